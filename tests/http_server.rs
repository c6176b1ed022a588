//! End-to-end tests through the axum router with file-backed collaborators.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use page_gateway::config::{AppConfig, ServerConfig};
use page_gateway::HttpServer;
use tempfile::TempDir;
use tower::ServiceExt;

mod common;

fn build_server(debug: bool) -> (HttpServer, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    common::write_app_root(dir.path());

    let mut config = ServerConfig::default();
    config.debug.enabled = debug;
    config.apps.push(AppConfig {
        name: "shop".into(),
        context_path: "/shop".into(),
        root: dir.path().to_str().unwrap().into(),
        ..Default::default()
    });
    (HttpServer::new(config), dir)
}

async fn send(server: &HttpServer, request: Request<Body>) -> Response {
    server.router().oneshot(request).await.unwrap()
}

async fn get(server: &HttpServer, uri: &str) -> Response {
    send(server, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_page_is_rendered_with_security_headers() {
    let (server, _dir) = build_server(false);

    let response = get(&server, "/shop/about").await;

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers[header::CONTENT_TYPE], "text/html; charset=utf-8");
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(
        headers[header::CACHE_CONTROL],
        "no-store, no-cache, must-revalidate, private"
    );
    assert_eq!(body_text(response).await, "<h1>about</h1>");
}

#[tokio::test]
async fn test_context_root_renders_index() {
    let (server, _dir) = build_server(false);

    let response = get(&server, "/shop").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "<h1>index</h1>");
}

#[tokio::test]
async fn test_missing_page_is_404() {
    let (server, _dir) = build_server(false);

    let response = get(&server, "/shop/nowhere").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_text(response).await,
        "Requested page '/nowhere' does not exist."
    );
}

#[tokio::test]
async fn test_fragment_is_json() {
    let (server, _dir) = build_server(false);

    let response = get(&server, "/shop/fragments/cart").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["name"], "cart");
    assert_eq!(body["html"], "<ul class=\"cart\"></ul>");
}

#[tokio::test]
async fn test_static_resource_uses_mime_table() {
    let (server, _dir) = build_server(false);

    let response = get(&server, "/shop/public/css/site.css").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");
    assert!(response.headers().get("x-content-type-options").is_none());
    assert_eq!(body_text(response).await, "body { margin: 0; }");
}

#[tokio::test]
async fn test_default_favicon_needs_no_app() {
    let (server, _dir) = build_server(false);

    let response = get(&server, "/favicon.ico").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/x-icon");
}

#[tokio::test]
async fn test_unknown_app_is_404() {
    let (server, _dir) = build_server(false);

    let response = get(&server, "/blog/post").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_text(response).await,
        "Cannot find an app for context path '/blog'."
    );
}

#[tokio::test]
async fn test_undeployable_app_is_500() {
    let mut config = ServerConfig::default();
    config.apps.push(AppConfig {
        name: "ghost".into(),
        context_path: "/ghost".into(),
        root: "/definitely/not/here".into(),
        ..Default::default()
    });
    let server = HttpServer::new(config);

    let response = get(&server, "/ghost/home").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_text(response).await,
        "Cannot deploy an app for context path '/ghost'."
    );
}

#[tokio::test]
async fn test_traversal_is_400() {
    let (server, _dir) = build_server(false);

    let response = get(&server, "/shop/public/../pages/index.html").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let (server, _dir) = build_server(false);
    let request = Request::get("/shop")
        .header("x-request-id", "req-42")
        .body(Body::empty())
        .unwrap();

    let response = send(&server, request).await;

    assert_eq!(response.headers()["x-request-id"], "req-42");
}

#[tokio::test]
async fn test_request_id_is_generated() {
    let (server, _dir) = build_server(false);

    let response = get(&server, "/shop").await;

    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_cross_origin_post_is_forbidden() {
    let (server, _dir) = build_server(false);
    let request = Request::builder()
        .method(Method::POST)
        .uri("/shop/about")
        .header(header::HOST, "shop.example")
        .header(header::ORIGIN, "https://evil.example")
        .body(Body::empty())
        .unwrap();

    let response = send(&server, request).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
}

#[tokio::test]
async fn test_debug_console_only_when_enabled() {
    let (server, _dir) = build_server(true);
    get(&server, "/shop/about").await;

    let response = get(&server, "/shop/debug/requests").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    let requests = body["requests"].as_array().unwrap();
    assert!(requests.iter().any(|r| r["uri"] == "/shop/about"));

    let (server, _dir) = build_server(false);
    let response = get(&server, "/shop/debug").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_text(response).await,
        "Requested page '/debug' does not exist."
    );
}

#[tokio::test]
async fn test_run_stops_on_shutdown() {
    let (server, _dir) = build_server(false);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let shutdown = page_gateway::Shutdown::new();
    let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));

    assert_eq!(
        shutdown.trigger(page_gateway::lifecycle::ShutdownReason::Requested),
        1
    );
    let result = tokio::time::timeout(std::time::Duration::from_secs(5), handle)
        .await
        .unwrap()
        .unwrap();
    assert!(result.is_ok());
}
