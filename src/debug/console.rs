//! Debug console endpoints under `<context>/debug`.

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;

use crate::app::Application;
use crate::debug::DebugLog;
use crate::http::request::DEBUG_PREFIX;
use crate::http::response::CONTENT_TYPE_APPLICATION_JSON;
use crate::http::{HttpRequest, HttpResponse};

/// Serves debug requests. Only consulted while debugging is enabled.
pub trait DebugHandler: Send + Sync {
    fn serve(&self, app: &Application, request: &HttpRequest, response: &mut HttpResponse);
}

/// JSON views of the application and of recently rendered requests.
pub struct DebugConsole {
    log: Arc<DebugLog>,
}

impl DebugConsole {
    pub fn new(log: Arc<DebugLog>) -> Self {
        Self { log }
    }
}

impl DebugHandler for DebugConsole {
    fn serve(&self, app: &Application, request: &HttpRequest, response: &mut HttpResponse) {
        let endpoint = request
            .uri_without_context_path()
            .strip_prefix(DEBUG_PREFIX)
            .unwrap_or_default()
            .trim_matches('/');

        let body = match endpoint {
            "" => json!({
                "name": app.name(),
                "context_path": app.context_path(),
                "root": app.root().display().to_string(),
                "response_headers": app.configuration().response_headers.pages,
                "csrf_enabled": app.configuration().csrf.enabled,
            }),
            "requests" => {
                let context_path = app.context_path();
                let requests: Vec<_> = self
                    .log
                    .recent()
                    .into_iter()
                    .filter(|r| {
                        r.uri == context_path || r.uri.starts_with(&format!("{}/", context_path))
                    })
                    .collect();
                json!({ "requests": requests })
            }
            other => {
                response.set_content(
                    StatusCode::NOT_FOUND,
                    format!("Unknown debug endpoint '{}'.", other),
                );
                return;
            }
        };

        response.set_content_with_type(StatusCode::OK, body.to_string(), CONTENT_TYPE_APPLICATION_JSON);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::debug::RequestScope;
    use crate::render::FileRenderer;
    use axum::http::{HeaderMap, Method};

    fn app() -> Application {
        Application::new(
            AppConfig {
                name: "shop".into(),
                context_path: "/shop".into(),
                root: "apps/shop".into(),
                ..Default::default()
            },
            Arc::new(FileRenderer),
        )
    }

    fn get(uri: &str) -> HttpRequest {
        HttpRequest::new(Method::GET, uri, HeaderMap::new())
    }

    #[test]
    fn test_app_summary() {
        let console = DebugConsole::new(Arc::new(DebugLog::default()));
        let mut response = HttpResponse::new();
        console.serve(&app(), &get("/shop/debug"), &mut response);

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["name"], "shop");
        assert_eq!(body["context_path"], "/shop");
        assert_eq!(body["csrf_enabled"], true);
    }

    #[test]
    fn test_recent_requests_filtered_by_app() {
        let log = Arc::new(DebugLog::default());
        for uri in ["/shop/home", "/blog/post", "/shopping/list"] {
            let request = get(uri);
            let _scope = RequestScope::enter(log.as_ref(), &request);
        }

        let console = DebugConsole::new(log);
        let mut response = HttpResponse::new();
        console.serve(&app(), &get("/shop/debug/requests"), &mut response);

        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        let requests = body["requests"].as_array().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0]["uri"], "/shop/home");
    }

    #[test]
    fn test_unknown_endpoint() {
        let console = DebugConsole::new(Arc::new(DebugLog::default()));
        let mut response = HttpResponse::new();
        console.serve(&app(), &get("/shop/debug/nope"), &mut response);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
