//! Shared collaborators and fixtures for the integration tests.

#![allow(dead_code)]

use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use page_gateway::app::{AppRegistry, Application};
use page_gateway::config::AppConfig;
use page_gateway::debug::{DebugHandler, RequestObserver};
use page_gateway::error::DeploymentError;
use page_gateway::filter::{Filter, FilterResult};
use page_gateway::io::StaticResolver;
use page_gateway::render::RenderEngine;
use page_gateway::{HttpRequest, HttpResponse, RenderError};

pub const CONTEXT_PATH: &str = "/shop";

pub fn request(method: Method, uri: &str) -> HttpRequest {
    HttpRequest::new(method, uri, HeaderMap::new())
}

pub fn request_with_headers(method: Method, uri: &str, headers: &[(&str, &str)]) -> HttpRequest {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        map.append(
            HeaderName::from_bytes(name.as_bytes()).unwrap(),
            HeaderValue::from_str(value).unwrap(),
        );
    }
    HttpRequest::new(method, uri, map)
}

pub fn app_config() -> AppConfig {
    AppConfig {
        name: "shop".into(),
        context_path: CONTEXT_PATH.into(),
        root: "apps/shop".into(),
        ..Default::default()
    }
}

pub fn application(renderer: Arc<StubRenderer>) -> Arc<Application> {
    Arc::new(Application::new(app_config(), renderer))
}

/// How [`RecordingRegistry`] answers.
pub enum Resolution {
    Deployed(Arc<Application>),
    Absent,
    Fails,
}

pub struct RecordingRegistry {
    resolution: Resolution,
    calls: AtomicUsize,
}

impl RecordingRegistry {
    pub fn new(resolution: Resolution) -> Self {
        Self {
            resolution,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn deployed(app: Arc<Application>) -> Self {
        Self::new(Resolution::Deployed(app))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AppRegistry for RecordingRegistry {
    fn resolve(&self, context_path: &str) -> Result<Option<Arc<Application>>, DeploymentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.resolution {
            Resolution::Deployed(app) => Ok(Some(app.clone())),
            Resolution::Absent => Ok(None),
            Resolution::Fails => Err(DeploymentError::new(context_path, "secret deployment detail")),
        }
    }
}

type PageOutcome = fn() -> Result<String, RenderError>;
type FragmentOutcome = fn() -> Result<serde_json::Value, RenderError>;

/// Render engine returning canned outcomes and counting calls.
pub struct StubRenderer {
    page: PageOutcome,
    fragment: FragmentOutcome,
    page_calls: AtomicUsize,
    fragment_calls: AtomicUsize,
}

impl StubRenderer {
    pub fn new() -> Self {
        Self::with_outcomes(
            || Ok("<h1>home</h1>".to_string()),
            || Ok(serde_json::json!({ "name": "cart", "html": "<ul></ul>" })),
        )
    }

    pub fn with_page(page: PageOutcome) -> Self {
        Self {
            page,
            ..Self::new()
        }
    }

    pub fn with_fragment(fragment: FragmentOutcome) -> Self {
        Self {
            fragment,
            ..Self::new()
        }
    }

    pub fn with_outcomes(page: PageOutcome, fragment: FragmentOutcome) -> Self {
        Self {
            page,
            fragment,
            page_calls: AtomicUsize::new(0),
            fragment_calls: AtomicUsize::new(0),
        }
    }

    pub fn page_calls(&self) -> usize {
        self.page_calls.load(Ordering::SeqCst)
    }

    pub fn fragment_calls(&self) -> usize {
        self.fragment_calls.load(Ordering::SeqCst)
    }
}

impl RenderEngine for StubRenderer {
    fn render_page(
        &self,
        _app: &Application,
        _request: &HttpRequest,
        _response: &mut HttpResponse,
    ) -> Result<String, RenderError> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        (self.page)()
    }

    fn render_fragment(
        &self,
        _app: &Application,
        _request: &HttpRequest,
        _response: &mut HttpResponse,
    ) -> Result<serde_json::Value, RenderError> {
        self.fragment_calls.fetch_add(1, Ordering::SeqCst);
        (self.fragment)()
    }
}

#[derive(Default)]
pub struct RecordingStaticResolver {
    served: AtomicUsize,
    favicons: AtomicUsize,
}

impl RecordingStaticResolver {
    pub fn served(&self) -> usize {
        self.served.load(Ordering::SeqCst)
    }

    pub fn favicons(&self) -> usize {
        self.favicons.load(Ordering::SeqCst)
    }
}

impl StaticResolver for RecordingStaticResolver {
    fn serve(&self, _app: &Application, request: &HttpRequest, response: &mut HttpResponse) {
        self.served.fetch_add(1, Ordering::SeqCst);
        response.set_content(StatusCode::OK, format!("static {}", request.uri()));
    }

    fn serve_default_favicon(&self, _request: &HttpRequest, response: &mut HttpResponse) {
        self.favicons.fetch_add(1, Ordering::SeqCst);
        response.set_content(StatusCode::OK, "favicon");
    }
}

#[derive(Default)]
pub struct RecordingDebugger {
    served: AtomicUsize,
}

impl RecordingDebugger {
    pub fn served(&self) -> usize {
        self.served.load(Ordering::SeqCst)
    }
}

impl DebugHandler for RecordingDebugger {
    fn serve(&self, _app: &Application, _request: &HttpRequest, response: &mut HttpResponse) {
        self.served.fetch_add(1, Ordering::SeqCst);
        response.set_content(StatusCode::OK, "debug");
    }
}

#[derive(Default)]
pub struct CountingObserver {
    started: AtomicUsize,
    ended: AtomicUsize,
}

impl CountingObserver {
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn ended(&self) -> usize {
        self.ended.load(Ordering::SeqCst)
    }
}

impl RequestObserver for CountingObserver {
    fn request_started(&self, _request: &HttpRequest) {
        self.started.fetch_add(1, Ordering::SeqCst);
    }

    fn request_ended(&self, _request: &HttpRequest) {
        self.ended.fetch_add(1, Ordering::SeqCst);
    }
}

/// Filter returning a fixed result and counting its invocations.
pub struct FixedFilter {
    name: &'static str,
    result: FilterResult,
    calls: Arc<AtomicUsize>,
}

impl FixedFilter {
    pub fn new(name: &'static str, result: FilterResult) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                name,
                result,
                calls: calls.clone(),
            },
            calls,
        )
    }
}

impl Filter for FixedFilter {
    fn name(&self) -> &'static str {
        self.name
    }

    fn do_filter(
        &self,
        _request: &HttpRequest,
        _configuration: &AppConfig,
    ) -> Result<FilterResult, RenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.result.clone())
    }
}

/// Log sink for `tracing_subscriber::fmt` that keeps everything in memory.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Run `f` with a subscriber writing into this sink.
    pub fn capture<T>(&self, f: impl FnOnce() -> T) -> T {
        let sink = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || sink.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f)
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Lay out an application root with a page, a fragment and a stylesheet.
pub fn write_app_root(root: &Path) {
    std::fs::create_dir_all(root.join("pages")).unwrap();
    std::fs::create_dir_all(root.join("fragments")).unwrap();
    std::fs::create_dir_all(root.join("public/css")).unwrap();
    std::fs::write(root.join("pages/index.html"), "<h1>index</h1>").unwrap();
    std::fs::write(root.join("pages/about.html"), "<h1>about</h1>").unwrap();
    std::fs::write(root.join("fragments/cart.html"), "<ul class=\"cart\"></ul>").unwrap();
    std::fs::write(root.join("public/css/site.css"), "body { margin: 0; }").unwrap();
}
