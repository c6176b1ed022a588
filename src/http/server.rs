//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the catch-all dispatch handler
//! - Wire up middleware (tracing, limits, request ID, timeout)
//! - Build the default collaborators from configuration
//! - Run each dispatch on the blocking pool and convert the result
//! - Observability (metrics, correlation IDs)

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{HeaderName, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::app::{AppRegistry, ConfigAppRegistry};
use crate::config::ServerConfig;
use crate::debug::{DebugConsole, DebugHandler, DebugLog};
use crate::dispatch::Dispatcher;
use crate::http::request::X_REQUEST_ID;
use crate::http::{HttpRequest, HttpResponse};
use crate::io::{FileStaticResolver, MimeCache};
use crate::lifecycle::ShutdownReason;
use crate::observability::metrics;
use crate::render::FileRenderer;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub registry: Arc<dyn AppRegistry>,
}

/// HTTP front end of the dispatcher.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a server with the file-backed collaborators described by the
    /// configuration.
    pub fn new(config: ServerConfig) -> Self {
        let mime = Arc::new(match &config.mime.map_path {
            Some(path) => MimeCache::from_file(PathBuf::from(path)),
            None => MimeCache::bundled(),
        });
        let static_resolver = Arc::new(FileStaticResolver::new(mime));

        let log = Arc::new(DebugLog::new(config.debug.history_size));
        let debugger: Option<Arc<dyn DebugHandler>> = if config.debug.enabled {
            Some(Arc::new(DebugConsole::new(log.clone())))
        } else {
            None
        };

        let dispatcher = Dispatcher::new(static_resolver, debugger).with_observer(log);
        let registry = Arc::new(ConfigAppRegistry::new(
            config.apps.clone(),
            Arc::new(FileRenderer),
        ));

        Self::with_components(config, dispatcher, registry)
    }

    /// Create a server around an existing dispatcher and registry.
    pub fn with_components(
        config: ServerConfig,
        dispatcher: Dispatcher,
        registry: Arc<dyn AppRegistry>,
    ) -> Self {
        let state = AppState {
            dispatcher: Arc::new(dispatcher),
            registry,
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        let request_id = HeaderName::from_static(X_REQUEST_ID);
        // Answers 408; `new` is deprecated in later tower-http 0.6 releases.
        #[allow(deprecated)]
        let timeout = TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs));
        Router::new()
            .route("/{*path}", any(dispatch_handler))
            .route("/", any(dispatch_handler))
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.listener.max_body_bytes))
            .layer(timeout)
            .layer(PropagateRequestIdLayer::new(request_id.clone()))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
    }

    /// The router, for embedding or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until a shutdown signal is received.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<ShutdownReason>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            apps = self.config.apps.len(),
            debug = self.config.debug.enabled,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                match shutdown.recv().await {
                    Ok(reason) => tracing::info!(%reason, "Draining in-flight requests"),
                    Err(_) => tracing::info!("Shutdown channel closed, draining"),
                }
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// Main dispatch handler.
/// Adapts the request, runs the dispatcher off the async executor and
/// converts the collected response.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let (parts, _body) = request.into_parts();
    let http_request = HttpRequest::from_parts(&parts);

    let method = http_request.method().to_string();
    let kind = http_request.kind().as_str();
    let request_id = http_request.request_id().to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        uri = %http_request.uri(),
        kind,
        "Dispatching request"
    );

    let joined = tokio::task::spawn_blocking(move || {
        let mut response = HttpResponse::new();
        state
            .dispatcher
            .serve(&http_request, &mut response, state.registry.as_ref());
        response
    })
    .await;

    match joined {
        Ok(response) => {
            metrics::record_request(&method, response.status().as_u16(), kind, start_time);
            response.into_response()
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Dispatch task failed");
            metrics::record_request(&method, 500, kind, start_time);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}
