//! Request dispatcher.
//!
//! # Responsibilities
//! - Reject malformed requests before any application lookup
//! - Serve the default favicon without an application
//! - Resolve the application for the context path
//! - Route to the static resolver, debug console or render sub-pipeline
//! - Translate every render failure into exactly one response
//!
//! # Design Decisions
//! - Stateless per call: only read-only collaborators are held
//! - Security headers are applied before filters and rendering
//! - Filters run for full pages only
//! - Static and debug branches handle their own failures

use std::sync::Arc;

use axum::http::{header, StatusCode};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::app::{AppRegistry, Application};
use crate::debug::{DebugHandler, DebugLog, RequestObserver, RequestScope};
use crate::error::RenderError;
use crate::filter::{FilterChain, FilterResult};
use crate::http::response::{CONTENT_TYPE_APPLICATION_JSON, CONTENT_TYPE_TEXT_HTML};
use crate::http::{HttpRequest, HttpResponse};
use crate::io::StaticResolver;
use crate::security::apply_security_headers;

/// Bytes escaped in a redirect target. Reserved URL characters and `%` are
/// kept so already-encoded targets pass through unchanged.
const LOCATION_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Routes each request to the right handling strategy.
pub struct Dispatcher {
    static_resolver: Arc<dyn StaticResolver>,
    debugger: Option<Arc<dyn DebugHandler>>,
    filters: FilterChain,
    observer: Arc<dyn RequestObserver>,
}

impl Dispatcher {
    /// Create a dispatcher with the canonical filter chain.
    ///
    /// Passing a debug handler turns debugging on for every request this
    /// dispatcher serves.
    pub fn new(
        static_resolver: Arc<dyn StaticResolver>,
        debugger: Option<Arc<dyn DebugHandler>>,
    ) -> Self {
        Self {
            static_resolver,
            debugger,
            filters: FilterChain::canonical(),
            observer: Arc::new(DebugLog::default()),
        }
    }

    /// Replace the filter chain.
    pub fn with_filters(mut self, filters: FilterChain) -> Self {
        self.filters = filters;
        self
    }

    /// Replace the observer notified around rendering.
    pub fn with_observer(mut self, observer: Arc<dyn RequestObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn is_debugging_enabled(&self) -> bool {
        self.debugger.is_some()
    }

    /// Serve one request. Every outcome is written to `response`.
    pub fn serve(
        &self,
        request: &HttpRequest,
        response: &mut HttpResponse,
        registry: &dyn AppRegistry,
    ) {
        if !request.is_valid() {
            serve_error(
                StatusCode::BAD_REQUEST,
                format!("Invalid URI '{}'.", request.uri()),
                response,
            );
            return;
        }
        if request.is_default_favicon_request() {
            self.static_resolver.serve_default_favicon(request, response);
            return;
        }

        let app = match registry.resolve(request.context_path()) {
            Ok(Some(app)) => app,
            Ok(None) => {
                serve_error(
                    StatusCode::NOT_FOUND,
                    format!(
                        "Cannot find an app for context path '{}'.",
                        request.context_path()
                    ),
                    response,
                );
                return;
            }
            Err(e) => {
                let msg = format!(
                    "Cannot deploy an app for context path '{}'.",
                    request.context_path()
                );
                tracing::error!(
                    request_id = %request.request_id(),
                    context_path = %request.context_path(),
                    error = %e,
                    "{}", msg
                );
                serve_error(StatusCode::INTERNAL_SERVER_ERROR, msg, response);
                return;
            }
        };

        self.serve_app(&app, request, response);
    }

    fn serve_app(&self, app: &Application, request: &HttpRequest, response: &mut HttpResponse) {
        if request.is_static_resource_request() {
            self.static_resolver.serve(app, request, response);
            return;
        }
        if let Some(debugger) = self.debugger.as_ref().filter(|_| request.is_debug_request()) {
            debugger.serve(app, request, response);
            return;
        }

        if let Err(e) = self.serve_page_or_fragment(app, request, response) {
            self.translate_failure(e, request, response);
        }
    }

    fn serve_page_or_fragment(
        &self,
        app: &Application,
        request: &HttpRequest,
        response: &mut HttpResponse,
    ) -> Result<(), RenderError> {
        let _scope = RequestScope::enter(self.observer.as_ref(), request);

        apply_security_headers(app.configuration(), response);

        if request.is_fragment_request() {
            let fragment = app.render_fragment(request, response)?;
            response.set_content_with_type(
                StatusCode::OK,
                fragment.to_string(),
                CONTENT_TYPE_APPLICATION_JSON,
            );
            return Ok(());
        }

        if let FilterResult::Reject { status, message } =
            self.filters.run(request, app.configuration())?
        {
            serve_error(status, message, response);
            return Ok(());
        }

        let html = app.render_page(request, response)?;
        response.set_content_with_type(StatusCode::OK, html, CONTENT_TYPE_TEXT_HTML);
        Ok(())
    }

    fn translate_failure(&self, error: RenderError, request: &HttpRequest, response: &mut HttpResponse) {
        match error {
            RenderError::Redirect(url) => {
                let location = utf8_percent_encode(&url, LOCATION_ENCODE_SET).to_string();
                match response.set_header(header::LOCATION.as_str(), &location) {
                    Ok(()) => response.set_status(StatusCode::FOUND),
                    Err(e) => {
                        let msg = format!(
                            "A server error occurred while serving for request '{}'.",
                            request
                        );
                        tracing::error!(
                            request_id = %request.request_id(),
                            location = %url,
                            error = %e,
                            "{}", msg
                        );
                        serve_error(StatusCode::INTERNAL_SERVER_ERROR, msg, response);
                    }
                }
            }
            RenderError::Http { status, message } => {
                serve_error(status, message, response);
            }
            RenderError::Framework(e) => {
                let msg = format!(
                    "A server error occurred while serving for request '{}'.",
                    request
                );
                tracing::error!(
                    request_id = %request.request_id(),
                    kind = %e.kind(),
                    error = %e,
                    "{}", msg
                );
                serve_error(StatusCode::INTERNAL_SERVER_ERROR, msg, response);
            }
            RenderError::Unexpected(e) => {
                let msg = format!(
                    "An unexpected error occurred while serving for request '{}'.",
                    request
                );
                tracing::error!(
                    request_id = %request.request_id(),
                    error = %e,
                    "{}", msg
                );
                serve_error(StatusCode::INTERNAL_SERVER_ERROR, msg, response);
            }
        }
    }
}

fn serve_error(status: StatusCode, content: String, response: &mut HttpResponse) {
    response.set_content(status, content);
}
