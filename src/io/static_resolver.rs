//! Static resource serving.
//!
//! # Responsibilities
//! - Serve `<context>/public/...` from `<root>/public/`
//! - Pick the content type through the injected MIME cache
//! - Apply the application's configured static resource headers
//! - Serve the default favicon without any application
//!
//! # Design Decisions
//! - Owns its error handling: every outcome is written to the response
//! - Request paths are validated before they get here; no `..` segments
//! - Unknown extensions are served as `application/octet-stream`

use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use axum::http::StatusCode;

use crate::app::Application;
use crate::http::request::STATIC_RESOURCES_PREFIX;
use crate::http::response::CONTENT_TYPE_OCTET_STREAM;
use crate::http::{HttpRequest, HttpResponse};
use crate::io::mime::MimeCache;

const DEFAULT_FAVICON: &[u8] = include_bytes!("../../resources/favicon.ico");
const CONTENT_TYPE_ICON: &str = "image/x-icon";

/// Serves static files and the default favicon.
pub trait StaticResolver: Send + Sync {
    fn serve(&self, app: &Application, request: &HttpRequest, response: &mut HttpResponse);

    fn serve_default_favicon(&self, request: &HttpRequest, response: &mut HttpResponse);
}

/// Serves static resources from each application's `public/` directory.
#[derive(Debug)]
pub struct FileStaticResolver {
    mime: Arc<MimeCache>,
}

impl FileStaticResolver {
    pub fn new(mime: Arc<MimeCache>) -> Self {
        Self { mime }
    }

    fn content_type(&self, path: &Path, request: &HttpRequest) -> String {
        let Some(extension) = path.extension().and_then(|e| e.to_str()) else {
            return CONTENT_TYPE_OCTET_STREAM.to_string();
        };
        match self.mime.get_mime_type(&extension.to_ascii_lowercase()) {
            Ok(Some(mime)) => mime.to_string(),
            Ok(None) => CONTENT_TYPE_OCTET_STREAM.to_string(),
            Err(e) => {
                tracing::error!(
                    request_id = %request.request_id(),
                    error = %e,
                    "Cannot resolve MIME type"
                );
                CONTENT_TYPE_OCTET_STREAM.to_string()
            }
        }
    }
}

impl StaticResolver for FileStaticResolver {
    fn serve(&self, app: &Application, request: &HttpRequest, response: &mut HttpResponse) {
        let relative = request
            .uri_without_context_path()
            .strip_prefix(STATIC_RESOURCES_PREFIX)
            .unwrap_or_default();
        let path = app.root().join("public").join(relative);

        if relative.is_empty() || !path.is_file() {
            response.set_content(
                StatusCode::NOT_FOUND,
                format!("Requested resource '{}' does not exist.", request.uri()),
            );
            return;
        }

        match std::fs::read(&path) {
            Ok(bytes) => {
                for (name, value) in &app.configuration().response_headers.static_resources {
                    if let Err(e) = response.set_header(name, value) {
                        tracing::warn!(app = %app.name(), error = %e, "Skipping static header");
                    }
                }
                let content_type = self.content_type(&path, request);
                response.set_content_with_type(StatusCode::OK, bytes, &content_type);
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                response.set_content(
                    StatusCode::NOT_FOUND,
                    format!("Requested resource '{}' does not exist.", request.uri()),
                );
            }
            Err(e) => {
                tracing::error!(
                    request_id = %request.request_id(),
                    path = %path.display(),
                    error = %e,
                    "Cannot read static resource"
                );
                response.set_content(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Cannot serve resource '{}'.", request.uri()),
                );
            }
        }
    }

    fn serve_default_favicon(&self, _request: &HttpRequest, response: &mut HttpResponse) {
        response.set_content_with_type(StatusCode::OK, DEFAULT_FAVICON, CONTENT_TYPE_ICON);
    }
}
