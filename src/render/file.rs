//! Render engine backed by pre-rendered HTML files.
//!
//! Pages live at `<root>/pages/<path>.html` (`/` maps to `index`), fragments
//! at `<root>/fragments/<name>.html`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use axum::http::StatusCode;
use serde_json::json;

use crate::app::Application;
use crate::error::{FrameworkError, RenderError};
use crate::http::request::FRAGMENTS_PREFIX;
use crate::http::{HttpRequest, HttpResponse};
use crate::render::RenderEngine;

/// Serves page and fragment markup straight from the application root.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileRenderer;

impl FileRenderer {
    fn page_file(root: &Path, uri: &str) -> PathBuf {
        let relative = uri.trim_matches('/');
        let relative = if relative.is_empty() { "index" } else { relative };
        root.join("pages").join(format!("{}.html", relative))
    }

    fn read(path: &Path, what: &str, name: &str) -> Result<String, RenderError> {
        std::fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => RenderError::http(
                StatusCode::NOT_FOUND,
                format!("Requested {} '{}' does not exist.", what, name),
            ),
            _ => FrameworkError::file_operation(format!(
                "cannot read {} file '{}': {}",
                what,
                path.display(),
                e
            ))
            .into(),
        })
    }
}

impl RenderEngine for FileRenderer {
    fn render_page(
        &self,
        app: &Application,
        request: &HttpRequest,
        _response: &mut HttpResponse,
    ) -> Result<String, RenderError> {
        let uri = request.uri_without_context_path();
        let path = Self::page_file(app.root(), uri);
        Self::read(&path, "page", uri)
    }

    fn render_fragment(
        &self,
        app: &Application,
        request: &HttpRequest,
        _response: &mut HttpResponse,
    ) -> Result<serde_json::Value, RenderError> {
        let name = request
            .uri_without_context_path()
            .strip_prefix(FRAGMENTS_PREFIX)
            .unwrap_or_default()
            .trim_matches('/');
        if name.is_empty() {
            return Err(RenderError::http(
                StatusCode::BAD_REQUEST,
                "Fragment name is missing.",
            ));
        }

        let path = app.root().join("fragments").join(format!("{}.html", name));
        let html = Self::read(&path, "fragment", name)?;
        Ok(json!({ "name": name, "html": html }))
    }
}
