//! Render engine contract.
//!
//! Turns an application plus a request into page markup or a JSON fragment.
//! Engines may fail with any [`RenderError`]; the dispatcher translates the
//! failure into the response.

mod file;

pub use file::FileRenderer;

use crate::app::Application;
use crate::error::RenderError;
use crate::http::{HttpRequest, HttpResponse};

/// Produces page and fragment content for an application.
pub trait RenderEngine: Send + Sync {
    fn render_page(
        &self,
        app: &Application,
        request: &HttpRequest,
        response: &mut HttpResponse,
    ) -> Result<String, RenderError>;

    fn render_fragment(
        &self,
        app: &Application,
        request: &HttpRequest,
        response: &mut HttpResponse,
    ) -> Result<serde_json::Value, RenderError>;
}
