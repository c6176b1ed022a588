//! Applications and their resolution by context path.
//!
//! # Data Flow
//! ```text
//! HttpRequest.context_path
//!     → AppRegistry::resolve (registry.rs)
//!     → Arc<Application> (configuration + render engine)
//!     → Dispatcher renders through Application::render_page / render_fragment
//! ```
//!
//! # Design Decisions
//! - The dispatcher never owns or caches applications; the registry does
//! - Absent (`Ok(None)`) and failed deployment (`Err`) are distinct outcomes

pub mod registry;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::RenderError;
use crate::http::{HttpRequest, HttpResponse};
use crate::render::RenderEngine;

pub use registry::{AppRegistry, ConfigAppRegistry};

/// A deployed application.
pub struct Application {
    name: String,
    context_path: String,
    root: PathBuf,
    configuration: AppConfig,
    renderer: Arc<dyn RenderEngine>,
}

impl Application {
    pub fn new(configuration: AppConfig, renderer: Arc<dyn RenderEngine>) -> Self {
        Self {
            name: configuration.name.clone(),
            context_path: configuration.context_path.clone(),
            root: PathBuf::from(&configuration.root),
            configuration,
            renderer,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn context_path(&self) -> &str {
        &self.context_path
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn configuration(&self) -> &AppConfig {
        &self.configuration
    }

    /// Render the full page addressed by the request.
    pub fn render_page(
        &self,
        request: &HttpRequest,
        response: &mut HttpResponse,
    ) -> Result<String, RenderError> {
        self.renderer.render_page(self, request, response)
    }

    /// Render the fragment addressed by the request.
    pub fn render_fragment(
        &self,
        request: &HttpRequest,
        response: &mut HttpResponse,
    ) -> Result<serde_json::Value, RenderError> {
        self.renderer.render_fragment(self, request, response)
    }
}

impl fmt::Debug for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Application")
            .field("name", &self.name)
            .field("context_path", &self.context_path)
            .field("root", &self.root)
            .finish()
    }
}
