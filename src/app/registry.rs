//! Application registry.
//!
//! # Responsibilities
//! - Map a context path to a deployed application
//! - Deploy declared applications lazily, on first request
//! - Report deployment failures separately from "nothing deployed here"

use std::sync::Arc;

use dashmap::DashMap;

use crate::app::Application;
use crate::config::AppConfig;
use crate::error::DeploymentError;
use crate::render::RenderEngine;

/// Resolves the application serving a context path.
pub trait AppRegistry: Send + Sync {
    /// `Ok(None)` when nothing is declared for the context path.
    fn resolve(&self, context_path: &str) -> Result<Option<Arc<Application>>, DeploymentError>;
}

/// Registry over the applications declared in configuration.
pub struct ConfigAppRegistry {
    declared: Vec<AppConfig>,
    renderer: Arc<dyn RenderEngine>,
    deployed: DashMap<String, Arc<Application>>,
}

impl ConfigAppRegistry {
    pub fn new(declared: Vec<AppConfig>, renderer: Arc<dyn RenderEngine>) -> Self {
        Self {
            declared,
            renderer,
            deployed: DashMap::new(),
        }
    }

    /// Number of applications deployed so far.
    pub fn deployed_count(&self) -> usize {
        self.deployed.len()
    }

    fn deploy(&self, config: &AppConfig) -> Result<Arc<Application>, DeploymentError> {
        let root = std::path::Path::new(&config.root);
        if !root.is_dir() {
            return Err(DeploymentError::new(
                &config.context_path,
                format!("root directory '{}' does not exist", config.root),
            ));
        }

        let app = Arc::new(Application::new(config.clone(), self.renderer.clone()));
        tracing::info!(
            app = %app.name(),
            context_path = %app.context_path(),
            root = %config.root,
            "Application deployed"
        );
        Ok(app)
    }
}

impl AppRegistry for ConfigAppRegistry {
    fn resolve(&self, context_path: &str) -> Result<Option<Arc<Application>>, DeploymentError> {
        if let Some(app) = self.deployed.get(context_path) {
            return Ok(Some(app.value().clone()));
        }

        let Some(config) = self.declared.iter().find(|a| a.context_path == context_path) else {
            return Ok(None);
        };

        let entry = match self.deployed.entry(context_path.to_string()) {
            dashmap::mapref::entry::Entry::Occupied(e) => e.get().clone(),
            dashmap::mapref::entry::Entry::Vacant(e) => {
                let app = self.deploy(config)?;
                e.insert(app.clone());
                app
            }
        };
        Ok(Some(entry))
    }
}
