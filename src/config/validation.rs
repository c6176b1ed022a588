//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check context paths are single segments and unique
//! - Check configured response headers are valid HTTP headers
//! - Validate value ranges (timeouts > 0, bind address parses)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use axum::http::{HeaderName, HeaderValue};
use thiserror::Error;

use crate::config::schema::{AppConfig, ServerConfig};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid bind address '{0}'")]
    InvalidBindAddress(String),

    #[error("request timeout must be greater than zero")]
    ZeroRequestTimeout,

    #[error("app '{app}': context path '{context_path}' must be a single segment starting with '/'")]
    InvalidContextPath { app: String, context_path: String },

    #[error("context path '{0}' is declared more than once")]
    DuplicateContextPath(String),

    #[error("app '{0}': root directory is empty")]
    EmptyRoot(String),

    #[error("app '{app}': invalid response header name '{name}'")]
    InvalidHeaderName { app: String, name: String },

    #[error("app '{app}': invalid value for response header '{name}'")]
    InvalidHeaderValue { app: String, name: String },
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    let mut seen = HashSet::new();
    for app in &config.apps {
        validate_app(app, &mut errors);
        if !seen.insert(app.context_path.as_str()) {
            errors.push(ValidationError::DuplicateContextPath(app.context_path.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_app(app: &AppConfig, errors: &mut Vec<ValidationError>) {
    if !is_single_segment(&app.context_path) {
        errors.push(ValidationError::InvalidContextPath {
            app: app.name.clone(),
            context_path: app.context_path.clone(),
        });
    }
    if app.root.trim().is_empty() {
        errors.push(ValidationError::EmptyRoot(app.name.clone()));
    }

    let headers = app
        .response_headers
        .pages
        .iter()
        .chain(app.response_headers.static_resources.iter());
    for (name, value) in headers {
        if HeaderName::from_bytes(name.as_bytes()).is_err() {
            errors.push(ValidationError::InvalidHeaderName {
                app: app.name.clone(),
                name: name.clone(),
            });
        } else if HeaderValue::from_str(value).is_err() {
            errors.push(ValidationError::InvalidHeaderValue {
                app: app.name.clone(),
                name: name.clone(),
            });
        }
    }
}

fn is_single_segment(context_path: &str) -> bool {
    match context_path.strip_prefix('/') {
        Some(rest) => {
            !rest.is_empty()
                && !rest.contains('/')
                && rest != ".."
                && rest != "."
        }
        None => false,
    }
}
