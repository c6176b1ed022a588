//! Failure types raised by filters, render engines and the app registry.
//!
//! The dispatcher translates every [`RenderError`] variant into exactly one
//! response; it never inspects a fault's source chain itself. Faults that do
//! not belong to the taxonomy enter it through [`RenderError::unexpected`],
//! which walks the source chain once and recovers a wrapped
//! [`FrameworkError`] when there is one.

use std::error::Error as StdError;
use std::fmt;

use axum::http::StatusCode;
use thiserror::Error;

use crate::io::mime::MimeError;

/// Boxed error used for faults outside the taxonomy.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Category of a recognised internal failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameworkErrorKind {
    Rendering,
    Configuration,
    FileOperation,
}

impl fmt::Display for FrameworkErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FrameworkErrorKind::Rendering => "rendering",
            FrameworkErrorKind::Configuration => "configuration",
            FrameworkErrorKind::FileOperation => "file operation",
        };
        f.write_str(name)
    }
}

/// A recognised internal failure.
///
/// Logged with full detail on the server, surfaced to clients only as a
/// generic 500.
#[derive(Debug, Clone, Error)]
#[error("{kind} error: {message}")]
pub struct FrameworkError {
    kind: FrameworkErrorKind,
    message: String,
}

impl FrameworkError {
    pub fn new(kind: FrameworkErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn rendering(message: impl Into<String>) -> Self {
        Self::new(FrameworkErrorKind::Rendering, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(FrameworkErrorKind::Configuration, message)
    }

    pub fn file_operation(message: impl Into<String>) -> Self {
        Self::new(FrameworkErrorKind::FileOperation, message)
    }

    pub fn kind(&self) -> FrameworkErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<MimeError> for FrameworkError {
    fn from(err: MimeError) -> Self {
        let kind = match err {
            MimeError::Configuration { .. } => FrameworkErrorKind::Configuration,
            MimeError::ResourceNotFound(_) | MimeError::Io { .. } => {
                FrameworkErrorKind::FileOperation
            }
        };
        Self::new(kind, err.to_string())
    }
}

/// A fault the taxonomy does not recognise.
///
/// Only constructible through [`RenderError::unexpected`].
#[derive(Debug)]
pub struct UnexpectedFault(BoxError);

impl UnexpectedFault {
    pub fn inner(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.0.as_ref()
    }
}

impl fmt::Display for UnexpectedFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl StdError for UnexpectedFault {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

/// Outcome of a failed filter or render call.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Intentional redirect to the given URL.
    #[error("redirect to '{0}'")]
    Redirect(String),

    /// Explicit status and message, surfaced verbatim.
    #[error("HTTP {status}: {message}")]
    Http { status: StatusCode, message: String },

    /// Recognised internal failure.
    #[error(transparent)]
    Framework(#[from] FrameworkError),

    /// Anything else.
    #[error("unexpected fault: {0}")]
    Unexpected(UnexpectedFault),
}

impl RenderError {
    pub fn redirect(url: impl Into<String>) -> Self {
        RenderError::Redirect(url.into())
    }

    pub fn http(status: StatusCode, message: impl Into<String>) -> Self {
        RenderError::Http {
            status,
            message: message.into(),
        }
    }

    /// Classify an arbitrary fault.
    ///
    /// The fault and each of its sources are checked in order; the first
    /// [`FrameworkError`] found, bare or carried by a nested
    /// `RenderError::Framework`, becomes a `Framework` outcome. Otherwise the
    /// fault is kept as `Unexpected`.
    pub fn unexpected(fault: impl Into<BoxError>) -> Self {
        let fault = fault.into();
        let recovered = {
            let mut current: Option<&(dyn StdError + 'static)> = Some(fault.as_ref());
            let mut found = None;
            while let Some(err) = current {
                if let Some(framework) = err.downcast_ref::<FrameworkError>() {
                    found = Some(framework.clone());
                    break;
                }
                // A nested `RenderError` hides its payload from `source()`.
                if let Some(RenderError::Framework(framework)) = err.downcast_ref::<RenderError>() {
                    found = Some(framework.clone());
                    break;
                }
                current = err.source();
            }
            found
        };
        match recovered {
            Some(framework) => RenderError::Framework(framework),
            None => RenderError::Unexpected(UnexpectedFault(fault)),
        }
    }
}

impl From<MimeError> for RenderError {
    fn from(err: MimeError) -> Self {
        RenderError::Framework(err.into())
    }
}

/// The app registry could not deploy the application for a context path.
#[derive(Debug, Error)]
#[error("cannot deploy app for context path '{context_path}': {reason}")]
pub struct DeploymentError {
    pub context_path: String,
    pub reason: String,
}

impl DeploymentError {
    pub fn new(context_path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            context_path: context_path.into(),
            reason: reason.into(),
        }
    }
}
