//! Pre-render filters for page requests.
//!
//! # Data Flow
//! ```text
//! Page request + app configuration
//!     → FilterChain::run
//!         → filter 1 (csrf.rs) → Continue | Reject(status, message)
//!         → filter 2 ...         (only if the previous one continued)
//!     → Continue: render the page
//!     → Reject: dispatcher writes status + message
//! ```
//!
//! # Design Decisions
//! - Order is fixed at construction and is part of the contract
//! - Strictly sequential, first rejection wins
//! - Filters never write the response; only the dispatcher does
//! - Fragment, static and debug requests never reach the chain

pub mod csrf;

use std::fmt;

use axum::http::StatusCode;

use crate::config::AppConfig;
use crate::error::RenderError;
use crate::http::HttpRequest;

pub use csrf::CsrfFilter;

/// Outcome of a single filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterResult {
    Continue,
    Reject { status: StatusCode, message: String },
}

impl FilterResult {
    pub fn reject(status: StatusCode, message: impl Into<String>) -> Self {
        FilterResult::Reject {
            status,
            message: message.into(),
        }
    }

    pub fn is_continue(&self) -> bool {
        matches!(self, FilterResult::Continue)
    }
}

/// A check run before a page is rendered.
///
/// Implementations must be safe to call repeatedly for the same request.
pub trait Filter: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    fn do_filter(
        &self,
        request: &HttpRequest,
        configuration: &AppConfig,
    ) -> Result<FilterResult, RenderError>;
}

/// Ordered, immutable sequence of filters.
pub struct FilterChain {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterChain {
    pub fn new(filters: Vec<Box<dyn Filter>>) -> Self {
        Self { filters }
    }

    /// The standard chain: CSRF guard first.
    pub fn canonical() -> Self {
        Self::new(vec![Box::new(CsrfFilter)])
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Run every filter in order, stopping at the first rejection or error.
    pub fn run(
        &self,
        request: &HttpRequest,
        configuration: &AppConfig,
    ) -> Result<FilterResult, RenderError> {
        for filter in &self.filters {
            let result = filter.do_filter(request, configuration)?;
            if let FilterResult::Reject { status, message } = &result {
                tracing::debug!(
                    request_id = %request.request_id(),
                    filter = filter.name(),
                    status = %status,
                    reason = %message,
                    "Request rejected by filter"
                );
                return Ok(result);
            }
        }
        Ok(FilterResult::Continue)
    }
}

impl Default for FilterChain {
    fn default() -> Self {
        Self::canonical()
    }
}

impl fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.filters.iter().map(|filter| filter.name()))
            .finish()
    }
}
