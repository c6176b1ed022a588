//! Debug console and per-request diagnostics.
//!
//! # Data Flow
//! ```text
//! Page/fragment dispatch:
//!     RequestScope::enter → RequestObserver::request_started
//!     ... render sub-pipeline ...
//!     RequestScope drop   → RequestObserver::request_ended (every exit path)
//!
//! <context>/debug requests (debugging enabled):
//!     → console.rs (DebugConsole) → JSON view of log.rs history
//! ```
//!
//! # Design Decisions
//! - The end notification lives in `Drop`, so it also fires on early
//!   returns and unwinding
//! - Debugging is a process-wide switch: the dispatcher either holds a debug
//!   handler or it does not

pub mod console;
pub mod log;

pub use console::{DebugConsole, DebugHandler};
pub use log::{DebugLog, RequestRecord};

use crate::http::HttpRequest;

/// Notified around the render sub-pipeline of each request.
pub trait RequestObserver: Send + Sync {
    fn request_started(&self, request: &HttpRequest);

    fn request_ended(&self, request: &HttpRequest);
}

/// Guard pairing `request_started` with `request_ended`.
pub struct RequestScope<'a> {
    observer: &'a dyn RequestObserver,
    request: &'a HttpRequest,
}

impl<'a> RequestScope<'a> {
    pub fn enter(observer: &'a dyn RequestObserver, request: &'a HttpRequest) -> Self {
        observer.request_started(request);
        Self { observer, request }
    }
}

impl Drop for RequestScope<'_> {
    fn drop(&mut self) {
        self.observer.request_ended(self.request);
    }
}
