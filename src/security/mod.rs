//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Page or fragment request (after app resolution):
//!     → headers.rs (hardening + configured page headers)
//!     → filter chain (page requests only, see crate::filter)
//!     → render
//! ```
//!
//! # Design Decisions
//! - Headers first: every page response is hardened, whatever happens next
//! - Fail closed: a rejecting filter stops the request before rendering

pub mod headers;

pub use headers::{apply_security_headers, DEFAULT_SECURITY_HEADERS};
