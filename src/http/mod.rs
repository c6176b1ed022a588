//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, limits, tracing)
//!     → request.rs (HttpRequest: validate, split context path, classify)
//!     → crate::dispatch (Dispatcher::serve)
//!     → response.rs (HttpResponse → axum Response)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{HttpRequest, RequestKind, X_REQUEST_ID};
pub use response::{HeaderError, HttpResponse};
pub use server::HttpServer;
