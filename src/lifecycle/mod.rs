//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! signals.rs: SIGINT / SIGTERM → ShutdownReason
//!     → shutdown.rs: Shutdown::trigger(reason)
//!     → HttpServer::run stops accepting, drains in-flight dispatches
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::{Shutdown, ShutdownReason};
pub use signals::wait_for_signal;
