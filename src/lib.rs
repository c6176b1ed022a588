//! Page gateway library: dispatches HTTP requests to deployed web
//! applications.

pub mod app;
pub mod config;
pub mod debug;
pub mod dispatch;
pub mod error;
pub mod filter;
pub mod http;
pub mod io;
pub mod lifecycle;
pub mod observability;
pub mod render;
pub mod security;

pub use config::schema::ServerConfig;
pub use dispatch::Dispatcher;
pub use error::{FrameworkError, RenderError};
pub use http::{HttpRequest, HttpResponse, HttpServer};
pub use lifecycle::Shutdown;
