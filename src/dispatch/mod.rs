//! Request dispatch pipeline.
//!
//! # Data Flow
//! ```text
//! HttpRequest
//!     → validity check ─────────────── invalid → 400
//!     → default favicon? ───────────── StaticResolver::serve_default_favicon
//!     → AppRegistry::resolve ───────── Err → 500, None → 404
//!     → static resource? ───────────── StaticResolver::serve
//!     → debug request (debug on)? ──── DebugHandler::serve
//!     → render sub-pipeline (inside RequestScope):
//!           security headers
//!           fragment → render_fragment → 200 JSON
//!           page     → FilterChain → render_page → 200 HTML
//!     → RenderError translation:
//!           Redirect → 302 + Location
//!           Http     → status + message
//!           Framework / Unexpected → logged, generic 500
//! ```
//!
//! # Design Decisions
//! - Every path writes exactly one terminal status/body
//! - The render engine reports failures as a tagged `RenderError`
//! - Safe to call concurrently; no state is shared between calls

pub mod dispatcher;

pub use dispatcher::Dispatcher;
