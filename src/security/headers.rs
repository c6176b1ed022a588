//! Security response headers.
//!
//! # Responsibilities
//! - Add hardening headers to every page and fragment response
//! - Overlay the application's configured page headers
//!
//! # Design Decisions
//! - Applied before filters and rendering, so rejected or failed requests
//!   still carry the headers
//! - Configured headers are applied after the defaults in declaration order;
//!   plain assignment, so they may override a default
//! - Static and debug responses do not go through this policy

use crate::config::AppConfig;
use crate::http::HttpResponse;

pub const HEADER_X_CONTENT_TYPE_OPTIONS: &str = "X-Content-Type-Options";
pub const HEADER_X_XSS_PROTECTION: &str = "X-XSS-Protection";
pub const HEADER_CACHE_CONTROL: &str = "Cache-Control";
pub const HEADER_EXPIRES: &str = "Expires";
pub const HEADER_PRAGMA: &str = "Pragma";

/// Headers every page and fragment response carries, in application order.
pub const DEFAULT_SECURITY_HEADERS: [(&str, &str); 5] = [
    (HEADER_X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (HEADER_X_XSS_PROTECTION, "1; mode=block"),
    (HEADER_CACHE_CONTROL, "no-store, no-cache, must-revalidate, private"),
    (HEADER_EXPIRES, "0"),
    (HEADER_PRAGMA, "no-cache"),
];

/// Set the default security headers, then the application's page headers.
pub fn apply_security_headers(configuration: &AppConfig, response: &mut HttpResponse) {
    for (name, value) in DEFAULT_SECURITY_HEADERS {
        if let Err(e) = response.set_header(name, value) {
            tracing::error!(error = %e, "Cannot apply security header");
        }
    }

    for (name, value) in &configuration.response_headers.pages {
        if let Err(e) = response.set_header(name, value) {
            tracing::warn!(app = %configuration.name, error = %e, "Skipping page header");
        }
    }
}
