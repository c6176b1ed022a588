//! Cross-site request forgery guard.
//!
//! Unsafe-method page requests must come from the request's own origin (or a
//! trusted one) and must echo the token cookie in a request header
//! (double-submit cookie).

use axum::http::{header, Method, StatusCode};

use crate::config::{AppConfig, CsrfConfig};
use crate::error::RenderError;
use crate::filter::{Filter, FilterResult};
use crate::http::HttpRequest;

pub const REASON_BAD_ORIGIN: &str = "Origin checking failed - does not match any trusted origins.";
pub const REASON_NO_CSRF_COOKIE: &str = "CSRF cookie not set.";
pub const REASON_CSRF_TOKEN_MISSING: &str = "CSRF token missing.";
pub const REASON_CSRF_TOKEN_MISMATCH: &str = "CSRF token mismatch.";

#[derive(Debug, Default, Clone, Copy)]
pub struct CsrfFilter;

impl Filter for CsrfFilter {
    fn name(&self) -> &'static str {
        "csrf"
    }

    fn do_filter(
        &self,
        request: &HttpRequest,
        configuration: &AppConfig,
    ) -> Result<FilterResult, RenderError> {
        let csrf = &configuration.csrf;
        if !csrf.enabled || is_safe_method(request.method()) {
            return Ok(FilterResult::Continue);
        }

        if let Some(origin) = request.header(header::ORIGIN.as_str()) {
            if !origin_allowed(origin, request.header(header::HOST.as_str()), csrf) {
                return Ok(FilterResult::reject(StatusCode::FORBIDDEN, REASON_BAD_ORIGIN));
            }
        }

        let Some(cookie_token) = cookie_value(request, &csrf.cookie_name) else {
            return Ok(FilterResult::reject(StatusCode::FORBIDDEN, REASON_NO_CSRF_COOKIE));
        };
        let Some(header_token) = request.header(&csrf.header_name) else {
            return Ok(FilterResult::reject(StatusCode::FORBIDDEN, REASON_CSRF_TOKEN_MISSING));
        };
        if !constant_time_eq(cookie_token.as_bytes(), header_token.as_bytes()) {
            return Ok(FilterResult::reject(StatusCode::FORBIDDEN, REASON_CSRF_TOKEN_MISMATCH));
        }

        Ok(FilterResult::Continue)
    }
}

fn is_safe_method(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS | Method::TRACE)
}

fn origin_allowed(origin: &str, host: Option<&str>, csrf: &CsrfConfig) -> bool {
    // "null" and other opaque origins have no authority.
    let Some((_, authority)) = origin.split_once("://") else {
        return false;
    };
    let authority = authority.trim_end_matches('/').to_ascii_lowercase();

    if host.is_some_and(|h| h.eq_ignore_ascii_case(&authority)) {
        return true;
    }
    csrf.trusted_origins
        .iter()
        .any(|trusted| trusted.eq_ignore_ascii_case(&authority))
}

fn cookie_value<'a>(request: &'a HttpRequest, name: &str) -> Option<&'a str> {
    request
        .headers()
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"'))
        .filter(|value| !value.is_empty())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
