//! Response sink written by the dispatcher and its collaborators.
//!
//! # Responsibilities
//! - Collect status, headers, body and content type for one request
//! - Offer a single terminal content write per dispatch
//! - Convert into an axum response for the wire
//!
//! # Design Decisions
//! - Header writes are plain assignment (last write wins)
//! - Invalid header names or values are rejected with a `HeaderError`;
//!   the caller decides whether to skip or fail
//! - Content type is kept apart from headers and applied on conversion

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

pub const CONTENT_TYPE_TEXT_PLAIN: &str = "text/plain; charset=utf-8";
pub const CONTENT_TYPE_TEXT_HTML: &str = "text/html; charset=utf-8";
pub const CONTENT_TYPE_APPLICATION_JSON: &str = "application/json";
pub const CONTENT_TYPE_OCTET_STREAM: &str = "application/octet-stream";

/// A header the response refused to store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    #[error("invalid header name '{0}'")]
    InvalidName(String),

    #[error("invalid value for header '{0}'")]
    InvalidValue(String),
}

/// Mutable response built up during a single dispatch.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    content_type: Option<String>,
}

impl Default for HttpResponse {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            content_type: None,
        }
    }
}

impl HttpResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// Set a header, replacing any previous value with the same name.
    ///
    /// On error the response is left untouched.
    pub fn set_header(&mut self, name: &str, value: &str) -> Result<(), HeaderError> {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| HeaderError::InvalidName(name.to_string()))?;
        let header_value =
            HeaderValue::from_str(value).map_err(|_| HeaderError::InvalidValue(name.to_string()))?;
        self.headers.insert(header_name, header_value);
        Ok(())
    }

    /// Write a plain-text body with the given status.
    pub fn set_content(&mut self, status: StatusCode, body: impl Into<Bytes>) {
        self.set_content_with_type(status, body, CONTENT_TYPE_TEXT_PLAIN);
    }

    /// Write a body with the given status and content type.
    pub fn set_content_with_type(
        &mut self,
        status: StatusCode,
        body: impl Into<Bytes>,
        content_type: &str,
    ) {
        self.status = status;
        self.body = body.into();
        self.content_type = Some(content_type.to_string());
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Body as UTF-8 text, lossy.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }
}

impl IntoResponse for HttpResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        if let Some(content_type) = self.content_type {
            if let Ok(value) = HeaderValue::from_str(&content_type) {
                response.headers_mut().insert(header::CONTENT_TYPE, value);
            }
        }
        response
    }
}
