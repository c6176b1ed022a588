//! Request model seen by the dispatcher.
//!
//! # Responsibilities
//! - Capture method, URI, headers and request ID of an incoming request
//! - Split the URI into context path and application-relative path
//! - Validate the URI shape before any application lookup
//! - Classify the request (favicon, static, debug, fragment, page)
//!
//! # Design Decisions
//! - Immutable once built; the dispatcher only borrows it
//! - Validation and classification happen once, at construction
//! - An invalid request is still representable so it can be answered with 400

use std::fmt;

use axum::http::{request::Parts, HeaderMap, Method};
use percent_encoding::percent_decode_str;
use uuid::Uuid;

/// Header carrying the request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Conventional path of the browser's default favicon request.
pub const DEFAULT_FAVICON_PATH: &str = "/favicon.ico";

/// Application-relative prefix of static resources.
pub const STATIC_RESOURCES_PREFIX: &str = "/public/";

/// Application-relative prefix of fragment requests.
pub const FRAGMENTS_PREFIX: &str = "/fragments/";

/// Application-relative prefix of the debug console.
pub const DEBUG_PREFIX: &str = "/debug";

/// How a request should be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    DefaultFavicon,
    StaticResource,
    Debug,
    Fragment,
    Page,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::DefaultFavicon => "favicon",
            RequestKind::StaticResource => "static",
            RequestKind::Debug => "debug",
            RequestKind::Fragment => "fragment",
            RequestKind::Page => "page",
        }
    }
}

/// An HTTP request as understood by the dispatch pipeline.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    method: Method,
    uri: String,
    path: String,
    query: Option<String>,
    context_path: String,
    uri_without_context_path: String,
    headers: HeaderMap,
    request_id: String,
    valid: bool,
    kind: RequestKind,
}

impl HttpRequest {
    /// Build a request from a method, a raw `path?query` URI and headers.
    pub fn new(method: Method, uri: impl Into<String>, headers: HeaderMap) -> Self {
        let uri = uri.into();
        let (raw_path, query) = match uri.split_once('?') {
            Some((path, query)) => (path.to_string(), Some(query.to_string())),
            None => (uri.clone(), None),
        };

        let decoded = percent_decode_str(&raw_path)
            .decode_utf8()
            .ok()
            .map(|p| p.into_owned());
        let valid = match &decoded {
            Some(path) => is_valid_path(path),
            None => false,
        };
        let path = decoded.unwrap_or_else(|| raw_path.clone());

        let (context_path, uri_without_context_path) = split_context_path(&path);
        let kind = classify(&path, &uri_without_context_path);

        let request_id = headers
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        Self {
            method,
            uri,
            path,
            query,
            context_path,
            uri_without_context_path,
            headers,
            request_id,
            valid,
            kind,
        }
    }

    /// Build a request from the head of an axum request.
    pub fn from_parts(parts: &Parts) -> Self {
        let uri = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| parts.uri.path().to_string());
        Self::new(parts.method.clone(), uri, parts.headers.clone())
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The raw URI as received (path and query, not decoded).
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The percent-decoded path.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// First path segment, e.g. `/shop` for `/shop/cart`.
    pub fn context_path(&self) -> &str {
        &self.context_path
    }

    /// Path relative to the context path, always starting with `/`.
    pub fn uri_without_context_path(&self) -> &str {
        &self.uri_without_context_path
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Value of a header, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn is_default_favicon_request(&self) -> bool {
        self.kind == RequestKind::DefaultFavicon
    }

    pub fn is_static_resource_request(&self) -> bool {
        self.kind == RequestKind::StaticResource
    }

    pub fn is_debug_request(&self) -> bool {
        self.kind == RequestKind::Debug
    }

    pub fn is_fragment_request(&self) -> bool {
        self.kind == RequestKind::Fragment
    }
}

impl fmt::Display for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.uri)
    }
}

fn is_valid_path(path: &str) -> bool {
    if !path.starts_with('/') {
        return false;
    }
    if path.contains('\\') || path.chars().any(char::is_control) {
        return false;
    }
    !path.split('/').any(|segment| segment == "..")
}

fn split_context_path(path: &str) -> (String, String) {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    match trimmed.find('/') {
        Some(idx) => (
            format!("/{}", &trimmed[..idx]),
            trimmed[idx..].to_string(),
        ),
        None => (format!("/{}", trimmed), "/".to_string()),
    }
}

fn classify(path: &str, uri_without_context_path: &str) -> RequestKind {
    if path == DEFAULT_FAVICON_PATH {
        RequestKind::DefaultFavicon
    } else if uri_without_context_path.starts_with(STATIC_RESOURCES_PREFIX) {
        RequestKind::StaticResource
    } else if uri_without_context_path == DEBUG_PREFIX
        || uri_without_context_path.starts_with("/debug/")
    {
        RequestKind::Debug
    } else if uri_without_context_path.starts_with(FRAGMENTS_PREFIX) {
        RequestKind::Fragment
    } else {
        RequestKind::Page
    }
}
