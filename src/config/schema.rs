//! Gateway configuration file layout.
//!
//! Every section is optional; a missing section or field falls back to its
//! `Default`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    pub listener: ListenerConfig,

    pub timeouts: TimeoutConfig,

    /// Debug console settings.
    pub debug: DebugConfig,

    /// MIME mapping source.
    pub mime: MimeConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,

    /// Deployed applications, keyed by context path.
    pub apps: Vec<AppConfig>,
}

/// Where the gateway accepts connections.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// `host:port` to bind.
    pub bind_address: String,

    /// Maximum accepted request body in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_body_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upper bound on one dispatch, in seconds. Exceeding it yields 408.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Debug console configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Serve `<context>/debug` requests through the debug console.
    pub enabled: bool,

    /// Number of finished requests kept for the console.
    pub history_size: usize,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            history_size: 100,
        }
    }
}

/// MIME mapping configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct MimeConfig {
    /// Optional TOML file replacing the bundled mapping.
    pub map_path: Option<String>,
}

/// Log filtering and the optional Prometheus exporter.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Level for the gateway's own targets when `RUST_LOG` is unset.
    pub log_level: String,

    pub metrics_enabled: bool,

    /// Scrape listener of the exporter.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// A deployable application.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Application name for logging.
    pub name: String,

    /// Context path, a single segment such as "/shop".
    pub context_path: String,

    /// Application root directory (holds `pages/`, `fragments/`, `public/`).
    pub root: String,

    /// Extra response headers.
    pub response_headers: ResponseHeadersConfig,

    /// Cross-site request forgery guard.
    pub csrf: CsrfConfig,
}

/// Application-declared response headers, in declaration order.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ResponseHeadersConfig {
    /// Applied to page and fragment responses after the security defaults.
    pub pages: IndexMap<String, String>,

    /// Applied to static resource responses.
    pub static_resources: IndexMap<String, String>,
}

/// CSRF guard configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CsrfConfig {
    /// Check unsafe-method page requests.
    pub enabled: bool,

    /// Cookie holding the token.
    pub cookie_name: String,

    /// Header the client echoes the token in.
    pub header_name: String,

    /// Extra origins (host[:port]) accepted besides the request host.
    pub trusted_origins: Vec<String>,
}

impl Default for CsrfConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cookie_name: "csrftoken".to_string(),
            header_name: "X-CSRF-Token".to_string(),
            trusted_origins: Vec::new(),
        }
    }
}
