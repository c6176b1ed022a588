//! Lazily built extension → MIME type table.
//!
//! # Responsibilities
//! - Load the extension mapping from a bundled or on-disk TOML resource
//! - Build the table at most once per cache, on first lookup
//! - Serve lookups as plain map reads afterwards
//!
//! # Design Decisions
//! - Owned and injected, not a process global
//! - `OnceCell::get_or_try_init` blocks concurrent first callers on the single
//!   in-flight build and publishes the finished table atomically
//! - A failed build leaves the cell empty; the next lookup retries

use std::collections::HashMap;
use std::fmt;
use std::io::ErrorKind;
use std::path::PathBuf;

use once_cell::sync::OnceCell;
use thiserror::Error;

/// Name of the bundled mapping resource.
pub const MIME_MAP_RESOURCE: &str = "mime-map.toml";

const BUNDLED_MIME_MAP: &str = include_str!("../../resources/mime-map.toml");

type MimeTable = HashMap<String, String>;

/// Errors raised while building the MIME table.
#[derive(Debug, Error)]
pub enum MimeError {
    #[error("cannot find MIME types file '{0}'")]
    ResourceNotFound(String),

    #[error("MIME types file '{name}' is invalid")]
    Configuration {
        name: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("cannot read MIME types file '{name}'")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Where the raw mapping text comes from.
pub trait MimeSource: Send + Sync {
    /// Name used in errors and logs.
    fn name(&self) -> &str;

    /// Read the raw TOML text.
    fn load(&self) -> Result<String, MimeError>;
}

/// The mapping compiled into the binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct BundledMimeSource;

impl MimeSource for BundledMimeSource {
    fn name(&self) -> &str {
        MIME_MAP_RESOURCE
    }

    fn load(&self) -> Result<String, MimeError> {
        Ok(BUNDLED_MIME_MAP.to_string())
    }
}

/// A mapping file on disk.
#[derive(Debug, Clone)]
pub struct FileMimeSource {
    path: PathBuf,
    name: String,
}

impl FileMimeSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self { path, name }
    }
}

impl MimeSource for FileMimeSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<String, MimeError> {
        std::fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => MimeError::ResourceNotFound(self.name.clone()),
            _ => MimeError::Io {
                name: self.name.clone(),
                source: e,
            },
        })
    }
}

/// Extension → MIME type lookup, built once on first use.
pub struct MimeCache {
    source: Box<dyn MimeSource>,
    table: OnceCell<MimeTable>,
}

impl MimeCache {
    pub fn new(source: impl MimeSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            table: OnceCell::new(),
        }
    }

    /// Cache over the bundled mapping.
    pub fn bundled() -> Self {
        Self::new(BundledMimeSource)
    }

    /// Cache over a mapping file.
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self::new(FileMimeSource::new(path))
    }

    /// Look up the MIME type for an extension (without the leading dot).
    ///
    /// Builds the table on first call. An unknown extension is `Ok(None)`.
    pub fn get_mime_type(&self, extension: &str) -> Result<Option<&str>, MimeError> {
        let table = self.table.get_or_try_init(|| self.build())?;
        Ok(table.get(extension).map(String::as_str))
    }

    /// Whether the table has been built.
    pub fn is_built(&self) -> bool {
        self.table.get().is_some()
    }

    fn build(&self) -> Result<MimeTable, MimeError> {
        let raw = self.source.load()?;
        let table: MimeTable = toml::from_str(&raw).map_err(|e| MimeError::Configuration {
            name: self.source.name().to_string(),
            source: e,
        })?;
        tracing::debug!(
            source = %self.source.name(),
            entries = table.len(),
            "MIME table built"
        );
        Ok(table)
    }
}

impl fmt::Debug for MimeCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MimeCache")
            .field("source", &self.source.name())
            .field("built", &self.is_built())
            .finish()
    }
}
