//! Error type shared by the config store and its typed accessors.

use std::path::PathBuf;

use thiserror::Error;
use viaconf_core::{DecodeError, EncodeError};

/// Error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The packaged template could not be found or opened. Fatal: the host
    /// cannot produce a configuration without its bundled defaults.
    #[error("template resource missing at {location}: {source}")]
    ResourceMissing {
        location: String,
        #[source]
        source: std::io::Error,
    },

    /// The packaged template exists but cannot be decoded.
    #[error("template resource at {location} is malformed: {source}")]
    TemplateMalformed {
        location: String,
        #[source]
        source: DecodeError,
    },

    /// A typed accessor found a value of a different shape.
    #[error("option {key} holds a {found}, expected {expected}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The effective document could not be serialized.
    #[error("failed to encode config: {0}")]
    Encode(#[from] EncodeError),
}
