//! Error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::template::TemplateError;

/// Errors that can occur while building a security database.
#[derive(Debug, Error)]
pub enum SecdbError {
    /// No repository name was configured.
    #[error("repository name not set, use --repo-name")]
    MissingRepoName,

    /// The reserved placeholder table breaks the non-overlap invariant.
    #[error("invalid reserved placeholder table: {0}")]
    InvalidPlaceholders(String),

    /// The configuration file could not be parsed.
    #[error("parsing config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The configuration could not be encoded as TOML.
    #[error("encoding config: {0}")]
    ConfigEncode(#[from] toml::ser::Error),

    /// A package document could not be read.
    #[error("reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A directory could not be listed.
    #[error("walking directory {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// The output file could not be written.
    #[error("writing {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The templating pass failed for a document.
    #[error("templating {}: {source}", path.display())]
    Template {
        path: PathBuf,
        #[source]
        source: TemplateError,
    },

    /// The templated document does not match the package schema.
    #[error("decoding {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A package document is not valid UTF-8.
    #[error("decoding {}: {source}", path.display())]
    Encoding {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// The database could not be encoded as JSON.
    #[error("encoding database: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type Result<T, E = SecdbError> = std::result::Result<T, E>;
