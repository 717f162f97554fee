//! Error types shared across the crate.

use std::path::PathBuf;

/// Result alias carrying [`WallError`].
pub type Result<T> = std::result::Result<T, WallError>;

#[derive(Debug, thiserror::Error)]
pub enum WallError {
    #[error("failed to read catalog {path:?}: {source}")]
    CatalogIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog {path:?}: {message}")]
    CatalogParse { path: PathBuf, message: String },
    #[error("unsupported catalog format {0:?} (expected .json or .toml)")]
    UnsupportedFormat(PathBuf),
    #[error("invalid media root `{root}`: {reason}")]
    MediaRoot { root: String, reason: String },
    #[error("could not resolve audio source `{reference}`: {source}")]
    Resolve {
        reference: String,
        #[source]
        source: url::ParseError,
    },
    #[error("track has an empty audio source")]
    EmptySource,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
