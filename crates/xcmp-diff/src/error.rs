//! Error types for the diff crate.

use std::path::PathBuf;

/// Errors that can occur while preparing a comparison.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// The configuration file could not be read.
    #[error("cannot read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The configuration text is not valid TOML for [`CompareConfig`].
    ///
    /// [`CompareConfig`]: crate::CompareConfig
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
