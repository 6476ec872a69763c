//! Merge error types.

use thiserror::Error;

/// Errors that can occur while merging visitor maps.
///
/// Failures raised by handlers are not represented here; they propagate
/// unchanged out of the composite handler that called them.
#[derive(Debug, Error)]
pub enum MergeError {
    /// No visitor maps were supplied.
    #[error("Cannot merge an empty list of visitors")]
    EmptyInput,

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl MergeError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
