//! Errors raised by the command-line tools.

use thiserror::Error;

use rmg_core::error::MapGenError;

/// Result type alias using [`ToolError`].
pub type Result<T> = std::result::Result<T, ToolError>;

/// Everything that can go wrong while running a tool command.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Generation or settings error from the core crate.
    #[error(transparent)]
    Map(#[from] MapGenError),

    /// JSON encoding failed.
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Settings could not be rendered back to RON.
    #[error("RON encoding failed: {0}")]
    Ron(#[from] ron::Error),

    /// Filesystem error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
