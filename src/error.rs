use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the different failure cases that can occur when the
/// tool reads, decodes, or exports event data.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when the expected `name = {` declaration is absent from the
    /// input file.
    #[error("declaration '{0} = {{' not found in input")]
    DeclarationNotFound(String),

    /// Raised when the input ends before the object literal's braces close.
    #[error("object literal bound to '{0}' is unterminated")]
    UnterminatedObject(String),

    /// Raised when the normalized text still fails strict JSON decoding.
    /// Carries the byte offset of the failure within the normalized text and
    /// a bounded context window around it.
    #[error("decode failed at byte {offset}: {message}\n  context: ...{context}...")]
    Decode {
        offset: usize,
        message: String,
        context: String,
    },

    /// Raised when the decoded document lacks a required top-level entry.
    #[error("document entry '{0}' is missing or not an object")]
    MissingEntry(&'static str),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
