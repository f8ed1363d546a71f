//! Error types for the protocol crate.

use thiserror::Error;

/// Ways a raw line can fail to decompose into prefix/command/arguments.
///
/// Every variant means the same thing to callers: the line is malformed
/// and must be dropped. The variants only record where the scan ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum LineParseError {
    /// The line contained no bytes at all.
    #[error("empty line")]
    EmptyLine,

    /// A `:` prefix marker at the very end of the line, with no prefix
    /// token after it.
    #[error("prefix marker at end of line")]
    EmptyPrefix,

    /// The line ended before a command token was read.
    #[error("missing command")]
    MissingCommand,

    /// A `:` trailing-argument marker at the very end of the line, with
    /// nothing following it.
    #[error("trailing marker at end of line")]
    EmptyTrailing,
}

/// Errors produced by the tokio line codec.
#[cfg(feature = "tokio")]
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CodecError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Line exceeded the maximum allowed length.
    #[error("line too long: {actual} bytes (limit: {limit})")]
    LineTooLong {
        /// Actual line length.
        actual: usize,
        /// Maximum allowed length.
        limit: usize,
    },
}
