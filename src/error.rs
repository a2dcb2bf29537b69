//! Error type for PO bundle loading.

use thiserror::Error;

/// Failure while loading a PO message bundle.
///
/// Parse failures abort the whole bundle construction: a malformed
/// block usually means a corrupt file, and a partially loaded bundle
/// is not safe to localize with.
#[derive(Debug, Error)]
pub enum PoError {
    /// A translation or context line did not carry a quoted value.
    #[error("malformed translation, line is not properly quoted: {line}")]
    MalformedQuoting { line: String },

    /// A `msgstr[` line with a missing or non-numeric plural index.
    #[error("incorrect plural translation line: {line}")]
    MalformedPluralIndex { line: String },

    /// A continuation line with no open field to extend.
    #[error("unexpected line continuation: {line}")]
    UnexpectedContinuation { line: String },

    /// The project id supplied at construction was empty.
    #[error("project id must not be empty")]
    InvalidProjectId,

    /// The underlying PO stream could not be read.
    #[error("failed to read PO content")]
    Io(#[from] std::io::Error),
}
