//! All error types for the xlfedit crate.
//!
//! These are returned from all fallible operations (detection, parsing, serialization, export).
//! A missing structural anchor during an edit is deliberately *not* an error; see
//! [`crate::types::UpdateOutcome`].

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// No dialect adapter recognised the content and no fallback applied.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The content matched a dialect but is not well-formed.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("JSON error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("XML error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An operation that needs a loaded document was called before any load succeeded.
    #[error("no document loaded; load a file first")]
    NoSession,

    #[error("unknown format `{0}`")]
    UnknownFormat(String),

    /// The requested export format is not offered for the loaded document.
    #[error("export not supported: {0}")]
    UnsupportedExport(String),
}

impl Error {
    /// Creates a new malformed input error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Error::MalformedInput(message.into())
    }
}
