//! Error types for userdic library.

use crate::model::Diagnostic;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for userdic operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for userdic library.
///
/// Every variant aborts a conversion. Per-record problems that a run can
/// survive are reported as [`Diagnostic`]s instead.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The dictionary format identifier is not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The part-of-speech table file does not exist.
    #[error("Part-of-speech table not found: {}", .0.display())]
    VocabularyNotFound(PathBuf),

    /// The part-of-speech table is malformed.
    #[error("Part-of-speech table error at line {line}: {message}")]
    Vocabulary { line: usize, message: String },

    /// A canonical part-of-speech has no label in the target format.
    #[error("Part-of-speech {label:?} cannot be expressed in {format} dictionaries")]
    UnrepresentablePartOfSpeech { format: String, label: String },

    /// XML parsing error in a property list.
    #[error("XML parsing error: {0}")]
    XmlParse(String),

    /// Invalid or malformed data.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A record was rejected under strict error handling.
    #[error("Rejected record: {0}")]
    Rejected(Diagnostic),
}

#[cfg(feature = "apple")]
impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}
