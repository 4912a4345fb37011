//! Error types for presentation content extraction.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during presentation content extraction.
#[derive(Error, Debug)]
pub enum Error {
    /// The file extension matches neither supported format.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Directory creation, input open or file write failure.
    #[error("Filesystem error at '{}': {source}", path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A single image could not be decoded or written.
    #[error("Failed to extract image '{filename}': {reason}")]
    ImageExtraction { filename: String, reason: String },

    /// Failed to parse the PPTX package structure.
    #[error("PPTX parsing error: {0}")]
    PptxParse(String),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    Zip(String),

    /// XML parsing error (for PPTX).
    #[error("XML parsing error: {0}")]
    Xml(String),

    /// Failed to parse the PDF object structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF is encrypted and cannot be read.
    #[error("Document is encrypted")]
    Encrypted,

    /// The record could not be encoded as JSON.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    /// Wrap an I/O error together with the path it concerns.
    pub fn fs(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::FileSystem {
            path: path.into(),
            source,
        }
    }

    /// Build a per-image failure.
    pub fn image(filename: impl Into<String>, reason: impl ToString) -> Self {
        Error::ImageExtraction {
            filename: filename.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether extraction may continue past this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::ImageExtraction { .. })
    }
}
