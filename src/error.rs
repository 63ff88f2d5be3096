//! Error types for the biuro library.

use std::io;
use thiserror::Error;

/// Result type alias for biuro operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while parsing invoices, rendering PDFs,
/// or forwarding messages.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input document is not well-formed XML.
    #[error("XML parsing error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// A required field is absent from the source record.
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// A numeric field is present but cannot be parsed as a decimal.
    /// This indicates a corrupt source record and is always fatal.
    #[error("Malformed numeric field {field}: {value:?}")]
    MalformedNumber { field: String, value: String },

    /// Error assembling or serializing the PDF document.
    #[error("PDF rendering error: {0}")]
    Pdf(String),

    /// A configured font resource could not be loaded.
    #[error("Font loading error: {0}")]
    Font(String),

    /// Error reading or writing the forwarded-identifier set.
    #[error("Forwarded-set error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failure fetching from the upstream message source.
    #[error("Message source error: {0}")]
    Transport(String),

    /// Failure building or delivering outbound mail.
    #[error("Mail delivery error: {0}")]
    Mail(String),
}

impl From<printpdf::Error> for Error {
    fn from(err: printpdf::Error) -> Self {
        Error::Pdf(err.to_string())
    }
}
