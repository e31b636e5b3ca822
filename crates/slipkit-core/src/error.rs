//! Error types for the slipkit-core library.

use thiserror::Error;

use crate::models::slip::SlipField;

/// Error reading or writing slipkit files.
#[derive(Error, Debug)]
pub enum SlipError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to reading PDF input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// The PDF has pages but no text layer (scanned slip).
    #[error("PDF has no extractable text")]
    NoText,
}

/// A packing slip did not match the expected structure.
///
/// Every variant names the offending document so a batch caller can report
/// failures next to the records that did extract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A required field has no anchor in the document.
    #[error("{document}: missing required field {field}")]
    MissingField { document: String, field: SlipField },

    /// An anchor was found but its value is unusable.
    #[error("{document}: malformed {field}: {value:?}")]
    Malformed {
        document: String,
        field: SlipField,
        value: String,
    },

    /// The document bytes could not be turned into text.
    #[error("{document}: unreadable document: {source}")]
    Unreadable {
        document: String,
        #[source]
        source: PdfError,
    },
}

impl ParseError {
    /// Identifier of the document that failed.
    pub fn document(&self) -> &str {
        match self {
            ParseError::MissingField { document, .. }
            | ParseError::Malformed { document, .. }
            | ParseError::Unreadable { document, .. } => document,
        }
    }

    /// The field at fault, if the failure is field-specific.
    pub fn field(&self) -> Option<SlipField> {
        match self {
            ParseError::MissingField { field, .. } | ParseError::Malformed { field, .. } => {
                Some(*field)
            }
            ParseError::Unreadable { .. } => None,
        }
    }
}

/// Label rendering failed. No partial document is produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// A record could not be laid out on its page.
    #[error("label for order {order_number} / SKU {sku}: character {character:?} cannot be encoded for the label font")]
    Unencodable {
        order_number: String,
        sku: String,
        character: char,
    },

    /// The finished document could not be serialized.
    #[error("failed to write PDF: {0}")]
    Serialize(String),
}

impl RenderError {
    /// `(order_number, sku)` of the offending record, when one is known.
    pub fn record(&self) -> Option<(&str, &str)> {
        match self {
            RenderError::Unencodable {
                order_number, sku, ..
            } => Some((order_number, sku)),
            RenderError::Serialize(_) => None,
        }
    }
}

/// Result type for slipkit file operations.
pub type Result<T> = std::result::Result<T, SlipError>;
