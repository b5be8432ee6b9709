//! Error types for the ordex-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the ordex library.
#[derive(Error, Debug)]
pub enum OrdexError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Conversion table error.
    #[error("conversion table error: {0}")]
    Conversion(#[from] ConversionError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
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
}

/// Errors raised while loading a conversion table.
#[derive(Error, Debug)]
pub enum ConversionError {
    /// The table file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file extension does not map to a known table format.
    #[error("unsupported table format: {0}")]
    UnsupportedFormat(String),

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Spreadsheet parsing failed.
    #[error("spreadsheet error: {0}")]
    Spreadsheet(String),

    /// JSON table parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A row does not have the configured columns.
    #[error("row {row}: missing column {column}")]
    MissingColumn { row: usize, column: usize },

    /// The same customer code maps to two different internal codes.
    #[error("customer code {code} maps to both {first} and {second}")]
    DuplicateCode {
        code: String,
        first: String,
        second: String,
    },
}

/// Result type for the ordex library.
pub type Result<T> = std::result::Result<T, OrdexError>;
