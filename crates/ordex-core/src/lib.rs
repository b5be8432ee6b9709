//! Core library for purchase-order processing.
//!
//! This crate provides:
//! - PDF text extraction, page by page
//! - Order header extraction (PO number, dates, supplier)
//! - Line-oriented item table parsing with layered fallbacks
//! - Customer-to-internal code resolution against a conversion table
//! - Report assembly for downstream writers

pub mod conversion;
pub mod error;
pub mod models;
pub mod order;
pub mod pdf;
pub mod pipeline;
pub mod report;

pub use conversion::{resolve, ConversionTable, ResolutionSummary};
pub use error::{ConversionError, OrdexError, PdfError, Result};
pub use models::config::OrdexConfig;
pub use models::order::{
    InternalCode, LineItem, OrderHeader, ParseStats, ParsedOrder, ResolvedItem, UNMAPPED,
};
pub use order::{parse, OrderParser, PurchaseOrderParser, TableRegion};
pub use pdf::{PdfExtractor, PdfProcessor, PlainText, TextSource};
pub use pipeline::OrderConverter;
pub use report::{DocumentOutcome, DocumentStatus, OrderReport, ReportRow};
