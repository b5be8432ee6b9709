//! End-to-end conversion of one document: text -> parsed order -> report.

use std::time::Instant;

use tracing::{error, info, warn};

use crate::conversion::{resolve, ConversionTable};
use crate::order::{OrderParser, PurchaseOrderParser};
use crate::pdf::TextSource;
use crate::report::{DocumentOutcome, DocumentStatus, OrderReport};

/// Converts documents against a shared, read-only conversion table.
pub struct OrderConverter<'t> {
    parser: PurchaseOrderParser,
    table: &'t ConversionTable,
    min_text_length: usize,
}

impl<'t> OrderConverter<'t> {
    /// Create a converter with the default parser.
    pub fn new(table: &'t ConversionTable) -> Self {
        Self {
            parser: PurchaseOrderParser::new(),
            table,
            min_text_length: 0,
        }
    }

    /// Use a configured parser.
    pub fn with_parser(mut self, parser: PurchaseOrderParser) -> Self {
        self.parser = parser;
        self
    }

    /// Treat documents with less extracted text than this as unreadable.
    pub fn with_min_text_length(mut self, min_text_length: usize) -> Self {
        self.min_text_length = min_text_length;
        self
    }

    /// Convert already-extracted text.
    pub fn convert_text(&self, source: &str, text: &str) -> DocumentOutcome {
        let start = Instant::now();

        let text_len = text.trim().len();
        if text_len < self.min_text_length {
            warn!("{}: only {} characters of text extracted", source, text_len);
            return DocumentOutcome::failed(
                source,
                format!("no usable text layer ({} characters)", text_len),
            );
        }

        let parsed = self.parser.parse(text);
        let resolved = resolve(&parsed.items, self.table);
        let report = OrderReport::assemble(&parsed.header, &resolved);

        let status = if report.rows.is_empty() {
            DocumentStatus::NoItems
        } else {
            DocumentStatus::Converted
        };

        info!(
            "{}: order {:?}, {} items, {} unmapped in {:?}",
            source,
            report.header.order_number,
            report.item_count(),
            report.unmapped_count(),
            start.elapsed()
        );

        DocumentOutcome {
            source: source.to_string(),
            status,
            report,
            error: None,
            stats: parsed.stats,
            warnings: parsed.warnings,
        }
    }

    /// Extract text from `document` and convert it.
    ///
    /// Extraction errors are reported in the outcome, never propagated.
    pub fn convert_source<S: TextSource + ?Sized>(&self, source: &str, document: &S) -> DocumentOutcome {
        match document.full_text() {
            Ok(text) => self.convert_text(source, &text),
            Err(e) => {
                error!("{}: text extraction failed: {}", source, e);
                DocumentOutcome::failed(source, e.to_string())
            }
        }
    }
}
