//! Report assembly: header plus resolved items as flat rows.
//!
//! Writing the rows to a file (CSV, JSON, spreadsheet) is left to the caller.

use serde::{Deserialize, Serialize};

use crate::conversion::ResolutionSummary;
use crate::models::order::{OrderHeader, ParseStats, ResolvedItem};

/// One output row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub order_number: String,
    pub order_date: String,
    pub delivery_date: String,
    pub supplier_name: String,
    pub customer_code: String,
    pub internal_code: String,
    pub description: String,
    pub quantity: String,
    pub unit_of_measure: String,
}

impl ReportRow {
    /// Field values in [`OrderReport::COLUMNS`] order.
    pub fn fields(&self) -> [&str; 9] {
        [
            self.order_number.as_str(),
            self.order_date.as_str(),
            self.delivery_date.as_str(),
            self.supplier_name.as_str(),
            self.customer_code.as_str(),
            self.internal_code.as_str(),
            self.description.as_str(),
            self.quantity.as_str(),
            self.unit_of_measure.as_str(),
        ]
    }
}

/// Assembled output for one order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReport {
    pub header: OrderHeader,
    pub rows: Vec<ReportRow>,
    pub summary: ResolutionSummary,
}

impl OrderReport {
    /// Column names, in row field order.
    pub const COLUMNS: [&'static str; 9] = [
        "order_number",
        "order_date",
        "delivery_date",
        "supplier_name",
        "customer_code",
        "internal_code",
        "description",
        "quantity",
        "uom",
    ];

    /// Build the report for one order.
    pub fn assemble(header: &OrderHeader, resolved: &[ResolvedItem]) -> Self {
        let rows = resolved
            .iter()
            .map(|r| ReportRow {
                order_number: header.order_number.clone(),
                order_date: header.order_date.clone(),
                delivery_date: header.delivery_date.clone(),
                supplier_name: header.supplier_name.clone(),
                customer_code: r.item.customer_code.clone(),
                internal_code: r.internal_code.to_string(),
                description: r.item.description.clone(),
                quantity: r.item.quantity.clone(),
                unit_of_measure: r.item.unit_of_measure.clone(),
            })
            .collect();

        Self {
            header: header.clone(),
            rows,
            summary: ResolutionSummary::from_resolved(resolved),
        }
    }

    pub fn item_count(&self) -> usize {
        self.rows.len()
    }

    pub fn unmapped_count(&self) -> usize {
        self.summary.unmapped
    }
}

/// Per-document processing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// At least one item was extracted.
    Converted,
    /// Text was read but no items were found.
    NoItems,
    /// The text could not be extracted.
    Failed,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Converted => "converted",
            DocumentStatus::NoItems => "no_items",
            DocumentStatus::Failed => "failed",
        }
    }
}

/// Result of processing one document, successful or not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentOutcome {
    /// Document name (usually the file path).
    pub source: String,
    pub status: DocumentStatus,
    /// Always present; empty header and no rows when extraction failed.
    pub report: OrderReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub stats: ParseStats,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl DocumentOutcome {
    /// Outcome for a document whose text could not be extracted.
    pub fn failed(source: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            status: DocumentStatus::Failed,
            report: OrderReport::default(),
            error: Some(error.into()),
            stats: ParseStats::default(),
            warnings: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status != DocumentStatus::Failed
    }

    pub fn item_count(&self) -> usize {
        self.report.item_count()
    }

    pub fn unmapped_count(&self) -> usize {
        self.report.unmapped_count()
    }
}
