//! Configuration structures for the conversion pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the ordex pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrdexConfig {
    /// Item table parsing configuration.
    pub parser: ParserConfig,

    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Conversion table configuration.
    pub conversion: ConversionConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

/// Line-item parser configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Keywords marking the item table header line.
    pub header_keywords: Vec<String>,

    /// Keywords marking the first line after the item table.
    pub terminator_keywords: Vec<String>,

    /// Substrings identifying column-label lines to skip inside the table.
    pub column_labels: Vec<String>,

    /// Regex patterns for boilerplate lines dropped during normalization.
    pub boilerplate_patterns: Vec<String>,

    /// Quantity values accepted in column mode regardless of other checks.
    pub accepted_quantity_literals: Vec<String>,

    /// Upper bound on quantity digits in column mode (None = unbounded).
    pub max_quantity_digits: Option<usize>,

    /// How many lines after a code line may hold its quantity and unit.
    pub continuation_lookahead: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            header_keywords: strings(&["Item Code", "Codice", "QTY"]),
            terminator_keywords: strings(&[
                "Total",
                "Totale",
                "Subtotal",
                "Delivery Address",
                "Note",
            ]),
            column_labels: strings(&[
                "Item Code",
                "Codice",
                "Descrizione",
                "Description",
                "QTY",
                "UOM",
            ]),
            boilerplate_patterns: Vec::new(),
            // Recurring case-count value on one supplier's product line
            accepted_quantity_literals: strings(&["12"]),
            max_quantity_digits: None,
            continuation_lookahead: 2,
        }
    }
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Maximum pages to read (0 = unlimited).
    pub max_pages: usize,

    /// Minimum extracted text length before the document counts as readable.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            max_pages: 0,
            min_text_length: 20,
        }
    }
}

/// Conversion table source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Default conversion table (CSV, XLSX or JSON).
    pub table_path: Option<PathBuf>,

    /// Whether the first CSV/XLSX row is a header row.
    pub has_headers: bool,

    /// Worksheet to read from XLSX tables (default: first sheet).
    pub sheet: Option<String>,

    /// Zero-based column holding the customer code.
    pub customer_column: usize,

    /// Zero-based column holding the internal code.
    pub internal_column: usize,

    /// CSV field delimiter.
    pub delimiter: char,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            table_path: None,
            has_headers: true,
            sheet: None,
            customer_column: 0,
            internal_column: 1,
            delimiter: ',',
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Write the extracted text next to each output as `<stem>_debug.txt`.
    pub dump_text: bool,

    /// Name outputs after the PO number when one was found.
    pub name_by_order_number: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dump_text: false,
            name_by_order_number: true,
        }
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

impl OrdexConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
