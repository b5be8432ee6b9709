//! Purchase order data models.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Marker character every customer code starts with.
pub const CODE_MARKER: char = '*';

/// Internal code reported for customer codes missing from the conversion table.
pub const UNMAPPED: &str = "UNMAPPED";

/// Date format used by order headers (dd/mm/yyyy).
const HEADER_DATE_FORMAT: &str = "%d/%m/%Y";

/// Document-level order metadata.
///
/// Every field is empty when its anchor was not found in the text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderHeader {
    /// Purchase order number (digits).
    pub order_number: String,

    /// Order date as printed (dd/mm/yyyy, not validated).
    pub order_date: String,

    /// Requested delivery date as printed (dd/mm/yyyy, not validated).
    pub delivery_date: String,

    /// Supplier name from the `To:` line.
    #[serde(default)]
    pub supplier_name: String,
}

impl OrderHeader {
    /// True when no header field was extracted.
    pub fn is_empty(&self) -> bool {
        self.order_number.is_empty()
            && self.order_date.is_empty()
            && self.delivery_date.is_empty()
            && self.supplier_name.is_empty()
    }

    /// Order date as a calendar date, if it is a valid dd/mm/yyyy value.
    pub fn order_date_parsed(&self) -> Option<NaiveDate> {
        parse_header_date(&self.order_date)
    }

    /// Delivery date as a calendar date, if it is a valid dd/mm/yyyy value.
    pub fn delivery_date_parsed(&self) -> Option<NaiveDate> {
        parse_header_date(&self.delivery_date)
    }
}

fn parse_header_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), HEADER_DATE_FORMAT).ok()
}

/// A single ordered product line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Supplier-facing code, always starting with [`CODE_MARKER`].
    pub customer_code: String,

    /// Free-text product description.
    pub description: String,

    /// Ordered quantity as ASCII digits, empty when unknown.
    pub quantity: String,

    /// Unit of measure token (e.g. `CS`, `24x50cl`), empty when unknown.
    #[serde(rename = "uom")]
    pub unit_of_measure: String,
}

impl LineItem {
    /// Create a line item, adding the code marker when it is missing.
    pub fn new(
        code: impl AsRef<str>,
        description: impl Into<String>,
        quantity: impl Into<String>,
        unit_of_measure: impl Into<String>,
    ) -> Self {
        Self {
            customer_code: normalize_code(code.as_ref()),
            description: description.into().trim().to_string(),
            quantity: quantity.into().trim().to_string(),
            unit_of_measure: unit_of_measure.into().trim().to_string(),
        }
    }

    /// Whether the item carries a usable customer code (marker plus at least one character).
    pub fn has_code(&self) -> bool {
        self.customer_code.starts_with(CODE_MARKER) && self.customer_code.len() > 1
    }

    /// Quantity as a number, only when it is a pure ASCII digit string.
    pub fn quantity_value(&self) -> Option<u32> {
        if is_ascii_digits(&self.quantity) {
            self.quantity.parse().ok()
        } else {
            None
        }
    }
}

/// Prefix a code with [`CODE_MARKER`] unless it already carries it.
pub fn normalize_code(code: &str) -> String {
    let code = code.trim();
    if code.starts_with(CODE_MARKER) {
        code.to_string()
    } else {
        format!("{CODE_MARKER}{code}")
    }
}

/// Non-empty and made only of ASCII digits.
pub fn is_ascii_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Internal code resolved for a customer code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InternalCode {
    /// Code found in the conversion table.
    Mapped(String),
    /// No entry in the conversion table.
    Unmapped,
}

impl InternalCode {
    pub fn is_mapped(&self) -> bool {
        matches!(self, InternalCode::Mapped(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            InternalCode::Mapped(code) => code,
            InternalCode::Unmapped => UNMAPPED,
        }
    }
}

impl fmt::Display for InternalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for InternalCode {
    fn from(value: String) -> Self {
        if value == UNMAPPED {
            InternalCode::Unmapped
        } else {
            InternalCode::Mapped(value)
        }
    }
}

impl From<InternalCode> for String {
    fn from(value: InternalCode) -> Self {
        match value {
            InternalCode::Mapped(code) => code,
            InternalCode::Unmapped => UNMAPPED.to_string(),
        }
    }
}

/// A line item paired with its internal code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedItem {
    #[serde(flatten)]
    pub item: LineItem,

    pub internal_code: InternalCode,
}

impl ResolvedItem {
    pub fn is_mapped(&self) -> bool {
        self.internal_code.is_mapped()
    }
}

/// Half-open line range `[start, end)` holding the item table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRegion {
    /// First body line.
    pub start: usize,
    /// One past the last body line.
    pub end: usize,
    /// Whether a header keyword bounded the region. When false the region
    /// spans the whole document and parsing is driven by marked codes only.
    pub anchored: bool,
}

impl TableRegion {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// How a line item was recovered from the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    /// Whitespace-delimited columns.
    Columns,
    /// Single line with compound unit and price.
    InlineFull,
    /// Single line with bare unit and price.
    InlineSimple,
    /// First standalone integer after the code.
    QuantityAnchored,
    /// Quantity and unit taken from a continuation line.
    MultiLine,
    /// Code and description only.
    CodeOnly,
}

impl ExtractionStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            ExtractionStrategy::Columns => "columns",
            ExtractionStrategy::InlineFull => "inline_full",
            ExtractionStrategy::InlineSimple => "inline_simple",
            ExtractionStrategy::QuantityAnchored => "quantity_anchored",
            ExtractionStrategy::MultiLine => "multi_line",
            ExtractionStrategy::CodeOnly => "code_only",
        }
    }
}

/// Diagnostic counts collected while parsing one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseStats {
    /// Normalized lines in the document.
    pub lines: usize,

    /// Lines inside the table region.
    pub region_lines: usize,

    /// Region lines that produced no item.
    pub skipped_lines: usize,

    /// Items produced per strategy.
    pub by_strategy: BTreeMap<ExtractionStrategy, usize>,
}

impl ParseStats {
    pub fn record(&mut self, strategy: ExtractionStrategy) {
        *self.by_strategy.entry(strategy).or_insert(0) += 1;
    }

    pub fn count(&self, strategy: ExtractionStrategy) -> usize {
        self.by_strategy.get(&strategy).copied().unwrap_or(0)
    }
}

/// Result of parsing one purchase order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedOrder {
    pub header: OrderHeader,
    pub items: Vec<LineItem>,
    pub region: TableRegion,
    pub stats: ParseStats,
    /// Non-fatal notes about the parse (missing anchors, fallbacks).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ParsedOrder {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.header.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_item_adds_marker() {
        let item = LineItem::new("274077", " Sprite ", "12", "CS");
        assert_eq!(item.customer_code, "*274077");
        assert_eq!(item.description, "Sprite");
        assert!(item.has_code());

        let marked = LineItem::new("*274077", "Sprite", "", "");
        assert_eq!(marked.customer_code, "*274077");
    }

    #[test]
    fn test_bare_marker_has_no_code() {
        let item = LineItem::new("*", "Sprite", "", "");
        assert!(!item.has_code());
    }

    #[test]
    fn test_quantity_value() {
        assert_eq!(LineItem::new("*1", "", "24", "").quantity_value(), Some(24));
        assert_eq!(LineItem::new("*1", "", "", "").quantity_value(), None);
        assert_eq!(LineItem::new("*1", "", "2,5", "").quantity_value(), None);
    }

    #[test]
    fn test_header_dates() {
        let header = OrderHeader {
            order_date: "15/01/2024".to_string(),
            delivery_date: "31/02/2024".to_string(),
            ..Default::default()
        };

        assert_eq!(header.order_date_parsed(), NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(header.delivery_date_parsed(), None);
        assert!(!header.is_empty());
        assert!(OrderHeader::default().is_empty());
    }

    #[test]
    fn test_internal_code_serializes_as_string() {
        let mapped = serde_json::to_string(&InternalCode::Mapped("A-100".into())).unwrap();
        let unmapped = serde_json::to_string(&InternalCode::Unmapped).unwrap();
        assert_eq!(mapped, "\"A-100\"");
        assert_eq!(unmapped, "\"UNMAPPED\"");

        let back: InternalCode = serde_json::from_str(&unmapped).unwrap();
        assert_eq!(back, InternalCode::Unmapped);
    }
}
