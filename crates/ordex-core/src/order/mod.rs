//! Purchase order parsing: header fields and the item table.

pub mod cleaner;
pub mod header;
pub mod items;
pub mod normalize;
pub mod patterns;
pub mod region;
pub mod strategies;

pub use cleaner::clean_description;
pub use header::extract_header;
pub use items::ItemParser;
pub use normalize::{normalize, LineNormalizer};
pub use region::{locate_table, KeywordSet};

pub use crate::models::order::TableRegion;

use tracing::{debug, info, warn};

use crate::error::{OrdexError, Result};
use crate::models::config::ParserConfig;
use crate::models::order::{LineItem, ParseStats, ParsedOrder};

/// Trait for purchase order parsing.
///
/// Parsing never fails: unreadable input yields an empty header and no items.
pub trait OrderParser {
    /// Parse one document's text (pages joined by newlines).
    fn parse(&self, text: &str) -> ParsedOrder;

    /// Parse a document given page by page.
    fn parse_pages(&self, pages: &[String]) -> ParsedOrder {
        self.parse(&pages.join("\n"))
    }
}

/// Line-oriented purchase order parser.
#[derive(Debug, Clone)]
pub struct PurchaseOrderParser {
    config: ParserConfig,
    normalizer: LineNormalizer,
    header_keywords: KeywordSet,
    terminator_keywords: KeywordSet,
}

impl PurchaseOrderParser {
    /// Create a parser with default settings.
    pub fn new() -> Self {
        let config = ParserConfig::default();
        Self {
            header_keywords: KeywordSet::new(&config.header_keywords),
            terminator_keywords: KeywordSet::new(&config.terminator_keywords),
            normalizer: LineNormalizer::new(),
            config,
        }
    }

    /// Create a parser from configuration.
    ///
    /// Fails only when a boilerplate pattern is not a valid regex.
    pub fn from_config(config: ParserConfig) -> Result<Self> {
        let normalizer = LineNormalizer::with_boilerplate(&config.boilerplate_patterns)
            .map_err(|e| OrdexError::Config(format!("invalid boilerplate pattern: {}", e)))?;

        Ok(Self {
            header_keywords: KeywordSet::new(&config.header_keywords),
            terminator_keywords: KeywordSet::new(&config.terminator_keywords),
            normalizer,
            config,
        })
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    fn clean_items(items: Vec<LineItem>) -> Vec<LineItem> {
        items
            .into_iter()
            .map(|mut item| {
                let quantity = Some(item.quantity.as_str()).filter(|q| !q.is_empty());
                item.description = clean_description(&item.description, quantity);
                item
            })
            .collect()
    }
}

impl Default for PurchaseOrderParser {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderParser for PurchaseOrderParser {
    fn parse(&self, text: &str) -> ParsedOrder {
        info!("Parsing order from {} characters of text", text.len());

        let mut warnings = Vec::new();
        let lines = self.normalizer.normalize(text);

        let header = extract_header(&lines.join("\n"));
        if header.order_number.is_empty() {
            warnings.push("Could not extract order number".to_string());
        }

        let region = locate_table(&lines, &self.header_keywords, &self.terminator_keywords);
        if !region.anchored && !lines.is_empty() {
            warn!("No item table header found, scanning whole document for marked codes");
            warnings.push("No item table header found".to_string());
        }

        let mut stats = ParseStats {
            lines: lines.len(),
            region_lines: region.len(),
            ..Default::default()
        };

        let items = ItemParser::new(&self.config).parse(&lines, region, &mut stats);
        let items = Self::clean_items(items);

        if items.is_empty() {
            warnings.push("Could not extract line items".to_string());
        }

        debug!(
            "Extracted order {:?} with {} items ({} region lines skipped)",
            header.order_number,
            items.len(),
            stats.skipped_lines
        );

        ParsedOrder {
            header,
            items,
            region,
            stats,
            warnings,
        }
    }
}

/// Parse raw document text with the default parser.
pub fn parse(text: &str) -> ParsedOrder {
    PurchaseOrderParser::new().parse(text)
}
