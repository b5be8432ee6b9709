//! Line-item parsing over the located table region.

use tracing::trace;

use super::patterns::COLUMN_GAP;
use super::strategies::{self, Candidate};
use crate::models::config::ParserConfig;
use crate::models::order::{
    is_ascii_digits, ExtractionStrategy, LineItem, ParseStats, TableRegion, CODE_MARKER,
};

/// Parses item lines inside a table region.
pub struct ItemParser<'c> {
    config: &'c ParserConfig,
}

impl<'c> ItemParser<'c> {
    pub fn new(config: &'c ParserConfig) -> Self {
        Self { config }
    }

    /// Parse every item in `region`, recording per-strategy counts in `stats`.
    ///
    /// Lines with at least four column fields are read positionally; other
    /// lines starting with a marked code go through the free-text strategies.
    pub fn parse(&self, lines: &[String], region: TableRegion, stats: &mut ParseStats) -> Vec<LineItem> {
        let end = region.end.min(lines.len());
        let mut items = Vec::new();
        let mut idx = region.start;

        while idx < end {
            let line = lines[idx].as_str();

            if self.is_label_line(line) {
                trace!("Skipping label line: {}", line);
                stats.skipped_lines += 1;
                idx += 1;
                continue;
            }

            let columns: Vec<&str> = COLUMN_GAP.split(line).collect();
            if columns.len() >= 4 {
                match self.parse_columns(&columns) {
                    Some(item) => {
                        stats.record(ExtractionStrategy::Columns);
                        items.push(item);
                    }
                    None => {
                        trace!("Column line rejected: {}", line);
                        stats.skipped_lines += 1;
                    }
                }
                idx += 1;
                continue;
            }

            let lookahead_end = (idx + 1 + self.config.continuation_lookahead).min(end);
            let following = &lines[idx + 1..lookahead_end];

            match Candidate::from_line(line, following).and_then(|c| strategies::extract(&c)) {
                Some(found) if found.item.has_code() => {
                    stats.record(found.strategy);
                    items.push(found.item);
                    idx += 1 + found.consumed;
                }
                _ => {
                    trace!("No item in line: {}", line);
                    stats.skipped_lines += 1;
                    idx += 1;
                }
            }
        }

        items
    }

    /// Column-header lines. Marked item lines never count, whatever their
    /// description says.
    fn is_label_line(&self, line: &str) -> bool {
        !line.starts_with(CODE_MARKER)
            && self
                .config
                .column_labels
                .iter()
                .any(|label| !label.is_empty() && line.contains(label.as_str()))
    }

    /// Read (code, description, quantity, unit) from the first four columns.
    fn parse_columns(&self, columns: &[&str]) -> Option<LineItem> {
        let [code, description, quantity, unit] = [columns[0], columns[1], columns[2], columns[3]]
            .map(str::trim);

        if !self.is_valid_quantity(quantity) {
            return None;
        }

        let marked = code.starts_with(CODE_MARKER) && code.len() > CODE_MARKER.len_utf8();
        if !marked && !is_ascii_digits(code) {
            return None;
        }

        Some(LineItem::new(code, description, quantity, unit))
    }

    fn is_valid_quantity(&self, quantity: &str) -> bool {
        if self
            .config
            .accepted_quantity_literals
            .iter()
            .any(|literal| literal == quantity)
        {
            return true;
        }

        is_ascii_digits(quantity)
            && self
                .config
                .max_quantity_digits
                .is_none_or(|max| quantity.len() <= max)
    }
}
