//! Customer-to-internal code resolution.

mod loader;

pub use loader::{load_table, TableFormat};

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConversionError;
use crate::models::order::{normalize_code, InternalCode, LineItem, ResolvedItem};

/// Read-only mapping from customer codes to internal codes.
///
/// Keys are stored in marked form (`*123`), so tables written with or
/// without the marker resolve the same way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionTable {
    entries: HashMap<String, String>,
}

impl ConversionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from pairs, rejecting a code mapped to two different values.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, ConversionError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut table = Self::new();
        for (customer, internal) in pairs {
            table.insert(customer.as_ref(), internal.as_ref())?;
        }
        Ok(table)
    }

    /// Add one entry. Blank codes are ignored; an identical repeat is a no-op.
    pub(crate) fn insert(&mut self, customer: &str, internal: &str) -> Result<(), ConversionError> {
        let customer = customer.trim();
        let internal = internal.trim();
        if customer.is_empty() || internal.is_empty() {
            return Ok(());
        }

        let key = normalize_code(customer);
        match self.entries.get(&key) {
            Some(existing) if existing != internal => Err(ConversionError::DuplicateCode {
                code: key,
                first: existing.clone(),
                second: internal.to_string(),
            }),
            Some(_) => Ok(()),
            None => {
                self.entries.insert(key, internal.to_string());
                Ok(())
            }
        }
    }

    /// Internal code for a customer code.
    pub fn get(&self, customer_code: &str) -> Option<&str> {
        self.entries.get(customer_code).map(String::as_str)
    }

    /// Resolve a customer code, falling back to [`InternalCode::Unmapped`].
    pub fn lookup(&self, customer_code: &str) -> InternalCode {
        match self.get(customer_code) {
            Some(internal) => InternalCode::Mapped(internal.to_string()),
            None => InternalCode::Unmapped,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by customer code.
    pub fn entries(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<(&str, &str)> = self
            .entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        entries.sort_unstable();
        entries
    }
}

/// Resolve every item against the table.
pub fn resolve(items: &[LineItem], table: &ConversionTable) -> Vec<ResolvedItem> {
    items
        .iter()
        .map(|item| ResolvedItem {
            item: item.clone(),
            internal_code: table.lookup(&item.customer_code),
        })
        .collect()
}

/// Counts describing one resolution pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionSummary {
    pub total: usize,
    pub mapped: usize,
    pub unmapped: usize,
    /// Distinct customer codes with no table entry, sorted.
    pub unmapped_codes: Vec<String>,
}

impl ResolutionSummary {
    pub fn from_resolved(resolved: &[ResolvedItem]) -> Self {
        let unmapped_codes: BTreeSet<&str> = resolved
            .iter()
            .filter(|r| !r.is_mapped())
            .map(|r| r.item.customer_code.as_str())
            .collect();
        let unmapped = resolved.iter().filter(|r| !r.is_mapped()).count();

        debug!(
            "Resolved {} items, {} unmapped ({} distinct codes)",
            resolved.len(),
            unmapped,
            unmapped_codes.len()
        );

        Self {
            total: resolved.len(),
            mapped: resolved.len() - unmapped,
            unmapped,
            unmapped_codes: unmapped_codes.into_iter().map(str::to_string).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::order::UNMAPPED;

    fn table() -> ConversionTable {
        ConversionTable::from_pairs([("*274077", "INT-001"), ("100234", "INT-002")]).unwrap()
    }

    #[test]
    fn test_resolve_mapped_and_unmapped() {
        let items = vec![
            LineItem::new("*274077", "Sprite", "12", "24x50cl"),
            LineItem::new("*999999", "Unknown", "1", "CS"),
        ];

        let resolved = resolve(&items, &table());

        assert_eq!(resolved[0].internal_code, InternalCode::Mapped("INT-001".into()));
        assert_eq!(resolved[1].internal_code, InternalCode::Unmapped);
        assert_eq!(resolved[1].internal_code.to_string(), UNMAPPED);
        assert_eq!(resolved[1].item, items[1]);
    }

    #[test]
    fn test_keys_normalized_to_marker() {
        assert_eq!(table().get("*100234"), Some("INT-002"));
        assert_eq!(table().get("100234"), None);
    }

    #[test]
    fn test_duplicate_codes() {
        let same = ConversionTable::from_pairs([("*1", "A"), ("1", "A")]).unwrap();
        assert_eq!(same.len(), 1);

        let conflict = ConversionTable::from_pairs([("*1", "A"), ("1", "B")]);
        assert!(matches!(conflict, Err(ConversionError::DuplicateCode { .. })));
    }

    #[test]
    fn test_blank_entries_ignored() {
        let table = ConversionTable::from_pairs([("", "A"), ("*2", " "), ("*3", "C")]).unwrap();
        assert_eq!(table.entries(), vec![("*3", "C")]);
    }

    #[test]
    fn test_summary_counts() {
        let items = vec![
            LineItem::new("*274077", "Sprite", "12", ""),
            LineItem::new("*999999", "A", "1", ""),
            LineItem::new("*999999", "A again", "2", ""),
            LineItem::new("*888888", "B", "1", ""),
        ];

        let summary = ResolutionSummary::from_resolved(&resolve(&items, &table()));

        assert_eq!(summary.total, 4);
        assert_eq!(summary.mapped, 1);
        assert_eq!(summary.unmapped, 3);
        assert_eq!(summary.unmapped_codes, vec!["*888888", "*999999"]);
    }
}
