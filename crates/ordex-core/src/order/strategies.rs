//! Extraction strategies for free-text item lines.
//!
//! A line starting with a marked code is a candidate record. The strategies
//! in [`STRATEGIES`] are tried in order and the first one that recovers an
//! item wins. Each strategy is a pure function so it can be tested on its
//! own.

use super::patterns::{CODE_LINE, DATA_LINE, INLINE_FULL, INLINE_SIMPLE, PRICE_TOKEN};
use crate::models::order::{is_ascii_digits, ExtractionStrategy, LineItem, CODE_MARKER};

/// A code line plus the lines that may continue it.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    /// Full code line.
    pub line: &'a str,
    /// Marked code token (e.g. `*100234`).
    pub code: &'a str,
    /// Everything after the code token.
    pub rest: &'a str,
    /// Following lines available for multi-line records.
    pub following: &'a [String],
}

impl<'a> Candidate<'a> {
    /// Build a candidate from a line starting with the code marker.
    pub fn from_line(line: &'a str, following: &'a [String]) -> Option<Self> {
        if !line.starts_with(CODE_MARKER) {
            return None;
        }

        let caps = CODE_LINE.captures(line)?;
        let code = caps.get(1)?.as_str();
        let rest = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("");

        Some(Self {
            line,
            code,
            rest,
            following,
        })
    }
}

/// An item recovered by a strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyMatch {
    pub item: LineItem,
    /// Following lines used by the record.
    pub consumed: usize,
    pub strategy: ExtractionStrategy,
}

/// Signature shared by all strategies.
pub type StrategyFn = fn(&Candidate<'_>) -> Option<StrategyMatch>;

/// Strategies in precedence order.
pub const STRATEGIES: [(ExtractionStrategy, StrategyFn); 5] = [
    (ExtractionStrategy::InlineFull, inline_full),
    (ExtractionStrategy::InlineSimple, inline_simple),
    (ExtractionStrategy::QuantityAnchored, quantity_anchored),
    (ExtractionStrategy::MultiLine, multi_line),
    (ExtractionStrategy::CodeOnly, code_only),
];

/// Run the strategies in order and return the first match.
pub fn extract(candidate: &Candidate<'_>) -> Option<StrategyMatch> {
    STRATEGIES.iter().find_map(|(_, strategy)| strategy(candidate))
}

fn single_line(item: LineItem, strategy: ExtractionStrategy) -> StrategyMatch {
    StrategyMatch {
        item,
        consumed: 0,
        strategy,
    }
}

/// Code, description, quantity, compound unit (`12 x 75cl`) and a price.
pub fn inline_full(candidate: &Candidate<'_>) -> Option<StrategyMatch> {
    let caps = INLINE_FULL.captures(candidate.line)?;
    let item = LineItem::new(&caps[1], &caps[2], &caps[3], &caps[4]);
    Some(single_line(item, ExtractionStrategy::InlineFull))
}

/// Code, description, quantity, bare unit and a price.
pub fn inline_simple(candidate: &Candidate<'_>) -> Option<StrategyMatch> {
    let caps = INLINE_SIMPLE.captures(candidate.line)?;
    let item = LineItem::new(&caps[1], &caps[2], &caps[3], &caps[4]);
    Some(single_line(item, ExtractionStrategy::InlineSimple))
}

/// First standalone integer after the code is the quantity, the next token
/// the unit.
pub fn quantity_anchored(candidate: &Candidate<'_>) -> Option<StrategyMatch> {
    let tokens: Vec<&str> = candidate.rest.split_whitespace().collect();
    let qty_idx = tokens.iter().position(|t| is_ascii_digits(t))?;

    let unit = tokens
        .get(qty_idx + 1)
        .filter(|t| !PRICE_TOKEN.is_match(t))
        .copied()
        .unwrap_or("");

    let item = LineItem::new(
        candidate.code,
        tokens[..qty_idx].join(" "),
        tokens[qty_idx],
        unit,
    );
    Some(single_line(item, ExtractionStrategy::QuantityAnchored))
}

/// Quantity and unit from one of the following lines; the code line gives
/// the description.
pub fn multi_line(candidate: &Candidate<'_>) -> Option<StrategyMatch> {
    for (offset, next) in candidate.following.iter().enumerate() {
        if next.starts_with(CODE_MARKER) {
            break;
        }

        if let Some(caps) = DATA_LINE.captures(next) {
            let item = LineItem::new(candidate.code, candidate.rest, &caps[1], &caps[2]);
            return Some(StrategyMatch {
                item,
                consumed: offset + 1,
                strategy: ExtractionStrategy::MultiLine,
            });
        }
    }

    None
}

/// Code and description only.
pub fn code_only(candidate: &Candidate<'_>) -> Option<StrategyMatch> {
    let item = LineItem::new(candidate.code, candidate.rest, "", "");
    Some(single_line(item, ExtractionStrategy::CodeOnly))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn candidate<'a>(line: &'a str, following: &'a [String]) -> Candidate<'a> {
        Candidate::from_line(line, following).unwrap()
    }

    #[test]
    fn test_candidate_requires_marker() {
        assert!(Candidate::from_line("100234 Coca Cola", &[]).is_none());
        assert!(Candidate::from_line("* 100234", &[]).is_none());

        let c = candidate("*100234", &[]);
        assert_eq!(c.code, "*100234");
        assert_eq!(c.rest, "");
    }

    #[test]
    fn test_inline_full_compound_unit() {
        let c = candidate("*100234 Coca Cola Zero 50cl 6 12 x 50cl €3,50", &[]);
        let m = extract(&c).unwrap();

        assert_eq!(m.strategy, ExtractionStrategy::InlineFull);
        assert_eq!(
            m.item,
            LineItem::new("*100234", "Coca Cola Zero 50cl", "6", "12 x 50cl")
        );
    }

    #[test]
    fn test_inline_full_parenthetical_unit() {
        let c = candidate("*300100 Prosecco DOC 2 (6x75cl) EUR 48.00", &[]);
        let m = inline_full(&c).unwrap();

        assert_eq!(m.item.description, "Prosecco DOC");
        assert_eq!(m.item.quantity, "2");
        assert_eq!(m.item.unit_of_measure, "(6x75cl)");
    }

    #[test]
    fn test_inline_simple_bare_unit() {
        let c = candidate("*200567 Fanta Orange 33cl 10 CS €12,00", &[]);
        assert!(inline_full(&c).is_none());

        let m = extract(&c).unwrap();
        assert_eq!(m.strategy, ExtractionStrategy::InlineSimple);
        assert_eq!(m.item, LineItem::new("*200567", "Fanta Orange 33cl", "10", "CS"));
    }

    #[test]
    fn test_quantity_anchored() {
        let c = candidate("*274077 GSD PET 50cl Sprite 12 24x50cl", &[]);
        let m = extract(&c).unwrap();

        assert_eq!(m.strategy, ExtractionStrategy::QuantityAnchored);
        assert_eq!(m.item, LineItem::new("*274077", "GSD PET 50cl Sprite", "12", "24x50cl"));
    }

    #[test]
    fn test_quantity_anchored_skips_price_as_unit() {
        let c = candidate("*274077 Sprite 4", &[]);
        let m = quantity_anchored(&c).unwrap();
        assert_eq!(m.item.unit_of_measure, "");

        let c = candidate("*274077 Sprite 4 €9,99 each", &[]);
        let m = quantity_anchored(&c).unwrap();
        assert_eq!(m.item.quantity, "4");
        assert_eq!(m.item.unit_of_measure, "");
    }

    #[test]
    fn test_multi_line_uses_continuation() {
        let following = vec!["Lemon flavour".to_string(), "6 CS €21,00".to_string()];
        let c = candidate("*500001 San Pellegrino Limonata", &following);
        let m = extract(&c).unwrap();

        assert_eq!(m.strategy, ExtractionStrategy::MultiLine);
        assert_eq!(m.consumed, 2);
        assert_eq!(
            m.item,
            LineItem::new("*500001", "San Pellegrino Limonata", "6", "CS")
        );
    }

    #[test]
    fn test_multi_line_stops_at_next_code() {
        let following = vec!["*500002 Next item".to_string(), "6 CS €21,00".to_string()];
        let c = candidate("*500001 San Pellegrino Limonata", &following);
        assert!(multi_line(&c).is_none());
    }

    #[test]
    fn test_code_only_fallback() {
        let following = vec!["Deliver to back door".to_string()];
        let c = candidate("*600000 Mixed crate", &following);
        let m = extract(&c).unwrap();

        assert_eq!(m.strategy, ExtractionStrategy::CodeOnly);
        assert_eq!(m.consumed, 0);
        assert_eq!(m.item, LineItem::new("*600000", "Mixed crate", "", ""));
    }
}
