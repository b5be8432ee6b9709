//! Item table region location.

use tracing::debug;

use crate::models::order::TableRegion;

/// Case-insensitive whole-word keyword matcher.
#[derive(Debug, Clone, Default)]
pub struct KeywordSet {
    keywords: Vec<String>,
}

impl KeywordSet {
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Self {
        Self {
            keywords: keywords
                .iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// True when any keyword occurs in `line` as a whole word.
    pub fn matches(&self, line: &str) -> bool {
        let haystack = line.to_lowercase();
        self.keywords
            .iter()
            .any(|keyword| contains_word(&haystack, keyword))
    }
}

fn contains_word(haystack: &str, word: &str) -> bool {
    haystack.match_indices(word).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + word.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

/// Find the item table body within normalized lines.
///
/// The body starts after the first header line and stops before the first
/// terminator line that follows it. Without a header line the whole document
/// is returned, unanchored.
pub fn locate_table(lines: &[String], header: &KeywordSet, terminators: &KeywordSet) -> TableRegion {
    let Some(header_idx) = lines.iter().position(|line| header.matches(line)) else {
        debug!("No table header found, using all {} lines", lines.len());
        return TableRegion {
            start: 0,
            end: lines.len(),
            anchored: false,
        };
    };

    let start = header_idx + 1;
    let end = lines[start..]
        .iter()
        .position(|line| terminators.matches(line))
        .map(|offset| start + offset)
        .unwrap_or(lines.len());

    debug!(
        "Table header at line {}, body spans [{}, {})",
        header_idx, start, end
    );

    TableRegion {
        start,
        end,
        anchored: true,
    }
}
