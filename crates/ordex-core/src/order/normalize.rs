//! Line normalization for extracted page text.

use regex::Regex;
use tracing::trace;

/// Splits extracted text into trimmed, non-empty lines.
#[derive(Debug, Clone, Default)]
pub struct LineNormalizer {
    boilerplate: Vec<Regex>,
}

impl LineNormalizer {
    /// Normalizer that only drops blank lines.
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizer that also drops lines matching any of `patterns`.
    pub fn with_boilerplate(patterns: &[String]) -> Result<Self, regex::Error> {
        let boilerplate = patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { boilerplate })
    }

    /// Normalize one document's text (pages already joined by newlines).
    pub fn normalize(&self, text: &str) -> Vec<String> {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter(|line| {
                let boilerplate = self.boilerplate.iter().any(|re| re.is_match(line));
                if boilerplate {
                    trace!("Dropping boilerplate line: {}", line);
                }
                !boilerplate
            })
            .map(str::to_string)
            .collect()
    }

    /// Normalize a document given as separate pages.
    pub fn normalize_pages(&self, pages: &[String]) -> Vec<String> {
        self.normalize(&pages.join("\n"))
    }
}

/// Normalize text with the default normalizer.
pub fn normalize(text: &str) -> Vec<String> {
    LineNormalizer::new().normalize(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drops_blank_lines_and_trims() {
        let lines = normalize("  PO No: 1  \n\n\t\n*123  Sprite  6  CS\r\n   ");
        assert_eq!(lines, vec!["PO No: 1", "*123  Sprite  6  CS"]);
    }

    #[test]
    fn test_keeps_order_across_pages() {
        let pages = vec!["first\n".to_string(), "\nsecond".to_string()];
        assert_eq!(LineNormalizer::new().normalize_pages(&pages), vec!["first", "second"]);
    }

    #[test]
    fn test_boilerplate_patterns() {
        let normalizer =
            LineNormalizer::with_boilerplate(&[r"^Page \d+ of \d+$".to_string()]).unwrap();
        let lines = normalizer.normalize("Header\nPage 1 of 2\nBody");
        assert_eq!(lines, vec!["Header", "Body"]);
    }

    #[test]
    fn test_invalid_boilerplate_pattern() {
        assert!(LineNormalizer::with_boilerplate(&["(".to_string()]).is_err());
    }
}
