//! Common regex patterns for purchase-order extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Header anchors
    pub static ref PO_NUMBER: Regex = Regex::new(
        r"PO No:\s*(\d+)"
    ).unwrap();

    pub static ref PO_DATE: Regex = Regex::new(
        r"Date of PO:\s*(\d{2}/\d{2}/\d{4})"
    ).unwrap();

    // "Delivery Date (ON OR BEFORE): 12/03/2024" - qualifier between label and colon
    pub static ref DELIVERY_DATE: Regex = Regex::new(
        r"Delivery Date[^\n]*?:\s*(\d{2}/\d{2}/\d{4})"
    ).unwrap();

    // "To:" opening a line; "Ship To:" and "Deliver To:" are addresses
    pub static ref SUPPLIER: Regex = Regex::new(
        r"(?m)^[ \t]*To:[ \t]*([^\n]+)"
    ).unwrap();

    // Column separator: two or more whitespace characters
    pub static ref COLUMN_GAP: Regex = Regex::new(
        r"\s{2,}"
    ).unwrap();

    // Line starting with a marked customer code
    pub static ref CODE_LINE: Regex = Regex::new(
        r"^(\*\S+)(?:\s+(.*))?$"
    ).unwrap();

    // *code description qty 12 x 75cl €price
    pub static ref INLINE_FULL: Regex = Regex::new(
        r"^(\*\S+)\s+(.+?)\s+(\d+)\s+(\(?\d+\s*[xX×]\s*\d+(?:[.,]\d+)?\s*[[:alpha:]]*\)?)\s+(?:€|EUR|£|\$)\s*\d"
    ).unwrap();

    // *code description qty CS €price
    pub static ref INLINE_SIMPLE: Regex = Regex::new(
        r"^(\*\S+)\s+(.+?)\s+(\d+)\s+([^\s€£$]+)\s+(?:€|EUR|£|\$)\s*\d"
    ).unwrap();

    // Continuation line: qty unit [token] then a price or decimal amount
    pub static ref DATA_LINE: Regex = Regex::new(
        r"^(\d+)\s+([^\s€£$]+)\s+(?:[^\s€£$]+\s+)?(?:€|EUR|£|\$|\d+[.,]\d+)"
    ).unwrap();

    // Token that starts with a currency marker
    pub static ref PRICE_TOKEN: Regex = Regex::new(
        r"^(?:€|EUR|£|\$)"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_full_captures() {
        let caps = INLINE_FULL
            .captures("*100234 Coca Cola Zero 50cl 6 12 x 50cl €3,50")
            .unwrap();
        assert_eq!(&caps[1], "*100234");
        assert_eq!(&caps[2], "Coca Cola Zero 50cl");
        assert_eq!(&caps[3], "6");
        assert_eq!(&caps[4], "12 x 50cl");
    }

    #[test]
    fn test_data_line_shapes() {
        assert!(DATA_LINE.is_match("6 CS €21,00"));
        assert!(DATA_LINE.is_match("6 CS 12x33cl €21,00"));
        assert!(DATA_LINE.is_match("6 CS 3.50"));
        assert!(!DATA_LINE.is_match("6 €21,00"));
        assert!(!DATA_LINE.is_match("Sprite lemon"));
    }

    #[test]
    fn test_delivery_date_qualifier() {
        let caps = DELIVERY_DATE
            .captures("Delivery Date (ON OR BEFORE): 12/03/2024")
            .unwrap();
        assert_eq!(&caps[1], "12/03/2024");
    }
}
