//! Order header extraction from fixed text anchors.

use regex::Regex;

use super::patterns::{DELIVERY_DATE, PO_DATE, PO_NUMBER, SUPPLIER};
use crate::models::order::OrderHeader;

/// Extract the order header from normalized document text.
///
/// Each field is looked up independently; a missing anchor leaves the
/// field empty.
pub fn extract_header(text: &str) -> OrderHeader {
    OrderHeader {
        order_number: first_capture(&PO_NUMBER, text),
        order_date: first_capture(&PO_DATE, text),
        delivery_date: first_capture(&DELIVERY_DATE, text),
        supplier_name: first_capture(&SUPPLIER, text),
    }
}

fn first_capture(pattern: &Regex, text: &str) -> String {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}
