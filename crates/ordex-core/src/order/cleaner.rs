//! Description cleanup: quantity echoes and repeated word runs.

/// Clean an item description.
///
/// Quantity truncation runs first, then repeat collapsing. The result is
/// stable: cleaning it again returns the same string.
pub fn clean_description(description: &str, quantity: Option<&str>) -> String {
    let truncated = match quantity.map(str::trim).filter(|q| !q.is_empty()) {
        Some(qty) => truncate_at_quantity(description, qty),
        None => description,
    };

    collapse_repeat(truncated)
}

/// Cut the description at the first standalone occurrence of `quantity`
/// that has more text after it.
fn truncate_at_quantity<'a>(description: &'a str, quantity: &str) -> &'a str {
    for (start, _) in description.match_indices(quantity) {
        let end = start + quantity.len();
        let before = description[..start].chars().next_back();
        let after = description[end..].chars().next();

        let standalone = before.is_none_or(char::is_whitespace)
            && after.is_some_and(char::is_whitespace);
        let has_trailing = !description[end..].trim().is_empty();
        let has_leading = !description[..start].trim().is_empty();

        if standalone && has_trailing && has_leading {
            return description[..start].trim_end();
        }
    }

    description
}

/// Collapse an immediately repeated leading word run.
fn collapse_repeat(description: &str) -> String {
    let tokens: Vec<&str> = description.split_whitespace().collect();

    if tokens.len() > 3 {
        for k in 1..=tokens.len() / 2 {
            if tokens[..k] == tokens[k..2 * k] {
                return tokens[..k].join(" ");
            }
        }
    }

    description.trim().to_string()
}
