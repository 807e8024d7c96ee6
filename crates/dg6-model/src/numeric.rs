//! Vendor number text.

/// Parses a vendor-formatted number such as `" 1,234.5 "`.
///
/// Surrounding whitespace and thousands separators are removed first. Empty
/// or non-numeric text, and NaN, yield `None`.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    // Remove thousands separators
    let cleaned = trimmed.replace(',', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }

    cleaned.parse::<f64>().ok().filter(|value| !value.is_nan())
}
