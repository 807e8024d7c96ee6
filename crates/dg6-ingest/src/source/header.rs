//! Row splitting and header normalization.

use std::collections::HashSet;

/// Normalizes a cell by trimming whitespace and a stray byte-order mark.
pub fn normalize_cell(value: &str) -> String {
    value.trim().trim_matches('\u{feff}').trim().to_string()
}

/// Parses a CSV line into trimmed fields, handling quoted values.
pub fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if !in_quotes => {
                in_quotes = true;
            }
            '"' if in_quotes => {
                // Check for escaped quote ("")
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            ',' if !in_quotes => {
                fields.push(normalize_cell(&current));
                current.clear();
            }
            _ => {
                current.push(c);
            }
        }
    }

    fields.push(normalize_cell(&current));
    fields
}

/// Makes header names unique by suffixing repeats with `.1`, `.2`, ...
///
/// Blank names become `Unnamed: <index>`.
pub fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    let mut result = Vec::with_capacity(headers.len());
    for (idx, header) in headers.into_iter().enumerate() {
        let base = if header.is_empty() {
            format!("Unnamed: {idx}")
        } else {
            header
        };
        let mut name = base.clone();
        let mut suffix = 0;
        while !used.insert(name.clone()) {
            suffix += 1;
            name = format!("{base}.{suffix}");
        }
        result.push(name);
    }
    result
}
