//! # Label Extraction
//!
//! Pulls the barcode digits and the expiration label out of detected text lines.
//!
//! Date patterns are tried in order, each over every line, first match wins:
//! 1. `MM/DD/YYYY`
//! 2. `DD/MM/YYYY`
//! 3. `YYYY/MM/DD`
//! 4. `EXP: MM/DD/YY`
//! 5. `JUN1814`
//! 6. `18 JUN 14`
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

const DATE_PATTERNS: [&str; 6] = [
    r"\b(0?[1-9]|1[0-2])[/-](0?[1-9]|[12][0-9]|3[01])[/-](\d{2,4})\b",
    r"\b(0?[1-9]|[12][0-9]|3[01])[/-](0?[1-9]|1[0-2])[/-](\d{2,4})\b",
    r"\b(\d{2,4})[/-](0?[1-9]|1[0-2])[/-](0?[1-9]|[12][0-9]|3[01])\b",
    r"\b(?:EXP|EXPIRY|EXPIRES)[: ]*(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})\b",
    r"\b(JAN|FEB|MAR|APR|MAY|JUN|JUL|AUG|SEP|OCT|NOV|DEC)[ ]?\d{1,2}\d{2,4}\b",
    r"\b\d{1,2}[ ]?(JAN|FEB|MAR|APR|MAY|JUN|JUL|AUG|SEP|OCT|NOV|DEC)[ ]?\d{2,4}\b",
];

// two-digit years first, `%Y` would read "24" as year 24
const DATE_FORMATS: [&str; 14] = [
    "%m/%d/%y", "%m/%d/%Y", "%m-%d-%y", "%m-%d-%Y", "%d/%m/%y", "%d/%m/%Y", "%d-%m-%y",
    "%d-%m-%Y", "%Y/%m/%d", "%Y-%m-%d", "%b%d%y", "%b%d%Y", "%d%b%y", "%d%b%Y",
];

static DATE_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    DATE_PATTERNS
        .iter()
        .filter_map(|pattern| Regex::new(pattern).ok())
        .collect()
});

static EXPIRY_PREFIX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^(?:EXPIRES|EXPIRY|EXP)[: ]*").ok());

/// Concatenates every line that is all digits once spaces are removed.
pub fn barcode_from_lines<S: AsRef<str>>(lines: &[S]) -> Option<String> {
    let barcode: String = lines
        .iter()
        .map(|line| line.as_ref().replace(' ', ""))
        .filter(|line| !line.is_empty() && line.chars().all(|c| c.is_ascii_digit()))
        .collect();

    (!barcode.is_empty()).then_some(barcode)
}

pub fn expiration_from_lines<S: AsRef<str>>(lines: &[S]) -> Option<String> {
    DATE_REGEXES.iter().find_map(|regex| {
        lines
            .iter()
            .find_map(|line| regex.find(line.as_ref()))
            .map(|found| found.as_str().to_string())
    })
}

pub fn normalize_date(raw: &str) -> Option<NaiveDate> {
    let upper = raw.trim().to_uppercase();
    let stripped = match EXPIRY_PREFIX.as_ref() {
        Some(prefix) => prefix.replace(&upper, "").into_owned(),
        None => upper,
    };
    let compact = stripped.replace(' ', "");

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(&compact, format).ok())
}
