// Utility helpers for loose parsing and console formatting.
//
// This module centralizes the "dirty" CSV cell handling so the rest of the
// code can assume typed, missing-aware values.
use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};

/// Date layouts accepted for `date_added`, tried in order.
///
/// The first one is what the titles export actually uses
/// (`September 25, 2021`).
const DATE_FORMATS: [&str; 5] = ["%B %d, %Y", "%b %d, %Y", "%Y-%m-%d", "%m/%d/%Y", "%d-%b-%y"];

/// Cell texts that count as missing, matching what spreadsheet and
/// dataframe exports write for empty values.
const NA_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// `None` for a missing cell or one holding a missing-value marker.
///
/// Markers must match exactly; `"Namibia"` or `" NA"` stay as text.
pub fn clean_cell(cell: Option<String>) -> Option<String> {
    cell.filter(|c| !NA_TOKENS.contains(&c.as_str()))
}

/// Parse a release year while being forgiving about how it was exported.
///
/// - Accepts `Option<&str>` so callers can pass through optional fields.
/// - Trims whitespace.
/// - Accepts integral floats such as `2015.0`.
/// - Returns `None` for text, fractions, non-finite values and anything
///   outside the `i32` range.
pub fn parse_year_safe(s: Option<&str>) -> Option<i32> {
    // `?` propagates `None` early if the option is missing.
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(y) = s.parse::<i32>() {
        return Some(y);
    }
    let f = s.parse::<f64>().ok()?;
    if !f.is_finite() || f.fract() != 0.0 {
        return None;
    }
    if f < i32::MIN as f64 || f > i32::MAX as f64 {
        return None;
    }
    Some(f as i32)
}

pub fn parse_date_safe(s: Option<&str>) -> Option<NaiveDate> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Split a comma-joined country cell into trimmed, non-empty names.
pub fn split_countries(cell: &str) -> impl Iterator<Item = &str> {
    cell.split(',').map(str::trim).filter(|c| !c.is_empty())
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` for counts in console messages
    // (e.g., `8,807 rows loaded`).
    n.to_formatted_string(&Locale::en)
}

pub fn format_percent(part: usize, whole: usize) -> String {
    // An empty whole renders as 0% instead of NaN.
    if whole == 0 {
        return "0.0%".to_string();
    }
    format!("{:.1}%", part as f64 * 100.0 / whole as f64)
}

/// Horizontal bar scaled so that `max` fills `width` cells.
///
/// Any non-zero value gets at least one cell so small groups stay visible.
pub fn bar(value: usize, max: usize, width: usize) -> String {
    if max == 0 || value == 0 {
        return String::new();
    }
    let cells = (value * width).div_ceil(max).clamp(1, width);
    "█".repeat(cells)
}
