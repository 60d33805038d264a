use crate::types::{FilterSpec, TitleRecord, TitleTable};
use log::debug;

/// Whether a single title passes every predicate of `spec`.
///
/// The country test is a raw substring match on the comma-joined cell, so
/// `"India"` also matches `"British Indian Ocean Territory"`.
pub fn matches(record: &TitleRecord, spec: &FilterSpec) -> bool {
    if record.kind.as_deref() != Some(spec.kind.as_str()) {
        return false;
    }
    if !record.country.contains(spec.country.as_str()) {
        return false;
    }
    match record.release_year {
        Some(y) => spec.year_min <= y && y <= spec.year_max,
        None => false,
    }
}

/// Rows of `table` that satisfy `spec`, in their original order.
pub fn apply(table: &TitleTable, spec: &FilterSpec) -> TitleTable {
    let rows: Vec<TitleRecord> = table
        .rows()
        .iter()
        .filter(|r| matches(r, spec))
        .cloned()
        .collect();
    debug!(
        "Filter {:?} kept {} of {} titles",
        spec,
        rows.len(),
        table.len()
    );
    TitleTable::new(rows)
}
