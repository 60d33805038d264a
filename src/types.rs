use chrono::NaiveDate;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tabled::Tabled;

/// Country value used when the source cell is empty.
pub const UNKNOWN_COUNTRY: &str = "Unknown";

pub const MOVIE: &str = "Movie";
pub const TV_SHOW: &str = "TV Show";

/// One CSV row as it appears in the source, before normalization.
///
/// Every field is optional: the `csv` crate maps empty cells to `None`, and a
/// column missing from the header also lands as `None`.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    pub show_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub title: Option<String>,
    pub director: Option<String>,
    pub cast: Option<String>,
    pub country: Option<String>,
    pub date_added: Option<String>,
    pub release_year: Option<String>,
    pub rating: Option<String>,
    pub duration: Option<String>,
    pub listed_in: Option<String>,
    pub description: Option<String>,
}

/// A normalized title.
///
/// `country` is never missing and `release_year`/`date_added` are either a
/// typed value or `None`, never raw text.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleRecord {
    pub show_id: Option<String>,
    pub kind: Option<String>,
    pub title: Option<String>,
    pub director: Option<String>,
    pub cast: Option<String>,
    pub country: String,
    pub date_added: Option<NaiveDate>,
    pub release_year: Option<i32>,
    pub rating: Option<String>,
    pub duration: Option<String>,
    pub listed_in: Option<String>,
    pub description: Option<String>,
}

/// Values the filter controls can offer for a table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOptions {
    /// Distinct `type` values in first-seen order.
    pub types: Vec<String>,
    /// Distinct trimmed country names, sorted.
    pub countries: Vec<String>,
}

/// An ordered, immutable sequence of titles.
#[derive(Debug, Clone, Default)]
pub struct TitleTable {
    rows: Vec<TitleRecord>,
    options: OnceCell<FilterOptions>,
}

impl TitleTable {
    pub fn new(rows: Vec<TitleRecord>) -> Self {
        Self {
            rows,
            options: OnceCell::new(),
        }
    }

    pub fn rows(&self) -> &[TitleRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Filter options for this table, derived on first use.
    pub fn options(&self) -> &FilterOptions {
        self.options
            .get_or_init(|| crate::options::derive_options(&self.rows))
    }
}

impl PartialEq for TitleTable {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows
    }
}

/// User-selected constraints: exact type, country substring, inclusive
/// release year window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterSpec {
    #[serde(rename = "type")]
    pub kind: String,
    pub country: String,
    pub year_min: i32,
    pub year_max: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Metrics {
    pub total: usize,
    pub movies: usize,
    pub shows: usize,
}

/// One preview line. The long free-text columns only go to JSON so the
/// console table stays narrow.
#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct PreviewRow {
    pub show_id: String,
    #[serde(rename = "type")]
    #[tabled(rename = "type")]
    pub kind: String,
    pub title: String,
    #[tabled(skip)]
    pub director: String,
    #[tabled(skip)]
    pub cast: String,
    pub country: String,
    pub date_added: String,
    pub release_year: String,
    pub rating: String,
    pub duration: String,
    #[tabled(skip)]
    pub listed_in: String,
    #[tabled(skip)]
    pub description: String,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct RatingCount {
    pub rating: String,
    pub count: usize,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct CountryCount {
    pub country: String,
    pub count: usize,
}

/// Rating share row rendered in place of a pie chart.
#[derive(Debug, Tabled, Clone)]
pub struct RatingShareRow {
    #[tabled(rename = "Rating")]
    pub rating: String,
    #[tabled(rename = "Count")]
    pub count: String,
    #[tabled(rename = "Share")]
    pub share: String,
}

/// Everything the dashboard renders for one filter selection.
#[derive(Debug, Serialize, Clone)]
pub struct Dashboard {
    pub filter: FilterSpec,
    pub metrics: Metrics,
    pub preview: Vec<PreviewRow>,
    pub by_year: BTreeMap<i32, usize>,
    pub by_rating: Vec<RatingCount>,
    pub top_countries: Vec<CountryCount>,
}
