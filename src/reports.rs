use crate::config::DashboardConfig;
use crate::filter;
use crate::types::{
    CountryCount, Dashboard, FilterSpec, Metrics, PreviewRow, RatingCount, TitleTable, MOVIE,
    TV_SHOW,
};
use crate::util::split_countries;
use std::collections::{BTreeMap, HashMap};

pub fn metrics(table: &TitleTable) -> Metrics {
    let count_kind = |kind: &str| {
        table
            .rows()
            .iter()
            .filter(|r| r.kind.as_deref() == Some(kind))
            .count()
    };
    Metrics {
        total: table.len(),
        movies: count_kind(MOVIE),
        shows: count_kind(TV_SHOW),
    }
}

/// Titles per release year, ascending. Rows without a year are left out.
pub fn count_by_year(table: &TitleTable) -> BTreeMap<i32, usize> {
    let mut map: BTreeMap<i32, usize> = BTreeMap::new();
    for year in table.rows().iter().filter_map(|r| r.release_year) {
        *map.entry(year).or_default() += 1;
    }
    map
}

/// Titles per rating, most frequent first; ties by rating name.
pub fn count_by_rating(table: &TitleTable) -> Vec<RatingCount> {
    let mut map: HashMap<&str, usize> = HashMap::new();
    for rating in table.rows().iter().filter_map(|r| r.rating.as_deref()) {
        *map.entry(rating).or_default() += 1;
    }
    let mut rows: Vec<RatingCount> = map
        .into_iter()
        .map(|(rating, count)| RatingCount {
            rating: rating.to_string(),
            count,
        })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.rating.cmp(&b.rating)));
    rows
}

/// The `n` countries credited on the most titles.
///
/// Multi-country cells count once for each listed country. Callers pass the
/// full table here, never a filtered one. Ties are broken by country name.
pub fn top_countries(table: &TitleTable, n: usize) -> Vec<CountryCount> {
    let mut map: HashMap<&str, usize> = HashMap::new();
    for country in table.rows().iter().flat_map(|r| split_countries(&r.country)) {
        *map.entry(country).or_default() += 1;
    }
    let mut rows: Vec<(&str, usize)> = map.into_iter().collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    rows.into_iter()
        .take(n)
        .map(|(country, count)| CountryCount {
            country: country.to_string(),
            count,
        })
        .collect()
}

/// First `n` rows rendered as display strings; missing cells are blank.
pub fn preview(table: &TitleTable, n: usize) -> Vec<PreviewRow> {
    let text = |v: &Option<String>| v.clone().unwrap_or_default();
    table
        .rows()
        .iter()
        .take(n)
        .map(|r| PreviewRow {
            show_id: text(&r.show_id),
            kind: text(&r.kind),
            title: text(&r.title),
            director: text(&r.director),
            cast: text(&r.cast),
            country: r.country.clone(),
            date_added: r
                .date_added
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            release_year: r.release_year.map(|y| y.to_string()).unwrap_or_default(),
            rating: text(&r.rating),
            duration: text(&r.duration),
            listed_in: text(&r.listed_in),
            description: text(&r.description),
        })
        .collect()
}

/// Run the whole pipeline for one selection: filter, then metrics, preview
/// and the per-year and per-rating views on the filtered rows, and the
/// country ranking on `full`.
pub fn build_dashboard(
    full: &TitleTable,
    spec: &FilterSpec,
    config: &DashboardConfig,
) -> Dashboard {
    let filtered = filter::apply(full, spec);
    Dashboard {
        filter: spec.clone(),
        metrics: metrics(&filtered),
        preview: preview(&filtered, config.preview_rows),
        by_year: count_by_year(&filtered),
        by_rating: count_by_rating(&filtered),
        top_countries: top_countries(full, config.top_countries),
    }
}
