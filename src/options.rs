// Filter control vocabulary and defaults derived from the full table.
use crate::types::{FilterOptions, FilterSpec, TitleRecord, TitleTable};
use crate::util::split_countries;
use std::collections::{BTreeSet, HashSet};

/// Distinct types in first-seen order and the sorted set of trimmed country
/// names.
///
/// The country list only populates the selector; a filter value outside it
/// is still accepted and simply matches nothing.
pub fn derive_options(rows: &[TitleRecord]) -> FilterOptions {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut types = Vec::new();
    for kind in rows.iter().filter_map(|r| r.kind.as_deref()) {
        if seen.insert(kind) {
            types.push(kind.to_string());
        }
    }

    let countries: BTreeSet<&str> = rows
        .iter()
        .flat_map(|r| split_countries(&r.country))
        .collect();

    FilterOptions {
        types,
        countries: countries.into_iter().map(str::to_string).collect(),
    }
}

/// Min and max release year over the whole table, `None` if no row has one.
pub fn year_bounds(table: &TitleTable) -> Option<(i32, i32)> {
    let mut years = table.rows().iter().filter_map(|r| r.release_year);
    let first = years.next()?;
    Some(years.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y))))
}

/// Clamp the preferred window into `bounds`, keeping `min <= max`.
pub fn clamp_window(window: (i32, i32), bounds: Option<(i32, i32)>) -> (i32, i32) {
    let Some((lo, hi)) = bounds else {
        return window;
    };
    let min = window.0.clamp(lo, hi);
    let max = window.1.clamp(lo, hi).max(min);
    (min, max)
}

/// The selection the dashboard opens with: first type, first country and
/// the preferred year window clamped to the data.
pub fn default_spec(table: &TitleTable, window: (i32, i32)) -> Option<FilterSpec> {
    let options = table.options();
    let kind = options.types.first()?.clone();
    let country = options.countries.first()?.clone();
    let (year_min, year_max) = clamp_window(window, year_bounds(table));
    Some(FilterSpec {
        kind,
        country,
        year_min,
        year_max,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::types::UNKNOWN_COUNTRY;

    pub(crate) fn title(
        kind: &str,
        country: &str,
        year: Option<i32>,
        rating: Option<&str>,
    ) -> TitleRecord {
        TitleRecord {
            show_id: None,
            kind: Some(kind.to_string()),
            title: None,
            director: None,
            cast: None,
            country: country.to_string(),
            date_added: None,
            release_year: year,
            rating: rating.map(str::to_string),
            duration: None,
            listed_in: None,
            description: None,
        }
    }

    #[test]
    fn types_keep_first_seen_order() {
        let mut untyped = title("Movie", "USA", Some(2000), None);
        untyped.kind = None;
        let table = TitleTable::new(vec![
            title("TV Show", "USA", Some(2000), None),
            untyped,
            title("Movie", "USA", Some(2000), None),
            title("TV Show", "USA", Some(2000), None),
        ]);
        assert_eq!(table.options().types, vec!["TV Show", "Movie"]);
    }

    #[test]
    fn countries_are_split_trimmed_deduped_and_sorted() {
        let table = TitleTable::new(vec![
            title("Movie", "United States, India", None, None),
            title("Movie", "India,", None, None),
            title("Movie", UNKNOWN_COUNTRY, None, None),
            title("Movie", " Brazil", None, None),
        ]);
        assert_eq!(
            table.options().countries,
            vec!["Brazil", "India", "United States", "Unknown"]
        );
    }

    #[test]
    fn empty_table_has_no_options_and_no_default() {
        let table = TitleTable::default();
        assert!(table.options().types.is_empty());
        assert!(table.options().countries.is_empty());
        assert_eq!(year_bounds(&table), None);
        assert_eq!(default_spec(&table, (2000, 2020)), None);
    }

    #[test]
    fn year_bounds_skip_missing_years() {
        let table = TitleTable::new(vec![
            title("Movie", "USA", Some(2010), None),
            title("Movie", "USA", None, None),
            title("Movie", "USA", Some(1942), None),
        ]);
        assert_eq!(year_bounds(&table), Some((1942, 2010)));
    }

    #[test]
    fn window_is_clamped_to_bounds() {
        assert_eq!(clamp_window((2000, 2020), Some((1925, 2021))), (2000, 2020));
        assert_eq!(clamp_window((2000, 2020), Some((2005, 2010))), (2005, 2010));
        assert_eq!(clamp_window((2000, 2020), Some((2021, 2022))), (2021, 2021));
        assert_eq!(clamp_window((2000, 2020), None), (2000, 2020));
    }

    #[test]
    fn default_spec_uses_first_options() {
        let table = TitleTable::new(vec![
            title("Movie", "USA, India", Some(2015), None),
            title("TV Show", "Canada", Some(2019), None),
        ]);
        let spec = default_spec(&table, (2000, 2020)).unwrap();
        assert_eq!(
            spec,
            FilterSpec {
                kind: "Movie".to_string(),
                country: "Canada".to_string(),
                year_min: 2015,
                year_max: 2019,
            }
        );
    }
}
