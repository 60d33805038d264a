use crate::types::{RawRow, TitleRecord, TitleTable, UNKNOWN_COUNTRY};
use crate::util::{clean_cell, parse_date_safe, parse_year_safe};
use csv::ReaderBuilder;
use log::{info, warn};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The only fatal loader condition: the source cannot be opened or read.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("data unavailable at {path}: {source}")]
    DataUnavailable {
        path: PathBuf,
        #[source]
        source: SourceError,
    },
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl LoadError {
    pub(crate) fn unavailable(path: &Path, source: impl Into<SourceError>) -> Self {
        LoadError::DataUnavailable {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub skipped_rows: usize,
    pub defaulted_countries: usize,
    pub missing_years: usize,
    pub missing_dates: usize,
}

/// Read the titles CSV at `path` and normalize it.
///
/// Per-cell parse failures become missing values and are only counted in the
/// returned [`LoadReport`].
pub fn load_titles(path: &Path) -> Result<(TitleTable, LoadReport), LoadError> {
    info!("Loading titles from {}", path.display());
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| LoadError::unavailable(path, e))?;
    // Force the header read so an unreadable source fails here rather than
    // looking like an empty table.
    rdr.headers().map_err(|e| LoadError::unavailable(path, e))?;

    let mut report = LoadReport::default();
    let mut rows: Vec<TitleRecord> = Vec::new();

    for (idx, result) in rdr.deserialize::<RawRow>().enumerate() {
        report.total_rows += 1;
        let raw = match result {
            Ok(r) => r,
            Err(e) if e.is_io_error() => return Err(LoadError::unavailable(path, e)),
            Err(e) => {
                warn!("Skipping row {}: {}", idx + 1, e);
                report.skipped_rows += 1;
                continue;
            }
        };
        rows.push(normalize(raw, &mut report));
    }

    report.loaded_rows = rows.len();
    info!(
        "Loaded {} titles ({} skipped, {} countries defaulted)",
        report.loaded_rows, report.skipped_rows, report.defaulted_countries
    );
    Ok((TitleTable::new(rows), report))
}

fn normalize(raw: RawRow, report: &mut LoadReport) -> TitleRecord {
    let release_year = parse_year_safe(clean_cell(raw.release_year).as_deref());
    if release_year.is_none() {
        report.missing_years += 1;
    }
    let date_added = parse_date_safe(clean_cell(raw.date_added).as_deref());
    if date_added.is_none() {
        report.missing_dates += 1;
    }
    let country = clean_cell(raw.country).unwrap_or_else(|| {
        report.defaulted_countries += 1;
        UNKNOWN_COUNTRY.to_string()
    });

    TitleRecord {
        show_id: clean_cell(raw.show_id),
        kind: clean_cell(raw.kind),
        title: clean_cell(raw.title),
        director: clean_cell(raw.director),
        cast: clean_cell(raw.cast),
        country,
        date_added,
        release_year,
        rating: clean_cell(raw.rating),
        duration: clean_cell(raw.duration),
        listed_in: clean_cell(raw.listed_in),
        description: clean_cell(raw.description),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    pub(crate) const HEADER: &str =
        "show_id,type,title,director,cast,country,date_added,release_year,rating,duration,listed_in,description";

    pub(crate) fn write_csv(body: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        write!(file, "{body}").unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn normalizes_loose_cells() {
        let file = write_csv(concat!(
            "s1,Movie,Alpha,,,\"India, USA\",\"September 25, 2021\",2015,PG,90 min,Dramas,First\n",
            "s2,TV Show,Beta,,,,someday,not-a-year,TV-MA,1 Season,Docuseries,Second\n",
        ));
        let (table, report) = load_titles(file.path()).unwrap();

        assert_eq!(table.len(), 2);
        let first = &table.rows()[0];
        assert_eq!(first.kind.as_deref(), Some("Movie"));
        assert_eq!(first.country, "India, USA");
        assert_eq!(first.release_year, Some(2015));
        assert_eq!(first.date_added, NaiveDate::from_ymd_opt(2021, 9, 25));
        assert_eq!(first.duration.as_deref(), Some("90 min"));

        let second = &table.rows()[1];
        assert_eq!(second.country, UNKNOWN_COUNTRY);
        assert_eq!(second.release_year, None);
        assert_eq!(second.date_added, None);
        assert_eq!(second.director, None);

        assert_eq!(
            report,
            LoadReport {
                total_rows: 2,
                loaded_rows: 2,
                skipped_rows: 0,
                defaulted_countries: 1,
                missing_years: 1,
                missing_dates: 1,
            }
        );
    }

    #[test]
    fn na_markers_load_as_missing() {
        let file = write_csv(concat!(
            "s1,Movie,NA,N/A,,NA,NULL,nan,NA,,,\n",
            "s2,Movie,Namibia Story,,,Namibia,,2019,PG,,,\n",
        ));
        let (table, report) = load_titles(file.path()).unwrap();

        let first = &table.rows()[0];
        assert_eq!(first.title, None);
        assert_eq!(first.director, None);
        assert_eq!(first.country, UNKNOWN_COUNTRY);
        assert_eq!(first.release_year, None);
        assert_eq!(first.rating, None);
        assert_eq!(table.rows()[1].country, "Namibia");
        assert_eq!(report.defaulted_countries, 1);
    }

    #[test]
    fn keeps_source_row_order() {
        let file = write_csv(concat!(
            "s3,Movie,C,,,USA,,2001,R,,,\n",
            "s1,Movie,A,,,USA,,2002,R,,,\n",
            "s2,Movie,B,,,USA,,2003,R,,,\n",
        ));
        let (table, _) = load_titles(file.path()).unwrap();
        let ids: Vec<_> = table
            .rows()
            .iter()
            .map(|r| r.show_id.clone().unwrap_or_default())
            .collect();
        assert_eq!(ids, vec!["s3", "s1", "s2"]);
    }

    #[test]
    fn header_only_file_is_an_empty_table() {
        let file = write_csv("");
        let (table, report) = load_titles(file.path()).unwrap();
        assert!(table.is_empty());
        assert_eq!(report.total_rows, 0);
    }

    #[test]
    fn missing_file_is_data_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.csv");
        let err = load_titles(&path).unwrap_err();
        match err {
            LoadError::DataUnavailable { path: p, .. } => assert_eq!(p, path),
        }
    }
}
