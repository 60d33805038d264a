use std::path::PathBuf;

/// Fixed settings for a dashboard session.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Titles CSV, relative to the working directory.
    pub data_path: PathBuf,
    pub preview_rows: usize,
    pub top_countries: usize,
    /// Year window selected before the user touches the range control.
    pub default_year_window: (i32, i32),
    /// Width in cells of the longest text bar.
    pub chart_width: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("netflix_titles.csv"),
            preview_rows: 10,
            top_countries: 10,
            default_year_window: (2000, 2020),
            chart_width: 40,
        }
    }
}
