// Console rendering of a dashboard: metrics, preview table and text charts.
use crate::types::{Dashboard, RatingShareRow};
use crate::util::{bar, format_int, format_percent};
use serde::Serialize;
use std::fmt::Write;
use tabled::{settings::Style, Table, Tabled};

pub fn to_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

pub fn render_table<T>(rows: &[T]) -> String
where
    T: Tabled + Clone,
{
    if rows.is_empty() {
        return "(no rows)\n".to_string();
    }
    let table_str = Table::new(rows.to_vec()).with(Style::markdown()).to_string();
    format!("{}\n", table_str)
}

/// Labelled horizontal bars, one line per entry, in the given order.
pub fn render_bar_chart(title: &str, entries: &[(String, usize)], width: usize) -> String {
    let mut out = format!("{}\n", title);
    if entries.is_empty() {
        out.push_str("(no data)\n");
        return out;
    }
    let max = entries.iter().map(|(_, c)| *c).max().unwrap_or(0);
    let label_width = entries.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    for (label, count) in entries {
        let _ = writeln!(
            out,
            "{:<lw$} | {} {}",
            label,
            bar(*count, max, width),
            format_int(*count),
            lw = label_width
        );
    }
    out
}

pub fn render_dashboard(dash: &Dashboard, chart_width: usize) -> String {
    let mut out = String::new();
    let f = &dash.filter;
    let _ = writeln!(
        out,
        "Filters: type = {}, country contains \"{}\", release year {}–{}\n",
        f.kind, f.country, f.year_min, f.year_max
    );

    out.push_str("Dataset Overview\n");
    let _ = writeln!(out, "Total Titles: {}", format_int(dash.metrics.total));
    let _ = writeln!(out, "Movies:       {}", format_int(dash.metrics.movies));
    let _ = writeln!(out, "TV Shows:     {}\n", format_int(dash.metrics.shows));

    out.push_str(&render_table(&dash.preview));
    out.push('\n');

    let years: Vec<(String, usize)> = dash
        .by_year
        .iter()
        .map(|(y, c)| (y.to_string(), *c))
        .collect();
    out.push_str(&render_bar_chart("Titles Released Over the Years", &years, chart_width));
    out.push('\n');

    out.push_str("Distribution of Ratings\n");
    let rated: usize = dash.by_rating.iter().map(|r| r.count).sum();
    let shares: Vec<RatingShareRow> = dash
        .by_rating
        .iter()
        .map(|r| RatingShareRow {
            rating: r.rating.clone(),
            count: format_int(r.count),
            share: format_percent(r.count, rated),
        })
        .collect();
    out.push_str(&render_table(&shares));
    out.push('\n');

    let countries: Vec<(String, usize)> = dash
        .top_countries
        .iter()
        .map(|c| (c.country.clone(), c.count))
        .collect();
    out.push_str(&render_bar_chart(
        &format!("Top {} Countries with Most Titles", countries.len()),
        &countries,
        chart_width,
    ));
    out
}
