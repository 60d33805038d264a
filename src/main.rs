// Entry point and interactive console flow.
//
// - Option [1] loads and normalizes the titles CSV, printing diagnostics.
// - Option [2] changes the type / country / release year filters.
// - Options [3] and [4] run the filter-and-aggregate pipeline and print the
//   dashboard as text or JSON.
// - Option [5] drops the cached table and loads it again.
mod cache;
mod config;
mod filter;
mod loader;
mod options;
mod output;
mod reports;
mod types;
mod util;

use anyhow::{bail, Result};
use cache::TableCache;
use config::DashboardConfig;
use loader::LoadReport;
use std::io::{self, Write};
use types::{FilterSpec, TitleTable};

/// State of one interactive session. The table itself lives in the cache and
/// is handed to the pipeline by reference.
struct Session {
    config: DashboardConfig,
    cache: TableCache,
    spec: Option<FilterSpec>,
}

/// Print `prompt` and read one trimmed line from stdin.
fn read_line(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut buf = String::new();
    if io::stdin().read_line(&mut buf)? == 0 {
        bail!("input closed");
    }
    Ok(buf.trim().to_string())
}

fn print_load_report(report: &LoadReport) {
    println!(
        "Processing dataset... ({} rows read, {} titles loaded)",
        util::format_int(report.total_rows),
        util::format_int(report.loaded_rows)
    );
    if report.skipped_rows > 0 {
        println!(
            "Note: {} rows skipped because they could not be decoded.",
            util::format_int(report.skipped_rows)
        );
    }
    println!(
        "Info: {} countries defaulted to \"{}\", {} unparseable release years, {} unparseable dates.\n",
        util::format_int(report.defaulted_countries),
        types::UNKNOWN_COUNTRY,
        util::format_int(report.missing_years),
        util::format_int(report.missing_dates)
    );
}

impl Session {
    fn new(config: DashboardConfig) -> Self {
        let cache = TableCache::new(config.data_path.clone());
        Self {
            config,
            cache,
            spec: None,
        }
    }

    /// The loaded table, or `None` after telling the user why not.
    fn table(&mut self) -> Option<std::sync::Arc<TitleTable>> {
        let first_load = !self.cache.is_loaded();
        match self.cache.get() {
            Ok(table) => {
                if first_load {
                    if let Some(report) = self.cache.last_report() {
                        print_load_report(&report);
                    }
                }
                if self.spec.is_none() {
                    self.spec = options::default_spec(&table, self.config.default_year_window);
                }
                Some(table)
            }
            Err(e) => {
                eprintln!("Failed to load file: {}\n", e);
                None
            }
        }
    }

    /// Handle option [1]: load the dataset (a no-op beyond the summary if it
    /// is already cached).
    fn handle_load(&mut self) {
        if self.cache.is_loaded() {
            println!("Dataset already loaded from {}.\n", self.cache.path().display());
        }
        if let Some(table) = self.table() {
            if table.is_empty() {
                println!("The dataset has no titles.\n");
            } else {
                println!("{} titles available.\n", util::format_int(table.len()));
            }
        }
    }

    /// Handle option [5]: invalidate and load again.
    fn handle_reload(&mut self) {
        self.cache.invalidate();
        self.spec = None;
        self.handle_load();
    }

    /// Handle option [2]: walk through the three filter controls. Pressing
    /// Enter keeps the current value of each one.
    fn handle_filters(&mut self) -> Result<()> {
        let Some(table) = self.table() else {
            return Ok(());
        };
        let Some(mut spec) = self.spec.clone() else {
            println!("The dataset has no types or countries to filter on.\n");
            return Ok(());
        };
        let opts = table.options();

        println!("Select Type:");
        for (i, kind) in opts.types.iter().enumerate() {
            println!("[{}] {}", i + 1, kind);
        }
        let choice = read_line(&format!("Type (Enter keeps \"{}\"): ", spec.kind))?;
        if !choice.is_empty() {
            match choice.parse::<usize>().ok().and_then(|i| opts.types.get(i.wrapping_sub(1))) {
                Some(kind) => spec.kind = kind.clone(),
                None => println!("Invalid choice. Keeping \"{}\".", spec.kind),
            }
        }

        let choice = read_line(&format!(
            "Country (Enter keeps \"{}\", ? lists {} countries): ",
            spec.country,
            opts.countries.len()
        ))?;
        let choice = if choice == "?" {
            println!("{}", opts.countries.join(", "));
            read_line("Country: ")?
        } else {
            choice
        };
        if !choice.is_empty() {
            if !opts.countries.contains(&choice) {
                println!("Note: \"{}\" is not a listed country; matching it as text.", choice);
            }
            spec.country = choice;
        }

        let bounds = options::year_bounds(&table);
        if let Some((lo, hi)) = bounds {
            println!("Release years in the data: {}–{}", lo, hi);
        }
        let year_min = read_year(
            &format!("From year (Enter keeps {}): ", spec.year_min),
            spec.year_min,
        )?;
        let year_max = read_year(
            &format!("To year (Enter keeps {}): ", spec.year_max),
            spec.year_max,
        )?;
        if year_min > year_max {
            println!("Invalid range {}–{}. Keeping the previous years.", year_min, year_max);
        } else {
            (spec.year_min, spec.year_max) = options::clamp_window((year_min, year_max), bounds);
        }

        println!(
            "Filters set: {}, \"{}\", {}–{}\n",
            spec.kind, spec.country, spec.year_min, spec.year_max
        );
        self.spec = Some(spec);
        Ok(())
    }

    /// Handle options [3] and [4]: run the pipeline for the current filters.
    fn handle_dashboard(&mut self, as_json: bool) -> Result<()> {
        let Some(table) = self.table() else {
            return Ok(());
        };
        let Some(spec) = self.spec.as_ref() else {
            println!("The dataset has no types or countries to filter on.\n");
            return Ok(());
        };
        let dash = reports::build_dashboard(&table, spec, &self.config);
        if as_json {
            println!("{}\n", output::to_json(&dash)?);
        } else {
            println!("{}", output::render_dashboard(&dash, self.config.chart_width));
        }
        Ok(())
    }
}

fn read_year(prompt: &str, current: i32) -> Result<i32> {
    let s = read_line(prompt)?;
    if s.is_empty() {
        return Ok(current);
    }
    match util::parse_year_safe(Some(&s)) {
        Some(y) => Ok(y),
        None => {
            println!("Not a year. Keeping {}.", current);
            Ok(current)
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut session = Session::new(DashboardConfig::default());
    loop {
        println!("Titles Dashboard");
        println!("[1] Load the dataset");
        println!("[2] Choose filters");
        println!("[3] Show dashboard");
        println!("[4] Show dashboard as JSON");
        println!("[5] Reload the dataset");
        println!("[0] Exit\n");
        match read_line("Enter choice: ")?.as_str() {
            "1" => session.handle_load(),
            "2" => session.handle_filters()?,
            "3" => session.handle_dashboard(false)?,
            "4" => session.handle_dashboard(true)?,
            "5" => session.handle_reload(),
            "0" => {
                println!("Exiting the program.");
                break;
            }
            _ => println!("Invalid choice. Please enter 0 to 5.\n"),
        }
    }
    Ok(())
}
