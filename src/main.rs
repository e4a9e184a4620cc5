//! CLI entry point for the bikeshare explorer.
//!
//! Runs the interactive exploration session by default, and provides
//! one-shot subcommands for printing a report or a page of raw trips.

use anyhow::{Context, Result, anyhow};
use bikeshare_explorer::{
    analyzers::types::TripReport,
    config::CityCatalog,
    filter::{FilterSpec, MonthFilter, WeekdayFilter, filter},
    loader::load_city,
    logging::env_filter,
    model::Dataset,
    output,
    pager::{block_count, page},
    prompt::Prompter,
    session,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{
    Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeshare_explorer")]
#[command(about = "Explore US bikeshare trip data", long_about = None)]
struct Cli {
    /// Directory the city CSV files live in [env: BIKESHARE_DATA_DIR]
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// JSON file mapping city names to CSV files [env: BIKESHARE_CITIES]
    #[arg(long, global = true)]
    cities: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactively choose a city and filters, then browse statistics (default)
    Explore,
    /// Print every statistic for one city and filter selection
    Report {
        #[arg(short, long)]
        city: String,

        /// Month name (January - June) or "all"
        #[arg(short, long, default_value = "all")]
        month: MonthFilter,

        /// Weekday name or "all"
        #[arg(short, long, default_value = "all")]
        day: WeekdayFilter,

        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Print one block of five raw trip records
    Raw {
        #[arg(short, long)]
        city: String,

        #[arg(short, long, default_value = "all")]
        month: MonthFilter,

        #[arg(short, long, default_value = "all")]
        day: WeekdayFilter,

        /// 1-based block number
        #[arg(short, long, default_value_t = 1)]
        block: usize,

        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// List configured cities and where their data is read from
    ListCities,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/bikeshare_explorer.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeshare_explorer.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    // stderr stays quiet by default so prompts are not interleaved with logs
    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(env_filter("RUST_LOG", "warn"));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(non_blocking_file)
        .with_filter(env_filter("RUST_LOG_JSON", "debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let catalog = build_catalog(cli.data_dir, cli.cities)?;

    match cli.command.unwrap_or(Commands::Explore) {
        Commands::Explore => {
            let stdin = std::io::stdin();
            let mut prompter = Prompter::new(stdin.lock(), std::io::stdout());
            session::run(&mut prompter, &catalog)?;
        }
        Commands::Report {
            city,
            month,
            day,
            format,
        } => {
            let spec = FilterSpec::new(month, day);
            let (city, selected) = load_selection(&catalog, &city, &spec)?;
            let report = TripReport::from_dataset(&selected, &spec).with_city(&city);
            output::print_pretty(&report);

            let mut stdout = std::io::stdout().lock();
            match format {
                Format::Text => output::write_report(&mut stdout, &report)?,
                Format::Json => writeln!(stdout, "{}", output::to_json(&report)?)?,
            }
        }
        Commands::Raw {
            city,
            month,
            day,
            block,
            format,
        } => {
            let spec = FilterSpec::new(month, day);
            let (_, selected) = load_selection(&catalog, &city, &spec)?;
            let rows = page(&selected, block)?;
            let blocks = block_count(&selected);
            debug!(block, blocks, rows = rows.len(), "Raw page selected");

            let mut stdout = std::io::stdout().lock();
            match format {
                Format::Text => {
                    writeln!(stdout, "Block {block} of {blocks}")?;
                    output::write_page(&mut stdout, &rows)?;
                }
                Format::Json => {
                    let body = serde_json::json!({
                        "block": block,
                        "blocks": blocks,
                        "rows": rows,
                    });
                    writeln!(stdout, "{}", output::to_json(&body)?)?;
                }
            }
        }
        Commands::ListCities => {
            let mut stdout = std::io::stdout().lock();
            for (city, path) in catalog.iter() {
                let status = if path.exists() { "found" } else { "missing" };
                writeln!(stdout, "{city}: {} ({status})", path.display())?;
            }
        }
    }

    Ok(())
}

/// Builds the city catalog from flags, falling back to environment
/// variables and then to the built-in city list.
fn build_catalog(data_dir: Option<PathBuf>, cities: Option<PathBuf>) -> Result<CityCatalog> {
    let data_dir = data_dir
        .or_else(|| std::env::var_os("BIKESHARE_DATA_DIR").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));
    let cities = cities.or_else(|| std::env::var_os("BIKESHARE_CITIES").map(PathBuf::from));

    let catalog = match cities {
        Some(path) => CityCatalog::load(&path, &data_dir)?,
        None => CityCatalog::builtin(&data_dir),
    };
    info!(data_dir = %data_dir.display(), cities = ?catalog.cities(), "City catalog ready");
    Ok(catalog)
}

/// Loads a city and applies the filters, returning the canonical city name.
#[tracing::instrument(skip(catalog), fields(month = %spec.month, weekday = %spec.weekday))]
fn load_selection(catalog: &CityCatalog, city: &str, spec: &FilterSpec) -> Result<(String, Dataset)> {
    let name = catalog
        .lookup(city)
        .ok_or_else(|| anyhow!("unknown city '{city}'; known cities: {}", catalog.cities().join(", ")))?
        .to_string();
    let dataset = load_city(catalog, &name).with_context(|| format!("loading data for {name}"))?;
    let selected = filter(&dataset, spec);
    info!(city = %name, trips = selected.len(), "Selection ready");
    Ok((name, selected))
}
