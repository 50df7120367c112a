//! bm65 CLI
//!
//! Command-line interface for the Beurer BM65 reader:
//! - Read measurements from the monitor and/or record files
//! - Filter, summarize and classify them
//! - Generate a default config file

use anyhow::{Context, Result};
use bm65::analysis::{
    average, class_distribution, mean_absolute_deviation, median, standard_deviation, StatsError,
    StatsResult,
};
use bm65::config::{generate_default_config, Config, ConfigError, LoggingConfig};
use bm65::device::fetch_from_device;
use bm65::output::{render, write_report_text, OutputFormat, Report};
use bm65::query::{parse_date, parse_time, Filter};
use bm65::storage::{load_files, merge, save_file, Measurement};
use clap::{Args, Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "bm65")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Reader for the Beurer BM65 blood pressure monitor")]
#[command(long_about = "Fetch measurements from a Beurer BM65 over its serial cable,\n\
keep them in JSON record files and print tables and statistics.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: ~/.config/bm65/config.toml, then ./bm65.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read measurements from the device or from record files
    Read(ReadArgs),

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
pub struct ReadArgs {
    /// Input JSON record file (repeatable)
    #[arg(short, long = "input-file")]
    pub input_file: Vec<PathBuf>,

    /// Save the resulting records to this JSON file
    #[arg(short, long = "output-file")]
    pub output_file: Option<PathBuf>,

    /// Also read the device and merge with the input files
    #[arg(short, long)]
    pub merge: bool,

    /// Serial device (overrides the config file)
    #[arg(short, long)]
    pub device: Option<String>,

    /// Keep only the N latest records (0 = all)
    #[arg(short, long, default_value_t = 0)]
    pub limit: usize,

    /// Records from this date on ("YYYY-mm-dd [HH:MM[:SS]]", "now-7d")
    #[arg(long, visible_alias = "since")]
    pub from_date: Option<String>,

    /// Records before this date
    #[arg(long)]
    pub to_date: Option<String>,

    /// Records taken from this time of day on (HH:MM)
    #[arg(long)]
    pub from_time: Option<String>,

    /// Records taken up to and including this time of day (HH:MM)
    #[arg(long)]
    pub to_time: Option<String>,

    /// Output format (csv, json, text)
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Compute the average
    #[arg(short, long)]
    pub average: bool,

    /// Compute the median
    #[arg(long)]
    pub median: bool,

    /// Compute average, median and deviations
    #[arg(short, long)]
    pub stats: bool,

    /// Show the WHO classification of each record
    #[arg(short, long)]
    pub class: bool,

    /// Show the WHO classification distribution
    #[arg(long)]
    pub class_stats: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, skipped) = load_config(cli.config.as_deref())?;
    init_logging(&config.logging);

    for e in &skipped {
        tracing::warn!("{}, skipped", e);
    }

    tracing::debug!("bm65 v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Read(args) => run_read(&args, &config)?,

        Commands::Config { output } => {
            let template = generate_default_config();

            match output {
                Some(path) => {
                    // Create parent directory if needed
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &template)
                        .with_context(|| format!("Failed to write {:?}", path))?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", template);
                }
            }
        }
    }

    Ok(())
}

/// The config and any default config files that failed to load
///
/// Runs before logging is set up, so failures are returned for the caller
/// to report.
fn load_config(path: Option<&Path>) -> Result<(Config, Vec<ConfigError>)> {
    match path {
        Some(path) => Ok((Config::load_with_env(path)?, Vec::new())),
        None => Ok(Config::load_default_reporting()),
    }
}

/// Logs go to stderr, stdout carries the records
fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("bm65={}", config.level)));
    let registry = tracing_subscriber::registry().with(filter);

    if config.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    }
}

fn run_read(args: &ReadArgs, config: &Config) -> Result<()> {
    // Reject bad arguments before talking to the device
    let filter = build_filter(args)?;
    let format = match args.format {
        Some(format) => Some(format),
        // Only the records file is wanted
        None if args.output_file.is_some() => None,
        None => Some(config.output.format.parse().map_err(anyhow::Error::msg)?),
    };

    let items = filter.apply(collect(args, config)?);
    let report = build_report(args, &items)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        Some(format) => render(&mut out, &items, &report, format, args.class)?,
        None => write_report_text(&mut out, &report)?,
    }

    if let Some(path) = &args.output_file {
        match save_file(path, &items) {
            Ok(()) => tracing::info!(count = items.len(), "Saved records to {:?}", path),
            Err(e) => tracing::error!("Could not write output file {:?}: {}", path, e),
        }
    }

    Ok(())
}

fn build_filter(args: &ReadArgs) -> Result<Filter> {
    let mut filter = Filter::new().limit(args.limit);

    if let Some(s) = &args.from_date {
        filter = filter.from_date(parse_date(s)?);
    }
    if let Some(s) = &args.to_date {
        filter = filter.to_date(parse_date(s)?);
    }
    if let Some(s) = &args.from_time {
        filter = filter.from_time(parse_time(s)?);
    }
    if let Some(s) = &args.to_time {
        filter = filter.to_time(parse_time(s)?);
    }

    Ok(filter)
}

/// Records from the input files, the device, or both merged
fn collect(args: &ReadArgs, config: &Config) -> Result<Vec<Measurement>> {
    let stored = if args.input_file.is_empty() {
        Vec::new()
    } else {
        load_files(&args.input_file).context("Failed to load record files")?
    };

    if !args.input_file.is_empty() && !args.merge {
        return Ok(stored);
    }

    let settings = config.device.serial_settings(args.device.as_deref());
    tracing::info!(device = %settings.path, "Reading measurements from device");

    let fetched = fetch_from_device(&settings)
        .with_context(|| format!("Failed to read measurements from {}", settings.path))?;

    Ok(merge(&fetched, &stored))
}

fn build_report(args: &ReadArgs, items: &[Measurement]) -> Result<Report> {
    let mut report = Report::default();
    let wanted = args.average || args.median || args.stats || args.class_stats;

    if !wanted {
        return Ok(report);
    }
    if items.is_empty() {
        tracing::warn!("No measurements left, skipping statistics");
        return Ok(report);
    }

    if args.average || args.stats {
        report.average = Some(average(items)?);
    }
    if args.median || args.stats {
        report.median = Some(median(items)?);
    }
    if args.stats {
        report.standard_deviation = optional(standard_deviation(items))?;
        report.mean_absolute_deviation = optional(mean_absolute_deviation(items))?;
    }
    if args.class_stats {
        report.class_distribution = Some(class_distribution(items)?);
    }

    Ok(report)
}

/// Deviations of a single reading are skipped, not an error
fn optional<T>(result: StatsResult<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(StatsError::SetTooSmall { len }) => {
            tracing::warn!(len, "Too few measurements for deviations");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}
