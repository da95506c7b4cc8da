//! Command-line interface components.

use crate::config::{CalendarPolicy, CompressionAlgorithm, DecoderConfig, ProcessorConfig};
use crate::models::ProcessingStats;
use crate::processor::DlyProcessor;
use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::path::PathBuf;
use tracing::debug;

/// Convert GHCN-Daily `.dly` files to Parquet
#[derive(Parser, Debug)]
#[command(name = "ghcnd-processor")]
#[command(about = "Decode GHCN-Daily fixed-width .dly files into a monthly Parquet table")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// A single .dly file or a directory searched recursively for .dly files
    #[arg(value_name = "INPUT")]
    pub input_path: PathBuf,

    /// Output Parquet file (defaults to <INPUT stem>.parquet beside the input)
    #[arg(short, long)]
    pub output_path: Option<PathBuf>,

    /// Leading lines to discard in every file
    #[arg(long, default_value_t = 0)]
    pub skip_rows: usize,

    /// Drop rows whose year/month cannot form a date instead of failing the file
    #[arg(long)]
    pub skip_malformed: bool,

    /// Keep per-day measurement and source flags
    #[arg(long)]
    pub keep_flags: bool,

    /// Parquet compression algorithm (snappy, zstd, lz4, none)
    #[arg(long, default_value = "snappy")]
    pub compression: String,

    /// Maximum files decoded concurrently
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Build the processor configuration from the flags
    pub fn to_config(&self) -> Result<ProcessorConfig> {
        let compression: CompressionAlgorithm = self
            .compression
            .parse()
            .context("Invalid --compression value")?;

        let mut decoder = DecoderConfig::default().with_skip_rows(self.skip_rows);
        if self.skip_malformed {
            decoder = decoder.with_calendar_policy(CalendarPolicy::SkipRow);
        }
        if self.keep_flags {
            decoder = decoder.with_auxiliary_flags();
        }

        let mut config = ProcessorConfig::default()
            .with_decoder(decoder)
            .with_compression(compression);
        if let Some(jobs) = self.jobs {
            config = config.with_max_concurrent_files(jobs);
        }
        if self.quiet {
            config = config.without_progress();
        }

        config.validate()?;
        Ok(config)
    }
}

/// Install the tracing subscriber. `RUST_LOG` overrides the flag level.
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ghcnd_processor={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .init();

    debug!("Logging initialized at level: {}", log_level);
}

/// Run the conversion described by `args`
pub async fn run(args: Args) -> Result<ProcessingStats> {
    setup_logging(&args);
    debug!("Command line arguments: {:?}", args);

    let config = args.to_config()?;
    let mut processor = DlyProcessor::new(args.input_path.clone(), args.output_path.clone())
        .with_context(|| format!("Cannot process {}", args.input_path.display()))?
        .with_config(config);

    let stats = processor
        .process()
        .await
        .with_context(|| format!("Failed to convert {}", args.input_path.display()))?;

    if !args.quiet {
        print_summary(&stats);
    }
    Ok(stats)
}

fn print_summary(stats: &ProcessingStats) {
    println!("\n{}", "Processing Summary".bright_green().bold());
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        stats.processing_time_ms.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Files processed:".bright_cyan(),
        stats.files_processed.to_string().bright_white()
    );
    if stats.files_failed > 0 {
        println!(
            "  {} {}",
            "Files failed:".bright_red(),
            stats.files_failed.to_string().bright_red().bold()
        );
    }
    if stats.rows_skipped > 0 {
        println!(
            "  {} {}",
            "Rows skipped:".bright_yellow(),
            stats.rows_skipped.to_string().bright_yellow()
        );
    }
    println!(
        "  {} {}",
        "Monthly records:".bright_cyan(),
        stats.total_records.to_string().bright_white().bold()
    );
    if stats.total_records > 0 {
        println!(
            "  {} {}",
            "Output:".bright_cyan(),
            stats.output_path.display()
        );
    }
}
