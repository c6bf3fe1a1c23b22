//! sd3merge - GoFitts trace file merger
//!
//! Collects the `FittsTask` records from every `.sd3` file in a directory
//! into a single file with a fixed header.
//!
//! Exit codes:
//!   0 - Success (including "no .sd3 files found")
//!   1 - Usage error or runtime error (missing directory, I/O failure)

mod cli;
mod config;
mod error;
mod merge;
mod models;
mod scanner;

use anyhow::{Context, Result};
use cli::{Args, ParseFailure};
use config::{Config, DEFAULT_CONFIG_FILE};
use merge::Aggregator;
use models::MergeOutcome;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = match Args::parse_args() {
        Ok(args) => args,
        Err(ParseFailure::Informational(e)) => e.exit(),
        Err(ParseFailure::Usage) => {
            println!("{}", Args::usage());
            std::process::exit(1);
        }
    };

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    let mut config = match args.config {
        Some(ref path) => Config::load(path)?,
        None => Config::default(),
    };
    config.merge_with_args(&args);

    init_logging(log_level(&args, &config))?;

    info!("sd3merge v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(&args, &config) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default sd3merge.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", DEFAULT_CONFIG_FILE);
    println!("   Pass it with --config to change the marker, extension, or header.");
    Ok(())
}

/// Log level from flags, falling back to the config file's verbose setting.
fn log_level(args: &Args, config: &Config) -> tracing::Level {
    if !args.quiet && config.general.verbose {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    }
}

/// Initialize logging on stderr so stdout only carries status messages.
fn init_logging(level: tracing::Level) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

/// Run the merge (or the dry run) for the parsed arguments.
fn run(args: &Args, config: &Config) -> Result<()> {
    let input_dir = args.input_dir();
    let output = PathBuf::from(&config.general.output);
    let aggregator = Aggregator::new(config.merge.clone());

    if args.dry_run {
        return handle_dry_run(&aggregator, input_dir, &output);
    }

    info!(
        "Merging {} lines from {} into {}",
        config.merge.marker,
        input_dir.display(),
        output.display()
    );

    let outcome = match aggregator.aggregate(input_dir, &output) {
        Ok(outcome) => outcome,
        Err(e) if e.is_not_found() => {
            return Err(anyhow::Error::new(e).context("Check the DIR argument"));
        }
        Err(e) => {
            return Err(anyhow::Error::new(e)
                .context(format!("Failed to merge {}", input_dir.display())));
        }
    };

    if let MergeOutcome::Merged(ref summary) = outcome {
        debug!(
            "{} of {} files contributed {} records",
            summary.files_with_records,
            outcome.files_processed(),
            summary.records_written
        );
    }

    println!("{}", outcome);
    Ok(())
}

/// Handle --dry-run: list the input files, write nothing.
fn handle_dry_run(aggregator: &Aggregator, input_dir: &Path, output: &Path) -> Result<()> {
    println!("🔍 Dry run: scanning {} (nothing is written)\n", input_dir.display());

    let files = aggregator.inputs(input_dir, output)?;
    let extension = aggregator.config().extension.as_str();

    if files.is_empty() {
        println!("   No {} files found.", extension);
    } else {
        println!("   {} files would be merged into {}:\n", files.len(), output.display());
        for file in &files {
            println!("     📄 {} ({} bytes)", file.name, file.size);
        }
    }

    println!("\n✅ Dry run complete.");
    Ok(())
}
