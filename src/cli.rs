//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and the usage message.

use clap::error::ErrorKind;
use clap::Parser;
use std::path::{Path, PathBuf};

/// sd3merge - merge FittsTask trace records from GoFitts .sd3 files
///
/// Reads every .sd3 file in DIR (not recursive), keeps the lines that start
/// with "FittsTask" and writes them below a fixed header into one file.
///
/// Examples:
///   sd3merge ./traces
///   sd3merge ./traces --output all_trials.sd3
///   sd3merge ./traces --dry-run
///   sd3merge --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory containing the .sd3 files to merge
    #[arg(value_name = "DIR", required_unless_present = "init_config")]
    pub dir: Option<PathBuf>,

    /// Output file path [default: results.sd3]
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// No configuration file is read unless this is given.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// List the files that would be merged and exit
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default sd3merge.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// What to do after a failed parse.
#[derive(Debug)]
pub enum ParseFailure {
    /// `--help` or `--version`: let clap print and exit successfully.
    Informational(clap::Error),
    /// Wrong arguments: print the usage message and exit non-zero.
    Usage,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Result<Self, ParseFailure> {
        Self::parse_from_iter(std::env::args_os())
    }

    /// Parse from an explicit argument list (first item is the binary name).
    pub fn parse_from_iter<I, T>(iter: I) -> Result<Self, ParseFailure>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(iter).map_err(|e| match e.kind() {
            ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => ParseFailure::Informational(e),
            _ => ParseFailure::Usage,
        })
    }

    /// One-line usage message shown for wrong arguments.
    pub fn usage() -> String {
        format!(
            "Usage: {} /path/to/your/FittsTaskSD3files",
            env!("CARGO_PKG_NAME")
        )
    }

    /// Input directory, empty when only `--init-config` was given.
    pub fn input_dir(&self) -> &Path {
        self.dir.as_deref().unwrap_or_else(|| Path::new(""))
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref output) = self.output {
            if output.as_os_str().is_empty() {
                return Err("Output path must not be empty".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, ParseFailure> {
        Args::parse_from_iter(std::iter::once("sd3merge").chain(args.iter().copied()))
    }

    #[test]
    fn test_single_positional() {
        let args = parse(&["traces"]).unwrap();
        assert_eq!(args.input_dir(), Path::new("traces"));
        assert!(args.output.is_none());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_wrong_positional_count_is_usage_error() {
        assert!(matches!(parse(&[]), Err(ParseFailure::Usage)));
        assert!(matches!(parse(&["a", "b"]), Err(ParseFailure::Usage)));
    }

    #[test]
    fn test_help_is_informational() {
        assert!(matches!(
            parse(&["--help"]),
            Err(ParseFailure::Informational(_))
        ));
    }

    #[test]
    fn test_init_config_needs_no_dir() {
        let args = parse(&["--init-config"]).unwrap();
        assert!(args.dir.is_none());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let args = parse(&["traces", "-v", "-q"]).unwrap();
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = parse(&["traces"]).unwrap();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
