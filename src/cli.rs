//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// tcextract - test case inventory for automation suites
///
/// Scans folders of Python test scripts for test case markers and writes
/// a review spreadsheet listing every script and test case.
///
/// Examples:
///   tcextract
///   tcextract --base-dir ~/src/suite --folders g7,long_execution
///   tcextract --format json --output all_tcs.json
///   tcextract --dry-run --verbose
///   tcextract --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Directory holding the test folders
    ///
    /// Defaults to the config file value, or the current directory.
    #[arg(short, long, value_name = "DIR", env = "TCEXTRACT_BASE_DIR")]
    pub base_dir: Option<PathBuf>,

    /// Folders to scan, in order (comma-separated)
    ///
    /// Example: --folders g7,long_execution
    #[arg(short, long, value_name = "NAMES", value_delimiter = ',')]
    pub folders: Option<Vec<String>>,

    /// Output file path for the report
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (xlsx, json)
    #[arg(long, default_value = "xlsx", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Path to configuration file
    ///
    /// If not specified, looks for .tcextract.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Dry run: scan and list the records without writing a report
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .tcextract.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Excel workbook (default)
    #[default]
    Xlsx,
    /// JSON format
    Json,
}

impl OutputFormat {
    /// File extension written for this format.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Json => "json",
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref folders) = self.folders {
            if folders.iter().all(|f| f.trim().is_empty()) {
                return Err("Folder list must not be empty".to_string());
            }
        }

        // A missing base directory is reported per folder while scanning
        if let Some(ref base_dir) = self.base_dir {
            if base_dir.exists() && !base_dir.is_dir() {
                return Err(format!(
                    "Base path is not a directory: {}",
                    base_dir.display()
                ));
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
