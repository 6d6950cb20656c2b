//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.tcextract.toml` files. Every setting has a built-in default, so the
//! tool runs without any configuration file.

use crate::models::Status;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".tcextract.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Scanner settings.
    #[serde(default)]
    pub scanner: ScannerConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
        }
    }
}

fn default_output() -> PathBuf {
    PathBuf::from("all_tcs.xlsx")
}

/// Scanner settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Directory holding the test folders.
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,

    /// Folders to scan, in order, relative to `base_dir`.
    #[serde(default = "default_folders")]
    pub folders: Vec<String>,

    /// File extensions to include.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            folders: default_folders(),
            extensions: default_extensions(),
        }
    }
}

impl ScannerConfig {
    /// Resolved root path of every folder, in scan order.
    pub fn folder_paths(&self) -> Vec<PathBuf> {
        self.folders
            .iter()
            .map(|folder| self.base_dir.join(folder))
            .collect()
    }
}

fn default_base_dir() -> PathBuf {
    PathBuf::from(".")
}

fn known_folders() -> Vec<String> {
    vec![
        "design_validation",
        "full_market_release",
        "g7",
        "limited_market_release",
        "long_execution",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_folders() -> Vec<String> {
    known_folders()
}

fn default_extensions() -> Vec<String> {
    vec!["py".to_string()]
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Folder names in sort priority order; unlisted folders sort first.
    #[serde(default = "default_folder_priority")]
    pub folder_priority: Vec<String>,

    /// Values offered in the Status column.
    #[serde(default = "default_status_choices")]
    pub status_choices: Vec<Status>,

    /// Worksheet name.
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            folder_priority: default_folder_priority(),
            status_choices: default_status_choices(),
            sheet_name: default_sheet_name(),
        }
    }
}

fn default_folder_priority() -> Vec<String> {
    known_folders()
}

fn default_status_choices() -> Vec<Status> {
    Status::ALL.to_vec()
}

fn default_sheet_name() -> String {
    "Sheet1".to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, and only
    /// override the config when they were given. Without `--output`, the
    /// configured output file takes the extension of `--format`.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref base_dir) = args.base_dir {
            self.scanner.base_dir = base_dir.clone();
        }
        if let Some(ref folders) = args.folders {
            self.scanner.folders = folders.clone();
        }
        match args.output {
            Some(ref output) => self.general.output = output.clone(),
            None => {
                self.general.output.set_extension(args.format.extension());
            }
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
