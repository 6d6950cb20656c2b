//! tcextract - test case inventory for automation suites
//!
//! A CLI tool that scans folders of Python test scripts for
//! `th.protocol.start("TC-…")` / `th.protocol.end()` markers and
//! writes a review spreadsheet with one row per test case.
//!
//! Exit codes:
//!   0 - Completed (including runs where nothing was found)
//!   1 - Runtime error (bad arguments, config, or unwritable output)

mod analysis;
mod cli;
mod config;
mod error;
mod models;
mod report;
mod scanner;

use analysis::FolderRanking;
use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::Config;
use models::Record;
use std::path::Path;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("tcextract v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(&args) {
        error!("Extraction failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .tcextract.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(config::CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", config::CONFIG_FILE_NAME);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", config::CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", config::CONFIG_FILE_NAME);
    println!("   Edit it to customize the base directory, folders, and output.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run the complete extraction workflow.
fn run(args: &Args) -> Result<()> {
    let mut config = load_config(args)?;
    config.merge_with_args(args);

    let mut scan_config = scanner::ScanConfig::from(&config.scanner);
    scan_config.show_progress = !args.quiet;

    let ranking = FolderRanking::from_ordered(config.report.folder_priority.iter().cloned());

    println!(
        "🔍 Scanning {} folder(s) under {}",
        config.scanner.folders.len(),
        config.scanner.base_dir.display()
    );
    let records = collect_records(&config.scanner, scan_config, &ranking);

    if records.is_empty() {
        println!("\n⚠️  No test cases found to save.");
        return Ok(());
    }

    if args.dry_run {
        return handle_dry_run(&records);
    }

    let rows = report::build_rows(&records);
    let output = &config.general.output;

    match args.format {
        OutputFormat::Xlsx => {
            let options = report::ReportOptions::from(&config.report);
            report::write_xlsx_report(&rows, output, &options)?;
        }
        OutputFormat::Json => report::write_json_report(&rows, output)?,
    }

    println!("\n📊 Rows written: {}", rows.len());
    println!(
        "\n✅ Data extraction completed. Results saved in: {}",
        output.display()
    );

    Ok(())
}

/// Scan every configured folder in order and return the sorted records.
fn collect_records(
    scanner_config: &config::ScannerConfig,
    scan_config: scanner::ScanConfig,
    ranking: &FolderRanking,
) -> Vec<Record> {
    let file_scanner = scanner::FileScanner::new(scan_config);

    let scans: Vec<_> = scanner_config
        .folder_paths()
        .iter()
        .map(|root| {
            let scan = file_scanner.scan_folder(root);
            if !scan.summary.root_found {
                println!("   Folder does not exist: {}", root.display());
            }
            scan
        })
        .collect();

    let mut records = analysis::aggregate_records(scans);
    analysis::sort_records(&mut records, ranking);
    records
}

/// Handle --dry-run: print the rows that would be written, write nothing.
fn handle_dry_run(records: &[Record]) -> Result<()> {
    println!("\n🔍 Dry run: {} row(s) would be written\n", records.len());

    for record in records {
        let id = record
            .test_case_id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_default();
        println!(
            "     📄 {:<24} {:<40} {}",
            record.folder_name, record.script_name, id
        );
    }

    println!("\n✅ Dry run complete. No report was written.");
    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", config::CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn fixtures_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    fn scanner_config(folders: &[&str]) -> config::ScannerConfig {
        config::ScannerConfig {
            base_dir: fixtures_dir(),
            folders: folders.iter().map(|f| f.to_string()).collect(),
            ..config::ScannerConfig::default()
        }
    }

    fn default_ranking() -> FolderRanking {
        FolderRanking::from_ordered(Config::default().report.folder_priority)
    }

    #[test]
    fn test_collect_records_sorted_across_folders() {
        let records = collect_records(
            &scanner_config(&["g7", "missing_folder", "design_validation"]),
            scanner::ScanConfig::default(),
            &default_ranking(),
        );

        let rows: Vec<(String, String, Option<String>)> = records
            .iter()
            .map(|r| {
                (
                    r.script_name.clone(),
                    r.folder_name.clone(),
                    r.test_case_id.as_ref().map(|id| id.to_string()),
                )
            })
            .collect();

        assert_eq!(
            rows,
            vec![
                ("test_alarms".into(), "g7".into(), Some("TC-101".into())),
                ("test_alarms".into(), "g7".into(), Some("TC-102".into())),
                ("test_alarms".into(), "g7".into(), Some("TC-55".into())),
                ("test_helpers".into(), "g7".into(), None),
                ("test_pairing".into(), "design_validation".into(), Some("TC-301".into())),
                ("test_pairing".into(), "g7".into(), Some("TC-201".into())),
            ]
        );
    }

    #[test]
    fn test_collect_records_unknown_folder_first() {
        let ranking = FolderRanking::from_ordered(["g7"]);
        let records = collect_records(
            &scanner_config(&["g7", "design_validation"]),
            scanner::ScanConfig::default(),
            &ranking,
        );

        let pairing: Vec<&str> = records
            .iter()
            .filter(|r| r.script_name == "test_pairing")
            .map(|r| r.folder_name.as_str())
            .collect();
        assert_eq!(pairing, vec!["design_validation", "g7"]);
    }

    #[test]
    fn test_collect_records_nothing_found() {
        let records = collect_records(
            &scanner_config(&["missing_folder"]),
            scanner::ScanConfig::default(),
            &default_ranking(),
        );
        assert!(records.is_empty());
    }

    #[test]
    fn test_run_writes_nothing_when_empty() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = tmp.path().join("all_tcs.xlsx");
        let config_path = tmp.path().join("config.toml");
        std::fs::write(
            &config_path,
            format!(
                "[scanner]\nbase_dir = {:?}\nfolders = [\"missing_folder\"]\n",
                tmp.path().display().to_string()
            ),
        )
        .unwrap();

        let args = Args {
            base_dir: None,
            folders: None,
            output: Some(output.clone()),
            format: OutputFormat::Xlsx,
            config: Some(config_path),
            verbose: false,
            quiet: true,
            dry_run: false,
            init_config: false,
        };

        run(&args).unwrap();
        assert!(!output.exists());
    }

    #[test]
    fn test_run_writes_json_report() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = tmp.path().join("all_tcs.json");

        let args = Args {
            base_dir: Some(fixtures_dir()),
            folders: Some(vec!["g7".to_string()]),
            output: Some(output.clone()),
            format: OutputFormat::Json,
            config: Some(tmp.path().join("absent.toml")),
            verbose: false,
            quiet: true,
            dry_run: false,
            init_config: false,
        };

        // An explicit config path that cannot be read is an error
        assert!(run(&args).is_err());

        let args = Args { config: None, ..args };
        run(&args).unwrap();

        let content = std::fs::read_to_string(&output).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.as_array().map(|a| a.len()), Some(5));
    }

    #[test]
    fn test_run_json_without_output_uses_json_extension() {
        let tmp = tempfile::TempDir::new().unwrap();
        let configured = tmp.path().join("all_tcs.xlsx");
        let config_path = tmp.path().join("config.toml");
        std::fs::write(
            &config_path,
            format!("[general]\noutput = {:?}\n", configured.display().to_string()),
        )
        .unwrap();

        let args = Args {
            base_dir: Some(fixtures_dir()),
            folders: Some(vec!["g7".to_string()]),
            output: None,
            format: OutputFormat::Json,
            config: Some(config_path),
            verbose: false,
            quiet: true,
            dry_run: false,
            init_config: false,
        };

        run(&args).unwrap();

        assert!(!configured.exists());
        let content = std::fs::read_to_string(tmp.path().join("all_tcs.json")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.as_array().map(|a| a.len()), Some(5));
    }
}
