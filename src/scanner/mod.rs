//! Test script scanner.
//!
//! Walks a root folder, reads every matching script and turns the test
//! case markers it contains into [`Record`]s.

pub mod patterns;
pub mod state;

use crate::error::{ScanError, ScanResult};
use crate::models::{FolderScan, Record, ScanSummary, TestCaseId};
use indicatif::{ProgressBar, ProgressStyle};
use state::CaseTracker;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Configuration for file scanning.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// File extensions to include, without the dot.
    pub extensions: Vec<String>,
    /// Show a spinner while scanning.
    pub show_progress: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["py".to_string()],
            show_progress: false,
        }
    }
}

impl From<&crate::config::ScannerConfig> for ScanConfig {
    fn from(config: &crate::config::ScannerConfig) -> Self {
        Self {
            extensions: config.extensions.clone(),
            show_progress: false,
        }
    }
}

/// Records extracted from one file's content.
#[derive(Debug, Clone, Default)]
pub struct FileExtract {
    /// Records in the order their test cases completed.
    pub records: Vec<Record>,
    /// Test case still open at end of file. It has no record.
    pub dropped: Option<TestCaseId>,
}

/// Extracts the records of one script from its content.
///
/// A script without any marker yields a single record with no test case.
pub fn extract_records(content: &str, folder_name: &str, script_name: &str) -> FileExtract {
    let mut tracker = CaseTracker::new();
    let mut records = Vec::new();

    for (i, line) in split_lines(content).enumerate() {
        for id in tracker.feed_line(line, i + 1) {
            records.push(Record::with_test_case(folder_name, script_name, id));
        }
    }

    if !tracker.matched() {
        debug!("  No test cases found in: {}", script_name);
        records.push(Record::without_test_case(folder_name, script_name));
    }

    let dropped = tracker.finish();
    if let Some(ref id) = dropped {
        debug!("  {} never ended in {}, dropping it", id, script_name);
    }

    FileExtract { records, dropped }
}

/// Split text into lines ending in `\n`, `\r\n` or a lone `\r`.
///
/// A final line terminator does not start an extra empty line.
pub fn split_lines(content: &str) -> impl Iterator<Item = &str> {
    let mut rest = content;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        match rest.find(|c: char| c == '\n' || c == '\r') {
            Some(pos) => {
                let line = &rest[..pos];
                let terminator = if rest[pos..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[pos + terminator..];
                Some(line)
            }
            None => Some(std::mem::take(&mut rest)),
        }
    })
}

/// Base name of a root folder, used as the folder column of its records.
pub fn folder_name(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| root.to_string_lossy().to_string())
}

/// File name without its extension.
pub fn script_name(path: &Path) -> Option<String> {
    path.file_stem().map(|s| s.to_string_lossy().to_string())
}

/// Scanner for test script folders.
pub struct FileScanner {
    config: ScanConfig,
}

impl FileScanner {
    /// Create a new file scanner.
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Scan a root folder and return its records in discovery order.
    ///
    /// A missing root or an unreadable file is logged and skipped; this
    /// never fails.
    pub fn scan_folder(&self, root: &Path) -> FolderScan {
        let folder = folder_name(root);
        info!("Processing folder: {}", folder);

        let mut scan = FolderScan {
            records: Vec::new(),
            summary: ScanSummary::new(&folder),
        };

        let scripts = match self.list_scripts(root) {
            Ok(scripts) => scripts,
            Err(e) => {
                warn!("{}", e);
                return scan;
            }
        };
        scan.summary.root_found = true;

        let progress = self.progress_bar(&folder);

        for path in scripts {
            let Some(script) = script_name(&path) else {
                continue;
            };
            progress.set_message(format!("{}: {}", folder, script));

            let content = match read_script(&path) {
                Ok(content) => content,
                Err(e) => {
                    warn!("{}", e);
                    scan.summary.files_skipped += 1;
                    continue;
                }
            };

            debug!("Processing file: {}", script);
            let extract = extract_records(&content, &folder, &script);

            scan.summary.files_scanned += 1;
            if extract.dropped.is_some() {
                scan.summary.unclosed_dropped += 1;
            }
            for record in &extract.records {
                if record.test_case_id.is_some() {
                    scan.summary.test_cases += 1;
                } else {
                    scan.summary.files_without_test_cases += 1;
                }
            }
            scan.records.extend(extract.records);
        }

        progress.finish_and_clear();

        info!(
            "Folder {}: {} records from {} files ({} test cases, {} without test cases, {} skipped)",
            folder,
            scan.summary.records(),
            scan.summary.files_scanned,
            scan.summary.test_cases,
            scan.summary.files_without_test_cases,
            scan.summary.files_skipped
        );

        scan
    }

    /// List matching scripts under `root`, sorted by path.
    ///
    /// Symlinks to files are listed; symlinked directories are not entered.
    /// Directory entries that cannot be read are logged and skipped.
    pub fn list_scripts(&self, root: &Path) -> ScanResult<Vec<PathBuf>> {
        if !root.exists() {
            return Err(ScanError::MissingRoot(root.to_path_buf()));
        }

        let mut scripts = Vec::new();
        let walker = WalkDir::new(root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("{}", ScanError::from(e));
                    continue;
                }
            };

            let is_file = entry.file_type().is_file()
                || (entry.path_is_symlink() && entry.path().is_file());
            if is_file && self.matches(entry.path()) {
                scripts.push(entry.into_path());
            }
        }

        Ok(scripts)
    }

    /// Check if a file has one of the configured extensions.
    pub fn matches(&self, path: &Path) -> bool {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        self.config.extensions.iter().any(|wanted| wanted == ext)
    }

    fn progress_bar(&self, folder: &str) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(folder.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}

fn read_script(path: &Path) -> ScanResult<String> {
    fs::read_to_string(path).map_err(|source| ScanError::ReadFile {
        path: path.to_path_buf(),
        source,
    })
}
