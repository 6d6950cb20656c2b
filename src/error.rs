//! Scanner error types.
//!
//! None of these are fatal: the scanner logs them and skips the
//! folder, file or directory entry involved.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Folder does not exist: {}", .0.display())]
    MissingRoot(PathBuf),

    #[error("Error reading file {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot read directory entry: {0}")]
    Walk(#[from] walkdir::Error),
}

pub type ScanResult<T> = std::result::Result<T, ScanError>;
