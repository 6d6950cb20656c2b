//! Record aggregation and ordering.
//!
//! Folder scans are concatenated in scan order and then stable-sorted by
//! script name, with the folder's rank as the tie-breaker.

use crate::models::{FolderScan, Record};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Rank assigned to folders missing from the ranking.
///
/// Known folders rank from 1, so unknown folders sort before all of them.
pub const UNKNOWN_FOLDER_RANK: usize = 0;

/// Fixed folder name to sort priority mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderRanking {
    ranks: HashMap<String, usize>,
}

impl FolderRanking {
    /// Build a ranking where the first name gets rank 1, the next rank 2, and so on.
    ///
    /// A name listed twice keeps its first rank.
    pub fn from_ordered<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ranks = HashMap::new();
        for (i, name) in names.into_iter().enumerate() {
            ranks.entry(name.into()).or_insert(i + 1);
        }
        Self { ranks }
    }

    /// Rank of a folder, [`UNKNOWN_FOLDER_RANK`] when it is not listed.
    pub fn rank(&self, folder_name: &str) -> usize {
        self.ranks
            .get(folder_name)
            .copied()
            .unwrap_or(UNKNOWN_FOLDER_RANK)
    }

    /// Compare two records by script name, then folder rank.
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        a.script_name
            .cmp(&b.script_name)
            .then_with(|| self.rank(&a.folder_name).cmp(&self.rank(&b.folder_name)))
    }
}

/// Concatenate folder scans, keeping the order in which folders were scanned.
pub fn aggregate_records(scans: Vec<FolderScan>) -> Vec<Record> {
    scans.into_iter().flat_map(|scan| scan.records).collect()
}

/// Stable sort of records by script name, then folder rank.
pub fn sort_records(records: &mut [Record], ranking: &FolderRanking) {
    records.sort_by(|a, b| ranking.compare(a, b));
}
