//! Data models for the test case extractor.
//!
//! This module contains the core data structures shared by the scanner,
//! the aggregator and the report generator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a single test case, stored as the digits that follow `TC-`.
///
/// The optional `AT-` infix seen in sources is not part of the identifier,
/// so `TC-AT-55` and `TC-55` are the same test case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct TestCaseId(String);

impl TestCaseId {
    /// Creates an identifier from its numeric part.
    ///
    /// Returns `None` when `digits` is empty or contains anything but ASCII digits.
    pub fn new(digits: impl Into<String>) -> Option<Self> {
        let digits = digits.into();
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            Some(Self(digits))
        } else {
            None
        }
    }

    /// Returns the numeric part, leading zeros included.
    pub fn digits(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TestCaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TC-{}", self.digits())
    }
}

impl From<TestCaseId> for String {
    fn from(id: TestCaseId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for TestCaseId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value
            .strip_prefix("TC-")
            .and_then(TestCaseId::new)
            .ok_or_else(|| format!("invalid test case id: {}", value))
    }
}

/// One output row candidate: folder, script and optional test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Base name of the scanned root folder.
    pub folder_name: String,
    /// File name of the script without its extension.
    pub script_name: String,
    /// Test case found in the script, absent when the script had none.
    pub test_case_id: Option<TestCaseId>,
}

impl Record {
    /// Creates a record for a discovered test case span.
    pub fn with_test_case(folder_name: &str, script_name: &str, id: TestCaseId) -> Self {
        Self {
            folder_name: folder_name.to_string(),
            script_name: script_name.to_string(),
            test_case_id: Some(id),
        }
    }

    /// Creates the placeholder record for a script without test cases.
    pub fn without_test_case(folder_name: &str, script_name: &str) -> Self {
        Self {
            folder_name: folder_name.to_string(),
            script_name: script_name.to_string(),
            test_case_id: None,
        }
    }
}

/// Review status a tester can pick for a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Fail,
    Pass,
    Blocked,
}

impl Status {
    /// All statuses in the order they are offered in the spreadsheet.
    pub const ALL: [Status; 3] = [Status::Fail, Status::Pass, Status::Blocked];
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Fail => write!(f, "Fail"),
            Status::Pass => write!(f, "Pass"),
            Status::Blocked => write!(f, "Blocked"),
        }
    }
}

/// Counters collected while scanning one root folder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Name of the scanned folder.
    pub folder_name: String,
    /// Whether the root folder existed.
    pub root_found: bool,
    /// Number of matching files that were read.
    pub files_scanned: usize,
    /// Number of matching files that could not be read.
    pub files_skipped: usize,
    /// Number of files that contained no test case markers.
    pub files_without_test_cases: usize,
    /// Number of test cases emitted.
    pub test_cases: usize,
    /// Number of test cases dropped because they were never closed.
    pub unclosed_dropped: usize,
}

impl ScanSummary {
    /// Creates an empty summary for a folder.
    pub fn new(folder_name: &str) -> Self {
        Self {
            folder_name: folder_name.to_string(),
            ..Self::default()
        }
    }

    /// Total number of records produced for the folder.
    pub fn records(&self) -> usize {
        self.test_cases + self.files_without_test_cases
    }
}

/// Records produced by scanning one root folder, plus its counters.
#[derive(Debug, Clone, Default)]
pub struct FolderScan {
    /// Records in discovery order.
    pub records: Vec<Record>,
    /// Counters for the folder.
    pub summary: ScanSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_test_case_id_display() {
        let id = TestCaseId::new("123").unwrap();
        assert_eq!(id.to_string(), "TC-123");
        assert_eq!(id.digits(), "123");
    }

    #[test]
    fn test_test_case_id_keeps_leading_zeros() {
        let id = TestCaseId::new("007").unwrap();
        assert_eq!(id.to_string(), "TC-007");
    }

    #[test]
    fn test_test_case_id_rejects_non_digits() {
        assert!(TestCaseId::new("").is_none());
        assert!(TestCaseId::new("12a").is_none());
        assert!(TestCaseId::new("AT-12").is_none());
    }

    #[test]
    fn test_test_case_id_serde() {
        let id = TestCaseId::new("42").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"TC-42\"");

        let back: TestCaseId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<TestCaseId>("\"42\"").is_err());
    }

    #[test]
    fn test_status_display() {
        let names: Vec<String> = Status::ALL.iter().map(|s| s.to_string()).collect();
        assert_eq!(names, vec!["Fail", "Pass", "Blocked"]);
    }

    #[test]
    fn test_summary_records() {
        let mut summary = ScanSummary::new("g7");
        summary.test_cases = 3;
        summary.files_without_test_cases = 2;
        assert_eq!(summary.records(), 5);
    }
}
