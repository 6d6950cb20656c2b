//! Line predicates for test case markers.
//!
//! Test scripts open a test case with `self.th.protocol.start("TC-123")`
//! (optionally `"TC-AT-123"`) and close it with `self.th.protocol.end()`.
//! Both predicates look for the call anywhere in the line.

use crate::models::TestCaseId;
use regex::Regex;
use std::sync::OnceLock;

fn start_regex() -> &'static Regex {
    static START_RE: OnceLock<Regex> = OnceLock::new();
    START_RE.get_or_init(|| {
        Regex::new(r#"\w+\.th\.protocol\.start\(\s*["']TC-(?:AT-)?(\d+)["']"#)
            .expect("start marker regex is valid")
    })
}

fn end_regex() -> &'static Regex {
    static END_RE: OnceLock<Regex> = OnceLock::new();
    END_RE.get_or_init(|| {
        Regex::new(r"\w+\.th\.protocol\.end\(\s*\)").expect("end marker regex is valid")
    })
}

/// Returns the test case opened on `line`, if it contains a start marker.
pub fn match_start(line: &str) -> Option<TestCaseId> {
    start_regex()
        .captures(line)
        .and_then(|caps| caps.get(1))
        .and_then(|digits| TestCaseId::new(digits.as_str()))
}

/// Returns true if `line` contains an end marker.
pub fn is_end(line: &str) -> bool {
    end_regex().is_match(line)
}
