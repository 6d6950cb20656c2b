//! Per-file test case tracking.
//!
//! A script is read line by line through a two-state machine:
//!
//! ```text
//!   Idle ──start(id)──▶ Open(id)
//!   Open(a) ──start(b)──▶ Open(b)   emits a
//!   Open(a) ──end──▶ Idle           emits a
//!   Idle ──end──▶ Idle              ignored
//!   Open(a) ──EOF──▶ (dropped)      a is never emitted
//! ```

use super::patterns;
use crate::models::TestCaseId;
use tracing::debug;

/// Whether a test case is currently open.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CaseState {
    #[default]
    Idle,
    Open(TestCaseId),
}

/// Tracks the test cases of a single file.
#[derive(Debug, Default)]
pub struct CaseTracker {
    state: CaseState,
    matched: bool,
}

impl CaseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> &CaseState {
        &self.state
    }

    /// Whether any start marker, or any end marker closing a case, was seen.
    pub fn matched(&self) -> bool {
        self.matched
    }

    /// Opens `id`, returning the previously open case which is now complete.
    pub fn start(&mut self, id: TestCaseId) -> Option<TestCaseId> {
        self.matched = true;
        match std::mem::replace(&mut self.state, CaseState::Open(id)) {
            CaseState::Open(previous) => Some(previous),
            CaseState::Idle => None,
        }
    }

    /// Closes the open case and returns it. Does nothing while idle.
    pub fn end(&mut self) -> Option<TestCaseId> {
        match std::mem::take(&mut self.state) {
            CaseState::Open(id) => {
                self.matched = true;
                Some(id)
            }
            CaseState::Idle => None,
        }
    }

    /// Feeds one line (1-indexed `line_no`) and returns the cases it completed.
    ///
    /// The start marker is checked before the end marker, so a line holding
    /// both opens the new case and closes it straight away.
    pub fn feed_line(&mut self, line: &str, line_no: usize) -> Vec<TestCaseId> {
        let mut completed = Vec::new();

        if let Some(id) = patterns::match_start(line) {
            debug!("  Found TC: {} at line {}", id, line_no);
            completed.extend(self.start(id));
        }

        if matches!(self.state(), CaseState::Open(_)) && patterns::is_end(line) {
            if let Some(id) = self.end() {
                debug!("  End of {} at line {}", id, line_no);
                completed.push(id);
            }
        }

        completed
    }

    /// Ends the file. Returns the case that was still open, which is dropped.
    pub fn finish(self) -> Option<TestCaseId> {
        match self.state {
            CaseState::Open(id) => Some(id),
            CaseState::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(digits: &str) -> TestCaseId {
        TestCaseId::new(digits).unwrap()
    }

    fn run(lines: &[&str]) -> (Vec<String>, Option<String>, bool) {
        let mut tracker = CaseTracker::new();
        let mut emitted = Vec::new();
        for (i, line) in lines.iter().enumerate() {
            emitted.extend(tracker.feed_line(line, i + 1).into_iter().map(|id| id.to_string()));
        }
        let matched = tracker.matched();
        let dropped = tracker.finish().map(|id| id.to_string());
        (emitted, dropped, matched)
    }

    #[test]
    fn test_start_then_end() {
        let (emitted, dropped, matched) = run(&[
            r#"self.th.protocol.start("TC-123")"#,
            "do_something()",
            "self.th.protocol.end()",
        ]);
        assert_eq!(emitted, vec!["TC-123"]);
        assert_eq!(dropped, None);
        assert!(matched);
    }

    #[test]
    fn test_new_start_closes_previous_and_last_is_dropped() {
        let (emitted, dropped, _) = run(&[
            r#"self.th.protocol.start("TC-1")"#,
            r#"self.th.protocol.start("TC-2")"#,
        ]);
        assert_eq!(emitted, vec!["TC-1"]);
        assert_eq!(dropped, Some("TC-2".to_string()));
    }

    #[test]
    fn test_end_while_idle_is_ignored() {
        let (emitted, dropped, matched) = run(&["self.th.protocol.end()"]);
        assert!(emitted.is_empty());
        assert_eq!(dropped, None);
        assert!(!matched);
    }

    #[test]
    fn test_start_and_end_on_one_line() {
        let (emitted, dropped, _) =
            run(&[r#"self.th.protocol.start("TC-8"); self.th.protocol.end()"#]);
        assert_eq!(emitted, vec!["TC-8"]);
        assert_eq!(dropped, None);
    }

    #[test]
    fn test_transitions() {
        let mut tracker = CaseTracker::new();
        assert_eq!(tracker.state(), &CaseState::Idle);
        assert_eq!(tracker.end(), None);
        assert!(!tracker.matched());

        assert_eq!(tracker.start(id("1")), None);
        assert_eq!(tracker.state(), &CaseState::Open(id("1")));
        assert_eq!(tracker.start(id("2")), Some(id("1")));
        assert_eq!(tracker.end(), Some(id("2")));
        assert_eq!(tracker.state(), &CaseState::Idle);
        assert_eq!(tracker.finish(), None);
    }

    #[test]
    fn test_no_markers() {
        let (emitted, dropped, matched) = run(&["import os", "def test(): pass"]);
        assert!(emitted.is_empty());
        assert_eq!(dropped, None);
        assert!(!matched);
    }
}
