// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::check::Outcome;
use crate::suite::Suite;
use serde::Serialize;

/// Outcome of one check, tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub suite: Suite,
    pub name: String,
    pub ensures: String,
    pub outcome: Outcome,
    pub duration_ms: u64,
}

/// Count of results per outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub errored: usize,
}

impl Summary {
    #[must_use]
    pub const fn total(&self) -> usize {
        self.passed + self.failed + self.skipped + self.errored
    }
}

/// Every check result of one verification run against one host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub target: String,
    pub results: Vec<CheckResult>,
}

impl Report {
    #[must_use]
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            results: Vec::new(),
        }
    }

    #[must_use]
    pub fn summary(&self) -> Summary {
        let mut summary: Summary = Summary::default();
        for result in &self.results {
            match result.outcome {
                Outcome::Passed => summary.passed += 1,
                Outcome::Failed { .. } => summary.failed += 1,
                Outcome::Skipped { .. } => summary.skipped += 1,
                Outcome::Errored { .. } => summary.errored += 1,
            }
        }
        summary
    }

    /// A run succeeds when nothing failed or errored. Skips do not count
    /// against it.
    #[must_use]
    pub fn is_success(&self) -> bool {
        let summary: Summary = self.summary();
        summary.failed == 0 && summary.errored == 0
    }

    /// Looks up a result by suite and check name.
    #[must_use]
    pub fn result(&self, suite: Suite, name: &str) -> Option<&CheckResult> {
        self.results
            .iter()
            .find(|result| result.suite == suite && result.name == name)
    }
}
