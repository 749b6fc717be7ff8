// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::check::{Check, Context, Outcome};
use crate::report::{CheckResult, Report};
use crate::suite::Suite;
use rolecheck_probe::Host;
use rolecheck_vars::HostVars;
use std::time::Instant;
use tracing::{info, warn};

/// Evaluates `checks` one after another. A failing or erroring check never
/// stops the ones after it.
#[must_use]
pub fn run_checks(suite: Suite, checks: &[Check], context: &Context<'_>) -> Vec<CheckResult> {
    checks
        .iter()
        .map(|check| {
            let start: Instant = Instant::now();
            let outcome: Outcome = check.evaluate(context);
            let elapsed = start.elapsed();

            match &outcome {
                Outcome::Passed | Outcome::Skipped { .. } => {
                    info!("{} {suite}::{}", outcome.label(), check.name());
                }
                Outcome::Failed { message } | Outcome::Errored { message } => {
                    warn!("{} {suite}::{}: {message}", outcome.label(), check.name());
                }
            }

            CheckResult {
                suite,
                name: check.name().to_string(),
                ensures: check.ensures().to_string(),
                outcome,
                duration_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            }
        })
        .collect()
}

/// Runs every check of `suites` against `host`.
#[must_use]
pub fn verify(host: &Host, vars: &HostVars, suites: &[Suite]) -> Report {
    let context: Context<'_> = Context::new(host, vars);
    let mut report: Report = Report::new(host.target());

    for suite in suites {
        info!("Running {suite} suite against {}", report.target);
        let checks: Vec<Check> = suite.checks();
        report
            .results
            .extend(run_checks(*suite, &checks, &context));
    }

    report
}
