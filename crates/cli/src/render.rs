// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use clap::ValueEnum;
use color_eyre::Result;
use rolecheck::{CheckResult, Outcome, Report, Summary};
use serde::Serialize;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// One line per check followed by a summary
    Text,
    /// A single JSON document
    Json,
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    target: &'a str,
    success: bool,
    summary: Summary,
    results: &'a [CheckResult],
}

/// Renders a verification report, newline-terminated.
pub fn report(report: &Report, format: Format) -> Result<String> {
    match format {
        Format::Text => Ok(report_text(report)?),
        Format::Json => {
            let document: JsonReport<'_> = JsonReport {
                target: &report.target,
                success: report.is_success(),
                summary: report.summary(),
                results: &report.results,
            };
            Ok(format!("{}\n", serde_json::to_string_pretty(&document)?))
        }
    }
}

fn report_text(report: &Report) -> Result<String, std::fmt::Error> {
    let mut out: String = String::new();
    writeln!(out, "Verifying {}", report.target)?;

    for result in &report.results {
        write!(
            out,
            "{:<5} {}::{}",
            result.outcome.label(),
            result.suite,
            result.name
        )?;
        match &result.outcome {
            Outcome::Passed => writeln!(out)?,
            Outcome::Skipped { reason } => writeln!(out, " ({reason})")?,
            Outcome::Failed { message } | Outcome::Errored { message } => {
                writeln!(out, ": {message}")?;
            }
        }
    }

    let summary: Summary = report.summary();
    writeln!(
        out,
        "\n{} checks: {} passed, {} failed, {} skipped, {} errored",
        summary.total(),
        summary.passed,
        summary.failed,
        summary.skipped,
        summary.errored
    )?;
    Ok(out)
}

/// Renders the inventory's host names.
pub fn hosts(hosts: &[String], format: Format) -> Result<String> {
    match format {
        Format::Text => Ok(hosts.iter().map(|host| format!("{host}\n")).collect()),
        Format::Json => Ok(format!("{}\n", serde_json::to_string_pretty(hosts)?)),
    }
}
