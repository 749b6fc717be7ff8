// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{CheckResult, Outcome, Report, Suite, Summary};
use serde_json::{Value, json};

fn result(suite: Suite, name: &str, outcome: Outcome) -> CheckResult {
    CheckResult {
        suite,
        name: name.to_string(),
        ensures: format!("{name} holds"),
        outcome,
        duration_ms: 3,
    }
}

fn mixed_report() -> Report {
    let mut report: Report = Report::new("ssh://root@web1");
    report.results = vec![
        result(Suite::Nftables, "package_installed", Outcome::Passed),
        result(
            Suite::Nftables,
            "service_running",
            Outcome::Skipped {
                reason: String::from("nftables_state is stopped, not started"),
            },
        ),
        result(
            Suite::Users,
            "users_exist",
            Outcome::Failed {
                message: String::from("User alice does not exist"),
            },
        ),
    ];
    report
}

#[test]
fn test_summary_counts_each_outcome() {
    let summary: Summary = mixed_report().summary();
    assert_eq!(
        summary,
        Summary {
            passed: 1,
            failed: 1,
            skipped: 1,
            errored: 0,
        }
    );
    assert_eq!(summary.total(), 3);
}

#[test]
fn test_skips_do_not_fail_a_run() {
    let mut report: Report = mixed_report();
    assert!(!report.is_success());

    report.results.retain(|result| result.suite == Suite::Nftables);
    assert!(report.is_success());

    report.results.push(result(
        Suite::Nftables,
        "ruleset_loaded",
        Outcome::Errored {
            message: String::from("connection refused"),
        },
    ));
    assert!(!report.is_success());
}

#[test]
fn test_empty_report_succeeds() {
    let report: Report = Report::new("local");
    assert!(report.is_success());
    assert_eq!(report.summary().total(), 0);
}

#[test]
fn test_result_lookup_is_scoped_to_suite() {
    let report: Report = mixed_report();
    assert!(report.result(Suite::Users, "users_exist").is_some());
    assert!(report.result(Suite::Nftables, "users_exist").is_none());
}

#[test]
fn test_report_json_shape() {
    let value: Value = serde_json::to_value(mixed_report()).unwrap();

    assert_eq!(value["target"], json!("ssh://root@web1"));
    assert_eq!(
        value["results"][1],
        json!({
            "suite": "nftables",
            "name": "service_running",
            "ensures": "service_running holds",
            "outcome": {
                "status": "skipped",
                "reason": "nftables_state is stopped, not started"
            },
            "duration_ms": 3
        })
    );
    assert_eq!(value["results"][0]["outcome"], json!({ "status": "passed" }));
}

#[test]
fn test_suite_names_match_serialized_form() {
    for suite in Suite::ALL {
        assert_eq!(suite.to_string(), suite.as_str());
        assert_eq!(serde_json::to_value(suite).unwrap(), json!(suite.as_str()));
    }
}
