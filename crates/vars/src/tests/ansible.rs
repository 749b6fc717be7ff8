// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{FirewallVars, HostVars, VarsError, parse_debug_output};
use serde_json::{Value, json};

/// Shapes a `json` callback report of one ad-hoc `debug` task.
fn report(host: &str, result: &Value) -> String {
    json!({
        "custom_stats": {},
        "global_custom_stats": {},
        "plays": [{
            "play": { "name": "Ansible Ad-Hoc", "id": "0242ac11-0002" },
            "tasks": [{
                "task": { "name": "debug", "id": "0242ac11-0004" },
                "hosts": { host: result }
            }]
        }],
        "stats": { host: { "ok": 1, "failures": 0, "unreachable": 0 } }
    })
    .to_string()
}

#[test]
fn test_rendered_variables_are_read() {
    let output: String = report(
        "instance",
        &json!({
            "_ansible_no_log": false,
            "_ansible_verbose_always": true,
            "action": "debug",
            "changed": false,
            "hostvars[inventory_hostname]": {
                "inventory_hostname": "instance",
                "default_policy": "drop",
                "nftables_ipv4_input_policy": "drop",
                "nftables_enabled": true
            }
        }),
    );

    let vars: HostVars = parse_debug_output(&output, "instance").unwrap();
    assert_eq!(
        vars.string("inventory_hostname").unwrap().as_deref(),
        Some("instance")
    );
    let firewall: FirewallVars<'_> = FirewallVars::new(&vars);
    assert!(firewall.service_enabled().unwrap());
    assert_eq!(
        vars.require_string("nftables_ipv4_input_policy").unwrap(),
        "drop"
    );
}

#[test]
fn test_failed_rendering_reports_ansible_message() {
    let output: String = report(
        "instance",
        &json!({
            "failed": true,
            "msg": "The task includes an option with an undefined variable. 'default_policy' is undefined"
        }),
    );

    match parse_debug_output(&output, "instance") {
        Err(VarsError::Render { host, message }) => {
            assert_eq!(host, "instance");
            assert!(message.contains("'default_policy' is undefined"));
        }
        other => panic!("expected a render error, got {other:?}"),
    }
}

#[test]
fn test_host_missing_from_report() {
    let output: String = report("other", &json!({ "hostvars[inventory_hostname]": {} }));

    let result = parse_debug_output(&output, "instance");
    assert!(matches!(result, Err(VarsError::Render { host, .. }) if host == "instance"));
}

#[test]
fn test_plain_text_output_is_rejected() {
    let result = parse_debug_output("instance | SUCCESS => {", "instance");
    assert!(matches!(result, Err(VarsError::Json { .. })));
}
