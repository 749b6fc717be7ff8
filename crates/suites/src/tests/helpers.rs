// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Outcome, Report, Suite, verify};
use rolecheck_probe::{File, FileKind, Group, Host, PackageManager, ScriptedBackend, User};
use rolecheck_vars::HostVars;
use serde_json::{Value, json};

pub const SSH_KEY: &str = "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIB7 alice@workstation";

pub const NFTABLES_CONF: &str = "#!/usr/sbin/nft -f

flush ruleset

table ip filter {
}

table ip6 filter {
}
";

pub fn vars(value: Value) -> HostVars {
    HostVars::from_value(value, "test").unwrap()
}

pub fn run(backend: ScriptedBackend, host_vars: &HostVars, suite: Suite) -> Report {
    let host: Host = Host::new(backend, false);
    verify(&host, host_vars, &[suite])
}

pub fn outcome<'a>(report: &'a Report, suite: Suite, name: &str) -> &'a Outcome {
    &report
        .result(suite, name)
        .unwrap_or_else(|| panic!("no result for {suite}::{name}"))
        .outcome
}

pub fn failure_message(report: &Report, suite: Suite, name: &str) -> String {
    match outcome(report, suite, name) {
        Outcome::Failed { message } => message.clone(),
        other => panic!("{suite}::{name} did not fail: {other:?}"),
    }
}

pub fn path(path: &str, kind: FileKind, owner: &str, group: &str, mode: u32) -> File {
    File {
        path: path.to_string(),
        exists: true,
        kind: Some(kind),
        owner: Some(owner.to_string()),
        group: Some(group.to_string()),
        mode: Some(mode),
    }
}

// --- nftables -------------------------------------------------------------

pub fn firewall_vars() -> HostVars {
    vars(json!({
        "nftables_enabled": true,
        "nftables_state": "started",
        "nftables_ipv4_policy_input": "drop",
        "nftables_ipv4_policy_output": "accept",
        "nftables_ipv4_policy_forward": "drop",
        "nftables_ipv6_policy_input": "drop",
        "nftables_ipv6_policy_output": "accept",
        "nftables_ipv6_policy_forward": "drop",
        "nftables_ipv4_input_rules": [
            "ct state established,related accept",
            "tcp dport 22 accept comment \"ssh\""
        ],
        "nftables_ipv6_input_rules": [
            "tcp dport 22 accept comment \"ssh\""
        ]
    }))
}

pub fn chain_body(direction: &str, policy: &str, rules: &[&str]) -> String {
    let mut body: String = format!(
        "\tchain {direction} {{\n\t\ttype filter hook {direction} priority filter; policy {policy};\n"
    );
    for rule in rules {
        body.push_str(&format!("\t\t{rule}\n"));
    }
    body.push_str("\t}\n");
    body
}

pub fn chain_listing(family: &str, direction: &str, policy: &str, rules: &[&str]) -> String {
    format!(
        "table {family} filter {{\n{}}}\n",
        chain_body(direction, policy, rules)
    )
}

const INPUT_RULES: [&str; 2] = [
    "ct state established,related accept",
    "tcp dport 22 accept comment \"ssh\"",
];

/// A host on which the nftables role applied [`firewall_vars`] correctly.
pub fn provisioned_firewall() -> ScriptedBackend {
    let mut backend: ScriptedBackend = ScriptedBackend::new()
        .with_package(PackageManager::Dpkg, "nftables")
        .with_command("nft")
        .with_systemd_service("nftables", true, true)
        .with_file(
            &path("/etc/nftables.conf", FileKind::Regular, "root", "root", 0o644),
            Some(NFTABLES_CONF),
        )
        .succeed("ping -c 1 127.0.0.1", "1 packets transmitted, 1 received\n");

    let mut ruleset: String = String::new();
    for family in ["ip", "ip6"] {
        let input: String = chain_body("input", "drop", &INPUT_RULES);
        let output: String = chain_body("output", "accept", &[]);
        let forward: String = chain_body("forward", "drop", &[]);
        let table: String = format!("table {family} filter {{\n{input}{output}{forward}}}\n");
        ruleset.push_str(&table);

        backend = backend
            .succeed(format!("nft list table {family} filter"), &table)
            .succeed(
                format!("nft list chain {family} filter input"),
                &chain_listing(family, "input", "drop", &INPUT_RULES),
            )
            .succeed(
                format!("nft list chain {family} filter output"),
                &chain_listing(family, "output", "accept", &[]),
            )
            .succeed(
                format!("nft list chain {family} filter forward"),
                &chain_listing(family, "forward", "drop", &[]),
            );
    }
    backend.succeed("nft list ruleset", &ruleset)
}

// --- users ----------------------------------------------------------------

pub fn users_vars() -> HostVars {
    vars(json!({
        "users_create": [
            {
                "name": "alice",
                "uid": 1001,
                "shell": "/bin/bash",
                "groups": ["wheel"],
                "pub_key": SSH_KEY
            },
            {
                "name": "carol",
                "groups": "sudo"
            }
        ],
        "users_delete": [
            { "name": "bob" }
        ]
    }))
}

pub fn alice() -> User {
    User {
        name: String::from("alice"),
        exists: true,
        uid: Some(1001),
        gid: Some(1001),
        home: Some(String::from("/home/alice")),
        shell: Some(String::from("/bin/bash")),
        groups: vec![String::from("alice"), String::from("wheel")],
    }
}

/// Carol is in `sudo` through her primary group only.
pub fn carol() -> User {
    User {
        name: String::from("carol"),
        exists: true,
        uid: Some(1002),
        gid: Some(27),
        home: Some(String::from("/home/carol")),
        shell: Some(String::from("/bin/sh")),
        groups: vec![String::from("carol")],
    }
}

pub fn group(name: &str, gid: u32) -> Group {
    Group {
        name: name.to_string(),
        exists: true,
        gid: Some(gid),
    }
}

/// A host on which the users role applied [`users_vars`] correctly.
pub fn provisioned_users() -> ScriptedBackend {
    ScriptedBackend::new()
        .with_user(&alice())
        .with_user(&carol())
        .with_group(&group("wheel", 10))
        .with_group(&group("sudo", 27))
        .with_file(
            &path("/home/alice", FileKind::Directory, "alice", "alice", 0o750),
            None,
        )
        .with_file(
            &path("/home/carol", FileKind::Directory, "carol", "sudo", 0o700),
            None,
        )
        .with_file(
            &path(
                "/home/alice/.ssh/authorized_keys",
                FileKind::Regular,
                "alice",
                "alice",
                0o600,
            ),
            Some(&format!("{SSH_KEY}\n")),
        )
        .with_file(
            &path("/etc/shells", FileKind::Regular, "root", "root", 0o644),
            Some("# /etc/shells: valid login shells\n/bin/sh\n/bin/bash\n"),
        )
        .without_user("bob")
}
