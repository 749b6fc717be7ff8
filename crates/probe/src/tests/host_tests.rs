// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    CommandOutput, File, FileKind, Group, Host, PackageManager, ProbeError, ScriptedBackend, User,
};
use std::sync::Arc;

fn alice() -> User {
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

#[test]
fn test_connect_as_root_skips_sudo() {
    let backend = ScriptedBackend::new().succeed("id -u", "0\n");
    let host: Host = Host::connect(backend, true).unwrap();
    assert!(!host.uses_sudo());
}

#[test]
fn test_connect_as_user_wraps_commands_in_sudo() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .succeed("id -u", "1000\n")
            .succeed("sudo -n /bin/sh -c true", "")
            .succeed("sudo -n /bin/sh -c 'nft list ruleset'", "table ip filter {}\n"),
    );
    let host: Host = Host::connect(Arc::clone(&backend), true).unwrap();
    assert!(host.uses_sudo());

    let output: CommandOutput = host.run("nft list ruleset").unwrap();
    assert!(output.succeeded());
    assert_eq!(
        backend.executed(),
        vec![
            "id -u",
            "sudo -n /bin/sh -c true",
            "sudo -n /bin/sh -c 'nft list ruleset'"
        ]
    );
}

#[test]
fn test_connect_fails_when_sudo_needs_a_password() {
    let backend = ScriptedBackend::new()
        .succeed("id -u", "1000\n")
        .fail("sudo -n /bin/sh -c true", 1, "sudo: a password is required\n");

    let err: ProbeError = Host::connect(backend, true).unwrap_err();
    assert!(matches!(err, ProbeError::Connection { .. }));
    assert!(format!("{err}").contains("a password is required"));
}

#[test]
fn test_connect_to_unreachable_host_is_fatal() {
    let result = Host::connect(ScriptedBackend::unreachable(), false);
    assert!(matches!(result, Err(ProbeError::Connection { .. })));
}

#[test]
fn test_run_reports_non_zero_exit_as_output() {
    let host: Host = Host::new(
        ScriptedBackend::new().fail("ping -c 1 127.0.0.1", 2, "connect: Network is unreachable"),
        false,
    );
    let output: CommandOutput = host.run("ping -c 1 127.0.0.1").unwrap();
    assert_eq!(output.exit_code, 2);
    assert!(!output.succeeded());
}

#[test]
fn test_run_expect_rejects_other_statuses() {
    let host: Host = Host::new(ScriptedBackend::new(), false);
    let err: ProbeError = host.run_expect(&[0], "cat -- /etc/missing").unwrap_err();
    assert!(matches!(err, ProbeError::UnexpectedExit { exit_code: 127, .. }));
}

#[test]
fn test_package_uses_detected_manager() {
    let host: Host = Host::new(
        ScriptedBackend::new().with_package(PackageManager::Rpm, "nftables"),
        false,
    );
    assert_eq!(host.package_manager().unwrap(), PackageManager::Rpm);
    assert!(host.package("nftables").unwrap().is_installed);
    assert!(!host.package("iptables").unwrap().is_installed);
}

#[test]
fn test_package_without_package_manager_is_unsupported() {
    let host: Host = Host::new(ScriptedBackend::new(), false);
    assert!(matches!(
        host.package("nftables"),
        Err(ProbeError::Unsupported(_))
    ));
}

#[test]
fn test_dpkg_config_files_state_is_not_installed() {
    let host: Host = Host::new(
        ScriptedBackend::new()
            .with_command("dpkg-query")
            .succeed(
                PackageManager::Dpkg.query_command("nftables"),
                "deinstall ok config-files",
            ),
        false,
    );
    assert!(!host.package("nftables").unwrap().is_installed);
}

#[test]
fn test_systemd_service_state() {
    let host: Host = Host::new(
        ScriptedBackend::new().with_systemd_service("nftables", true, false),
        false,
    );
    let service = host.service("nftables").unwrap();
    assert!(service.is_enabled);
    assert!(!service.is_running);
}

#[test]
fn test_sysv_service_state() {
    let host: Host = Host::new(
        ScriptedBackend::new()
            .succeed("ls /etc/rc?.d/S??nftables >/dev/null 2>&1", "")
            .succeed("service nftables status", "nftables is running"),
        false,
    );
    let service = host.service("nftables").unwrap();
    assert!(service.is_enabled);
    assert!(service.is_running);
}

#[test]
fn test_file_probe_and_content() {
    let config: File = File {
        path: String::from("/etc/nftables.conf"),
        exists: true,
        kind: Some(FileKind::Regular),
        owner: Some(String::from("root")),
        group: Some(String::from("root")),
        mode: Some(0o644),
    };
    let host: Host = Host::new(
        ScriptedBackend::new().with_file(&config, Some("flush ruleset\n")),
        false,
    );

    assert_eq!(host.file("/etc/nftables.conf").unwrap(), config);
    assert_eq!(
        host.file_content("/etc/nftables.conf").unwrap(),
        "flush ruleset\n"
    );
    assert!(!host.file("/etc/shells").unwrap().exists);
}

#[test]
fn test_user_probe_reads_groups() {
    let host: Host = Host::new(ScriptedBackend::new().with_user(&alice()), false);
    assert_eq!(host.user("alice").unwrap(), alice());
}

#[test]
fn test_missing_user_and_group() {
    let host: Host = Host::new(
        ScriptedBackend::new()
            .without_user("bob")
            .without_group("docker"),
        false,
    );
    assert!(!host.user("bob").unwrap().exists);
    assert!(!host.group("docker").unwrap().exists);
}

#[test]
fn test_group_probe() {
    let wheel: Group = Group {
        name: String::from("wheel"),
        exists: true,
        gid: Some(10),
    };
    let host: Host = Host::new(ScriptedBackend::new().with_group(&wheel), false);
    assert_eq!(host.group("wheel").unwrap(), wheel);
}

#[test]
fn test_probes_are_not_cached() {
    let backend = Arc::new(ScriptedBackend::new().without_user("bob"));
    let host: Host = Host::new(Arc::clone(&backend), false);
    host.user("bob").unwrap();
    host.user("bob").unwrap();
    assert_eq!(backend.executed().len(), 2);
}
