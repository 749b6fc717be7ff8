// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::connection::{ConnectionKind, resolve};
use rolecheck_probe::{Connection, ContainerTarget, SshTarget};
use rolecheck_vars::{HostVars, VarsError};
use serde_json::{Value, json};
use std::path::PathBuf;

fn vars(value: Value) -> HostVars {
    HostVars::from_value(value, "test").unwrap()
}

#[test]
fn test_ssh_is_the_default_plugin() {
    let host_vars: HostVars = vars(json!({
        "ansible_host": "192.0.2.10",
        "ansible_user": "deploy",
        "ansible_port": 2222,
        "ansible_ssh_private_key_file": "/home/deploy/.ssh/id_ed25519"
    }));

    let connection: Connection = resolve(ConnectionKind::Auto, "web1", &host_vars).unwrap();

    assert_eq!(
        connection,
        Connection::Ssh(SshTarget {
            host: String::from("192.0.2.10"),
            user: Some(String::from("deploy")),
            port: Some(2222),
            identity_file: Some(PathBuf::from("/home/deploy/.ssh/id_ed25519")),
        })
    );
}

#[test]
fn test_inventory_name_is_the_fallback_address() {
    let connection: Connection = resolve(ConnectionKind::Auto, "web1", &vars(json!({}))).unwrap();
    assert_eq!(
        connection,
        Connection::Ssh(SshTarget {
            host: String::from("web1"),
            ..SshTarget::default()
        })
    );
}

#[test]
fn test_container_plugins() {
    for (plugin, engine) in [
        ("docker", "docker"),
        ("community.docker.docker", "docker"),
        ("podman", "podman"),
        ("containers.podman.podman", "podman"),
    ] {
        let host_vars: HostVars = vars(json!({ "ansible_connection": plugin }));
        let connection: Connection =
            resolve(ConnectionKind::Auto, "instance", &host_vars).unwrap();
        assert_eq!(
            connection,
            Connection::Container(ContainerTarget {
                engine: engine.to_string(),
                container: String::from("instance"),
                user: None,
            }),
            "plugin {plugin}"
        );
    }
}

#[test]
fn test_local_plugin() {
    let host_vars: HostVars = vars(json!({ "ansible_connection": "local" }));
    assert_eq!(
        resolve(ConnectionKind::Auto, "localhost", &host_vars).unwrap(),
        Connection::Local
    );
}

#[test]
fn test_explicit_kind_overrides_plugin() {
    let host_vars: HostVars = vars(json!({ "ansible_connection": "podman" }));

    assert_eq!(
        resolve(ConnectionKind::Local, "instance", &host_vars).unwrap(),
        Connection::Local
    );
    assert!(matches!(
        resolve(ConnectionKind::Ssh, "instance", &host_vars).unwrap(),
        Connection::Ssh(_)
    ));
    // An explicit container connection keeps the host's engine.
    assert!(matches!(
        resolve(ConnectionKind::Docker, "instance", &host_vars).unwrap(),
        Connection::Container(ContainerTarget { engine, .. }) if engine == "podman"
    ));
    assert!(matches!(
        resolve(ConnectionKind::Docker, "instance", &vars(json!({}))).unwrap(),
        Connection::Container(ContainerTarget { engine, .. }) if engine == "docker"
    ));
}

#[test]
fn test_bad_port() {
    let host_vars: HostVars = vars(json!({ "ansible_port": "ssh" }));
    let err: VarsError = resolve(ConnectionKind::Auto, "web1", &host_vars).unwrap_err();
    assert!(matches!(err, VarsError::Invalid { ref name, .. } if name == "ansible_port"));
}
