// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Works out how to reach a host from its inventory variables, the way
//! Ansible's connection plugins would.

use clap::ValueEnum;
use rolecheck_probe::{Connection, ContainerTarget, SshTarget};
use rolecheck_vars::{HostVars, VarsError};
use std::path::PathBuf;

pub const ANSIBLE_CONNECTION: &str = "ansible_connection";
pub const ANSIBLE_HOST: &str = "ansible_host";
pub const ANSIBLE_USER: &str = "ansible_user";
pub const ANSIBLE_PORT: &str = "ansible_port";
pub const ANSIBLE_KEY_FILE: &str = "ansible_ssh_private_key_file";

const DOCKER: &str = "docker";
const PODMAN: &str = "podman";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConnectionKind {
    /// Follow the host's `ansible_connection`
    Auto,
    Local,
    Ssh,
    /// `docker exec`, or `podman exec` for podman-connected hosts
    Docker,
}

/// Container engine behind an Ansible connection plugin, if it is one.
fn container_engine(plugin: &str) -> Option<&'static str> {
    match plugin {
        "docker" | "community.docker.docker" => Some(DOCKER),
        "podman" | "containers.podman.podman" => Some(PODMAN),
        _ => None,
    }
}

/// Builds the connection for inventory host `name`.
///
/// # Errors
///
/// Returns an error if a connection variable has the wrong type or
/// `ansible_port` is not a port number.
pub fn resolve(kind: ConnectionKind, name: &str, vars: &HostVars) -> Result<Connection, VarsError> {
    let plugin: Option<String> = vars.string(ANSIBLE_CONNECTION)?;
    let engine: Option<&'static str> = plugin.as_deref().and_then(container_engine);

    match kind {
        ConnectionKind::Local => Ok(Connection::Local),
        ConnectionKind::Ssh => ssh_target(name, vars).map(Connection::Ssh),
        ConnectionKind::Docker => {
            container_target(engine.unwrap_or(DOCKER), name, vars).map(Connection::Container)
        }
        ConnectionKind::Auto => match (plugin.as_deref(), engine) {
            (Some("local"), _) => Ok(Connection::Local),
            (_, Some(engine)) => container_target(engine, name, vars).map(Connection::Container),
            _ => ssh_target(name, vars).map(Connection::Ssh),
        },
    }
}

fn address(name: &str, vars: &HostVars) -> Result<String, VarsError> {
    Ok(vars
        .string(ANSIBLE_HOST)?
        .unwrap_or_else(|| name.to_string()))
}

fn ssh_target(name: &str, vars: &HostVars) -> Result<SshTarget, VarsError> {
    let port: Option<u16> = vars
        .string(ANSIBLE_PORT)?
        .map(|port| {
            port.parse::<u16>().map_err(|err| VarsError::Invalid {
                name: ANSIBLE_PORT.to_string(),
                reason: format!("'{port}' is not a port number: {err}"),
            })
        })
        .transpose()?;

    Ok(SshTarget {
        host: address(name, vars)?,
        user: vars.string(ANSIBLE_USER)?,
        port,
        identity_file: vars.string(ANSIBLE_KEY_FILE)?.map(PathBuf::from),
    })
}

fn container_target(
    engine: &str,
    name: &str,
    vars: &HostVars,
) -> Result<ContainerTarget, VarsError> {
    Ok(ContainerTarget {
        engine: engine.to_string(),
        container: address(name, vars)?,
        user: vars.string(ANSIBLE_USER)?,
    })
}
