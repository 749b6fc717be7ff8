// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::ansible::capture;
use crate::error::VarsError;
use crate::host_vars::HostVars;
use duct::cmd;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::info;

/// Group every host belongs to in an Ansible inventory.
const ALL_GROUP: &str = "all";

/// A resolved Ansible inventory: every host in `all` plus its variables.
///
/// Variables are kept as written in the inventory. Use
/// [`crate::render_host_vars`] for the values Ansible actually applies.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    hosts: Vec<String>,
    host_vars: BTreeMap<String, HostVars>,
}

impl Inventory {
    /// Resolves an inventory by running `ansible-inventory -i <path> --list`.
    ///
    /// # Errors
    ///
    /// Returns an error if `ansible-inventory` cannot be started, exits
    /// non-zero, or prints something that is not an inventory listing.
    pub fn load(path: &Path) -> Result<Self, VarsError> {
        info!("Resolving inventory {}", path.display());
        let expression = cmd!("ansible-inventory", "-i", path, "--list");
        let command_line = format!("ansible-inventory -i {} --list", path.display());
        let output = capture(&expression, &command_line)?;

        Self::from_listing(&String::from_utf8_lossy(&output.stdout))
    }

    /// Parses the JSON printed by `ansible-inventory --list`.
    ///
    /// Hosts are collected from `all` and every group reachable through its
    /// `children`, then sorted and de-duplicated.
    ///
    /// # Errors
    ///
    /// Returns an error if `listing` is not a JSON object.
    pub fn from_listing(listing: &str) -> Result<Self, VarsError> {
        let document: Value =
            serde_json::from_str(listing).map_err(|source| VarsError::Json {
                origin: String::from("ansible-inventory --list"),
                source,
            })?;
        let Value::Object(groups) = document else {
            return Err(VarsError::NotAMapping {
                origin: String::from("ansible-inventory --list"),
            });
        };

        let mut hosts: BTreeSet<String> = BTreeSet::new();
        let mut visited: BTreeSet<String> = BTreeSet::new();
        collect_group_hosts(&groups, ALL_GROUP, &mut visited, &mut hosts);

        let mut host_vars: BTreeMap<String, HostVars> = BTreeMap::new();
        let meta_host_vars = groups
            .get("_meta")
            .and_then(|meta| meta.get("hostvars"))
            .and_then(Value::as_object);
        if let Some(all_vars) = meta_host_vars {
            for (host, vars) in all_vars {
                let origin = format!("hostvars of {host}");
                host_vars.insert(host.clone(), HostVars::from_value(vars.clone(), &origin)?);
                // Hosts only listed under _meta are still part of `all`.
                hosts.insert(host.clone());
            }
        }

        Ok(Self {
            hosts: hosts.into_iter().collect(),
            host_vars,
        })
    }

    /// All hosts in the inventory, sorted by name.
    #[must_use]
    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    /// The host checks run against when none is named explicitly.
    ///
    /// # Errors
    ///
    /// Returns [`VarsError::NoHosts`] if the inventory is empty.
    pub fn first_host(&self) -> Result<&str, VarsError> {
        self.hosts
            .first()
            .map(String::as_str)
            .ok_or(VarsError::NoHosts)
    }

    /// Returns the variables of `host`. A host with no variables yields an
    /// empty mapping.
    ///
    /// # Errors
    ///
    /// Returns [`VarsError::HostNotFound`] if `host` is not in the inventory.
    pub fn host_vars(&self, host: &str) -> Result<HostVars, VarsError> {
        if !self.hosts.iter().any(|known| known == host) {
            return Err(VarsError::HostNotFound(host.to_string()));
        }
        Ok(self.host_vars.get(host).cloned().unwrap_or_default())
    }
}

fn collect_group_hosts(
    groups: &Map<String, Value>,
    group: &str,
    visited: &mut BTreeSet<String>,
    hosts: &mut BTreeSet<String>,
) {
    if !visited.insert(group.to_string()) {
        return;
    }
    let Some(Value::Object(entry)) = groups.get(group) else {
        return;
    };

    if let Some(Value::Array(members)) = entry.get("hosts") {
        hosts.extend(members.iter().filter_map(Value::as_str).map(String::from));
    }
    if let Some(Value::Array(children)) = entry.get("children") {
        for child in children.iter().filter_map(Value::as_str) {
            collect_group_hosts(groups, child, visited, hosts);
        }
    }
}
