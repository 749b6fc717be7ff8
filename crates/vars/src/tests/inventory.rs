// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Inventory, VarsError};

const MOLECULE_LISTING: &str = r#"{
    "_meta": {
        "hostvars": {
            "instance": {
                "ansible_connection": "docker",
                "nftables_enabled": true
            }
        }
    },
    "all": { "children": ["ungrouped", "molecule"] },
    "molecule": { "hosts": ["instance", "backup"] },
    "ungrouped": {}
}"#;

#[test]
fn test_from_listing_collects_hosts_from_children() {
    let inventory: Inventory = Inventory::from_listing(MOLECULE_LISTING).unwrap();
    assert_eq!(inventory.hosts(), ["backup", "instance"]);
    assert_eq!(inventory.first_host().unwrap(), "backup");
}

#[test]
fn test_host_vars_come_from_meta() {
    let inventory: Inventory = Inventory::from_listing(MOLECULE_LISTING).unwrap();
    let vars = inventory.host_vars("instance").unwrap();
    assert_eq!(vars.flag("nftables_enabled").unwrap(), Some(true));
}

#[test]
fn test_host_without_vars_has_empty_mapping() {
    let inventory: Inventory = Inventory::from_listing(MOLECULE_LISTING).unwrap();
    assert!(inventory.host_vars("backup").unwrap().is_empty());
}

#[test]
fn test_unknown_host_is_an_error() {
    let inventory: Inventory = Inventory::from_listing(MOLECULE_LISTING).unwrap();
    assert!(matches!(
        inventory.host_vars("nowhere"),
        Err(VarsError::HostNotFound(host)) if host == "nowhere"
    ));
}

#[test]
fn test_cyclic_children_terminate() {
    let listing = r#"{
        "all": { "children": ["a"] },
        "a": { "children": ["b"], "hosts": ["one"] },
        "b": { "children": ["a"], "hosts": ["two"] }
    }"#;
    let inventory: Inventory = Inventory::from_listing(listing).unwrap();
    assert_eq!(inventory.hosts(), ["one", "two"]);
}

#[test]
fn test_empty_inventory_has_no_first_host() {
    let inventory: Inventory =
        Inventory::from_listing(r#"{ "all": { "children": ["ungrouped"] } }"#).unwrap();
    assert!(matches!(inventory.first_host(), Err(VarsError::NoHosts)));
}

#[test]
fn test_from_listing_rejects_garbage() {
    assert!(matches!(
        Inventory::from_listing("not json"),
        Err(VarsError::Json { .. })
    ));
    assert!(matches!(
        Inventory::from_listing("[1, 2]"),
        Err(VarsError::NotAMapping { .. })
    ));
}
