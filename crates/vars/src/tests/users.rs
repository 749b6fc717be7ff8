// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{GroupList, HostVars, UserDeletion, UserSpec, UsersVars, VarsError};
use serde_json::json;

#[test]
fn test_users_vars_reads_full_user_spec() {
    let vars: HostVars = HostVars::from_value(
        json!({
            "users_create": [{
                "name": "alice",
                "uid": 1001,
                "shell": "/bin/bash",
                "groups": ["wheel", "docker"],
                "pub_key": "ssh-ed25519 AAAAC3Nza alice@example",
                "password": "ignored"
            }]
        }),
        "test",
    )
    .unwrap();

    let users: UsersVars<'_> = UsersVars::new(&vars);
    let create: Vec<UserSpec> = users.create().unwrap().unwrap();
    assert_eq!(create.len(), 1);
    let alice: &UserSpec = &create[0];
    assert_eq!(alice.name, "alice");
    assert_eq!(alice.uid, Some(1001));
    assert_eq!(alice.shell.as_deref(), Some("/bin/bash"));
    assert_eq!(
        alice.groups.as_ref().map(GroupList::names),
        Some(vec!["wheel", "docker"])
    );
    assert_eq!(alice.home_dir(), "/home/alice");
    assert_eq!(alice.authorized_keys_path(), "/home/alice/.ssh/authorized_keys");
    assert!(users.delete().unwrap().is_none());
}

#[test]
fn test_groups_may_be_a_single_string() {
    let vars: HostVars = HostVars::from_value(
        json!({ "users_create": [{ "name": "carol", "groups": "sudo" }] }),
        "test",
    )
    .unwrap();

    let create: Vec<UserSpec> = UsersVars::new(&vars).create().unwrap().unwrap();
    let carol: &UserSpec = &create[0];
    assert_eq!(carol.groups, Some(GroupList::One(String::from("sudo"))));
    assert_eq!(carol.groups.as_ref().unwrap().names(), vec!["sudo"]);
    assert_eq!(carol.uid, None);
}

#[test]
fn test_users_delete_entries() {
    let vars: HostVars =
        HostVars::from_value(json!({ "users_delete": [{ "name": "bob" }] }), "test").unwrap();

    let users: UsersVars<'_> = UsersVars::new(&vars);
    let delete: Vec<UserDeletion> = users.delete().unwrap().unwrap();
    assert_eq!(delete[0].name, "bob");
    assert_eq!(delete[0].home_dir(), "/home/bob");
    assert!(users.create().unwrap().is_none());
}

#[test]
fn test_user_without_name_is_invalid() {
    let vars: HostVars =
        HostVars::from_value(json!({ "users_create": [{ "uid": 5 }] }), "test").unwrap();

    let result = UsersVars::new(&vars).create();
    assert!(matches!(result, Err(VarsError::Invalid { name, .. }) if name == "users_create"));
}

#[test]
fn test_negative_uid_is_invalid() {
    let vars: HostVars = HostVars::from_value(
        json!({ "users_create": [{ "name": "dave", "uid": -1 }] }),
        "test",
    )
    .unwrap();

    assert!(UsersVars::new(&vars).create().is_err());
}

#[test]
fn test_malformed_create_list_does_not_hide_deletions() {
    let vars: HostVars = HostVars::from_value(
        json!({
            "users_create": [{ "name": "alice", "uid": "1001" }],
            "users_delete": [{ "name": "bob" }]
        }),
        "test",
    )
    .unwrap();

    let users: UsersVars<'_> = UsersVars::new(&vars);
    assert!(
        matches!(users.create(), Err(VarsError::Invalid { name, .. }) if name == "users_create")
    );
    let delete: Vec<UserDeletion> = users.delete().unwrap().unwrap();
    assert_eq!(delete[0].name, "bob");
}
