// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Checks for hosts provisioned by the users role.

use crate::check::{Check, Context, Failures, Verdict};
use rolecheck_probe::{File, Group, User};
use rolecheck_vars::users::{USERS_CREATE, USERS_DELETE};
use rolecheck_vars::{GroupList, UserDeletion, UserSpec, UsersVars};
use std::fmt::Display;

pub const SHELLS_PATH: &str = "/etc/shells";
pub const AUTHORIZED_KEYS_MODE: u32 = 0o600;
/// Bits a home directory must grant its owner; others are tolerated.
pub const HOME_OWNER_BITS: u32 = 0o700;

#[must_use]
pub fn checks() -> Vec<Check> {
    vec![
        Check::new(
            "users_exist",
            "every configured user exists with the configured uid and shell",
            users_exist,
        ),
        Check::new(
            "user_groups",
            "users belong to their configured groups",
            user_groups,
        ),
        Check::new(
            "home_directories",
            "home directories exist and are owned and usable by their users",
            home_directories,
        ),
        Check::new(
            "ssh_keys",
            "configured public keys are authorized for their users",
            ssh_keys,
        ),
        Check::new(
            "login_shells",
            "configured shells are valid login shells",
            login_shells,
        ),
        Check::new(
            "deleted_users_absent",
            "users marked for deletion no longer exist",
            deleted_users_absent,
        ),
        Check::new(
            "deleted_homes_removed",
            "home directories of deleted users are gone",
            deleted_homes_removed,
        ),
    ]
}

fn created_users(context: &Context<'_>) -> Result<Vec<UserSpec>, Verdict> {
    UsersVars::new(context.vars)
        .create()?
        .ok_or_else(|| Verdict::skip(format!("{USERS_CREATE} is not defined")))
}

fn deleted_users(context: &Context<'_>) -> Result<Vec<UserDeletion>, Verdict> {
    UsersVars::new(context.vars)
        .delete()?
        .ok_or_else(|| Verdict::skip(format!("{USERS_DELETE} is not defined")))
}

/// Narrows `users` to those declaring an optional field, skipping the check
/// when none does.
fn users_declaring(
    users: Vec<UserSpec>,
    field: &str,
    declares: fn(&UserSpec) -> bool,
) -> Result<Vec<UserSpec>, Verdict> {
    let selected: Vec<UserSpec> = users.into_iter().filter(declares).collect();
    if selected.is_empty() {
        return Err(Verdict::skip(format!(
            "no user in {USERS_CREATE} declares {field}"
        )));
    }
    Ok(selected)
}

fn shown<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| String::from("none"), |value| value.to_string())
}

fn users_exist(context: &Context<'_>) -> Result<(), Verdict> {
    let mut failures: Failures = Failures::new();

    for spec in created_users(context)? {
        let user: User = context.host.user(&spec.name)?;
        if !user.exists {
            failures.push(format!("User {} does not exist", spec.name));
            continue;
        }
        if let Some(uid) = spec.uid {
            failures.ensure(user.uid == Some(uid), || {
                format!(
                    "User {} has UID {}, expected {uid}",
                    spec.name,
                    shown(user.uid)
                )
            });
        }
        if let Some(shell) = &spec.shell {
            failures.ensure(user.shell.as_ref() == Some(shell), || {
                format!(
                    "User {} has shell {}, expected {shell}",
                    spec.name,
                    shown(user.shell.as_deref())
                )
            });
        }
    }
    failures.finish()
}

fn user_groups(context: &Context<'_>) -> Result<(), Verdict> {
    let users: Vec<UserSpec> =
        users_declaring(created_users(context)?, "groups", |spec| spec.groups.is_some())?;
    let mut failures: Failures = Failures::new();

    for spec in &users {
        let user: User = context.host.user(&spec.name)?;
        if !user.exists {
            failures.push(format!("User {} does not exist", spec.name));
            continue;
        }

        let names: Vec<&str> = spec
            .groups
            .as_ref()
            .map(GroupList::names)
            .unwrap_or_default();
        for group_name in names {
            let group: Group = context.host.group(group_name)?;
            if !group.exists {
                failures.push(format!("Group {group_name} does not exist"));
                continue;
            }
            let primary: bool = group.gid.is_some() && user.gid == group.gid;
            let supplementary: bool = user.groups.iter().any(|name| name == group_name);
            failures.ensure(primary || supplementary, || {
                format!("User {} is not in group {group_name}", spec.name)
            });
        }
    }
    failures.finish()
}

fn home_directories(context: &Context<'_>) -> Result<(), Verdict> {
    let mut failures: Failures = Failures::new();

    for spec in created_users(context)? {
        let home: File = context.host.file(&spec.home_dir())?;
        if !home.exists {
            failures.push(format!(
                "Home directory for user {} does not exist",
                spec.name
            ));
            continue;
        }
        failures.ensure(home.is_directory(), || {
            format!("Home path for user {} is not a directory", spec.name)
        });
        failures.ensure(home.owner.as_deref() == Some(spec.name.as_str()), || {
            format!(
                "Home directory for user {} has wrong owner {}",
                spec.name,
                shown(home.owner.as_deref())
            )
        });
        let mode: u32 = home.mode.unwrap_or_default();
        failures.ensure(mode & HOME_OWNER_BITS == HOME_OWNER_BITS, || {
            format!(
                "Home directory for user {} has incorrect permissions {mode:#o}",
                spec.name
            )
        });
    }
    failures.finish()
}

fn ssh_keys(context: &Context<'_>) -> Result<(), Verdict> {
    let users: Vec<UserSpec> =
        users_declaring(created_users(context)?, "pub_key", |spec| spec.pub_key.is_some())?;
    let mut failures: Failures = Failures::new();

    for spec in &users {
        let path: String = spec.authorized_keys_path();
        let file: File = context.host.file(&path)?;
        if !file.exists {
            failures.push(format!(
                "authorized_keys file does not exist for user {}",
                spec.name
            ));
            continue;
        }
        if !file.is_file() {
            failures.push(format!(
                "authorized_keys path is not a file for user {}",
                spec.name
            ));
            continue;
        }
        failures.ensure(file.owner.as_deref() == Some(spec.name.as_str()), || {
            format!(
                "authorized_keys file has wrong owner for user {}",
                spec.name
            )
        });
        failures.ensure(file.mode == Some(AUTHORIZED_KEYS_MODE), || {
            format!(
                "authorized_keys file has incorrect permissions {:#o} for user {}",
                file.mode.unwrap_or_default(),
                spec.name
            )
        });

        let key: &str = spec.pub_key.as_deref().unwrap_or_default();
        let content: String = context.host.file_content(&path)?;
        failures.ensure(content.contains(key), || {
            format!(
                "Public key not found in authorized_keys for user {}",
                spec.name
            )
        });
    }
    failures.finish()
}

fn login_shells(context: &Context<'_>) -> Result<(), Verdict> {
    let users: Vec<UserSpec> =
        users_declaring(created_users(context)?, "shell", |spec| spec.shell.is_some())?;
    let mut failures: Failures = Failures::new();

    // Without a shell registry, fall back to the shell binary existing.
    // A registry entry only has to contain the shell path, so `/bin/bash`
    // is satisfied by `/usr/bin/bash`.
    let registry: Option<String> = if context.host.file(SHELLS_PATH)?.exists {
        Some(context.host.file_content(SHELLS_PATH)?)
    } else {
        None
    };

    for spec in &users {
        let shell: &str = spec.shell.as_deref().unwrap_or_default();
        match &registry {
            Some(shells) => failures.ensure(shells.contains(shell), || {
                format!(
                    "Shell {shell} for user {} not found in {SHELLS_PATH}",
                    spec.name
                )
            }),
            None => failures.ensure(context.host.file(shell)?.exists, || {
                format!("Shell {shell} for user {} does not exist", spec.name)
            }),
        }
    }
    failures.finish()
}

fn deleted_users_absent(context: &Context<'_>) -> Result<(), Verdict> {
    let mut failures: Failures = Failures::new();

    for deleted in deleted_users(context)? {
        failures.ensure(!context.host.user(&deleted.name)?.exists, || {
            format!(
                "User {} still exists but should have been deleted",
                deleted.name
            )
        });
    }
    failures.finish()
}

fn deleted_homes_removed(context: &Context<'_>) -> Result<(), Verdict> {
    let mut failures: Failures = Failures::new();

    for deleted in deleted_users(context)? {
        let home: String = deleted.home_dir();
        failures.ensure(!context.host.file(&home)?.exists, || {
            format!("Home directory {home} still exists for deleted user")
        });
    }
    failures.finish()
}
