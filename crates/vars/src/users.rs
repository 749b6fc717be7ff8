// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Typed view of the user-management role variables.

use crate::error::VarsError;
use crate::host_vars::HostVars;
use serde::{Deserialize, Serialize};

/// Variable holding the accounts to create.
pub const USERS_CREATE: &str = "users_create";
/// Variable holding the accounts to remove.
pub const USERS_DELETE: &str = "users_delete";

/// Group memberships, written either as one group name or a list of names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupList {
    One(String),
    Many(Vec<String>),
}

impl GroupList {
    /// The group names in declaration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        match self {
            Self::One(name) => vec![name.as_str()],
            Self::Many(names) => names.iter().map(String::as_str).collect(),
        }
    }
}

/// One entry of `users_create`. Keys the checks do not consume (passwords,
/// comments, and so on) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSpec {
    pub name: String,
    #[serde(default)]
    pub uid: Option<u32>,
    #[serde(default)]
    pub shell: Option<String>,
    #[serde(default)]
    pub groups: Option<GroupList>,
    #[serde(default)]
    pub pub_key: Option<String>,
}

impl UserSpec {
    /// Home directory the role creates for this account.
    #[must_use]
    pub fn home_dir(&self) -> String {
        home_dir_of(&self.name)
    }

    /// Location of the account's `authorized_keys` file.
    #[must_use]
    pub fn authorized_keys_path(&self) -> String {
        format!("{}/.ssh/authorized_keys", self.home_dir())
    }
}

/// One entry of `users_delete`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDeletion {
    pub name: String,
}

impl UserDeletion {
    #[must_use]
    pub fn home_dir(&self) -> String {
        home_dir_of(&self.name)
    }
}

/// Borrowed view over the users role variables of a host.
///
/// Each accessor reads only its own variable, so a malformed `users_create`
/// does not stop `users_delete` from being read. `None` means the variable is
/// not defined at all, which the suites report as a skip rather than as an
/// empty, trivially satisfied list.
#[derive(Debug, Clone, Copy)]
pub struct UsersVars<'a> {
    vars: &'a HostVars,
}

impl<'a> UsersVars<'a> {
    #[must_use]
    pub const fn new(vars: &'a HostVars) -> Self {
        Self { vars }
    }

    /// Accounts listed in `users_create`.
    ///
    /// # Errors
    ///
    /// Returns [`VarsError::Invalid`] if the variable is not a list of users.
    pub fn create(&self) -> Result<Option<Vec<UserSpec>>, VarsError> {
        self.vars.deserialize(USERS_CREATE)
    }

    /// Accounts listed in `users_delete`.
    ///
    /// # Errors
    ///
    /// Returns [`VarsError::Invalid`] if the variable is not a list of users.
    pub fn delete(&self) -> Result<Option<Vec<UserDeletion>>, VarsError> {
        self.vars.deserialize(USERS_DELETE)
    }
}

fn home_dir_of(name: &str) -> String {
    format!("/home/{name}")
}
