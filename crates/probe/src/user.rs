// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::ProbeError;
use serde::Serialize;
use shell_words::quote;

/// `getent` exit status for a key that is not in the database.
pub(crate) const GETENT_NOT_FOUND: i32 = 2;

/// Account record of one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub name: String,
    pub exists: bool,
    pub uid: Option<u32>,
    /// Primary group id.
    pub gid: Option<u32>,
    pub home: Option<String>,
    pub shell: Option<String>,
    /// Names of every group the user belongs to, primary group included.
    pub groups: Vec<String>,
}

impl User {
    #[must_use]
    pub fn missing(name: &str) -> Self {
        Self {
            name: name.to_string(),
            exists: false,
            uid: None,
            gid: None,
            home: None,
            shell: None,
            groups: Vec::new(),
        }
    }

    #[must_use]
    pub fn passwd_command(name: &str) -> String {
        format!("getent passwd {}", quote(name))
    }

    #[must_use]
    pub fn groups_command(name: &str) -> String {
        format!("id -Gn {}", quote(name))
    }

    /// Renders this user as a `passwd` database line.
    #[must_use]
    pub fn passwd_line(&self) -> String {
        format!(
            "{}:x:{}:{}::{}:{}",
            self.name,
            self.uid.unwrap_or_default(),
            self.gid.unwrap_or_default(),
            self.home.as_deref().unwrap_or_default(),
            self.shell.as_deref().unwrap_or_default()
        )
    }

    /// Parses a `passwd` line printed by [`Self::passwd_command`]. Groups are
    /// filled in separately.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Parse`] if the line does not have seven fields
    /// or the ids are not numeric.
    pub fn parse_passwd(name: &str, line: &str) -> Result<Self, ProbeError> {
        let parse_error = |reason: String| ProbeError::Parse {
            command: Self::passwd_command(name),
            reason,
        };

        let line: &str = line.lines().next().unwrap_or_default();
        let fields: Vec<&str> = line.split(':').collect();
        let [_, _, uid, gid, _, home, shell] = fields.as_slice() else {
            return Err(parse_error(format!("expected 7 fields, got '{line}'")));
        };
        let uid: u32 = uid
            .parse()
            .map_err(|_| parse_error(format!("invalid uid '{uid}'")))?;
        let gid: u32 = gid
            .parse()
            .map_err(|_| parse_error(format!("invalid gid '{gid}'")))?;

        Ok(Self {
            name: name.to_string(),
            exists: true,
            uid: Some(uid),
            gid: Some(gid),
            home: Some((*home).to_string()),
            shell: Some((*shell).to_string()),
            groups: Vec::new(),
        })
    }
}
