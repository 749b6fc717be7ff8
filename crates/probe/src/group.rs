// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::ProbeError;
use serde::Serialize;
use shell_words::quote;

/// Group database record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    pub name: String,
    pub exists: bool,
    pub gid: Option<u32>,
}

impl Group {
    #[must_use]
    pub fn missing(name: &str) -> Self {
        Self {
            name: name.to_string(),
            exists: false,
            gid: None,
        }
    }

    #[must_use]
    pub fn getent_command(name: &str) -> String {
        format!("getent group {}", quote(name))
    }

    #[must_use]
    pub fn group_line(&self) -> String {
        format!("{}:x:{}:", self.name, self.gid.unwrap_or_default())
    }

    /// Parses a line such as `wheel:x:10:alice,bob`.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Parse`] if the gid field is missing or not
    /// numeric.
    pub fn parse_getent(name: &str, line: &str) -> Result<Self, ProbeError> {
        let line: &str = line.lines().next().unwrap_or_default();
        let gid: u32 = line
            .split(':')
            .nth(2)
            .and_then(|gid| gid.parse().ok())
            .ok_or_else(|| ProbeError::Parse {
                command: Self::getent_command(name),
                reason: format!("no numeric gid in '{line}'"),
            })?;

        Ok(Self {
            name: name.to_string(),
            exists: true,
            gid: Some(gid),
        })
    }
}
