// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::check::Check;
use crate::{nftables, users};
use serde::Serialize;

/// A verification suite, one per provisioning role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Suite {
    Nftables,
    Users,
}

impl Suite {
    pub const ALL: [Self; 2] = [Self::Nftables, Self::Users];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nftables => "nftables",
            Self::Users => "users",
        }
    }

    /// The suite's checks in reporting order.
    #[must_use]
    pub fn checks(self) -> Vec<Check> {
        match self {
            Self::Nftables => nftables::checks(),
            Self::Users => users::checks(),
        }
    }
}

impl std::fmt::Display for Suite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
