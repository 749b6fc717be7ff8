// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Typed view of the nftables role variables.

use crate::error::VarsError;
use crate::host_vars::HostVars;
use serde::{Deserialize, Serialize};

/// Whether the role manages the nftables service at all.
pub const NFTABLES_ENABLED: &str = "nftables_enabled";
/// Desired service state, e.g. `started`.
pub const NFTABLES_STATE: &str = "nftables_state";

/// An address family with its own `filter` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressFamily {
    Ipv4,
    Ipv6,
}

impl AddressFamily {
    pub const ALL: [Self; 2] = [Self::Ipv4, Self::Ipv6];

    /// Family keyword used by `nft` (`ip` or `ip6`).
    #[must_use]
    pub const fn nft_family(self) -> &'static str {
        match self {
            Self::Ipv4 => "ip",
            Self::Ipv6 => "ip6",
        }
    }

    /// Prefix used in variable names (`ipv4` or `ipv6`).
    #[must_use]
    pub const fn var_prefix(self) -> &'static str {
        match self {
            Self::Ipv4 => "ipv4",
            Self::Ipv6 => "ipv6",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ipv4 => "IPv4",
            Self::Ipv6 => "IPv6",
        }
    }
}

impl std::fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A base chain of the `filter` table, named after its traffic direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChainDirection {
    Input,
    Output,
    Forward,
}

impl ChainDirection {
    pub const ALL: [Self; 3] = [Self::Input, Self::Output, Self::Forward];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Output => "output",
            Self::Forward => "forward",
        }
    }
}

impl std::fmt::Display for ChainDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Name of the variable holding the default policy of one chain, e.g.
/// `nftables_ipv4_policy_input`.
#[must_use]
pub fn policy_var_name(family: AddressFamily, direction: ChainDirection) -> String {
    format!(
        "nftables_{}_policy_{}",
        family.var_prefix(),
        direction.as_str()
    )
}

/// Name of the variable holding the input rules of one family, e.g.
/// `nftables_ipv6_input_rules`.
#[must_use]
pub fn input_rules_var_name(family: AddressFamily) -> String {
    format!("nftables_{}_input_rules", family.var_prefix())
}

/// Borrowed view over the nftables variables of a host.
#[derive(Debug, Clone, Copy)]
pub struct FirewallVars<'a> {
    vars: &'a HostVars,
}

impl<'a> FirewallVars<'a> {
    #[must_use]
    pub const fn new(vars: &'a HostVars) -> Self {
        Self { vars }
    }

    /// Whether the service should be enabled. Undefined reads as `false`.
    ///
    /// # Errors
    ///
    /// Returns [`VarsError::Invalid`] if the flag is not boolean-like.
    pub fn service_enabled(&self) -> Result<bool, VarsError> {
        Ok(self.vars.flag(NFTABLES_ENABLED)?.unwrap_or(false))
    }

    /// # Errors
    ///
    /// Returns [`VarsError::Invalid`] if the state is not a scalar.
    pub fn service_state(&self) -> Result<Option<String>, VarsError> {
        self.vars.string(NFTABLES_STATE)
    }

    /// Configured default policy of one chain (`accept`, `drop`, ...).
    ///
    /// # Errors
    ///
    /// Returns [`VarsError::Missing`] if the policy is not configured.
    pub fn policy(
        &self,
        family: AddressFamily,
        direction: ChainDirection,
    ) -> Result<String, VarsError> {
        self.vars
            .require_string(&policy_var_name(family, direction))
    }

    /// Configured input rules in declaration order. Undefined reads as empty.
    ///
    /// # Errors
    ///
    /// Returns [`VarsError::Invalid`] if the value is not a list of strings.
    pub fn input_rules(&self, family: AddressFamily) -> Result<Vec<String>, VarsError> {
        self.vars.string_list(&input_rules_var_name(family))
    }
}
