// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Access to the variables a host was provisioned with.
//!
//! Hosts come from `ansible-inventory`; their variables are rendered by
//! Ansible itself and optionally overlaid with YAML/JSON vars files. The typed views in [`users`] and
//! [`firewall`] read the keys the verification suites consume.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod ansible;
mod error;
pub mod firewall;
mod host_vars;
mod inventory;
pub mod users;
mod vars_file;

#[cfg(test)]
mod tests;

pub use ansible::{parse_debug_output, render_host_vars};
pub use error::VarsError;
pub use firewall::{AddressFamily, ChainDirection, FirewallVars};
pub use host_vars::HostVars;
pub use inventory::Inventory;
pub use users::{GroupList, UserDeletion, UserSpec, UsersVars};
pub use vars_file::load_vars_file;
