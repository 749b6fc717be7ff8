// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only probes against a live host.
//!
//! A [`Host`] runs shell commands through a [`Backend`] (local shell, `ssh`,
//! or a container engine) and turns their output into typed snapshots:
//! [`Package`], [`Service`], [`File`], [`User`], [`Group`], and raw
//! [`CommandOutput`]. Nothing is cached; every probe call re-queries the host.

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

mod backend;
mod error;
mod file;
mod group;
mod host;
mod package;
#[cfg(any(test, feature = "testing"))]
mod scripted;
mod service;
mod user;

#[cfg(test)]
mod tests;

pub use backend::{
    Backend, CommandOutput, Connection, ContainerBackend, ContainerTarget, LocalBackend,
    SshBackend, SshTarget,
};
pub use error::ProbeError;
pub use file::{File, FileKind};
pub use group::Group;
pub use host::Host;
pub use package::{Package, PackageManager};
#[cfg(any(test, feature = "testing"))]
pub use scripted::ScriptedBackend;
pub use service::Service;
pub use user::User;
