// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Verification suites for provisioned hosts.
//!
//! Each suite is a list of independent [`Check`]s. A check reads the expected
//! state from the host's variables, the actual state from [`Host`] probes,
//! and yields an [`Outcome`]: passed, failed, skipped, or errored when the
//! evidence could not be gathered at all.
//!
//! [`Host`]: rolecheck_probe::Host

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

mod check;
pub mod nftables;
mod report;
mod runner;
mod suite;
pub mod users;

#[cfg(test)]
mod tests;

pub use check::{Check, Context, Failures, Outcome, Verdict};
pub use report::{CheckResult, Report, Summary};
pub use runner::{run_checks, verify};
pub use suite::Suite;
