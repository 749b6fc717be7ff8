// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `rolecheck` verifies that a host provisioned by the nftables or users
//! role is in the state its variables describe.
//!
//! Hosts and their variables come from an Ansible inventory, normally the
//! one Molecule writes for a scenario. Results go to stdout, logs to stderr.
//! The exit status is 0 when no check failed or errored, 1 when one did, and
//! 2 when the run could not start at all.

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

mod connection;
mod render;

#[cfg(test)]
mod tests;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use color_eyre::{Result, eyre::Context};
use connection::ConnectionKind;
use render::Format;
use rolecheck::{Report, Suite, verify};
use rolecheck_probe::{Connection, Host};
use rolecheck_vars::{HostVars, Inventory, load_vars_file, render_host_vars};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::level_filters::LevelFilter;
use tracing::{debug, info};
use tracing_log::AsTrace;
use tracing_subscriber::EnvFilter;

/// Exit status when a check failed or errored.
const CHECKS_FAILED: u8 = 1;
/// Exit status when the run could not start.
const SETUP_FAILED: u8 = 2;

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let args: Args = Args::parse();
    init_logging(args.log_level());

    match args.run() {
        Ok(code) => Ok(code),
        Err(err) => {
            tracing::error!("{err:#}");
            Ok(ExitCode::from(SETUP_FAILED))
        }
    }
}

/// Logs go to stderr so stdout carries only the report. `RUST_LOG`, when
/// set, overrides the level chosen with `-v`/`-q`.
fn init_logging(level: LevelFilter) {
    let filter: EnvFilter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

/// Verify hosts provisioned by the nftables and users roles
#[derive(Debug, Parser)]
#[command(name = "rolecheck", author, version, about, long_about = None)]
struct Args {
    /// Ansible inventory describing the hosts under test
    #[arg(short, long, env = "MOLECULE_INVENTORY_FILE")]
    inventory: PathBuf,

    /// Inventory host to verify. Defaults to the first host by name.
    #[arg(long)]
    host: Option<String>,

    /// YAML or JSON mapping of extra variables, applied over the inventory's.
    /// May be repeated; later files win.
    #[arg(long = "vars-file", value_name = "PATH")]
    vars_files: Vec<PathBuf>,

    /// Use the inventory's variables as written instead of having Ansible
    /// render their templates. Values that still contain templates then
    /// make the checks reading them error.
    #[arg(long)]
    raw_vars: bool,

    /// How to reach the host
    #[arg(long, value_enum, default_value_t = ConnectionKind::Auto)]
    connection: ConnectionKind,

    /// Run probes as the connecting user instead of through `sudo -n`
    #[arg(long)]
    no_sudo: bool,

    /// Output format of the report
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<WarnLevel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
enum Command {
    /// Run verification suites against the host
    #[command(visible_alias = "v")]
    Verify {
        #[arg(value_enum, default_value_t = SuiteSelection::All)]
        suite: SuiteSelection,
    },

    /// List the hosts in the inventory
    Hosts,

    /// Print the host's resolved variables as JSON
    Vars,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SuiteSelection {
    Nftables,
    Users,
    All,
}

impl SuiteSelection {
    fn suites(self) -> Vec<Suite> {
        match self {
            Self::Nftables => vec![Suite::Nftables],
            Self::Users => vec![Suite::Users],
            Self::All => Suite::ALL.to_vec(),
        }
    }
}

impl Args {
    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }

    fn run(&self) -> Result<ExitCode> {
        let inventory: Inventory = Inventory::load(&self.inventory)
            .wrap_err_with(|| format!("failed to load inventory {}", self.inventory.display()))?;

        match self.command {
            Command::Hosts => {
                print!("{}", render::hosts(inventory.hosts(), self.format)?);
                Ok(ExitCode::SUCCESS)
            }
            Command::Vars => {
                let (_, vars) = self.resolve_host(&inventory)?;
                println!("{}", serde_json::to_string_pretty(vars.as_map())?);
                Ok(ExitCode::SUCCESS)
            }
            Command::Verify { suite } => self.verify(&inventory, &suite.suites()),
        }
    }

    fn verify(&self, inventory: &Inventory, suites: &[Suite]) -> Result<ExitCode> {
        let (name, vars) = self.resolve_host(inventory)?;
        let connection: Connection = connection::resolve(self.connection, &name, &vars)
            .wrap_err_with(|| format!("cannot work out how to reach {name}"))?;
        debug!("Connection for {name}: {connection:?}");

        let host: Host = Host::connect(connection.into_backend(), !self.no_sudo)
            .wrap_err_with(|| format!("failed to connect to {name}"))?;
        let report: Report = verify(&host, &vars, suites);

        print!("{}", render::report(&report, self.format)?);
        if report.is_success() {
            Ok(ExitCode::SUCCESS)
        } else {
            Ok(ExitCode::from(CHECKS_FAILED))
        }
    }

    /// Picks the host to verify and merges its variables with the vars files.
    ///
    /// Variables are rendered by Ansible unless `--raw-vars` is given. The
    /// host must be in the inventory either way.
    fn resolve_host(&self, inventory: &Inventory) -> Result<(String, HostVars)> {
        let name: String = match &self.host {
            Some(host) => host.clone(),
            None => inventory.first_host()?.to_string(),
        };
        info!("Verifying host {name}");

        let listed: HostVars = inventory.host_vars(&name)?;
        let mut vars: HostVars = if self.raw_vars {
            listed
        } else {
            render_host_vars(&self.inventory, &name)
                .wrap_err_with(|| format!("failed to render variables of {name}"))?
        };
        for path in &self.vars_files {
            let overlay: HostVars = load_vars_file(path)?;
            debug!("{} sets {} variables", path.display(), overlay.len());
            vars.overlay(overlay);
        }
        Ok((name, vars))
    }
}
