// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Checks for hosts provisioned by the nftables role.
//!
//! Rule checks compare text, not rule semantics: a configured rule must
//! appear byte for byte in `nft list chain` output once its trailing
//! ` comment ` annotation is removed. A rule that `nft` echoes back in a
//! different but equivalent form fails.

use crate::check::{Check, Context, Failures, Verdict};
use rolecheck_probe::{CommandOutput, File};
use rolecheck_vars::firewall::input_rules_var_name;
use rolecheck_vars::{AddressFamily, ChainDirection, FirewallVars};

pub const PACKAGE: &str = "nftables";
pub const SERVICE: &str = "nftables";
pub const BINARY: &str = "nft";
pub const CONFIG_PATH: &str = "/etc/nftables.conf";
pub const CONFIG_OWNER: &str = "root";
pub const CONFIG_GROUP: &str = "root";
pub const CONFIG_MODE: u32 = 0o644;
pub const FLUSH_RULESET: &str = "flush ruleset";
pub const LOOPBACK_COMMAND: &str = "ping -c 1 127.0.0.1";
pub const LIST_RULESET_COMMAND: &str = "nft list ruleset";

/// Separates a rule from its human-readable annotation.
const RULE_ANNOTATION: &str = " comment ";

/// The part of a configured rule that must appear in the live ruleset.
///
/// ```
/// use rolecheck::nftables::rule_match_fragment;
///
/// assert_eq!(
///     rule_match_fragment(r#"add rule ip filter input tcp dport 22 accept comment "ssh""#),
///     "add rule ip filter input tcp dport 22 accept"
/// );
/// ```
#[must_use]
pub fn rule_match_fragment(rule: &str) -> &str {
    rule.split_once(RULE_ANNOTATION)
        .map_or(rule, |(head, _)| head)
        .trim()
}

#[must_use]
pub fn list_table_command(family: AddressFamily) -> String {
    format!("nft list table {} filter", family.nft_family())
}

#[must_use]
pub fn list_chain_command(family: AddressFamily, direction: ChainDirection) -> String {
    format!("nft list chain {} filter {direction}", family.nft_family())
}

#[must_use]
pub fn checks() -> Vec<Check> {
    let mut checks: Vec<Check> = vec![
        Check::new(
            "package_installed",
            "nftables package is installed",
            package_installed,
        ),
        Check::new(
            "command_available",
            "nft command is on the PATH",
            command_available,
        ),
        Check::new(
            "service_enabled",
            "nftables service is enabled when the role manages it",
            service_enabled,
        ),
        Check::new(
            "service_running",
            "nftables service is running when the role starts it",
            service_running,
        ),
        Check::new(
            "config_file",
            "/etc/nftables.conf is a root-owned 0644 regular file",
            config_file,
        ),
        Check::new(
            "config_flushes_ruleset",
            "configuration starts from an empty ruleset",
            config_flushes_ruleset,
        ),
        Check::new(
            "config_declares_tables",
            "configuration declares the ip and ip6 filter tables",
            config_declares_tables,
        ),
        Check::new(
            "ruleset_loaded",
            "the live ruleset can be listed",
            ruleset_loaded,
        ),
    ];

    for family in AddressFamily::ALL {
        checks.push(Check::new(
            format!("{}_chains_exist", family.var_prefix()),
            format!("{family} filter table has input, output and forward chains"),
            move |context: &Context<'_>| chains_exist(context, family),
        ));
    }
    for family in AddressFamily::ALL {
        checks.push(Check::new(
            format!("{}_chain_policies", family.var_prefix()),
            format!("{family} chain policies match the configured policies"),
            move |context: &Context<'_>| chain_policies(context, family),
        ));
    }
    for family in AddressFamily::ALL {
        checks.push(Check::new(
            format!("{}_input_rules_applied", family.var_prefix()),
            format!("configured {family} input rules are in the live ruleset"),
            move |context: &Context<'_>| input_rules_applied(context, family),
        ));
    }

    checks.push(Check::new(
        "loopback_reachable",
        "loopback traffic passes the firewall",
        loopback_reachable,
    ));
    checks
}

fn package_installed(context: &Context<'_>) -> Result<(), Verdict> {
    if context.host.package(PACKAGE)?.is_installed {
        Ok(())
    } else {
        Err(Verdict::fail("nftables package is not installed"))
    }
}

fn command_available(context: &Context<'_>) -> Result<(), Verdict> {
    if context.host.command_exists(BINARY)? {
        Ok(())
    } else {
        Err(Verdict::fail("nft command not found"))
    }
}

fn service_enabled(context: &Context<'_>) -> Result<(), Verdict> {
    let firewall: FirewallVars<'_> = FirewallVars::new(context.vars);
    if !firewall.service_enabled()? {
        return Err(Verdict::skip("nftables_enabled is false"));
    }

    if context.host.service(SERVICE)?.is_enabled {
        Ok(())
    } else {
        Err(Verdict::fail("nftables service is not enabled"))
    }
}

fn service_running(context: &Context<'_>) -> Result<(), Verdict> {
    let firewall: FirewallVars<'_> = FirewallVars::new(context.vars);
    if !firewall.service_enabled()? {
        return Err(Verdict::skip("nftables_enabled is false"));
    }
    let state: Option<String> = firewall.service_state()?;
    if state.as_deref() != Some("started") {
        return Err(Verdict::skip(format!(
            "nftables_state is {}, not started",
            state.as_deref().unwrap_or("undefined")
        )));
    }

    if context.host.service(SERVICE)?.is_running {
        Ok(())
    } else {
        Err(Verdict::fail("nftables service is not running"))
    }
}

fn config_file(context: &Context<'_>) -> Result<(), Verdict> {
    let file: File = context.host.file(CONFIG_PATH)?;
    if !file.exists {
        return Err(Verdict::fail("nftables configuration file does not exist"));
    }

    let mut failures: Failures = Failures::new();
    failures.ensure(file.is_file(), || {
        String::from("nftables config path is not a file")
    });
    failures.ensure(file.owner.as_deref() == Some(CONFIG_OWNER), || {
        format!(
            "Config file owner is {}, expected {CONFIG_OWNER}",
            file.owner.as_deref().unwrap_or_default()
        )
    });
    failures.ensure(file.group.as_deref() == Some(CONFIG_GROUP), || {
        format!(
            "Config file group is {}, expected {CONFIG_GROUP}",
            file.group.as_deref().unwrap_or_default()
        )
    });
    failures.ensure(file.mode == Some(CONFIG_MODE), || {
        format!(
            "Config file permissions are {:#o}, expected {CONFIG_MODE:#o}",
            file.mode.unwrap_or_default()
        )
    });
    failures.finish()
}

/// Content of the configuration file, failing the check if it is missing.
fn config_content(context: &Context<'_>) -> Result<String, Verdict> {
    if !context.host.file(CONFIG_PATH)?.exists {
        return Err(Verdict::fail("nftables configuration file does not exist"));
    }
    Ok(context.host.file_content(CONFIG_PATH)?)
}

fn config_flushes_ruleset(context: &Context<'_>) -> Result<(), Verdict> {
    if config_content(context)?.contains(FLUSH_RULESET) {
        Ok(())
    } else {
        Err(Verdict::fail("Configuration does not contain 'flush ruleset'"))
    }
}

fn config_declares_tables(context: &Context<'_>) -> Result<(), Verdict> {
    let content: String = config_content(context)?;
    let mut failures: Failures = Failures::new();
    for family in AddressFamily::ALL {
        failures.ensure(
            content.contains(&format!("table {} filter", family.nft_family())),
            || format!("{family} filter table not found"),
        );
    }
    failures.finish()
}

fn ruleset_loaded(context: &Context<'_>) -> Result<(), Verdict> {
    let output: CommandOutput = context.host.run(LIST_RULESET_COMMAND)?;
    if output.succeeded() {
        Ok(())
    } else {
        Err(Verdict::fail(format!(
            "Failed to list nftables ruleset: {}",
            output.stderr.trim()
        )))
    }
}

fn chains_exist(context: &Context<'_>, family: AddressFamily) -> Result<(), Verdict> {
    let output: CommandOutput = context.host.run(&list_table_command(family))?;
    if !output.succeeded() {
        return Err(Verdict::fail(format!("{family} filter table does not exist")));
    }

    let mut failures: Failures = Failures::new();
    for direction in ChainDirection::ALL {
        failures.ensure(output.stdout.contains(&format!("chain {direction}")), || {
            format!("{family} {direction} chain not found")
        });
    }
    failures.finish()
}

fn chain_policies(context: &Context<'_>, family: AddressFamily) -> Result<(), Verdict> {
    let firewall: FirewallVars<'_> = FirewallVars::new(context.vars);
    let mut failures: Failures = Failures::new();

    for direction in ChainDirection::ALL {
        let policy: String = firewall.policy(family, direction)?;
        let output: CommandOutput = context.host.run(&list_chain_command(family, direction))?;
        if !output.succeeded() {
            failures.push(format!(
                "{family} {direction} chain cannot be listed: {}",
                output.stderr.trim()
            ));
            continue;
        }
        failures.ensure(output.stdout.contains(&format!("policy {policy}")), || {
            format!("{family} {direction} policy {policy} not found")
        });
    }
    failures.finish()
}

fn input_rules_applied(context: &Context<'_>, family: AddressFamily) -> Result<(), Verdict> {
    let rules: Vec<String> = FirewallVars::new(context.vars).input_rules(family)?;
    if rules.is_empty() {
        return Err(Verdict::skip(format!(
            "no rules configured in {}",
            input_rules_var_name(family)
        )));
    }

    let output: CommandOutput = context
        .host
        .run(&list_chain_command(family, ChainDirection::Input))?;
    if !output.succeeded() {
        return Err(Verdict::fail(format!(
            "{family} input chain cannot be listed: {}",
            output.stderr.trim()
        )));
    }

    let mut failures: Failures = Failures::new();
    for rule in &rules {
        let fragment: &str = rule_match_fragment(rule);
        failures.ensure(output.stdout.contains(fragment), || {
            format!("{family} input rule '{fragment}' not found in active ruleset")
        });
    }
    failures.finish()
}

fn loopback_reachable(context: &Context<'_>) -> Result<(), Verdict> {
    if context.host.run(LOOPBACK_COMMAND)?.succeeded() {
        Ok(())
    } else {
        Err(Verdict::fail("Loopback connectivity failed"))
    }
}
