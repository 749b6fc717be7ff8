// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Runs the Ansible command line tools and reads what they print.
//!
//! `ansible-inventory --list` reports variables exactly as written, so a
//! value such as `"{{ default_policy }}"` comes back untouched. Asking
//! Ansible itself to print `hostvars[inventory_hostname]` through the `debug`
//! module yields the variables with every template rendered, the way a
//! playbook run would see them.

use crate::error::VarsError;
use crate::host_vars::HostVars;
use duct::{Expression, cmd};
use serde_json::Value;
use std::path::Path;
use std::process::Output;
use tracing::{debug, info};

/// The expression the `debug` module prints; also the key of its result.
const HOSTVARS_EXPRESSION: &str = "hostvars[inventory_hostname]";

/// Runs `expression` to completion, capturing its output whatever the exit
/// status.
///
/// # Errors
///
/// Returns [`VarsError::CommandSpawn`] if the command cannot be started.
fn spawn(expression: &Expression, command_line: &str) -> Result<Output, VarsError> {
    debug!("running command: {:?}", expression);
    expression
        .stdout_capture()
        .stderr_capture()
        .unchecked()
        .run()
        .map_err(|source| VarsError::CommandSpawn {
            command: command_line.to_string(),
            source,
        })
}

fn command_failed(command_line: &str, output: &Output) -> VarsError {
    VarsError::CommandFailed {
        command: command_line.to_string(),
        status: output.status.code().unwrap_or(-1),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    }
}

/// Runs `expression` to completion, capturing its output.
///
/// # Errors
///
/// Returns [`VarsError::CommandSpawn`] if the command cannot be started and
/// [`VarsError::CommandFailed`] if it exits non-zero.
pub fn capture(expression: &Expression, command_line: &str) -> Result<Output, VarsError> {
    let output: Output = spawn(expression, command_line)?;
    if !output.status.success() {
        return Err(command_failed(command_line, &output));
    }
    Ok(output)
}

/// Resolves the rendered variables of `host`.
///
/// Runs `ansible <host> -i <inventory> -m debug -a
/// 'var=hostvars[inventory_hostname]'` with the `json` stdout callback. The
/// `debug` module runs on the controller, so the host itself is not
/// contacted.
///
/// # Errors
///
/// Returns an error if `ansible` cannot be started, exits non-zero, or its
/// output carries no variables for `host`.
pub fn render_host_vars(inventory: &Path, host: &str) -> Result<HostVars, VarsError> {
    info!("Rendering variables of {host}");
    let expression = cmd!(
        "ansible",
        host,
        "-i",
        inventory,
        "-m",
        "debug",
        "-a",
        format!("var={HOSTVARS_EXPRESSION}")
    )
    .env("ANSIBLE_STDOUT_CALLBACK", "json")
    .env("ANSIBLE_LOAD_CALLBACK_PLUGINS", "1");
    let command_line = format!(
        "ansible {host} -i {} -m debug -a 'var={HOSTVARS_EXPRESSION}'",
        inventory.display()
    );

    // A host whose templates fail still gets a JSON report, with a non-zero
    // exit status; its message says more than stderr does.
    let output: Output = spawn(&expression, &command_line)?;
    match parse_debug_output(&String::from_utf8_lossy(&output.stdout), host) {
        Err(VarsError::Json { .. }) if !output.status.success() => {
            Err(command_failed(&command_line, &output))
        }
        result => result,
    }
}

/// Extracts the variables of `host` from the `json` callback's report of a
/// `debug var=hostvars[inventory_hostname]` run.
///
/// # Errors
///
/// Returns [`VarsError::Json`] if `output` is not JSON and
/// [`VarsError::Render`] if the report has no variables for `host`, for
/// example because templating failed.
pub fn parse_debug_output(output: &str, host: &str) -> Result<HostVars, VarsError> {
    let origin: String = format!("ansible {host} -m debug");
    let document: Value = serde_json::from_str(output).map_err(|source| VarsError::Json {
        origin: origin.clone(),
        source,
    })?;

    let result: &Value = document
        .get("plays")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|play| play.get("tasks").and_then(Value::as_array))
        .flatten()
        .find_map(|task| task.get("hosts").and_then(|hosts| hosts.get(host)))
        .ok_or_else(|| VarsError::Render {
            host: host.to_string(),
            message: String::from("no result reported for the host"),
        })?;

    if let Some(vars) = result.get(HOSTVARS_EXPRESSION) {
        return HostVars::from_value(vars.clone(), &origin);
    }

    let message: &str = result
        .get("msg")
        .and_then(Value::as_str)
        .unwrap_or("the debug task returned no variables");
    Err(VarsError::Render {
        host: host.to_string(),
        message: message.to_string(),
    })
}
