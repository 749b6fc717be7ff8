// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::path::PathBuf;

/// Errors raised while resolving hosts or reading their variables.
#[derive(Debug, thiserror::Error)]
pub enum VarsError {
    /// An external command could not be started.
    #[error("failed to run `{command}`: {source}")]
    CommandSpawn {
        /// The command line that was attempted.
        command: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// An external command ran but reported failure.
    #[error("`{command}` exited with status {status}: {stderr}")]
    CommandFailed {
        /// The command line that failed.
        command: String,
        /// The exit status, or -1 if the process was killed by a signal.
        status: i32,
        /// Captured standard error.
        stderr: String,
    },
    /// A vars file could not be read.
    #[error("failed to read vars file {}: {source}", path.display())]
    ReadFile {
        /// The file that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// JSON output could not be parsed.
    #[error("invalid JSON from {origin}: {source}")]
    Json {
        /// Where the JSON came from.
        origin: String,
        /// The parse error.
        #[source]
        source: serde_json::Error,
    },
    /// A vars file is not valid YAML.
    #[error("invalid YAML in {}: {source}", path.display())]
    Yaml {
        /// The offending file.
        path: PathBuf,
        /// The parse error.
        #[source]
        source: serde_yaml_ng::Error,
    },
    /// A document that must be a mapping is something else.
    #[error("{origin} is not a mapping of variable names to values")]
    NotAMapping {
        /// Where the document came from.
        origin: String,
    },
    /// The requested host is not part of the inventory.
    #[error("host '{0}' not found in inventory")]
    HostNotFound(String),
    /// The inventory resolved to no hosts at all.
    #[error("inventory defines no hosts")]
    NoHosts,
    /// A required variable is not defined for the host.
    #[error("variable '{0}' is not defined")]
    Missing(String),
    /// A variable is defined but has the wrong shape.
    #[error("variable '{name}' is invalid: {reason}")]
    Invalid {
        /// The variable name.
        name: String,
        /// What was wrong with it.
        reason: String,
    },
    /// Ansible could not render the variables of a host.
    #[error("failed to render variables of '{host}': {message}")]
    Render {
        /// The host whose variables were requested.
        host: String,
        /// What Ansible reported.
        message: String,
    },
}
