// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors raised while probing a host.
///
/// A probe that ran and observed something unexpected is not an error; these
/// cover the cases where no observation could be made at all.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// The transport process (`sh`, `ssh`, `docker`) could not be started.
    #[error("failed to start `{command}`: {source}")]
    Spawn {
        /// The command that was being run.
        command: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The host could not be reached or refused the session.
    #[error("cannot reach {target}: {message}")]
    Connection {
        /// Description of the connection target.
        target: String,
        /// What the transport reported.
        message: String,
    },
    /// The command was killed by a signal before it exited.
    #[error("`{command}` was terminated by a signal")]
    Terminated {
        /// The command that was being run.
        command: String,
    },
    /// The command exited with a status the probe does not accept.
    #[error("`{command}` exited with status {exit_code}: {stderr}")]
    UnexpectedExit {
        /// The command that was run.
        command: String,
        /// Its exit status.
        exit_code: i32,
        /// Captured standard error.
        stderr: String,
    },
    /// The command succeeded but its output could not be understood.
    #[error("unexpected output from `{command}`: {reason}")]
    Parse {
        /// The command that was run.
        command: String,
        /// What could not be parsed.
        reason: String,
    },
    /// The host lacks the tooling a probe needs.
    #[error("unsupported host: {0}")]
    Unsupported(String),
}
