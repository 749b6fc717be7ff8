// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::ProbeError;
use duct::cmd;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::trace;

/// `ssh` reserves this status for its own failures.
const SSH_CONNECTION_FAILURE: i32 = 255;

/// Captured result of one command on the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    #[must_use]
    pub fn new(exit_code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}

/// Transport that runs a shell command line on the target host.
///
/// Implementations hand `command` to a POSIX shell on the target and must
/// report transport failures as [`ProbeError::Connection`], keeping them
/// apart from the command's own non-zero exits.
pub trait Backend: std::fmt::Debug {
    /// Runs `command` through `/bin/sh -c` on the target.
    ///
    /// # Errors
    ///
    /// Returns an error if the command could not be delivered to the host.
    fn execute(&self, command: &str) -> Result<CommandOutput, ProbeError>;

    /// Human-readable description of the target, used in logs and errors.
    fn target(&self) -> String;
}

impl<T: Backend + ?Sized> Backend for Arc<T> {
    fn execute(&self, command: &str) -> Result<CommandOutput, ProbeError> {
        (**self).execute(command)
    }

    fn target(&self) -> String {
        (**self).target()
    }
}

impl<T: Backend + ?Sized> Backend for Box<T> {
    fn execute(&self, command: &str) -> Result<CommandOutput, ProbeError> {
        (**self).execute(command)
    }

    fn target(&self) -> String {
        (**self).target()
    }
}

/// Runs commands on the machine rolecheck itself runs on.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalBackend;

impl Backend for LocalBackend {
    fn execute(&self, command: &str) -> Result<CommandOutput, ProbeError> {
        capture(&cmd!("/bin/sh", "-c", command), command)
    }

    fn target(&self) -> String {
        String::from("local")
    }
}

/// How to reach a host over SSH.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SshTarget {
    pub host: String,
    pub user: Option<String>,
    pub port: Option<u16>,
    pub identity_file: Option<PathBuf>,
}

/// Runs commands through the system `ssh` client in batch mode.
#[derive(Debug, Clone)]
pub struct SshBackend {
    target: SshTarget,
}

impl SshBackend {
    #[must_use]
    pub const fn new(target: SshTarget) -> Self {
        Self { target }
    }

    /// Arguments passed to `ssh` ahead of the remote command.
    #[must_use]
    pub fn ssh_args(&self) -> Vec<String> {
        let mut args: Vec<String> = vec![String::from("-o"), String::from("BatchMode=yes")];
        if let Some(port) = self.target.port {
            args.push(String::from("-p"));
            args.push(port.to_string());
        }
        if let Some(identity) = &self.target.identity_file {
            args.push(String::from("-i"));
            args.push(identity.display().to_string());
        }
        if let Some(user) = &self.target.user {
            args.push(String::from("-l"));
            args.push(user.clone());
        }
        args.push(self.target.host.clone());
        args.push(String::from("--"));
        args
    }
}

impl Backend for SshBackend {
    fn execute(&self, command: &str) -> Result<CommandOutput, ProbeError> {
        let mut args: Vec<String> = self.ssh_args();
        args.push(command.to_string());

        let output = capture(&duct::cmd("ssh", args), command)?;
        if output.exit_code == SSH_CONNECTION_FAILURE {
            return Err(ProbeError::Connection {
                target: self.target(),
                message: output.stderr.trim().to_string(),
            });
        }
        Ok(output)
    }

    fn target(&self) -> String {
        match &self.target.user {
            Some(user) => format!("ssh://{user}@{}", self.target.host),
            None => format!("ssh://{}", self.target.host),
        }
    }
}

/// A running container reached with `<engine> exec`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerTarget {
    /// Engine binary, `docker` or `podman`.
    pub engine: String,
    pub container: String,
    pub user: Option<String>,
}

/// Runs commands inside a container via `docker exec` or `podman exec`.
#[derive(Debug, Clone)]
pub struct ContainerBackend {
    target: ContainerTarget,
}

impl ContainerBackend {
    #[must_use]
    pub const fn new(target: ContainerTarget) -> Self {
        Self { target }
    }

    #[must_use]
    pub fn exec_args(&self, command: &str) -> Vec<String> {
        let mut args: Vec<String> = vec![String::from("exec")];
        if let Some(user) = &self.target.user {
            args.push(String::from("--user"));
            args.push(user.clone());
        }
        args.push(self.target.container.clone());
        args.extend([String::from("/bin/sh"), String::from("-c")]);
        args.push(command.to_string());
        args
    }
}

impl Backend for ContainerBackend {
    fn execute(&self, command: &str) -> Result<CommandOutput, ProbeError> {
        let output = capture(
            &duct::cmd(&self.target.engine, self.exec_args(command)),
            command,
        )?;
        if is_engine_error(&output) {
            return Err(ProbeError::Connection {
                target: self.target(),
                message: output.stderr.trim().to_string(),
            });
        }
        Ok(output)
    }

    fn target(&self) -> String {
        format!("{}://{}", self.target.engine, self.target.container)
    }
}

/// Whether a failed `exec` was reported by the engine rather than by the
/// command inside the container.
#[must_use]
pub fn is_engine_error(output: &CommandOutput) -> bool {
    if output.succeeded() {
        return false;
    }
    let stderr: String = output.stderr.trim_start().to_ascii_lowercase();
    stderr.starts_with("error response from daemon")
        || stderr.starts_with("error: no container")
        || stderr.starts_with("error: no such container")
        || stderr.starts_with("cannot connect to the docker daemon")
}

/// Where a [`Host`](crate::Host) should run its commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Connection {
    Local,
    Ssh(SshTarget),
    Container(ContainerTarget),
}

impl Connection {
    #[must_use]
    pub fn into_backend(self) -> Box<dyn Backend> {
        match self {
            Self::Local => Box::new(LocalBackend),
            Self::Ssh(target) => Box::new(SshBackend::new(target)),
            Self::Container(target) => Box::new(ContainerBackend::new(target)),
        }
    }
}

fn capture(expression: &duct::Expression, command: &str) -> Result<CommandOutput, ProbeError> {
    trace!("running command: {:?}", expression);
    let output = expression
        .stdout_capture()
        .stderr_capture()
        .unchecked()
        .run()
        .map_err(|source| ProbeError::Spawn {
            command: command.to_string(),
            source,
        })?;

    let exit_code: i32 = output.status.code().ok_or_else(|| ProbeError::Terminated {
        command: command.to_string(),
    })?;

    Ok(CommandOutput {
        exit_code,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}
