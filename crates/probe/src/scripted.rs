// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::backend::{Backend, CommandOutput};
use crate::error::ProbeError;
use crate::file::File;
use crate::group::Group;
use crate::host::command_exists_command;
use crate::package::PackageManager;
use crate::service::{InitSystem, SYSTEMD_DETECT_COMMAND};
use crate::user::{GETENT_NOT_FOUND, User};
use std::collections::HashMap;
use std::sync::Mutex;

/// Exit status for commands the script has no answer for, as a shell
/// reports an unknown command.
const UNSCRIPTED_EXIT: i32 = 127;

/// A simulated host answering commands from a fixed table.
///
/// Commands without a scripted answer exit with status 127, so anything not
/// set up reads as absent. The `with_*` builders script the exact commands
/// the probes issue.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    responses: HashMap<String, CommandOutput>,
    unreachable: bool,
    executed: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A host every command fails to reach.
    #[must_use]
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn respond(mut self, command: impl Into<String>, output: CommandOutput) -> Self {
        self.responses.insert(command.into(), output);
        self
    }

    #[must_use]
    pub fn succeed(self, command: impl Into<String>, stdout: &str) -> Self {
        self.respond(command, CommandOutput::new(0, stdout, ""))
    }

    #[must_use]
    pub fn fail(self, command: impl Into<String>, exit_code: i32, stderr: &str) -> Self {
        self.respond(command, CommandOutput::new(exit_code, "", stderr))
    }

    /// Every command line received so far, in order.
    #[must_use]
    pub fn executed(&self) -> Vec<String> {
        self.executed
            .lock()
            .map(|executed| executed.clone())
            .unwrap_or_default()
    }

    /// Makes `binary` resolvable on the PATH.
    #[must_use]
    pub fn with_command(self, binary: &str) -> Self {
        self.succeed(command_exists_command(binary), "")
    }

    /// Installs `name` in the given package database, which becomes the
    /// detected package manager unless one earlier in detection order is
    /// also scripted.
    #[must_use]
    pub fn with_package(self, manager: PackageManager, name: &str) -> Self {
        let stdout: &str = match manager {
            PackageManager::Dpkg => "install ok installed",
            PackageManager::Rpm | PackageManager::Apk | PackageManager::Pacman => "",
        };
        self.with_command(manager.binary())
            .succeed(manager.query_command(name), stdout)
    }

    /// Adds a systemd unit with the given state and makes systemd the
    /// running init system.
    #[must_use]
    pub fn with_systemd_service(self, name: &str, enabled: bool, running: bool) -> Self {
        let enabled_output = if enabled {
            CommandOutput::new(0, "enabled\n", "")
        } else {
            CommandOutput::new(1, "disabled\n", "")
        };
        let running_output = if running {
            CommandOutput::new(0, "active\n", "")
        } else {
            CommandOutput::new(3, "inactive\n", "")
        };
        self.succeed(SYSTEMD_DETECT_COMMAND, "")
            .respond(InitSystem::Systemd.enabled_command(name), enabled_output)
            .respond(InitSystem::Systemd.running_command(name), running_output)
    }

    /// Adds a path with the given metadata and, for readable files, content.
    #[must_use]
    pub fn with_file(self, file: &File, content: Option<&str>) -> Self {
        let scripted = self.succeed(File::stat_command(&file.path), &format!("{}\n", file.stat_line()));
        match content {
            Some(content) => scripted.succeed(File::content_command(&file.path), content),
            None => scripted,
        }
    }

    /// Adds an account. `user.groups` becomes the `id -Gn` answer.
    #[must_use]
    pub fn with_user(self, user: &User) -> Self {
        self.succeed(User::passwd_command(&user.name), &format!("{}\n", user.passwd_line()))
            .succeed(User::groups_command(&user.name), &format!("{}\n", user.groups.join(" ")))
    }

    /// Declares that no account called `name` exists.
    #[must_use]
    pub fn without_user(self, name: &str) -> Self {
        self.fail(User::passwd_command(name), GETENT_NOT_FOUND, "")
    }

    #[must_use]
    pub fn with_group(self, group: &Group) -> Self {
        self.succeed(Group::getent_command(&group.name), &format!("{}\n", group.group_line()))
    }

    /// Declares that no group called `name` exists.
    #[must_use]
    pub fn without_group(self, name: &str) -> Self {
        self.fail(Group::getent_command(name), GETENT_NOT_FOUND, "")
    }
}

impl Backend for ScriptedBackend {
    fn execute(&self, command: &str) -> Result<CommandOutput, ProbeError> {
        if let Ok(mut executed) = self.executed.lock() {
            executed.push(command.to_string());
        }
        if self.unreachable {
            return Err(ProbeError::Connection {
                target: self.target(),
                message: String::from("connection refused"),
            });
        }
        Ok(self.responses.get(command).cloned().unwrap_or_else(|| {
            CommandOutput::new(UNSCRIPTED_EXIT, "", format!("sh: {command}: not found"))
        }))
    }

    fn target(&self) -> String {
        String::from("scripted")
    }
}
