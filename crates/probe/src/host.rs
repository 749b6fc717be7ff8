// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::backend::{Backend, CommandOutput};
use crate::error::ProbeError;
use crate::file::File;
use crate::group::Group;
use crate::package::{Package, PackageManager};
use crate::service::{InitSystem, SYSTEMD_DETECT_COMMAND, Service};
use crate::user::{GETENT_NOT_FOUND, User};
use shell_words::quote;
use tracing::{debug, info};

/// A session on the host under verification.
///
/// Every probe issues fresh commands; two calls for the same resource are two
/// independent round trips.
#[derive(Debug)]
pub struct Host {
    backend: Box<dyn Backend>,
    sudo: bool,
}

impl Host {
    /// Wraps a backend without contacting the host.
    ///
    /// When `sudo` is set every command runs through `sudo -n /bin/sh -c`.
    #[must_use]
    pub fn new(backend: impl Backend + 'static, sudo: bool) -> Self {
        Self {
            backend: Box::new(backend),
            sudo,
        }
    }

    /// Opens a session and makes sure the host answers.
    ///
    /// If `sudo` is requested but the session already runs as root, commands
    /// are not wrapped, so hosts without `sudo` installed still work.
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot be reached, or if privileges were
    /// requested and `sudo` cannot be used without a password.
    pub fn connect(backend: impl Backend + 'static, sudo: bool) -> Result<Self, ProbeError> {
        let mut host: Self = Self::new(backend, false);
        let target: String = host.backend.target();
        info!("Connecting to {target}");

        let whoami: CommandOutput = host.run("id -u")?;
        if !whoami.succeeded() {
            return Err(ProbeError::Connection {
                target,
                message: format!("`id -u` failed: {}", whoami.stderr.trim()),
            });
        }

        if sudo && whoami.stdout.trim() != "0" {
            host.sudo = true;
            let probe: CommandOutput = host.run("true")?;
            if !probe.succeeded() {
                return Err(ProbeError::Connection {
                    target,
                    message: format!(
                        "sudo is not usable without a password: {}",
                        probe.stderr.trim()
                    ),
                });
            }
        }

        debug!("Connected to {target} (sudo: {})", host.sudo);
        Ok(host)
    }

    #[must_use]
    pub fn target(&self) -> String {
        self.backend.target()
    }

    #[must_use]
    pub const fn uses_sudo(&self) -> bool {
        self.sudo
    }

    /// Runs a shell command line and captures its result. A non-zero exit is
    /// a result, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the command could not be delivered to the host.
    pub fn run(&self, command: &str) -> Result<CommandOutput, ProbeError> {
        let command_line: String = if self.sudo {
            format!("sudo -n /bin/sh -c {}", quote(command))
        } else {
            command.to_string()
        };
        debug!("{}: {}", self.backend.target(), command_line);
        self.backend.execute(&command_line)
    }

    /// Runs a command that must exit with one of `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::UnexpectedExit`] for any other exit status.
    pub fn run_expect(&self, expected: &[i32], command: &str) -> Result<CommandOutput, ProbeError> {
        let output: CommandOutput = self.run(command)?;
        if expected.contains(&output.exit_code) {
            Ok(output)
        } else {
            Err(ProbeError::UnexpectedExit {
                command: command.to_string(),
                exit_code: output.exit_code,
                stderr: output.stderr.trim().to_string(),
            })
        }
    }

    /// Whether `binary` resolves on the host's `PATH`.
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot be reached.
    pub fn command_exists(&self, binary: &str) -> Result<bool, ProbeError> {
        Ok(self.run(&command_exists_command(binary))?.succeeded())
    }

    /// Detects which package database the host uses.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Unsupported`] if none of the known package
    /// managers is installed.
    pub fn package_manager(&self) -> Result<PackageManager, ProbeError> {
        for manager in PackageManager::DETECTION_ORDER {
            if self.command_exists(manager.binary())? {
                return Ok(manager);
            }
        }
        Err(ProbeError::Unsupported(String::from(
            "no dpkg, rpm, apk or pacman found",
        )))
    }

    /// # Errors
    ///
    /// Returns an error if the host cannot be reached or has no supported
    /// package manager.
    pub fn package(&self, name: &str) -> Result<Package, ProbeError> {
        let manager: PackageManager = self.package_manager()?;
        let output: CommandOutput = self.run(&manager.query_command(name))?;
        Ok(Package {
            name: name.to_string(),
            is_installed: manager.is_installed(&output),
        })
    }

    /// Uses systemd when it is the running init system, SysV scripts
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot be reached.
    pub fn service(&self, name: &str) -> Result<Service, ProbeError> {
        let init: InitSystem = if self.run(SYSTEMD_DETECT_COMMAND)?.succeeded() {
            InitSystem::Systemd
        } else {
            InitSystem::SysV
        };

        let is_enabled: bool = self.run(&init.enabled_command(name))?.succeeded();
        let is_running: bool = self.run(&init.running_command(name))?.succeeded();
        Ok(Service {
            name: name.to_string(),
            is_enabled,
            is_running,
        })
    }

    /// Reads metadata of `path`, following symlinks. A path that cannot be
    /// stat'ed reads as missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot be reached or `stat` prints
    /// something unexpected.
    pub fn file(&self, path: &str) -> Result<File, ProbeError> {
        let output: CommandOutput = self.run(&File::stat_command(path))?;
        if !output.succeeded() {
            return Ok(File::missing(path));
        }
        File::parse_stat(path, &output.stdout)
    }

    /// Reads the content of `path` as text, replacing invalid UTF-8.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::UnexpectedExit`] if the file cannot be read.
    pub fn file_content(&self, path: &str) -> Result<String, ProbeError> {
        Ok(self.run_expect(&[0], &File::content_command(path))?.stdout)
    }

    /// # Errors
    ///
    /// Returns an error if the host cannot be reached or the account
    /// databases print something unexpected.
    pub fn user(&self, name: &str) -> Result<User, ProbeError> {
        let passwd: CommandOutput =
            self.run_expect(&[0, GETENT_NOT_FOUND], &User::passwd_command(name))?;
        if passwd.exit_code == GETENT_NOT_FOUND {
            return Ok(User::missing(name));
        }

        let mut user: User = User::parse_passwd(name, &passwd.stdout)?;
        user.groups = self
            .run_expect(&[0], &User::groups_command(name))?
            .stdout
            .split_whitespace()
            .map(String::from)
            .collect();
        Ok(user)
    }

    /// # Errors
    ///
    /// Returns an error if the host cannot be reached or the group database
    /// prints something unexpected.
    pub fn group(&self, name: &str) -> Result<Group, ProbeError> {
        let output: CommandOutput =
            self.run_expect(&[0, GETENT_NOT_FOUND], &Group::getent_command(name))?;
        if output.exit_code == GETENT_NOT_FOUND {
            return Ok(Group::missing(name));
        }
        Group::parse_getent(name, &output.stdout)
    }
}

pub(crate) fn command_exists_command(binary: &str) -> String {
    format!("command -v {} >/dev/null 2>&1", quote(binary))
}
