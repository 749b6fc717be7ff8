// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::Serialize;
use shell_words::quote;

/// Succeeds only when systemd is the running init system.
pub const SYSTEMD_DETECT_COMMAND: &str = "test -d /run/systemd/system";

/// Enablement and run state of one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Service {
    pub name: String,
    pub is_enabled: bool,
    pub is_running: bool,
}

/// How the host's init system is queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InitSystem {
    Systemd,
    SysV,
}

impl InitSystem {
    pub(crate) fn enabled_command(self, name: &str) -> String {
        match self {
            Self::Systemd => format!("systemctl is-enabled {}", quote(name)),
            // Start links are named S<priority><service>.
            Self::SysV => format!("ls /etc/rc?.d/S??{} >/dev/null 2>&1", quote(name)),
        }
    }

    pub(crate) fn running_command(self, name: &str) -> String {
        match self {
            Self::Systemd => format!("systemctl is-active {}", quote(name)),
            Self::SysV => format!("service {} status", quote(name)),
        }
    }
}
