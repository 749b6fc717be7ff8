// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::backend::CommandOutput;
use serde::Serialize;
use shell_words::quote;

/// Package database queried for install status, in detection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PackageManager {
    Dpkg,
    Rpm,
    Apk,
    Pacman,
}

impl PackageManager {
    pub const DETECTION_ORDER: [Self; 4] = [Self::Dpkg, Self::Rpm, Self::Apk, Self::Pacman];

    /// Binary whose presence identifies this package manager.
    #[must_use]
    pub const fn binary(self) -> &'static str {
        match self {
            Self::Dpkg => "dpkg-query",
            Self::Rpm => "rpm",
            Self::Apk => "apk",
            Self::Pacman => "pacman",
        }
    }

    /// Command that reports whether `name` is installed.
    #[must_use]
    pub fn query_command(self, name: &str) -> String {
        let name = quote(name);
        match self {
            Self::Dpkg => format!("dpkg-query -f '${{Status}}' -W {name}"),
            Self::Rpm => format!("rpm -q --quiet {name}"),
            Self::Apk => format!("apk -e info {name}"),
            Self::Pacman => format!("pacman -Q {name}"),
        }
    }

    /// Interprets the output of [`Self::query_command`].
    #[must_use]
    pub fn is_installed(self, output: &CommandOutput) -> bool {
        match self {
            Self::Dpkg => output.succeeded() && dpkg_status_installed(&output.stdout),
            Self::Rpm | Self::Apk | Self::Pacman => output.succeeded(),
        }
    }
}

/// Install status of one package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Package {
    pub name: String,
    pub is_installed: bool,
}

/// `dpkg-query` prints `<want> <error> <status>`, e.g. `install ok installed`.
/// Removed packages with leftover config report `config-files` instead.
fn dpkg_status_installed(stdout: &str) -> bool {
    stdout
        .lines()
        .last()
        .and_then(|line| line.split_whitespace().nth(2))
        .is_some_and(|status| status == "installed")
}
