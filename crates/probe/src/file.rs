// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::ProbeError;
use serde::Serialize;
use shell_words::quote;

/// Type of a filesystem entry as reported by `stat` after following links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FileKind {
    Regular,
    Directory,
    Other(String),
}

impl FileKind {
    fn from_stat(kind: &str) -> Self {
        match kind {
            "regular file" | "regular empty file" => Self::Regular,
            "directory" => Self::Directory,
            other => Self::Other(other.to_string()),
        }
    }

    /// The `%F` text `stat` prints for this kind.
    #[must_use]
    pub fn as_stat_str(&self) -> &str {
        match self {
            Self::Regular => "regular file",
            Self::Directory => "directory",
            Self::Other(kind) => kind,
        }
    }
}

/// Metadata of one path on the host. Everything but `exists` is `None` for a
/// missing path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct File {
    pub path: String,
    pub exists: bool,
    pub kind: Option<FileKind>,
    pub owner: Option<String>,
    pub group: Option<String>,
    /// Permission bits, e.g. `0o644`.
    pub mode: Option<u32>,
}

impl File {
    #[must_use]
    pub fn missing(path: &str) -> Self {
        Self {
            path: path.to_string(),
            exists: false,
            kind: None,
            owner: None,
            group: None,
            mode: None,
        }
    }

    #[must_use]
    pub fn is_file(&self) -> bool {
        self.kind == Some(FileKind::Regular)
    }

    #[must_use]
    pub fn is_directory(&self) -> bool {
        self.kind == Some(FileKind::Directory)
    }

    /// Command reading the metadata of `path`.
    #[must_use]
    pub fn stat_command(path: &str) -> String {
        format!("stat -L -c '%F|%U|%G|%a' -- {}", quote(path))
    }

    /// Command printing the content of `path`.
    #[must_use]
    pub fn content_command(path: &str) -> String {
        format!("cat -- {}", quote(path))
    }

    /// Renders this file the way [`Self::stat_command`] prints it.
    #[must_use]
    pub fn stat_line(&self) -> String {
        format!(
            "{}|{}|{}|{:o}",
            self.kind.as_ref().map_or("", FileKind::as_stat_str),
            self.owner.as_deref().unwrap_or_default(),
            self.group.as_deref().unwrap_or_default(),
            self.mode.unwrap_or_default()
        )
    }

    /// Parses one line printed by [`Self::stat_command`].
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Parse`] if the line does not have four fields or
    /// the mode is not octal.
    pub fn parse_stat(path: &str, line: &str) -> Result<Self, ProbeError> {
        let parse_error = |reason: String| ProbeError::Parse {
            command: Self::stat_command(path),
            reason,
        };

        let fields: Vec<&str> = line.trim_end_matches('\n').split('|').collect();
        let [kind, owner, group, mode] = fields.as_slice() else {
            return Err(parse_error(format!("expected 4 fields, got '{line}'")));
        };
        let mode: u32 = u32::from_str_radix(mode.trim(), 8)
            .map_err(|err| parse_error(format!("invalid mode '{mode}': {err}")))?;

        Ok(Self {
            path: path.to_string(),
            exists: true,
            kind: Some(FileKind::from_stat(kind)),
            owner: Some((*owner).to_string()),
            group: Some((*group).to_string()),
            mode: Some(mode),
        })
    }
}
