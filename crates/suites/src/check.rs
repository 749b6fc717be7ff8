// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rolecheck_probe::{Host, ProbeError};
use rolecheck_vars::{HostVars, VarsError};
use serde::Serialize;

/// What a check needs: the live host and the variables it was provisioned
/// with.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    pub host: &'a Host,
    pub vars: &'a HostVars,
}

impl<'a> Context<'a> {
    #[must_use]
    pub const fn new(host: &'a Host, vars: &'a HostVars) -> Self {
        Self { host, vars }
    }
}

/// Why a check did not pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Observed state differs from the configured state.
    Fail(String),
    /// The configuration says this check does not apply.
    Skip(String),
    /// The state could not be observed or the configuration could not be read.
    Error(String),
}

impl Verdict {
    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self::Fail(message.into())
    }

    #[must_use]
    pub fn skip(reason: impl Into<String>) -> Self {
        Self::Skip(reason.into())
    }
}

impl From<ProbeError> for Verdict {
    fn from(err: ProbeError) -> Self {
        Self::Error(err.to_string())
    }
}

impl From<VarsError> for Verdict {
    fn from(err: VarsError) -> Self {
        Self::Error(err.to_string())
    }
}

/// Final result of one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    Passed,
    Failed { message: String },
    Skipped { reason: String },
    Errored { message: String },
}

impl Outcome {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Passed => "PASS",
            Self::Failed { .. } => "FAIL",
            Self::Skipped { .. } => "SKIP",
            Self::Errored { .. } => "ERROR",
        }
    }

    /// The failure message, skip reason, or error text.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Passed => None,
            Self::Failed { message } | Self::Errored { message } => Some(message),
            Self::Skipped { reason } => Some(reason),
        }
    }
}

impl From<Result<(), Verdict>> for Outcome {
    fn from(result: Result<(), Verdict>) -> Self {
        match result {
            Ok(()) => Self::Passed,
            Err(Verdict::Fail(message)) => Self::Failed { message },
            Err(Verdict::Skip(reason)) => Self::Skipped { reason },
            Err(Verdict::Error(message)) => Self::Errored { message },
        }
    }
}

type CheckFn = Box<dyn Fn(&Context<'_>) -> Result<(), Verdict>>;

/// One named, independent assertion about the host.
pub struct Check {
    name: String,
    ensures: String,
    run: CheckFn,
}

impl Check {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        ensures: impl Into<String>,
        run: impl Fn(&Context<'_>) -> Result<(), Verdict> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            ensures: ensures.into(),
            run: Box::new(run),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// One-line description of the state this check guarantees.
    #[must_use]
    pub fn ensures(&self) -> &str {
        &self.ensures
    }

    #[must_use]
    pub fn evaluate(&self, context: &Context<'_>) -> Outcome {
        Outcome::from((self.run)(context))
    }
}

impl std::fmt::Debug for Check {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Check")
            .field("name", &self.name)
            .field("ensures", &self.ensures)
            .finish_non_exhaustive()
    }
}

/// Collects every mismatch a check finds so one run reports all of them.
#[derive(Debug, Default)]
pub struct Failures {
    messages: Vec<String>,
}

impl Failures {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    /// Records `message` unless `holds`.
    pub fn ensure(&mut self, holds: bool, message: impl FnOnce() -> String) {
        if !holds {
            self.messages.push(message());
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Passes when nothing was recorded, fails with every message otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`Verdict::Fail`] joining all recorded messages.
    pub fn finish(self) -> Result<(), Verdict> {
        if self.messages.is_empty() {
            Ok(())
        } else {
            Err(Verdict::Fail(self.messages.join("; ")))
        }
    }
}
