// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::VarsError;
use crate::host_vars::HostVars;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Loads a YAML or JSON file holding a mapping of variable names to values.
///
/// JSON is accepted because it is valid YAML.
///
/// # Errors
///
/// Returns an error if the file cannot be read, does not parse, or its top
/// level is not a mapping.
pub fn load_vars_file(path: &Path) -> Result<HostVars, VarsError> {
    debug!("Loading vars file {}", path.display());
    let text = std::fs::read_to_string(path).map_err(|source| VarsError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    let document: Value = serde_yaml_ng::from_str(&text).map_err(|source| VarsError::Yaml {
        path: path.to_path_buf(),
        source,
    })?;

    HostVars::from_value(document, &path.display().to_string())
}
