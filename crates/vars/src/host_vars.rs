// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::VarsError;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Delimiters of Jinja expressions and statements.
const TEMPLATE_MARKERS: [&str; 2] = ["{{", "{%"];

/// The full variable mapping of one host.
///
/// Values keep the JSON shape Ansible reports them in. The typed accessors
/// treat an explicit `null` the same as an undefined variable, and reject
/// values that still carry Jinja delimiters: those were never rendered, so
/// comparing them against the host would report nonsense.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostVars {
    values: Map<String, Value>,
}

impl HostVars {
    /// Wraps an existing mapping.
    #[must_use]
    pub const fn new(values: Map<String, Value>) -> Self {
        Self { values }
    }

    /// Builds host variables from a JSON value, which must be an object.
    ///
    /// # Errors
    ///
    /// Returns [`VarsError::NotAMapping`] if `value` is not a JSON object.
    pub fn from_value(value: Value, origin: &str) -> Result<Self, VarsError> {
        match value {
            Value::Object(values) => Ok(Self { values }),
            Value::Null => Ok(Self::default()),
            _ => Err(VarsError::NotAMapping {
                origin: origin.to_string(),
            }),
        }
    }

    /// Returns the raw value of a variable, skipping `null`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name).filter(|value| !value.is_null())
    }

    /// Like [`Self::get`], but refuses values with unrendered templates.
    fn lookup(&self, name: &str) -> Result<Option<&Value>, VarsError> {
        match self.get(name) {
            Some(value) if is_unrendered(value) => Err(VarsError::Invalid {
                name: name.to_string(),
                reason: format!("contains an unrendered template: {value}"),
            }),
            found => Ok(found),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Overlays `other` on top of these variables. Top-level keys in `other`
    /// replace ours wholesale; nested mappings are not merged.
    pub fn overlay(&mut self, other: Self) {
        self.values.extend(other.values);
    }

    /// Reads a boolean flag using Ansible's truthiness rules for strings.
    ///
    /// # Errors
    ///
    /// Returns [`VarsError::Invalid`] for values that are neither booleans,
    /// integers nor recognised boolean strings.
    pub fn flag(&self, name: &str) -> Result<Option<bool>, VarsError> {
        let Some(value) = self.lookup(name)? else {
            return Ok(None);
        };
        let parsed: Option<bool> = match value {
            Value::Bool(flag) => Some(*flag),
            Value::Number(number) => number.as_i64().map(|n| n != 0),
            Value::String(text) => parse_bool_string(text),
            _ => None,
        };
        parsed.map(Some).ok_or_else(|| VarsError::Invalid {
            name: name.to_string(),
            reason: format!("expected a boolean, got {value}"),
        })
    }

    /// Reads an optional scalar as text.
    ///
    /// Numbers are rendered the way they appear in JSON so that a policy or
    /// state written without quotes in YAML still reads back.
    ///
    /// # Errors
    ///
    /// Returns [`VarsError::Invalid`] if the value is a list or mapping.
    pub fn string(&self, name: &str) -> Result<Option<String>, VarsError> {
        match self.lookup(name)? {
            None => Ok(None),
            Some(Value::String(text)) => Ok(Some(text.clone())),
            Some(Value::Number(number)) => Ok(Some(number.to_string())),
            Some(Value::Bool(flag)) => Ok(Some(flag.to_string())),
            Some(other) => Err(VarsError::Invalid {
                name: name.to_string(),
                reason: format!("expected a string, got {other}"),
            }),
        }
    }

    /// Reads a scalar that must be defined.
    ///
    /// # Errors
    ///
    /// Returns [`VarsError::Missing`] if the variable is undefined or null,
    /// and [`VarsError::Invalid`] if it is not a scalar.
    pub fn require_string(&self, name: &str) -> Result<String, VarsError> {
        self.string(name)?
            .ok_or_else(|| VarsError::Missing(name.to_string()))
    }

    /// Reads a list of strings. An undefined variable reads as an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`VarsError::Invalid`] if the value is not a list of strings.
    pub fn string_list(&self, name: &str) -> Result<Vec<String>, VarsError> {
        Ok(self.deserialize::<Vec<String>>(name)?.unwrap_or_default())
    }

    /// Deserializes a variable into a typed value.
    ///
    /// # Errors
    ///
    /// Returns [`VarsError::Invalid`] if the value does not match `T` or
    /// holds an unrendered template.
    pub fn deserialize<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, VarsError> {
        self.lookup(name)?
            .map(|value| {
                serde_json::from_value(value.clone()).map_err(|err| VarsError::Invalid {
                    name: name.to_string(),
                    reason: err.to_string(),
                })
            })
            .transpose()
    }
}

fn parse_bool_string(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "t" | "on" | "1" => Some(true),
        "no" | "n" | "false" | "f" | "off" | "0" | "" => Some(false),
        _ => None,
    }
}

fn is_unrendered(value: &Value) -> bool {
    match value {
        Value::String(text) => TEMPLATE_MARKERS.iter().any(|marker| text.contains(marker)),
        Value::Array(items) => items.iter().any(is_unrendered),
        Value::Object(entries) => entries.values().any(is_unrendered),
        _ => false,
    }
}
