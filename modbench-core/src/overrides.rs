//! Parameter overrides
//!
//! `NAME=VALUE` pairs patched into a module's configuration after `init`
//! and before `get_iterations`. A bare `NAME` targets every module whose
//! configuration has that key; `module.NAME` targets a single module and
//! must name an existing key.

use crate::error::BenchError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::str::FromStr;
use thiserror::Error;

/// Malformed override argument
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverrideError {
    /// No `=` separator
    #[error("expected NAME=VALUE, got `{0}`")]
    MissingSeparator(String),

    /// Nothing before the `=`
    #[error("empty parameter name in `{0}`")]
    EmptyName(String),
}

/// A single parameter override
#[derive(Debug, Clone, PartialEq)]
pub struct Override {
    /// Module the override is scoped to (`None` = every module that knows the key)
    pub module: Option<String>,
    /// Configuration key
    pub key: String,
    /// Replacement value
    pub value: toml::Value,
}

impl Override {
    /// Build an override from already-split parts
    pub fn new(module: Option<&str>, key: impl Into<String>, value: toml::Value) -> Self {
        Self {
            module: module.map(str::to_string),
            key: key.into(),
            value,
        }
    }

    /// Whether the override is relevant to `module`
    pub fn targets(&self, module: &str) -> bool {
        self.module.as_deref().is_none_or(|m| m == module)
    }
}

impl FromStr for Override {
    type Err = OverrideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, raw) = s
            .split_once('=')
            .ok_or_else(|| OverrideError::MissingSeparator(s.to_string()))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(OverrideError::EmptyName(s.to_string()));
        }

        let (module, key) = match name.rsplit_once('.') {
            Some((module, key)) if !module.is_empty() && !key.is_empty() => (Some(module), key),
            _ => (None, name),
        };

        Ok(Override::new(module, key, parse_value(raw.trim())))
    }
}

/// Interpret `raw` as a TOML literal (`42`, `1.5`, `true`, `"text"`, `[1, 2]`),
/// falling back to a plain string.
pub fn parse_value(raw: &str) -> toml::Value {
    toml::from_str::<toml::Table>(&format!("value = {raw}"))
        .ok()
        .and_then(|mut table| table.remove("value"))
        .unwrap_or_else(|| toml::Value::String(raw.to_string()))
}

/// Ordered set of overrides; later entries win
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    entries: Vec<Override>,
}

impl Overrides {
    /// Empty override set
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an override
    pub fn push(&mut self, entry: Override) {
        self.entries.push(entry);
    }

    /// Number of overrides
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no overrides
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in application order
    pub fn iter(&self) -> impl Iterator<Item = &Override> {
        self.entries.iter()
    }

    /// Apply every override relevant to `module` to `config`.
    ///
    /// The configuration round-trips through its TOML representation, so a
    /// value of the wrong type surfaces as a `ConfigurationError`. Unscoped
    /// overrides whose key the configuration lacks leave it untouched, even
    /// when it has no table form at all.
    pub fn apply<C>(&self, module: &str, config: C) -> Result<C, BenchError>
    where
        C: Serialize + DeserializeOwned,
    {
        let relevant: Vec<&Override> = self.entries.iter().filter(|o| o.targets(module)).collect();
        if relevant.is_empty() {
            return Ok(config);
        }
        let scoped = relevant.iter().any(|o| o.module.is_some());

        let mut table = match toml::Value::try_from(&config) {
            Ok(toml::Value::Table(table)) => table,
            Ok(_) if !scoped => return Ok(config),
            Ok(_) => {
                return Err(BenchError::Configuration(
                    "configuration is not a table of parameters".to_string(),
                ));
            }
            Err(e) if !scoped => {
                tracing::debug!(module, "overrides skipped, configuration has no table form: {}", e);
                return Ok(config);
            }
            Err(e) => {
                return Err(BenchError::Configuration(format!(
                    "cannot serialize configuration: {e}"
                )));
            }
        };

        let mut applied = false;
        for entry in relevant {
            match table.get_mut(&entry.key) {
                Some(slot) => {
                    tracing::debug!(module, key = %entry.key, value = %entry.value, "override applied");
                    *slot = entry.value.clone();
                    applied = true;
                }
                None if entry.module.is_some() => {
                    return Err(BenchError::Configuration(format!(
                        "unknown parameter `{}`",
                        entry.key
                    )));
                }
                None => {}
            }
        }
        if !applied {
            return Ok(config);
        }

        toml::Value::Table(table)
            .try_into::<C>()
            .map_err(|e| BenchError::Configuration(format!("invalid parameter override: {e}")))
    }
}

impl FromIterator<Override> for Overrides {
    fn from_iter<I: IntoIterator<Item = Override>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Extend<Override> for Overrides {
    fn extend<I: IntoIterator<Item = Override>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}
