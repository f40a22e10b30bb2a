//! Configuration loading from modbench.toml
//!
//! Harness defaults can be kept in a `modbench.toml` file in the project root.
//! The file is discovered by walking up from the current directory; every
//! field is optional and command-line flags take precedence.

use anyhow::Context;
use modbench_core::{FixturePolicy, Override, Overrides};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// File name looked up during discovery
pub const CONFIG_FILE: &str = "modbench.toml";

/// modbench configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ModbenchConfig {
    /// Runner configuration
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
    /// Parameter overrides (`key = value` or `"module.key" = value`)
    #[serde(default)]
    pub params: toml::Table,
}

/// Runner configuration for suite execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Global iteration multiplier
    #[serde(default = "default_multiplier")]
    pub multiplier: u32,
    /// Fixture policy: "shared" or "fresh"
    #[serde(default)]
    pub fixture: FixturePolicy,
    /// Leading iterations reported as a warmup phase
    #[serde(default)]
    pub warmup_iterations: u64,
    /// Per-module wall-clock budget (e.g., "60s", "5m")
    #[serde(default)]
    pub timeout: Option<String>,
    /// Core to pin the harness thread to
    #[serde(default)]
    pub pin_cpu: Option<usize>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            multiplier: default_multiplier(),
            fixture: FixturePolicy::default(),
            warmup_iterations: 0,
            timeout: None,
            pin_cpu: None,
        }
    }
}

fn default_multiplier() -> u32 {
    1
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format: "human", "json", "csv"
    #[serde(default = "default_format")]
    pub format: String,
    /// Write the report to this file instead of stdout
    #[serde(default)]
    pub path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            path: None,
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}

impl ModbenchConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self =
            toml::from_str(&content).with_context(|| format!("invalid {}", path.display()))?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join(CONFIG_FILE);
            if config_path.exists() {
                return match Self::load(&config_path) {
                    Ok(config) => {
                        tracing::debug!(path = %config_path.display(), "loaded configuration");
                        Some(config)
                    }
                    Err(e) => {
                        tracing::warn!("ignoring configuration: {:#}", e);
                        None
                    }
                };
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Configured timeout, if any
    pub fn timeout(&self) -> anyhow::Result<Option<Duration>> {
        self.runner
            .timeout
            .as_deref()
            .map(|s| Self::parse_duration(s).map(Duration::from_nanos))
            .transpose()
    }

    /// `[params]` entries as overrides, in table order.
    ///
    /// A dotted key (`"fibonacci.n" = 10`) is scoped to one module.
    pub fn overrides(&self) -> Overrides {
        self.params
            .iter()
            .map(|(name, value)| match name.rsplit_once('.') {
                Some((module, key)) if !module.is_empty() && !key.is_empty() => {
                    Override::new(Some(module), key, value.clone())
                }
                _ => Override::new(None, name.as_str(), value.clone()),
            })
            .collect()
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# modbench Configuration

[runner]
# Global factor applied to every module's iteration count
multiplier = 1
# Fixture handling between iterations: "shared" or "fresh"
fixture = "shared"
# Leading iterations reported separately as a warmup phase
warmup_iterations = 0
# Per-module wall-clock budget, checked between iterations (uncomment to enable)
# timeout = "60s"
# Pin the harness thread to a core (uncomment to enable)
# pin_cpu = 0

[output]
# Default output format: human, json, csv
format = "human"
# Write the report to a file instead of stdout (uncomment to enable)
# path = "target/modbench/report.json"

[params]
# Parameter overrides applied after init
# n = 500
# "fibonacci.iterations" = 10
"#
        .to_string()
    }

    /// Parse duration string (e.g., "3s", "500ms", "2m") to nanoseconds
    pub fn parse_duration(s: &str) -> anyhow::Result<u64> {
        let s = s.trim();
        if s.is_empty() {
            return Err(anyhow::anyhow!("Empty duration string"));
        }

        // Find where the number ends and unit begins
        let (num_part, unit_part) = s
            .char_indices()
            .find(|(_, c)| c.is_alphabetic())
            .map(|(i, _)| s.split_at(i))
            .unwrap_or((s, "s"));

        let value: f64 = num_part
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid duration number: {}", num_part))?;
        if value < 0.0 {
            return Err(anyhow::anyhow!("Negative duration: {}", s));
        }

        let multiplier: u64 = match unit_part.to_lowercase().as_str() {
            "ns" => 1,
            "us" | "µs" => 1_000,
            "ms" => 1_000_000,
            "s" | "" => 1_000_000_000,
            "m" | "min" => 60_000_000_000,
            _ => return Err(anyhow::anyhow!("Unknown duration unit: {}", unit_part)),
        };

        Ok((value * multiplier as f64) as u64)
    }
}
