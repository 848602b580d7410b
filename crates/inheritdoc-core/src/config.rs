//! Layered configuration with precedence tracking.
//!
//! Each value remembers where it came from. Precedence (highest first):
//!
//! 1. CLI flags
//! 2. Environment variables (`INHERITDOC_ORDER`, `INHERITDOC_FORMAT`)
//! 3. Built-in defaults

use std::fmt;
use std::str::FromStr;

use crate::error::DocError;
use crate::resolve::GroupOrder;

/// Environment variable selecting the group order.
pub const ENV_ORDER: &str = "INHERITDOC_ORDER";

/// Environment variable selecting the output format.
pub const ENV_FORMAT: &str = "INHERITDOC_FORMAT";

// ============================================================================
// Configuration Sources
// ============================================================================

/// Configuration value source (for precedence tracking).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigSource {
    /// Built-in default value.
    Default = 0,
    /// From environment variable.
    EnvVar = 1,
    /// From CLI flag (highest precedence).
    CliFlag = 2,
}

/// A configuration value with its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValue<T> {
    /// The actual value.
    pub value: T,
    /// Where the value came from.
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    /// Create a new config value with the given source.
    pub fn new(value: T, source: ConfigSource) -> Self {
        ConfigValue { value, source }
    }

    /// Merge with another value, preferring higher precedence.
    pub fn merge(self, other: Self) -> Self {
        if other.source >= self.source {
            other
        } else {
            self
        }
    }
}

// ============================================================================
// Output Format
// ============================================================================

/// How responses are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Pretty-printed JSON responses.
    #[default]
    Json,
    /// "Methods inherited from ..." lines.
    Text,
}

impl OutputFormat {
    /// Stable name used in config and flags.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Text => "text",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(OutputFormat::Json),
            "text" => Ok(OutputFormat::Text),
            other => Err(format!(
                "invalid output format '{}', expected one of: json, text",
                other
            )),
        }
    }
}

// ============================================================================
// Configuration Resolution
// ============================================================================

/// CLI configuration overrides.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    /// --order flag.
    pub order: Option<GroupOrder>,
    /// --format flag.
    pub format: Option<OutputFormat>,
}

/// Resolved configuration with precedence information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Group order for inherited-method pages.
    pub order: ConfigValue<GroupOrder>,
    /// Output format.
    pub format: ConfigValue<OutputFormat>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        ResolvedConfig {
            order: ConfigValue::new(GroupOrder::default(), ConfigSource::Default),
            format: ConfigValue::new(OutputFormat::default(), ConfigSource::Default),
        }
    }
}

impl ResolvedConfig {
    /// Resolve configuration from the process environment and CLI flags.
    pub fn resolve(cli_overrides: &CliOverrides) -> Result<Self, DocError> {
        Self::resolve_with(cli_overrides, |key| std::env::var(key).ok())
    }

    /// Resolve configuration using `env` to look up environment variables.
    ///
    /// An environment value that does not parse is an invalid-arguments error
    /// naming the variable.
    pub fn resolve_with<F>(cli_overrides: &CliOverrides, env: F) -> Result<Self, DocError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ResolvedConfig::default();
        config.apply_env_vars(env)?;
        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    fn apply_env_vars<F>(&mut self, env: F) -> Result<(), DocError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = env(ENV_ORDER) {
            let order = raw.parse::<GroupOrder>().map_err(|msg| {
                DocError::invalid_args_with_details(msg, serde_json::json!({ "env": ENV_ORDER }))
            })?;
            self.order = self
                .order
                .clone()
                .merge(ConfigValue::new(order, ConfigSource::EnvVar));
        }

        if let Some(raw) = env(ENV_FORMAT) {
            let format = raw.parse::<OutputFormat>().map_err(|msg| {
                DocError::invalid_args_with_details(msg, serde_json::json!({ "env": ENV_FORMAT }))
            })?;
            self.format = self
                .format
                .clone()
                .merge(ConfigValue::new(format, ConfigSource::EnvVar));
        }

        Ok(())
    }

    fn apply_cli_overrides(&mut self, overrides: &CliOverrides) {
        if let Some(order) = overrides.order {
            self.order = ConfigValue::new(order, ConfigSource::CliFlag);
        }
        if let Some(format) = overrides.format {
            self.format = ConfigValue::new(format, ConfigSource::CliFlag);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
