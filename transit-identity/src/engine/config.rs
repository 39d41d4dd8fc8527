//! Engine configuration.

use std::path::PathBuf;

use serde::Deserialize;

use crate::resolve::Strictness;
use crate::rules::{FeedRevision, InvalidFeedRevision, RuleTables, RulesError};

/// Environment variable selecting lenient classification.
pub const LENIENT_VAR: &str = "TRANSIT_ID_LENIENT";
/// Environment variable naming the built-in rule revision.
pub const REVISION_VAR: &str = "TRANSIT_ID_REVISION";
/// Environment variable pointing at a JSON rule document.
pub const RULES_VAR: &str = "TRANSIT_ID_RULES";

/// Error reading configuration from the environment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value {value:?} for {var}: {reason}")]
pub struct ConfigError {
    var: &'static str,
    value: String,
    reason: String,
}

/// Configuration for one identity resolution run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Whether missing long-name and color rules abort the run.
    pub strictness: Strictness,

    /// Built-in rule revision, used when `rules_path` is unset.
    pub revision: FeedRevision,

    /// JSON rule document replacing the built-in tables.
    pub rules_path: Option<PathBuf>,
}

impl EngineConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(strictness: Strictness, revision: FeedRevision, rules_path: Option<PathBuf>) -> Self {
        Self {
            strictness,
            revision,
            rules_path,
        }
    }

    /// Read configuration from the process environment.
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup(LENIENT_VAR) {
            config.strictness = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => Strictness::Lenient,
                "" | "0" | "false" | "no" => Strictness::Strict,
                _ => {
                    return Err(ConfigError {
                        var: LENIENT_VAR,
                        value,
                        reason: "expected a boolean".to_string(),
                    });
                }
            };
        }

        if let Some(value) = lookup(REVISION_VAR) {
            config.revision = value.parse().map_err(|e: InvalidFeedRevision| {
                ConfigError {
                    var: REVISION_VAR,
                    value: value.clone(),
                    reason: e.to_string(),
                }
            })?;
        }

        config.rules_path = lookup(RULES_VAR)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Ok(config)
    }

    /// The rule tables this configuration selects.
    pub fn rule_tables(&self) -> Result<RuleTables, RulesError> {
        match &self.rules_path {
            Some(path) => RuleTables::load(path),
            None => RuleTables::builtin(self.revision),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strictness: Strictness::Strict,
            revision: FeedRevision::Current,
            rules_path: None,
        }
    }
}
