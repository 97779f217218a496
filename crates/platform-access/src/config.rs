//! Access matcher configuration.
//!
//! Provides the global allow-list consulted for unauthenticated requests and
//! the transitional compatibility switches. Configuration is loaded from
//! environment variables or JSON, with defaults matching the site layout.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::compat::CompatibilityPolicy;
use crate::descriptor::MODIFIER_DELIMITER;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },

    /// Configuration document could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Grants every visitor holds, authenticated or not.
pub const DEFAULT_GLOBAL_ACCESS_LIST: &[&str] = &[
    "ROOT:#:GET",
    "*.HTML:#:GET",
    "?*:*.HTML:#:GET",
    "?*:?*:*.HTML:#:GET",
    "CSS:*:#:GET",
    "JS:*:#:GET",
    "SCRIPTS:*:#:GET",
    "IMAGES:*:#:GET",
    "FONTS:*:#:GET",
    "FAVICON.ICO:#:GET",
    "SIGNIN:*:#:*",
    "SIGNOUT:*:#:*",
    "DATA:*:#:*",
];

/// Access matcher configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AccessConfig {
    /// Grant descriptors checked by global (unauthenticated) access checks.
    pub global_access_list: Vec<String>,

    /// Transitional compatibility switches.
    pub compatibility: CompatibilityPolicy,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            global_access_list: DEFAULT_GLOBAL_ACCESS_LIST
                .iter()
                .map(|s| s.to_string())
                .collect(),
            compatibility: CompatibilityPolicy::default(),
        }
    }
}

impl AccessConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `ACCESS_GLOBAL_LIST`: Comma-separated global grant descriptors
    ///   (default: the built-in site allow-list)
    /// - `ACCESS_ALLOW_NON_CANONICAL`: Allow non entity-service resources
    ///   without matching (default: true)
    /// - `ACCESS_RELATIONSHIP_AS_CHILD`: Treat `Relationship` associations as
    ///   `Child` (default: true)
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            global_access_list: std::env::var("ACCESS_GLOBAL_LIST")
                .map(|s| parse_list(&s))
                .unwrap_or(default.global_access_list),
            compatibility: CompatibilityPolicy {
                allow_non_canonical: env_flag(
                    "ACCESS_ALLOW_NON_CANONICAL",
                    default.compatibility.allow_non_canonical,
                ),
                relationship_as_child: env_flag(
                    "ACCESS_RELATIONSHIP_AS_CHILD",
                    default.compatibility.relationship_as_child,
                ),
            },
        }
    }

    /// Parse configuration from a JSON document. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Replace the global allow-list.
    pub fn with_global_access_list<I, S>(mut self, descriptors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.global_access_list = descriptors.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the compatibility switches.
    pub fn with_compatibility(mut self, compatibility: CompatibilityPolicy) -> Self {
        self.compatibility = compatibility;
        self
    }

    /// Validate the configuration.
    ///
    /// Every global grant must be non-empty and carry the `:#:` delimiter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.global_access_list.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "global_access_list".to_string(),
                message: "must contain at least one descriptor".to_string(),
            });
        }
        for descriptor in &self.global_access_list {
            if descriptor.trim().is_empty() || !descriptor.contains(MODIFIER_DELIMITER) {
                return Err(ConfigError::InvalidValue {
                    key: "global_access_list".to_string(),
                    message: format!("malformed descriptor '{}'", descriptor),
                });
            }
        }
        Ok(())
    }
}

fn parse_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .collect()
}

fn env_flag(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|s| s != "false" && s != "0")
        .unwrap_or(default)
}
