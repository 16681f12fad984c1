//! # Validator Configuration
//!
//! Settings shared by every traversal a validator runs. Loaded from YAML or
//! JSON, or built in code.
//!
//! ```yaml
//! max_depth: 64
//! context:
//!   tenant: acme
//!   strict: true
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::MEMBER_PREFIX_KEY;
use crate::error::ConfigError;

/// Traversal settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorConfig {
    /// Maximum number of path segments between the root and any node the
    /// traversal enters. `None` means unbounded.
    pub max_depth: Option<usize>,
    /// Baseline context items. Items passed to an individual call take
    /// precedence over these.
    pub context: BTreeMap<String, Value>,
}

impl ValidatorConfig {
    /// Parse a YAML document.
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(source).map_err(|e| ConfigError::Parse {
            reason: format!("invalid YAML: {e}"),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON document.
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(source).map_err(|e| ConfigError::Parse {
            reason: format!("invalid JSON: {e}"),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file. `.yaml`/`.yml` files are parsed as YAML, anything
    /// else as JSON.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        tracing::debug!(path = %path.display(), "loading validator config");
        match ext {
            "yaml" | "yml" => Self::from_yaml_str(&content),
            _ => Self::from_json_str(&content),
        }
    }

    /// Set the depth limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Add a baseline context item.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Check field ranges.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for a zero depth limit or a baseline
    /// item stored under the reserved path key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == Some(0) {
            return Err(ConfigError::Invalid {
                field: "max_depth",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.context.contains_key(MEMBER_PREFIX_KEY) {
            return Err(ConfigError::Invalid {
                field: "context",
                reason: format!("'{MEMBER_PREFIX_KEY}' is reserved for the traversal"),
            });
        }
        Ok(())
    }
}
