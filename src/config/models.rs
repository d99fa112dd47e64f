//! Configuration models

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::utils::error::PermError;

/// Hard upper bound for `group_max_level`.
pub const MAX_GROUP_LEVEL: u32 = 64;

/// Permission system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermsConfig {
    /// Storage backend selected at startup
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Create missing permission rows on first grant
    #[serde(default)]
    pub auto_create: bool,
    /// Maximum parent hops for group inheritance
    #[serde(default = "default_group_max_level")]
    pub group_max_level: u32,
    /// Extra codename display names, extending the built-in map
    #[serde(default)]
    pub codenames: HashMap<String, String>,
}

fn default_backend() -> String {
    "memory".to_string()
}

fn default_group_max_level() -> u32 {
    10
}

impl Default for PermsConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            auto_create: false,
            group_max_level: default_group_max_level(),
            codenames: HashMap::new(),
        }
    }
}

impl PermsConfig {
    /// Load from `PERMKIT_*` environment variables, defaults elsewhere.
    pub fn from_env() -> crate::utils::error::Result<Self> {
        let mut config = Self::default();
        if let Ok(backend) = std::env::var("PERMKIT_BACKEND") {
            config.backend = backend;
        }
        if let Ok(raw) = std::env::var("PERMKIT_AUTO_CREATE") {
            config.auto_create = raw.parse().map_err(|_| {
                PermError::misconfigured(format!(
                    "PERMKIT_AUTO_CREATE must be true or false, got {:?}",
                    raw
                ))
            })?;
        }
        if let Ok(raw) = std::env::var("PERMKIT_GROUP_MAX_LEVEL") {
            config.group_max_level = raw.parse().map_err(|_| {
                PermError::misconfigured(format!(
                    "PERMKIT_GROUP_MAX_LEVEL must be an integer, got {:?}",
                    raw
                ))
            })?;
        }
        Ok(config)
    }

    /// Merge two configurations, with other taking precedence
    pub fn merge(mut self, other: Self) -> Self {
        if other.backend != default_backend() {
            self.backend = other.backend;
        }
        if other.auto_create {
            self.auto_create = other.auto_create;
        }
        if other.group_max_level != default_group_max_level() {
            self.group_max_level = other.group_max_level;
        }
        self.codenames.extend(other.codenames);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.backend.is_empty() {
            return Err("backend must not be empty".to_string());
        }
        if self.group_max_level > MAX_GROUP_LEVEL {
            return Err(format!(
                "group_max_level {} exceeds the maximum of {}",
                self.group_max_level, MAX_GROUP_LEVEL
            ));
        }
        Ok(())
    }
}
