use crate::error::{Result, WindsiteError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Programmatic override supplied by the embedding host
    Override,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Override => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for the lifecycle core
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    /// Clustering radius for duplicate detection, in kilometers
    pub duplicate_radius_km: ConfigValue<f64>,
    /// Backing-store session lifetime, in seconds
    pub session_ttl_secs: ConfigValue<i64>,
    /// In-process session cache lifetime, in seconds
    pub session_cache_ttl_secs: ConfigValue<u64>,
    /// Upper bound on the per-session project history
    pub history_limit: ConfigValue<usize>,
    /// Attempt cap for unique-name generation
    pub name_attempt_limit: ConfigValue<u32>,
    /// Maximum example names carried in a suggestion message
    pub suggestion_limit: ConfigValue<usize>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            duplicate_radius_km: ConfigValue::new(1.0, ConfigSource::Default),
            session_ttl_secs: ConfigValue::new(7 * 24 * 60 * 60, ConfigSource::Default),
            session_cache_ttl_secs: ConfigValue::new(300, ConfigSource::Default),
            history_limit: ConfigValue::new(10, ConfigSource::Default),
            name_attempt_limit: ConfigValue::new(1000, ConfigSource::Default),
            suggestion_limit: ConfigValue::new(5, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| WindsiteError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| WindsiteError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        // Update values from file
        if let Some(radius) = file_config.duplicate_radius_km {
            validate_radius_value("duplicate_radius_km", radius)?;
            self.duplicate_radius_km.update(radius, ConfigSource::File);
        }

        if let Some(ttl) = file_config.session_ttl_secs {
            self.session_ttl_secs.update(ttl, ConfigSource::File);
        }

        if let Some(ttl) = file_config.session_cache_ttl_secs {
            self.session_cache_ttl_secs.update(ttl, ConfigSource::File);
        }

        if let Some(limit) = file_config.history_limit {
            self.history_limit.update(limit, ConfigSource::File);
        }

        if let Some(limit) = file_config.name_attempt_limit {
            self.name_attempt_limit.update(limit, ConfigSource::File);
        }

        if let Some(limit) = file_config.suggestion_limit {
            self.suggestion_limit.update(limit, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // WINDSITE_DUPLICATE_RADIUS_KM
        if let Ok(raw) = env::var("WINDSITE_DUPLICATE_RADIUS_KM") {
            match raw.parse::<f64>() {
                Ok(radius) if radius > 0.0 && radius.is_finite() => {
                    self.duplicate_radius_km.update(radius, ConfigSource::Environment)
                }
                _ => tracing::warn!(
                    "Invalid WINDSITE_DUPLICATE_RADIUS_KM value '{}': expected positive number",
                    raw
                ),
            }
        }

        // WINDSITE_SESSION_TTL_SECS
        if let Ok(raw) = env::var("WINDSITE_SESSION_TTL_SECS") {
            match raw.parse::<i64>() {
                Ok(ttl) => self.session_ttl_secs.update(ttl, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid WINDSITE_SESSION_TTL_SECS value '{}': expected integer seconds",
                    raw
                ),
            }
        }

        // WINDSITE_SESSION_CACHE_TTL_SECS
        if let Ok(raw) = env::var("WINDSITE_SESSION_CACHE_TTL_SECS") {
            match raw.parse::<u64>() {
                Ok(ttl) => self.session_cache_ttl_secs.update(ttl, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid WINDSITE_SESSION_CACHE_TTL_SECS value '{}': expected integer seconds",
                    raw
                ),
            }
        }

        // WINDSITE_HISTORY_LIMIT
        if let Ok(raw) = env::var("WINDSITE_HISTORY_LIMIT") {
            match raw.parse::<usize>() {
                Ok(limit) => self.history_limit.update(limit, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid WINDSITE_HISTORY_LIMIT value '{}': expected integer",
                    raw
                ),
            }
        }

        // WINDSITE_NAME_ATTEMPT_LIMIT
        if let Ok(raw) = env::var("WINDSITE_NAME_ATTEMPT_LIMIT") {
            match raw.parse::<u32>() {
                Ok(limit) => self.name_attempt_limit.update(limit, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid WINDSITE_NAME_ATTEMPT_LIMIT value '{}': expected integer",
                    raw
                ),
            }
        }

        // WINDSITE_SUGGESTION_LIMIT
        if let Ok(raw) = env::var("WINDSITE_SUGGESTION_LIMIT") {
            match raw.parse::<usize>() {
                Ok(limit) => self.suggestion_limit.update(limit, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid WINDSITE_SUGGESTION_LIMIT value '{}': expected integer",
                    raw
                ),
            }
        }

        self
    }

    /// Update configuration from host-supplied overrides
    pub fn update_from_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(radius) = overrides.duplicate_radius_km {
            self.duplicate_radius_km.update(radius, ConfigSource::Override);
        }

        if let Some(ttl) = overrides.session_ttl_secs {
            self.session_ttl_secs.update(ttl, ConfigSource::Override);
        }

        if let Some(ttl) = overrides.session_cache_ttl_secs {
            self.session_cache_ttl_secs.update(ttl, ConfigSource::Override);
        }

        if let Some(limit) = overrides.history_limit {
            self.history_limit.update(limit, ConfigSource::Override);
        }

        if let Some(limit) = overrides.name_attempt_limit {
            self.name_attempt_limit.update(limit, ConfigSource::Override);
        }

        if let Some(limit) = overrides.suggestion_limit {
            self.suggestion_limit.update(limit, ConfigSource::Override);
        }
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "duplicate_radius_km".to_string(),
            (format!("{} km", self.duplicate_radius_km.value), self.duplicate_radius_km.source),
        );

        map.insert(
            "session_ttl_secs".to_string(),
            (format!("{} s", self.session_ttl_secs.value), self.session_ttl_secs.source),
        );

        map.insert(
            "session_cache_ttl_secs".to_string(),
            (format!("{} s", self.session_cache_ttl_secs.value), self.session_cache_ttl_secs.source),
        );

        map.insert(
            "history_limit".to_string(),
            (self.history_limit.value.to_string(), self.history_limit.source),
        );

        map.insert(
            "name_attempt_limit".to_string(),
            (self.name_attempt_limit.value.to_string(), self.name_attempt_limit.source),
        );

        map.insert(
            "suggestion_limit".to_string(),
            (self.suggestion_limit.value.to_string(), self.suggestion_limit.source),
        );

        map
    }
}

impl Default for LayeredConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn validate_radius_value(key: &str, radius: f64) -> Result<()> {
    if radius > 0.0 && radius.is_finite() {
        Ok(())
    } else {
        Err(WindsiteError::ConfigInvalid {
            key: key.to_string(),
            reason: format!("Radius must be a positive number, got {}", radius),
        })
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    duplicate_radius_km: Option<f64>,
    session_ttl_secs: Option<i64>,
    session_cache_ttl_secs: Option<u64>,
    history_limit: Option<usize>,
    name_attempt_limit: Option<u32>,
    suggestion_limit: Option<usize>,
}

/// Host configuration overrides
#[derive(Debug, Default)]
pub struct ConfigOverrides {
    pub duplicate_radius_km: Option<f64>,
    pub session_ttl_secs: Option<i64>,
    pub session_cache_ttl_secs: Option<u64>,
    pub history_limit: Option<usize>,
    pub name_attempt_limit: Option<u32>,
    pub suggestion_limit: Option<usize>,
}
