//! Configuration types and loading
//!
//! Everything is read from environment variables on top of built-in defaults.
//! The binary calls `dotenvy::dotenv()` first so a `.env` file works too.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Storage medium configuration
    pub storage: StorageConfig,

    /// Defaults applied to user-facing actions
    pub defaults: DefaultsConfig,

    /// Export destination
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Directory holding one file per storage key
    pub data_dir: PathBuf,
    /// Prefix for the three collection keys
    pub key_prefix: String,
    /// Total bytes the medium may hold; `None` means unbounded
    pub quota_bytes: Option<usize>,
    /// Seed the demonstration project on first run
    pub seed_defaults: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DefaultsConfig {
    /// Author recorded on updates when none is given
    pub author: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
}

/// Browser local storage is typically capped at 5 MiB per origin
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                data_dir: PathBuf::from(".pm-data"),
                key_prefix: "project_management".to_string(),
                quota_bytes: Some(DEFAULT_QUOTA_BYTES),
                seed_defaults: true,
            },
            defaults: DefaultsConfig {
                author: "User".to_string(),
            },
            export: ExportConfig {
                output_dir: PathBuf::from("."),
            },
        }
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup("PM_DATA_DIR") {
            config.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(prefix) = lookup("PM_KEY_PREFIX") {
            if prefix.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "PM_KEY_PREFIX".to_string(),
                    message: "must not be blank".to_string(),
                });
            }
            config.storage.key_prefix = prefix;
        }
        if let Some(quota) = lookup("PM_QUOTA_BYTES") {
            config.storage.quota_bytes = match quota.trim() {
                "" | "0" | "none" | "unlimited" => None,
                value => Some(value.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "PM_QUOTA_BYTES".to_string(),
                    message: format!("expected a byte count, got {:?}", value),
                })?),
            };
        }
        if let Some(seed) = lookup("PM_SEED_DEFAULTS") {
            config.storage.seed_defaults = parse_bool(&seed);
        }

        if let Some(author) = lookup("PM_DEFAULT_AUTHOR") {
            config.defaults.author = author;
        }

        if let Some(dir) = lookup("PM_EXPORT_DIR") {
            config.export.output_dir = PathBuf::from(dir);
        }

        tracing::debug!(
            data_dir = %config.storage.data_dir.display(),
            key_prefix = %config.storage.key_prefix,
            quota_bytes = ?config.storage.quota_bytes,
            "Configuration loaded"
        );

        Ok(config)
    }
}

fn parse_bool(v: &str) -> bool {
    matches!(v.trim(), "true" | "1" | "yes")
}

/// The free-form `settings` collection
///
/// Stored as an arbitrary JSON object; nothing about its shape is validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings {
    values: Map<String, Value>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.values.get(key).and_then(Value::as_bool)
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.values.get(key).and_then(Value::as_i64)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

impl From<Map<String, Value>> for Settings {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.storage.key_prefix, "project_management");
        assert_eq!(config.storage.quota_bytes, Some(DEFAULT_QUOTA_BYTES));
        assert!(config.storage.seed_defaults);
        assert_eq!(config.defaults.author, "User");
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("PM_DATA_DIR", "/tmp/pm"),
            ("PM_QUOTA_BYTES", "1024"),
            ("PM_SEED_DEFAULTS", "false"),
            ("PM_DEFAULT_AUTHOR", "alice"),
        ]))
        .unwrap();

        assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/pm"));
        assert_eq!(config.storage.quota_bytes, Some(1024));
        assert!(!config.storage.seed_defaults);
        assert_eq!(config.defaults.author, "alice");
    }

    #[test]
    fn test_unlimited_quota() {
        let config = AppConfig::from_lookup(lookup_from(&[("PM_QUOTA_BYTES", "unlimited")])).unwrap();
        assert_eq!(config.storage.quota_bytes, None);
    }

    #[test]
    fn test_invalid_quota() {
        let err = AppConfig::from_lookup(lookup_from(&[("PM_QUOTA_BYTES", "lots")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "PM_QUOTA_BYTES"));
    }

    #[test]
    fn test_blank_prefix_rejected() {
        assert!(AppConfig::from_lookup(lookup_from(&[("PM_KEY_PREFIX", "  ")])).is_err());
    }

    #[test]
    fn test_settings() {
        let mut settings = Settings::default();
        settings.set("theme", "dark");
        settings.set("compact", true);
        settings.set("page_size", 42);

        assert_eq!(settings.get_string("theme"), Some("dark"));
        assert_eq!(settings.get_bool("compact"), Some(true));
        assert_eq!(settings.get_int("page_size"), Some(42));
        assert_eq!(settings.get_int("theme"), None);

        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }
}
