//! # Strut Config
//!
//! Hierarchical configuration for strut applications.
//!
//! Values from JSON/TOML files, `.env` files and the process environment are
//! merged into one tree. Keys are addressed with `:` or `.` separated paths and
//! matched case-insensitively, ignoring `_` and `-`, so
//! `Redis:ConnectionString`, `redis.connection_string` and the environment
//! variable `REDIS__CONNECTION_STRING` all name the same value.
//!
//! ```
//! use strut_config::{ConfigManager, FileFormat};
//!
//! let config = ConfigManager::new();
//! config
//!     .load_str(r#"{"Redis": {"ConnectionString": "redis://cache:6379", "DbNumber": 2}}"#, FileFormat::Json)
//!     .unwrap();
//!
//! let db: i64 = config.get("redis:db_number").unwrap();
//! assert_eq!(db, 2);
//! assert!(config.section("Redis").exists());
//! ```

pub mod builder;
pub mod env;
pub mod error;
pub mod loader;
pub mod options;
pub mod section;
pub mod tree;

pub use builder::ConfigBuilder;
pub use env::EnvLoader;
pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, FileFormat};
pub use options::ConfigureOptionsExt;
pub use section::ConfigSection;

use parking_lot::RwLock;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::Arc;
use strut_core::Provider;
use tracing::debug;
use tree::{insert_path, lookup, merge, split_path};

/// Main configuration manager
///
/// Clones share the same tree, so values loaded after a section was handed
/// out are visible through that section.
#[derive(Clone, Debug)]
pub struct ConfigManager {
    root: Arc<RwLock<Map<String, Value>>>,
    env_prefix: Option<String>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            root: Arc::new(RwLock::new(Map::new())),
            env_prefix: None,
        }
    }

    /// Create with environment variable prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            root: Arc::new(RwLock::new(Map::new())),
            env_prefix: Some(prefix.into()),
        }
    }

    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Load configuration from environment variables
    ///
    /// `__` in a variable name separates hierarchy levels.
    pub fn load_env(&self) -> Result<()> {
        let vars = EnvLoader::new(self.env_prefix.clone()).load();
        let count = vars.len();

        let mut root = self.root.write();
        for (segments, value) in vars {
            insert_path(&mut root, &segments, Value::String(value));
        }

        debug!(count = count, prefix = ?self.env_prefix, "Loaded environment variables");
        Ok(())
    }

    /// Load a `.env` file into the process environment, then the environment
    /// into the tree. Without a path a missing `.env` is ignored.
    pub fn load_dotenv(&self, path: Option<&Path>) -> Result<()> {
        match path {
            Some(path) => {
                dotenvy::from_path(path).map_err(|e| ConfigError::LoadError(e.to_string()))?
            }
            None => {
                dotenvy::dotenv().ok();
            }
        }
        self.load_env()
    }

    /// Load configuration from file
    pub fn load_file(&self, path: impl AsRef<Path>, format: FileFormat) -> Result<()> {
        let path = path.as_ref();
        let data = ConfigLoader::new(format).load_file(path)?;
        merge(&mut self.root.write(), data);

        debug!(path = %path.display(), format = ?format, "Loaded configuration file");
        Ok(())
    }

    /// Load a file, detecting its format from the name
    pub fn load_file_auto(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = ConfigLoader::auto(path)?.format();
        self.load_file(path, format)
    }

    /// Parse and merge configuration from a string
    pub fn load_str(&self, content: &str, format: FileFormat) -> Result<()> {
        let data = ConfigLoader::new(format).parse(content)?;
        merge(&mut self.root.write(), data);
        Ok(())
    }

    /// Set a configuration value at a key path
    pub fn set<T: Serialize>(&self, path: &str, value: T) -> Result<()> {
        let segments = split_path(path);
        if segments.is_empty() {
            return Err(ConfigError::KeyNotFound(path.to_string()));
        }

        let value = serde_json::to_value(value)
            .map_err(|e| ConfigError::SerializationError(e.to_string()))?;
        insert_path(&mut self.root.write(), &segments, value);

        Ok(())
    }

    /// Get a configuration value
    pub fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.get_at(&split_path(path))
    }

    pub(crate) fn get_at<T: DeserializeOwned>(&self, segments: &[String]) -> Result<T> {
        let path = segments.join(":");
        let value = self
            .node(segments)
            .ok_or_else(|| ConfigError::KeyNotFound(path.clone()))?;

        match serde_json::from_value(value.clone()) {
            Ok(v) => Ok(v),
            // Environment and .env values are strings; let "42" or "true"
            // satisfy numeric and boolean targets.
            Err(e) => match &value {
                Value::String(text) => serde_json::from_str(text.trim()).map_err(|_| {
                    ConfigError::BindError {
                        path,
                        message: e.to_string(),
                    }
                }),
                _ => Err(ConfigError::BindError {
                    path,
                    message: e.to_string(),
                }),
            },
        }
    }

    /// Get a configuration value with default
    pub fn get_or<T: DeserializeOwned>(&self, path: &str, default: T) -> T {
        self.get(path).unwrap_or(default)
    }

    pub fn get_string(&self, path: &str) -> Result<String> {
        self.get(path)
    }

    pub fn get_int(&self, path: &str) -> Result<i64> {
        self.get(path)
    }

    pub fn get_bool(&self, path: &str) -> Result<bool> {
        self.get(path)
    }

    pub fn get_float(&self, path: &str) -> Result<f64> {
        self.get(path)
    }

    /// Check if a key path exists
    pub fn has(&self, path: &str) -> bool {
        self.node(&split_path(path)).is_some()
    }

    /// Top-level keys
    pub fn keys(&self) -> Vec<String> {
        self.root.read().keys().cloned().collect()
    }

    /// A view of the subtree at `path`. The section need not exist yet.
    pub fn section(&self, path: &str) -> ConfigSection {
        ConfigSection::new(self.clone(), split_path(path))
    }

    /// Merge configuration from another manager; its values win
    pub fn merge(&self, other: &ConfigManager) -> Result<()> {
        if Arc::ptr_eq(&self.root, &other.root) {
            return Ok(());
        }

        let incoming = other.root.read().clone();
        merge(&mut self.root.write(), incoming);
        Ok(())
    }

    /// Copy of the whole tree
    pub fn snapshot(&self) -> Value {
        Value::Object(self.root.read().clone())
    }

    pub(crate) fn node(&self, segments: &[String]) -> Option<Value> {
        let root = self.root.read();
        if segments.is_empty() {
            return Some(Value::Object(root.clone()));
        }
        let Some((first, rest)) = segments.split_first() else {
            return None;
        };
        let top = root
            .iter()
            .find(|(k, _)| tree::keys_match(k, first))
            .map(|(_, v)| v)?;
        lookup(top, rest).cloned()
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider for ConfigManager {}
