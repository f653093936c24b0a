// Environment variable loading

use crate::loader::env_key_segments;
use crate::{ConfigError, Result};
use std::env;

/// Environment variable loader
///
/// With a prefix, only variables starting with it are read and the prefix is
/// stripped: `APP_REDIS__DB_NUMBER` becomes the path `REDIS:DB_NUMBER`.
pub struct EnvLoader {
    prefix: Option<String>,
}

impl EnvLoader {
    pub fn new(prefix: Option<String>) -> Self {
        Self { prefix }
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Load every matching variable as `(path segments, value)` pairs.
    pub fn load(&self) -> Vec<(Vec<String>, String)> {
        // Variables that are not valid unicode are skipped.
        env::vars_os()
            .filter_map(|(key, value)| {
                let (key, value) = (key.into_string().ok()?, value.into_string().ok()?);
                let key = self.strip_prefix(&key)?;
                let segments = env_key_segments(key);
                (!segments.is_empty()).then_some((segments, value))
            })
            .collect()
    }

    fn strip_prefix<'a>(&self, key: &'a str) -> Option<&'a str> {
        match &self.prefix {
            Some(prefix) => key
                .strip_prefix(prefix.as_str())
                .map(|rest| rest.trim_start_matches('_')),
            None => Some(key),
        }
    }

    /// Load a specific environment variable
    pub fn load_var(&self, key: &str) -> Result<String> {
        let full_key = match &self.prefix {
            Some(prefix) => format!("{}_{}", prefix, key.to_uppercase()),
            None => key.to_uppercase(),
        };

        env::var(&full_key).map_err(ConfigError::EnvError)
    }

    /// Load with default value
    pub fn load_var_or(&self, key: &str, default: &str) -> String {
        self.load_var(key).unwrap_or_else(|_| default.to_string())
    }
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self::new(None)
    }
}
