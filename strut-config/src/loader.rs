// Configuration file loaders

use crate::tree::{insert_path, split_path};
use crate::{ConfigError, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Separator for hierarchy levels in flat `KEY=value` sources.
pub const ENV_SEPARATOR: &str = "__";

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Toml,
    Env,
}

impl FileFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(FileFormat::Json),
            "toml" => Some(FileFormat::Toml),
            "env" => Some(FileFormat::Env),
            _ => None,
        }
    }

    /// Detect the format of `path`; `.env` files have no extension of their own.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        if path.file_name().and_then(|n| n.to_str()) == Some(".env") {
            return Some(FileFormat::Env);
        }
        path.extension()
            .and_then(|s| s.to_str())
            .and_then(Self::from_extension)
    }
}

/// Configuration file loader
///
/// Every format is parsed into a JSON object tree.
pub struct ConfigLoader {
    format: FileFormat,
}

impl ConfigLoader {
    pub fn new(format: FileFormat) -> Self {
        Self { format }
    }

    /// Auto-detect format from file name
    pub fn auto(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = FileFormat::from_path(path).ok_or_else(|| {
            ConfigError::LoadError(format!("Unsupported format: {}", path.display()))
        })?;
        Ok(Self::new(format))
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    /// Load configuration from file
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Map<String, Value>> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::LoadError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        self.parse(&content)
    }

    /// Parse configuration from string
    pub fn parse(&self, content: &str) -> Result<Map<String, Value>> {
        let value = match self.format {
            FileFormat::Json => serde_json::from_str(content)
                .map_err(|e| ConfigError::ParseError(format!("JSON parse error: {}", e)))?,
            FileFormat::Toml => {
                let toml_value: toml::Value = toml::from_str(content)
                    .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e)))?;
                serde_json::to_value(toml_value)
                    .map_err(|e| ConfigError::SerializationError(e.to_string()))?
            }
            FileFormat::Env => Value::Object(parse_env(content)),
        };

        match value {
            Value::Object(map) => Ok(map),
            other => Err(ConfigError::ParseError(format!(
                "Configuration root must be an object, found {}",
                type_name(&other)
            ))),
        }
    }
}

/// Parse `KEY=value` lines; `__` in a key separates hierarchy levels.
fn parse_env(content: &str) -> Map<String, Value> {
    let mut map = Map::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line = line.strip_prefix("export ").unwrap_or(line);
        if let Some((key, value)) = line.split_once('=') {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            insert_path(
                &mut map,
                &env_key_segments(key.trim()),
                Value::String(value.to_string()),
            );
        }
    }

    map
}

/// Split a flat key such as `REDIS__DB_NUMBER` into path segments.
pub(crate) fn env_key_segments(key: &str) -> Vec<String> {
    key.split(ENV_SEPARATOR)
        .flat_map(split_path)
        .collect()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_json() {
        let loader = ConfigLoader::new(FileFormat::Json);
        let map = loader
            .parse(r#"{"Redis": {"ConnectionString": "redis://h", "DbNumber": 2}}"#)
            .unwrap();

        assert_eq!(map["Redis"]["DbNumber"], json!(2));
    }

    #[test]
    fn test_parse_toml() {
        let loader = ConfigLoader::new(FileFormat::Toml);
        let toml = r#"
            [redis]
            connection_string = "redis://localhost:6379"
            db_number = 4
        "#;

        let map = loader.parse(toml).unwrap();
        assert_eq!(map["redis"]["db_number"], json!(4));
    }

    #[test]
    fn test_parse_env_nested() {
        let loader = ConfigLoader::new(FileFormat::Env);
        let env = r#"
            # Comment
            REDIS__CONNECTION_STRING="redis://cache:6379"
            export REDIS__DB_NUMBER=5
            PLAIN='quoted value'
        "#;

        let map = loader.parse(env).unwrap();
        assert_eq!(map["REDIS"]["CONNECTION_STRING"], json!("redis://cache:6379"));
        assert_eq!(map["REDIS"]["DB_NUMBER"], json!("5"));
        assert_eq!(map["PLAIN"], json!("quoted value"));
    }

    #[test]
    fn test_non_object_root_rejected() {
        let loader = ConfigLoader::new(FileFormat::Json);
        let err = loader.parse("[1, 2]").unwrap_err();
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(FileFormat::from_extension("json"), Some(FileFormat::Json));
        assert_eq!(FileFormat::from_extension("TOML"), Some(FileFormat::Toml));
        assert_eq!(FileFormat::from_extension("unknown"), None);
        assert_eq!(FileFormat::from_path("config/.env"), Some(FileFormat::Env));
        assert_eq!(FileFormat::from_path("appsettings.json"), Some(FileFormat::Json));
        assert!(ConfigLoader::auto("settings.yaml").is_err());
    }

    #[test]
    fn test_env_key_segments() {
        assert_eq!(env_key_segments("REDIS__DB_NUMBER"), vec!["REDIS", "DB_NUMBER"]);
        assert_eq!(env_key_segments("PLAIN"), vec!["PLAIN"]);
    }
}
