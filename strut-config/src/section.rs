// Configuration sections and binding

use crate::tree::{overlay, split_path};
use crate::{ConfigError, ConfigManager, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

/// A view of one subtree of a [`ConfigManager`].
///
/// Sections are cheap to clone and always read the manager's current tree,
/// so a section taken at startup sees values loaded afterwards.
#[derive(Clone, Debug)]
pub struct ConfigSection {
    manager: ConfigManager,
    segments: Vec<String>,
}

impl ConfigSection {
    pub(crate) fn new(manager: ConfigManager, segments: Vec<String>) -> Self {
        Self { manager, segments }
    }

    /// Full path of this section, `:` separated.
    pub fn path(&self) -> String {
        self.segments.join(":")
    }

    /// Last path segment; `None` for the root section.
    pub fn key(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    pub fn exists(&self) -> bool {
        self.manager.node(&self.segments).is_some()
    }

    /// Copy of the subtree, if present.
    pub fn value(&self) -> Option<Value> {
        self.manager.node(&self.segments)
    }

    /// Keys directly under this section.
    pub fn children(&self) -> Vec<String> {
        match self.value() {
            Some(Value::Object(map)) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    /// A nested section.
    pub fn section(&self, key: &str) -> ConfigSection {
        let mut segments = self.segments.clone();
        segments.extend(split_path(key));
        ConfigSection::new(self.manager.clone(), segments)
    }

    /// Read a value below this section.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let mut segments = self.segments.clone();
        segments.extend(split_path(key));
        self.manager.get_at(&segments)
    }

    /// Bind the section onto `T::default()`.
    pub fn bind<T: Default + Serialize + DeserializeOwned>(&self) -> Result<T> {
        let mut target = T::default();
        self.bind_into(&mut target)?;
        Ok(target)
    }

    /// Bind the section onto an existing value.
    ///
    /// Keys present in the section overwrite the matching fields; fields with
    /// no matching key keep their current value. A missing section leaves the
    /// target untouched.
    pub fn bind_into<T: Serialize + DeserializeOwned>(&self, target: &mut T) -> Result<()> {
        let Some(source) = self.value() else {
            return Ok(());
        };

        let mut merged = serde_json::to_value(&*target)
            .map_err(|e| ConfigError::SerializationError(e.to_string()))?;
        overlay(&mut merged, &source);

        *target = serde_json::from_value(merged).map_err(|e| ConfigError::BindError {
            path: self.path(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}

impl fmt::Display for ConfigSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}
