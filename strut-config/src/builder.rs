// Layered construction of a ConfigManager

use crate::{ConfigManager, FileFormat, Result};
use std::path::PathBuf;
use tracing::debug;

enum Source {
    File {
        path: PathBuf,
        format: Option<FileFormat>,
        optional: bool,
    },
    Dotenv(Option<PathBuf>),
    Env,
}

/// Builder for a layered [`ConfigManager`]
///
/// Sources are applied in the order they were added; later sources win.
///
/// ```no_run
/// use strut_config::{ConfigBuilder, FileFormat};
///
/// let config = ConfigBuilder::new()
///     .add_file("appsettings.json", FileFormat::Json)
///     .add_optional_file("appsettings.local.toml")
///     .load_env()
///     .build()?;
/// # Ok::<(), strut_config::ConfigError>(())
/// ```
pub struct ConfigBuilder {
    prefix: Option<String>,
    sources: Vec<Source>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            prefix: None,
            sources: Vec::new(),
        }
    }

    /// Only read environment variables starting with `prefix`
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Add a required configuration file
    pub fn add_file(mut self, path: impl Into<PathBuf>, format: FileFormat) -> Self {
        self.sources.push(Source::File {
            path: path.into(),
            format: Some(format),
            optional: false,
        });
        self
    }

    /// Add a file that is skipped when it does not exist; the format is
    /// detected from its name.
    pub fn add_optional_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(Source::File {
            path: path.into(),
            format: None,
            optional: true,
        });
        self
    }

    /// Load a `.env` file (default location when `None`) and the environment
    pub fn load_dotenv(mut self, path: Option<PathBuf>) -> Self {
        self.sources.push(Source::Dotenv(path));
        self
    }

    /// Layer environment variables
    pub fn load_env(mut self) -> Self {
        self.sources.push(Source::Env);
        self
    }

    /// Build the configuration manager
    pub fn build(self) -> Result<ConfigManager> {
        let manager = match self.prefix {
            Some(prefix) => ConfigManager::with_prefix(prefix),
            None => ConfigManager::new(),
        };

        for source in self.sources {
            match source {
                Source::File {
                    path,
                    format,
                    optional,
                } => {
                    if optional && !path.exists() {
                        debug!(path = %path.display(), "Optional configuration file not found");
                        continue;
                    }
                    match format {
                        Some(format) => manager.load_file(&path, format)?,
                        None => manager.load_file_auto(&path)?,
                    }
                }
                Source::Dotenv(path) => manager.load_dotenv(path.as_deref())?,
                Source::Env => manager.load_env()?,
            }
        }

        Ok(manager)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
