// Binding container options from configuration sections

use crate::ConfigSection;
use serde::Serialize;
use serde::de::DeserializeOwned;
use strut_core::{Container, OptionsType};
use tracing::debug;

/// Register configuration binding as an options configure step.
pub trait ConfigureOptionsExt {
    /// Bind `T` from `section` when `Options<T>` is first resolved.
    ///
    /// The section is read at resolution time, not at registration, so
    /// values loaded in between are picked up. Binding errors surface as
    /// [`strut_core::Error::OptionsBinding`].
    fn bind_options<T>(&self, section: &ConfigSection) -> &Self
    where
        T: OptionsType + Serialize + DeserializeOwned;
}

impl ConfigureOptionsExt for Container {
    fn bind_options<T>(&self, section: &ConfigSection) -> &Self
    where
        T: OptionsType + Serialize + DeserializeOwned,
    {
        debug!(
            options = std::any::type_name::<T>(),
            section = %section,
            "Binding options from configuration"
        );

        let section = section.clone();
        self.try_configure_options::<T, _>(move |options| {
            section.bind_into(options)?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConfigManager;
    use serde::Deserialize;

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(default)]
    struct CacheOptions {
        ttl_seconds: u64,
        prefix: String,
    }

    #[test]
    fn test_bind_options_reads_at_resolution() {
        let config = ConfigManager::new();
        let container = Container::new();
        container.bind_options::<CacheOptions>(&config.section("Cache"));

        config.set("cache:TtlSeconds", "30").unwrap();

        let options = container.options::<CacheOptions>().unwrap();
        assert_eq!(options.ttl_seconds, 30);
    }

    #[test]
    fn test_bind_after_configure_overlays() {
        let config = ConfigManager::new();
        config.set("cache:prefix", "app:").unwrap();

        let container = Container::new();
        container
            .configure_options::<CacheOptions, _>(|o| o.ttl_seconds = 60)
            .bind_options::<CacheOptions>(&config.section("cache"));

        let options = container.options::<CacheOptions>().unwrap();
        assert_eq!(options.ttl_seconds, 60);
        assert_eq!(options.prefix, "app:");
    }

    #[test]
    fn test_bind_failure_is_binding_error() {
        let config = ConfigManager::new();
        config.set("cache:ttl_seconds", "soon").unwrap();

        let container = Container::new();
        container.bind_options::<CacheOptions>(&config.section("cache"));

        let err = container.options::<CacheOptions>().unwrap_err();
        assert!(matches!(err, strut_core::Error::OptionsBinding(_)));
    }
}
