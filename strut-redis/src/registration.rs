//! Registering Redis in a strut container.

use std::sync::Arc;
use strut_config::{ConfigSection, ConfigureOptionsExt};
use strut_core::Container;
use strut_validation::ValidateOptionsExt;
use tracing::{debug, info};

use crate::{RedisHelper, RedisOptions, RedisService};

/// Redis registration for [`Container`].
///
/// Both methods only record registrations. [`RedisOptions`] are assembled
/// and validated the first time `Options<RedisOptions>` or
/// `dyn RedisHelper` is resolved; an invalid value then fails that
/// resolution with [`strut_core::Error::OptionsValidation`].
///
/// Calling either method more than once adds more configure steps but keeps
/// one helper. After the helper (or `Options<RedisOptions>`) has been
/// resolved, further calls change nothing: the options and the helper are
/// fixed for the life of the container.
pub trait RedisContainerExt {
    /// Register Redis with options bound from `configuration`.
    ///
    /// Reads `ConnectionString` and `DbNumber` from the section. Keys match
    /// case-insensitively and ignore `_`, so `connection_string` or the
    /// environment form `REDIS__CONNECTION_STRING` work as well.
    ///
    /// ```
    /// use strut_config::{ConfigManager, FileFormat};
    /// use strut_core::Container;
    /// use strut_redis::{RedisContainerExt, RedisHelper};
    ///
    /// let config = ConfigManager::new();
    /// config
    ///     .load_str(r#"{"Redis": {"ConnectionString": "localhost:6379", "DbNumber": 1}}"#, FileFormat::Json)
    ///     .unwrap();
    ///
    /// let container = Container::new();
    /// container.add_redis(&config.section("Redis"));
    ///
    /// let redis = container.resolve::<dyn RedisHelper>().unwrap();
    /// assert_eq!(redis.options().db_number, 1);
    /// ```
    ///
    /// A configuration section is always required:
    ///
    /// ```compile_fail
    /// use strut_core::Container;
    /// use strut_redis::RedisContainerExt;
    ///
    /// Container::new().add_redis(None);
    /// ```
    fn add_redis(&self, configuration: &ConfigSection) -> &Self;

    /// Register Redis with options set by `configure`.
    ///
    /// ```
    /// use strut_core::Container;
    /// use strut_redis::{RedisContainerExt, RedisHelper};
    ///
    /// let container = Container::new();
    /// container.add_redis_with(|options| {
    ///     options.connection_string = "redis://localhost:6379".to_string();
    ///     options.db_number = 2;
    /// });
    ///
    /// assert!(container.resolve::<dyn RedisHelper>().is_ok());
    /// ```
    ///
    /// ```compile_fail
    /// use strut_core::Container;
    /// use strut_redis::RedisContainerExt;
    ///
    /// Container::new().add_redis_with(None);
    /// ```
    fn add_redis_with<F>(&self, configure: F) -> &Self
    where
        F: Fn(&mut RedisOptions) + Send + Sync + 'static;
}

impl RedisContainerExt for Container {
    fn add_redis(&self, configuration: &ConfigSection) -> &Self {
        info!(section = %configuration, "Registering Redis from configuration");
        self.bind_options::<RedisOptions>(configuration);
        register_helper(self)
    }

    fn add_redis_with<F>(&self, configure: F) -> &Self
    where
        F: Fn(&mut RedisOptions) + Send + Sync + 'static,
    {
        info!("Registering Redis from callback");
        self.configure_options::<RedisOptions, _>(configure);
        register_helper(self)
    }
}

fn register_helper(container: &Container) -> &Container {
    container.validate_options::<RedisOptions>();
    if container.has::<dyn RedisHelper>() {
        debug!("Redis helper already registered");
        return container;
    }
    container.register_singleton::<dyn RedisHelper, _>(|container| {
        let options = container.options::<RedisOptions>()?;
        debug!(db = options.db_number, "Creating Redis helper");
        Ok(Arc::new(RedisService::new(options.value().clone())) as Arc<dyn RedisHelper>)
    });
    container
}
