// Strut - a typed service container with configuration binding, options
// validation and Redis registration.
//
// This crate re-exports the member crates behind features so applications
// can depend on one crate.

// Re-export core functionality
pub use strut_core::*;

// Re-export optional crates
#[cfg(feature = "config")]
pub use strut_config;

#[cfg(feature = "validation")]
pub use strut_validation;

#[cfg(feature = "redis")]
pub use strut_redis;

/// Prelude for common imports
pub mod prelude {
    pub use crate::{Container, Error, Options, Provider, Result};

    #[cfg(feature = "config")]
    pub use strut_config::{
        ConfigBuilder, ConfigManager, ConfigSection, ConfigureOptionsExt, FileFormat,
    };

    #[cfg(feature = "validation")]
    pub use strut_validation::{Validate, ValidateOptionsExt, ValidationError};

    #[cfg(feature = "redis")]
    pub use strut_redis::{RedisContainerExt, RedisHelper, RedisOptions};
}
