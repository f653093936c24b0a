//! # Strut Redis
//!
//! Registers a Redis helper in a strut [`Container`](strut_core::Container).
//!
//! ## Features
//!
//! - **Options binding**: `ConnectionString` / `DbNumber` from any
//!   configuration section, or a configure callback
//! - **Deferred validation**: options are checked once, on first resolution
//! - **Lazy singleton**: one [`RedisService`] per container, connected on
//!   first command
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use strut_config::ConfigManager;
//! use strut_core::Container;
//! use strut_core::logging::LogConfig;
//! use strut_redis::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let _guard = LogConfig::from_env().init()?;
//!
//!     let config = ConfigManager::builder()
//!         .add_optional_file("appsettings.json")
//!         .load_env()
//!         .build()?;
//!
//!     let container = Container::new();
//!     container.add_redis(&config.section("Redis"));
//!
//!     let redis = container.resolve::<dyn RedisHelper>()?;
//!     redis.set("greeting", "hello").await?;
//!     assert_eq!(redis.get("greeting").await?.as_deref(), Some("hello"));
//!     Ok(())
//! }
//! ```

mod error;
mod helper;
mod options;
mod registration;
mod service;

pub use error::{RedisError, Result};
pub use helper::RedisHelper;
pub use options::{MAX_DB_NUMBER, RedisOptions};
pub use registration::RedisContainerExt;
pub use service::RedisService;

// Re-export redis crate for convenience
pub use redis;

/// Prelude for common imports.
///
/// ```
/// use strut_redis::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{RedisError, Result};
    pub use crate::helper::RedisHelper;
    pub use crate::options::RedisOptions;
    pub use crate::registration::RedisContainerExt;
    pub use crate::service::RedisService;
}
