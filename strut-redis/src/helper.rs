//! The Redis capability registered in the container.

use crate::{RedisOptions, Result};
use async_trait::async_trait;
use std::time::Duration;
use strut_core::Provider;

/// Redis operations available to services resolved from the container.
///
/// Resolve it as `Arc<dyn RedisHelper>` after
/// [`add_redis`](crate::RedisContainerExt::add_redis).
#[async_trait]
pub trait RedisHelper: Send + Sync {
    /// The validated options this helper was built with.
    fn options(&self) -> &RedisOptions;

    /// Check the server answers.
    async fn ping(&self) -> Result<()>;

    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Set a value that expires after `ttl`.
    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;

    /// Delete a key; `true` if it existed.
    async fn delete(&self, key: &str) -> Result<bool>;

    async fn exists(&self, key: &str) -> Result<bool>;

    /// Set expiration on a key; `true` if the key exists.
    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool>;
}

impl Provider for dyn RedisHelper {}
