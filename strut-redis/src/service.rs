//! Redis service backing the registered helper.

use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::{RedisError, RedisHelper, RedisOptions, Result};

/// [`RedisHelper`] over a single multiplexed connection.
///
/// Construction does no I/O; the connection is opened by the first command
/// and shared by every command after it.
pub struct RedisService {
    options: RedisOptions,
    connection: OnceCell<MultiplexedConnection>,
}

impl RedisService {
    pub fn new(options: RedisOptions) -> Self {
        Self {
            options,
            connection: OnceCell::new(),
        }
    }

    /// Whether a connection has been opened yet.
    pub fn is_connected(&self) -> bool {
        self.connection.initialized()
    }

    /// Get the shared connection, opening it on first use.
    pub async fn connection(&self) -> Result<MultiplexedConnection> {
        let conn = self
            .connection
            .get_or_try_init(|| async {
                let url = self.options.connection_url()?;
                debug!(
                    host = url.host_str().unwrap_or(""),
                    db = self.options.db_number,
                    "Opening Redis connection"
                );

                let client = redis::Client::open(url.as_str())
                    .map_err(|e| RedisError::Connection(e.to_string()))?;
                let conn = client
                    .get_multiplexed_async_connection()
                    .await
                    .map_err(|e| RedisError::Connection(e.to_string()))?;

                info!(db = self.options.db_number, "Redis connection established");
                Ok::<_, RedisError>(conn)
            })
            .await?;

        Ok(conn.clone())
    }
}

#[async_trait::async_trait]
impl RedisHelper for RedisService {
    fn options(&self) -> &RedisOptions {
        &self.options
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.connection().await?;
        let reply: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| RedisError::Connection(e.to_string()))?;

        if reply == "PONG" {
            Ok(())
        } else {
            Err(RedisError::Command(format!("unexpected PING reply: {}", reply)))
        }
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.connection().await?;
        let _: () = conn.set(key, value).await?;
        Ok(())
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let mut conn = self.connection().await?;
        let _: () = conn.set_ex(key, value, ttl.as_secs()).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut conn = self.connection().await?;
        let deleted: u32 = conn.del(key).await?;
        Ok(deleted > 0)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.connection().await?;
        let exists: bool = conn.exists(key).await?;
        Ok(exists)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool> {
        let mut conn = self.connection().await?;
        let result: bool = conn.expire(key, ttl.as_secs() as i64).await?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_does_not_connect() {
        let service = RedisService::new(RedisOptions::new("x", 0));
        assert!(!service.is_connected());
        assert_eq!(service.options().connection_string, "x");
    }

    #[tokio::test]
    async fn test_bad_scheme_fails_before_connecting() {
        let service = RedisService::new(RedisOptions::new("http://cache", 0));

        let err = service.ping().await.unwrap_err();
        assert!(matches!(err, RedisError::Config(_)));
        assert!(!service.is_connected());
    }

    #[tokio::test]
    #[ignore = "requires Redis"]
    async fn test_commands_against_server() {
        let service = RedisService::new(RedisOptions::new("redis://127.0.0.1:6379", 15));

        service.ping().await.unwrap();
        service.set("strut:test", "value").await.unwrap();
        assert_eq!(service.get("strut:test").await.unwrap().as_deref(), Some("value"));
        assert!(service.exists("strut:test").await.unwrap());
        assert!(service.expire("strut:test", Duration::from_secs(30)).await.unwrap());
        assert!(service.delete("strut:test").await.unwrap());
        assert!(!service.exists("strut:test").await.unwrap());

        service
            .set_ex("strut:ttl", "v", Duration::from_secs(5))
            .await
            .unwrap();
        assert!(service.is_connected());
    }
}
