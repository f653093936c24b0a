//! Redis connection options.

use crate::{RedisError, Result};
use serde::{Deserialize, Serialize};
use strut_validation::{InRange, NotEmpty, Validate, ValidationError, ValidationErrors};
use url::Url;

/// Highest database index accepted; Redis ships with 16 databases.
pub const MAX_DB_NUMBER: i32 = 15;

/// Options for the registered Redis helper.
///
/// Bound from configuration (`ConnectionString`, `DbNumber`) or set by a
/// callback. Validated when first resolved from the container, never here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisOptions {
    /// Redis URL or `host:port`. Required.
    pub connection_string: String,

    /// Database index, 0 through 15.
    pub db_number: i32,
}

impl RedisOptions {
    /// Options for `connection_string` and database `db_number`.
    pub fn new(connection_string: impl Into<String>, db_number: i32) -> Self {
        Self {
            connection_string: connection_string.into(),
            db_number,
        }
    }

    /// Connection URL with the database selected.
    ///
    /// A bare `host:port` gets the `redis://` scheme. For `redis://` and
    /// `rediss://` the database number replaces the path; for unix sockets it
    /// is passed as the `db` query parameter.
    pub fn connection_url(&self) -> Result<Url> {
        let raw = self.connection_string.trim();
        if raw.is_empty() {
            return Err(RedisError::Config(
                "redis connection string is required".to_string(),
            ));
        }

        let raw = if raw.contains("://") {
            raw.to_string()
        } else {
            format!("redis://{}", raw)
        };

        let mut url = Url::parse(&raw)
            .map_err(|e| RedisError::Config(format!("invalid connection string: {}", e)))?;

        match url.scheme() {
            "redis" | "rediss" => url.set_path(&format!("/{}", self.db_number)),
            "unix" | "redis+unix" => {
                let pairs: Vec<(String, String)> = url
                    .query_pairs()
                    .filter(|(key, _)| key != "db")
                    .map(|(key, value)| (key.into_owned(), value.into_owned()))
                    .collect();
                url.query_pairs_mut()
                    .clear()
                    .extend_pairs(pairs)
                    .append_pair("db", &self.db_number.to_string());
            }
            other => {
                return Err(RedisError::Config(format!(
                    "unsupported scheme '{}'",
                    other
                )));
            }
        }

        Ok(url)
    }
}

impl Validate for RedisOptions {
    fn validate(&self) -> std::result::Result<(), Vec<ValidationError>> {
        let mut errors = ValidationErrors::default();

        errors.check(
            NotEmpty::validate(&self.connection_string, "connection_string")
                .map_err(|e| e.with_message("redis connection string is required")),
        );
        errors.check(
            InRange {
                min: 0,
                max: MAX_DB_NUMBER,
            }
            .validate(self.db_number, "db_number")
            .map_err(|e| e.with_message("redis db number must be between 0 and 15")),
        );

        errors.into_result()
    }
}
