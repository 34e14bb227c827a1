//! Configuration for mock connections and shared mock databases.
//!
//! Both configs use the builder pattern via `typed-builder`, and both have a
//! `Default` that matches what an unconfigured driver reports.

use std::time::Duration;
use typed_builder::TypedBuilder;

use crate::queue::DEFAULT_CHUNK_SIZE;

/// Timeout reported by connections that were not given one.
pub const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(15);

/// Properties a connection reports about itself.
///
/// None of these are interpreted; they are handed back as configured.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use mockable_db::config::ConnectionConfig;
///
/// let config = ConnectionConfig::builder()
///     .connection_string("Server=test;Database=orders")
///     .database("orders")
///     .build();
///
/// assert_eq!(config.connection_timeout, Duration::from_secs(15));
/// assert!(config.data_source.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
#[builder(doc)]
pub struct ConnectionConfig {
    /// Opaque connection string
    #[builder(default, setter(into))]
    pub connection_string: String,

    /// Initial database name
    #[builder(default, setter(into))]
    pub database: String,

    /// Reported data source
    #[builder(default, setter(into))]
    pub data_source: String,

    /// Reported connection timeout
    #[builder(default = DEFAULT_CONNECTION_TIMEOUT)]
    pub connection_timeout: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ConnectionConfig {
    /// Configuration carrying only a connection string.
    pub fn new<S: Into<String>>(connection_string: S) -> Self {
        Self::builder().connection_string(connection_string).build()
    }
}

/// Configuration for a [`MockDatabase`](crate::databases::mock::MockDatabase).
///
/// # Examples
///
/// ```
/// use mockable_db::config::{ConnectionConfig, MockDatabaseConfig};
///
/// let config = MockDatabaseConfig::builder()
///     .connection(ConnectionConfig::new("Server=mock"))
///     .text_chunk_size(500)
///     .build();
/// assert_eq!(config.text_chunk_size, 500);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
#[builder(doc)]
pub struct MockDatabaseConfig {
    /// Configuration handed to every connection the database creates
    #[builder(default)]
    pub connection: ConnectionConfig,

    /// Characters per row when queueing chunked text
    #[builder(default = DEFAULT_CHUNK_SIZE)]
    pub text_chunk_size: usize,
}

impl Default for MockDatabaseConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_config_defaults() {
        let config = ConnectionConfig::default();
        assert!(config.connection_string.is_empty());
        assert!(config.database.is_empty());
        assert_eq!(config.connection_timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_connection_config_builder() {
        let config = ConnectionConfig::builder()
            .connection_string("cs")
            .data_source("localhost")
            .connection_timeout(Duration::from_secs(3))
            .build();

        assert_eq!(config.connection_string, "cs");
        assert_eq!(config.data_source, "localhost");
        assert_eq!(config.connection_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_mock_database_config_default() {
        let config = MockDatabaseConfig::default();
        assert_eq!(config.text_chunk_size, 2000);
        assert_eq!(config.connection, ConnectionConfig::default());
    }
}
