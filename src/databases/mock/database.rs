//! The shared owner of a result queue.

use log::debug;

use super::command::CommandRecord;
use super::connection::{Backing, Connection};
use super::parameter::{DbType, Parameter};
use crate::config::MockDatabaseConfig;
use crate::queue::ResultQueue;
use crate::traits::database::DatabaseFactory;
use crate::value::Value;

/// A scripted database whose connections all draw from one queue.
///
/// Test setup enqueues results here; the code under test asks for
/// connections through [`DatabaseFactory`] and consumes them in order,
/// whichever connection it happens to use.
///
/// # Examples
///
/// ```
/// use mockable_db::databases::mock::MockDatabase;
/// use mockable_db::traits::database::DatabaseFactory;
///
/// let db = MockDatabase::new();
/// db.results().enqueue_scalar("first");
/// db.results().enqueue_scalar("second");
///
/// let a = db.connection();
/// let b = db.connection();
/// let first = a.create_command().execute_scalar().unwrap().unwrap();
/// let second = b.create_command().execute_scalar().unwrap().unwrap();
///
/// assert_eq!(first.as_str().unwrap(), "first");
/// assert_eq!(second.as_str().unwrap(), "second");
/// assert_eq!(db.executed_commands().len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct MockDatabase {
    config: MockDatabaseConfig,
    backing: Backing,
}

impl MockDatabase {
    pub fn new() -> Self {
        Self::with_config(MockDatabaseConfig::default())
    }

    pub fn with_config(config: MockDatabaseConfig) -> Self {
        debug!(
            "MockDatabase: created (text chunk size {})",
            config.text_chunk_size
        );
        Self {
            backing: Backing::with_chunk_size(config.text_chunk_size),
            config,
        }
    }

    pub fn config(&self) -> &MockDatabaseConfig {
        &self.config
    }

    /// The queue every connection of this database draws from.
    pub fn results(&self) -> &ResultQueue {
        &self.backing.results
    }

    /// Every command executed through any of this database's connections.
    pub fn executed_commands(&self) -> Vec<CommandRecord> {
        self.backing.executed_commands()
    }
}

impl DatabaseFactory for MockDatabase {
    type Connection = Connection;
    type Parameter = Parameter;

    fn connection(&self) -> Connection {
        Connection::attached(self.backing.clone(), self.config.connection.clone())
    }

    fn create_parameter(&self, name: &str, db_type: DbType, value: Value) -> Parameter {
        Parameter::builder()
            .name(name)
            .db_type(db_type)
            .value(value)
            .build()
    }

    fn create_sized_parameter(
        &self,
        name: &str,
        db_type: DbType,
        size: i32,
        value: Value,
    ) -> Parameter {
        Parameter::builder()
            .name(name)
            .db_type(db_type)
            .size(size)
            .value(value)
            .build()
    }
}
