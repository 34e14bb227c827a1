//! Mock connections.
//!
//! A [`Connection`] owns (or shares) the result queue its commands draw from
//! and the log those commands are recorded in. A standalone connection has a
//! private queue; connections handed out by a
//! [`MockDatabase`](super::MockDatabase) all share the database's.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use log::debug;
use strum::{Display, EnumString};
use uuid::Uuid;

use super::command::{Command, CommandRecord};
use super::transaction::{IsolationLevel, Transaction};
use crate::config::ConnectionConfig;
use crate::errors::MockDbResult;
use crate::queue::ResultQueue;

/// Version every mock connection reports for its server.
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString)]
pub enum ConnectionState {
    #[default]
    Closed,
    Open,
    Connecting,
    Executing,
    Fetching,
    Broken,
}

/// The queue and command log a connection works against.
#[derive(Debug, Clone, Default)]
pub(crate) struct Backing {
    pub(crate) results: ResultQueue,
    pub(crate) commands: Rc<RefCell<Vec<CommandRecord>>>,
}

impl Backing {
    pub(crate) fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            results: ResultQueue::with_chunk_size(chunk_size),
            commands: Rc::default(),
        }
    }

    pub(crate) fn executed_commands(&self) -> Vec<CommandRecord> {
        self.commands.borrow().clone()
    }
}

/// # Examples
///
/// ```
/// use mockable_db::databases::mock::{Connection, ConnectionState};
///
/// let mut connection = Connection::with_connection_string("Server=nowhere");
/// assert_eq!(connection.state(), ConnectionState::Closed);
///
/// connection.open().unwrap();
/// connection.change_database("reports").unwrap();
/// assert_eq!(connection.state(), ConnectionState::Open);
/// assert_eq!(connection.database(), "reports");
/// ```
#[derive(Debug)]
pub struct Connection {
    id: Uuid,
    config: ConnectionConfig,
    state: ConnectionState,
    backing: Backing,
}

impl Default for Connection {
    fn default() -> Self {
        Self::new()
    }
}

impl Connection {
    /// A closed connection with its own empty queue.
    pub fn new() -> Self {
        Self::with_config(ConnectionConfig::default())
    }

    pub fn with_connection_string<S: Into<String>>(connection_string: S) -> Self {
        Self::with_config(ConnectionConfig::new(connection_string))
    }

    pub fn with_config(config: ConnectionConfig) -> Self {
        Self::attached(Backing::default(), config)
    }

    pub(crate) fn attached(backing: Backing, config: ConnectionConfig) -> Self {
        let id = Uuid::new_v4();
        debug!("Connection {}: created", id);
        Self {
            id,
            config,
            state: ConnectionState::Closed,
            backing,
        }
    }

    pub fn open(&mut self) -> MockDbResult<()> {
        debug!("Connection {}: open", self.id);
        self.state = ConnectionState::Open;
        Ok(())
    }

    pub fn close(&mut self) -> MockDbResult<()> {
        debug!("Connection {}: close", self.id);
        self.state = ConnectionState::Closed;
        Ok(())
    }

    pub async fn open_async(&mut self) -> MockDbResult<()> {
        self.open()
    }

    pub async fn close_async(&mut self) -> MockDbResult<()> {
        self.close()
    }

    pub fn change_database<S: Into<String>>(&mut self, database: S) -> MockDbResult<()> {
        self.config.database = database.into();
        debug!("Connection {}: database is now '{}'", self.id, self.config.database);
        Ok(())
    }

    pub async fn change_database_async<S: Into<String>>(&mut self, database: S) -> MockDbResult<()> {
        self.change_database(database)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn connection_string(&self) -> &str {
        &self.config.connection_string
    }

    pub fn set_connection_string<S: Into<String>>(&mut self, connection_string: S) {
        self.config.connection_string = connection_string.into();
    }

    pub fn database(&self) -> &str {
        &self.config.database
    }

    pub fn data_source(&self) -> &str {
        &self.config.data_source
    }

    pub fn connection_timeout(&self) -> Duration {
        self.config.connection_timeout
    }

    pub fn server_version(&self) -> &'static str {
        SERVER_VERSION
    }

    /// The queue this connection's commands draw results from.
    pub fn results(&self) -> &ResultQueue {
        &self.backing.results
    }

    /// Every command executed through this connection's backing, oldest first.
    ///
    /// Connections sharing a [`MockDatabase`](super::MockDatabase) share the log.
    pub fn executed_commands(&self) -> Vec<CommandRecord> {
        self.backing.executed_commands()
    }

    pub fn create_command(&self) -> Command {
        Command::new(self.backing.clone(), self.id)
    }

    pub fn begin_transaction(&self) -> Transaction {
        self.begin_transaction_with(IsolationLevel::default())
    }

    pub fn begin_transaction_with(&self, isolation_level: IsolationLevel) -> Transaction {
        Transaction::begin(self.id, isolation_level)
    }
}
