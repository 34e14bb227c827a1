//! The mock relational driver.
//!
//! [`Connection`], [`Command`], [`DataReader`], [`Transaction`] and
//! [`Parameter`] mirror the shapes of a relational client driver, but every
//! result comes from a [`ResultQueue`](crate::queue::ResultQueue) that test
//! code filled ahead of time.
//!
//! These types are single-threaded: they share their queue through `Rc`.

pub mod command;
pub mod connection;
pub mod database;
pub mod parameter;
pub mod parameter_collection;
pub mod reader;
pub mod transaction;

pub use command::{Command, CommandRecord, CommandType, ExecutionMode, UpdateRowSource};
pub use connection::{Connection, ConnectionState, SERVER_VERSION};
pub use database::MockDatabase;
pub use parameter::{DataRowVersion, DbType, Parameter, ParameterDirection, ParameterId};
pub use parameter_collection::ParameterCollection;
pub use reader::DataReader;
pub use transaction::{IsolationLevel, Transaction, TransactionState};
