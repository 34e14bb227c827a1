//! Prelude module for convenient imports.
//!
//! This module re-exports the types and traits a test usually needs,
//! so a single glob import is enough to script a mock database.
//!
//! # Usage
//!
//! ```
//! use mockable_db::prelude::*;
//!
//! let db = MockDatabase::new();
//! db.results().enqueue_scalar(42);
//!
//! let connection = db.connection();
//! let value = connection.create_command().execute_scalar()?;
//! assert_eq!(value, Some(Value::Int32(42)));
//! # Ok::<(), MockDbError>(())
//! ```
//!
//! # What's Included
//!
//! ## Mock Driver
//!
//! - [`MockDatabase`]: shared owner of a result queue
//! - [`Connection`], [`Command`], [`DataReader`], [`Transaction`]
//! - [`Parameter`], [`ParameterCollection`], [`DbType`]
//!
//! ## Scripting Results
//!
//! - [`ResultQueue`]: the FIFO commands draw from
//! - [`Table`], [`Column`]: tabular payloads
//! - [`FaultDescriptor`]: a queued failure
//! - [`Value`], [`ValueKind`]: cell values and their kinds
//!
//! ## Traits
//!
//! - [`DatabaseFactory`]: the connection/parameter seam
//! - [`Repository`], [`Keyed`]: the CRUD contract
//! - [`TableRow`]: self-describing rows, derivable with `#[derive(TableRow)]`
//!
//! ## Error Handling
//!
//! - [`MockDbError`]: the single error type
//! - [`MockDbResult`]: Result alias (`Result<T, MockDbError>`)
//!
//! # Not Included
//!
//! [`MemoryRepository`](crate::databases::memory::MemoryRepository) and the
//! configuration types are imported from their own modules.

// Mock driver
pub use crate::databases::mock::{
    Command, Connection, DataReader, DbType, MockDatabase, Parameter, ParameterCollection,
    Transaction,
};

// Scripting results
pub use crate::fault::FaultDescriptor;
pub use crate::queue::ResultQueue;
pub use crate::table::{Column, Table};
pub use crate::value::{Value, ValueKind};

// Traits
pub use crate::traits::{DatabaseFactory, Keyed, Repository};
// Both the trait and its derive
pub use crate::TableRow;

// Error handling
pub use crate::errors::{MockDbError, MockDbResult};
