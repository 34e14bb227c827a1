//! # Mockable DB
//!
//! An in-memory, scriptable stand-in for a relational database driver, plus a
//! generic CRUD repository contract with async and blocking entry points.
//!
//! ## Features
//!
//! - **Scripted results**: queue tables, scalars, row counts and chunked text
//!   ahead of time and have commands consume them in order
//! - **Fault injection**: queue a database fault and have it raised exactly
//!   where the code under test would see it
//! - **Driver-shaped API**: connections, commands, readers, transactions and
//!   parameter collections with the usual semantics
//! - **Command log**: assert on what was executed, with which parameters
//! - **Repository contract**: async CRUD primitives with blocking wrappers and
//!   a ready-made in-memory implementation
//! - **Row derive**: `#[derive(TableRow)]` turns plain structs into table rows
//!
//! ## Quick Start
//!
//! ```rust
//! use mockable_db::prelude::*;
//!
//! #[derive(TableRow)]
//! struct Customer {
//!     id: i32,
//!     name: String,
//! }
//!
//! let db = MockDatabase::new();
//! db.results().enqueue_rows(&[
//!     Customer { id: 1, name: "Ada".into() },
//!     Customer { id: 2, name: "Grace".into() },
//! ])?;
//! db.results().enqueue_fault(FaultDescriptor::builder().message("timeout").build());
//!
//! let connection = db.connection();
//! let command = connection.create_command();
//!
//! let mut reader = command.execute_reader()?;
//! let mut names = Vec::new();
//! while reader.read() {
//!     names.push(reader.get_string(reader.get_ordinal("name")?)?.to_string());
//! }
//! assert_eq!(names, ["Ada", "Grace"]);
//!
//! assert!(matches!(command.execute_scalar(), Err(MockDbError::Sql(_))));
//! # Ok::<(), MockDbError>(())
//! ```

extern crate self as mockable_db;

pub mod config;
pub mod databases;
pub mod errors;
pub mod fault;
pub mod prelude;
pub mod queue;
pub mod table;
pub mod traits;
pub mod value;

pub use errors::{MockDbError, MockDbResult};
pub use mockable_db_macros::TableRow;
pub use traits::row::TableRow;
