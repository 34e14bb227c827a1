//! Forward-only cursor over queued results.
//!
//! A [`DataReader`] is bound to at most one [`Table`] at a time. `read` walks
//! its rows; `next_result` rebinds the reader to the next table waiting in the
//! connection's [`ResultQueue`]. Once the queue runs dry the reader closes and
//! every accessor reports [`MockDbError::InvalidState`].
//!
//! # Examples
//!
//! ```
//! use mockable_db::databases::mock::Connection;
//!
//! let connection = Connection::new();
//! connection.results().enqueue_scalar(42);
//! connection.results().enqueue_row_count(7);
//!
//! let mut reader = connection.create_command().execute_reader().unwrap();
//! assert!(reader.read());
//! assert_eq!(reader.get_i32(0).unwrap(), 42);
//! assert!(!reader.read());
//!
//! assert!(reader.next_result().unwrap());
//! assert!(reader.read());
//! assert_eq!(reader.get_value_by_name("recordsaffected").unwrap().as_i32().unwrap(), 7);
//!
//! assert!(!reader.next_result().unwrap());
//! assert!(reader.is_closed());
//! ```

use chrono::{DateTime, Utc};
use log::{debug, trace};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::errors::{MockDbError, MockDbResult};
use crate::queue::ResultQueue;
use crate::table::{Column, Table};
use crate::value::{Value, ValueKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    BeforeFirst,
    At(usize),
    AfterLast,
}

#[derive(Debug)]
pub struct DataReader {
    queue: ResultQueue,
    table: Option<Table>,
    cursor: Cursor,
}

macro_rules! typed_getters {
    ($($fn_name:ident => $as_fn:ident : $ty:ty),* $(,)?) => {
        $(
            pub fn $fn_name(&self, ordinal: usize) -> MockDbResult<$ty> {
                self.get_value(ordinal)?.$as_fn()
            }
        )*
    };
}

impl DataReader {
    /// Bind a reader to the next queued result.
    ///
    /// A queued fault is raised here, before any row can be read.
    ///
    /// # Errors
    ///
    /// [`MockDbError::QueueEmpty`] if nothing is queued.
    pub(crate) fn open(queue: ResultQueue) -> MockDbResult<Self> {
        let table = queue.dequeue_table()?;
        debug!("DataReader: opened on result '{}'", table.name());
        Ok(Self {
            queue,
            table: Some(table),
            cursor: Cursor::BeforeFirst,
        })
    }

    fn bound(&self) -> MockDbResult<&Table> {
        self.table
            .as_ref()
            .ok_or_else(|| MockDbError::InvalidState("the reader is closed".to_string()))
    }

    fn column(&self, ordinal: usize) -> MockDbResult<&Column> {
        let table = self.bound()?;
        table.columns().get(ordinal).ok_or(MockDbError::OutOfRange {
            index: ordinal,
            len: table.column_count(),
        })
    }

    fn current_row(&self) -> MockDbResult<&[Value]> {
        let table = self.bound()?;
        match self.cursor {
            Cursor::At(row) => Ok(&table.rows()[row]),
            _ => Err(MockDbError::no_current_row()),
        }
    }

    /// Advance to the next row. Returns `false` once the rows are exhausted.
    pub fn read(&mut self) -> bool {
        let Some(table) = &self.table else {
            return false;
        };

        let next = match self.cursor {
            Cursor::BeforeFirst => 0,
            Cursor::At(row) => row + 1,
            Cursor::AfterLast => return false,
        };

        if next < table.row_count() {
            trace!("DataReader: row {} of '{}'", next, table.name());
            self.cursor = Cursor::At(next);
            true
        } else {
            self.cursor = Cursor::AfterLast;
            false
        }
    }

    /// Rebind to the next queued result.
    ///
    /// Returns `Ok(false)` and closes the reader when nothing is left. A
    /// queued fault closes the reader and is returned as the error. A closed
    /// reader stays closed and leaves the queue alone.
    pub fn next_result(&mut self) -> MockDbResult<bool> {
        if self.is_closed() {
            return Ok(false);
        }
        self.cursor = Cursor::BeforeFirst;
        match self.queue.next_table() {
            Ok(Some(table)) => {
                debug!("DataReader: moved to result '{}'", table.name());
                self.table = Some(table);
                Ok(true)
            }
            Ok(None) => {
                self.close();
                Ok(false)
            }
            Err(e) => {
                self.close();
                Err(e)
            }
        }
    }

    pub fn close(&mut self) {
        if self.table.take().is_some() {
            debug!("DataReader: closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.table.is_none()
    }

    /// Number of columns in the current result; zero once closed.
    pub fn field_count(&self) -> usize {
        self.table.as_ref().map_or(0, Table::column_count)
    }

    pub fn has_rows(&self) -> bool {
        self.table.as_ref().is_some_and(|t| t.row_count() > 0)
    }

    pub fn get_name(&self, ordinal: usize) -> MockDbResult<&str> {
        Ok(&self.column(ordinal)?.name)
    }

    /// Ordinal of the first column whose name matches, ignoring case.
    pub fn get_ordinal(&self, name: &str) -> MockDbResult<usize> {
        self.bound()?
            .ordinal(name)
            .ok_or_else(|| MockDbError::NotFound(format!("column '{}'", name)))
    }

    pub fn get_field_kind(&self, ordinal: usize) -> MockDbResult<ValueKind> {
        Ok(self.column(ordinal)?.kind)
    }

    pub fn get_value(&self, ordinal: usize) -> MockDbResult<&Value> {
        let row = self.current_row()?;
        row.get(ordinal).ok_or(MockDbError::OutOfRange {
            index: ordinal,
            len: row.len(),
        })
    }

    pub fn get_value_by_name(&self, name: &str) -> MockDbResult<&Value> {
        self.get_value(self.get_ordinal(name)?)
    }

    /// Copy the current row into `target`, returning how many cells were copied.
    pub fn get_values(&self, target: &mut [Value]) -> MockDbResult<usize> {
        let row = self.current_row()?;
        let count = row.len().min(target.len());
        target[..count].clone_from_slice(&row[..count]);
        Ok(count)
    }

    pub fn is_null(&self, ordinal: usize) -> MockDbResult<bool> {
        Ok(self.get_value(ordinal)?.is_null())
    }

    typed_getters!(
        get_bool => as_bool: bool,
        get_byte => as_u8: u8,
        get_i16 => as_i16: i16,
        get_i32 => as_i32: i32,
        get_i64 => as_i64: i64,
        get_f32 => as_f32: f32,
        get_f64 => as_f64: f64,
        get_char => as_char: char,
        get_datetime => as_datetime: DateTime<Utc>,
        get_guid => as_guid: Uuid,
    );

    pub fn get_string(&self, ordinal: usize) -> MockDbResult<&str> {
        self.get_value(ordinal)?.as_str()
    }

    pub fn get_bytes(&self, ordinal: usize) -> MockDbResult<&[u8]> {
        self.get_value(ordinal)?.as_bytes()
    }

    /// Concatenate the first column of every remaining row of the current result.
    ///
    /// This is the inverse of [`ResultQueue::enqueue_chunked_text`].
    pub fn read_chunked_text(&mut self) -> MockDbResult<String> {
        self.bound()?;
        let mut text = String::new();
        while self.read() {
            text.push_str(self.get_string(0)?);
        }
        Ok(text)
    }

    /// Reassemble chunked text and deserialize it.
    pub fn read_json<T: DeserializeOwned>(&mut self) -> MockDbResult<T> {
        let text = self.read_chunked_text()?;
        Ok(serde_json::from_str(&text)?)
    }
}
