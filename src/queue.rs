//! The scripted result queue.
//!
//! Test setup code pushes results into a [`ResultQueue`] ahead of time. Each
//! command execution, and each [`DataReader::next_result`](crate::databases::mock::DataReader::next_result)
//! call, takes the next one off the front. A queued [`FaultDescriptor`] is
//! raised at exactly that point, never earlier.
//!
//! The queue is a shared handle: cloning it never copies the pending results.
//! Every connection built from the same [`MockDatabase`](crate::databases::mock::MockDatabase)
//! drains one FIFO.
//!
//! # Examples
//!
//! ```
//! use mockable_db::queue::{QueuedResult, ResultQueue};
//!
//! let queue = ResultQueue::new();
//! queue.enqueue_row_count(3);
//! queue.enqueue_chunked_text(&"x".repeat(4500));
//! assert_eq!(queue.len(), 2);
//!
//! match queue.dequeue().unwrap() {
//!     QueuedResult::Table(t) => assert_eq!(t.cell(0, 0).unwrap().as_i32().unwrap(), 3),
//!     QueuedResult::Fault(_) => unreachable!(),
//! }
//! ```

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use log::debug;
use serde::Serialize;

use crate::errors::{MockDbError, MockDbResult};
use crate::fault::FaultDescriptor;
use crate::table::{Column, Table};
use crate::traits::row::TableRow;
use crate::value::{Value, ValueKind};

/// Characters per row produced by [`ResultQueue::enqueue_chunked_text`].
pub const DEFAULT_CHUNK_SIZE: usize = 2000;

pub const SCALAR_COLUMN: &str = "Scalar";
pub const ROW_COUNT_COLUMN: &str = "RecordsAffected";
pub const TEXT_COLUMN: &str = "Json";

/// One pending outcome.
#[derive(Debug)]
pub enum QueuedResult {
    Table(Table),
    Fault(FaultDescriptor),
}

#[derive(Debug)]
struct QueueInner {
    pending: VecDeque<QueuedResult>,
    chunk_size: usize,
}

/// Shared FIFO of pending results.
#[derive(Debug, Clone)]
pub struct ResultQueue {
    inner: Rc<RefCell<QueueInner>>,
}

impl Default for ResultQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultQueue {
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }

    /// A queue whose chunked-text results split every `chunk_size` characters.
    ///
    /// A zero chunk size is treated as one.
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            inner: Rc::new(RefCell::new(QueueInner {
                pending: VecDeque::new(),
                chunk_size: chunk_size.max(1),
            })),
        }
    }

    fn push(&self, result: QueuedResult) {
        let mut inner = self.inner.borrow_mut();
        inner.pending.push_back(result);
        debug!("ResultQueue: {} result(s) pending", inner.pending.len());
    }

    /// Queue a table. `None` stands for a result with no rows.
    pub fn enqueue_table(&self, table: Option<Table>) {
        self.push(QueuedResult::Table(table.unwrap_or_else(Table::empty)));
    }

    /// Queue a result with no columns and no rows.
    pub fn enqueue_empty(&self) {
        self.push(QueuedResult::Table(Table::empty()));
    }

    /// Queue a one-cell `Scalar` table typed after the value.
    pub fn enqueue_scalar<V: Into<Value>>(&self, value: V) {
        self.push(QueuedResult::Table(Table::single_cell(
            SCALAR_COLUMN,
            value.into(),
        )));
    }

    /// Queue a one-cell `RecordsAffected` table.
    pub fn enqueue_row_count(&self, count: i32) {
        self.push(QueuedResult::Table(Table::single_cell(
            ROW_COUNT_COLUMN,
            Value::Int32(count),
        )));
    }

    /// Queue `text` as a `Json` table holding one row per chunk.
    ///
    /// Chunking stops once the remaining text is blank, so blank input
    /// queues nothing at all.
    pub fn enqueue_chunked_text(&self, text: &str) {
        let chunk_size = self.inner.borrow().chunk_size;
        let chunks = split_chunks(text, chunk_size);
        if chunks.is_empty() {
            debug!("ResultQueue: blank text, nothing queued");
            return;
        }

        let rows = chunks
            .into_iter()
            .map(|chunk| vec![Value::String(chunk)])
            .collect();
        self.push(QueuedResult::Table(Table::from_trusted(
            "Table",
            vec![Column::new(TEXT_COLUMN, ValueKind::String)],
            rows,
        )));
    }

    /// Serialize `value` to JSON and queue it as chunked text.
    pub fn enqueue_json<T: Serialize + ?Sized>(&self, value: &T) -> MockDbResult<()> {
        let text = serde_json::to_string(value)?;
        self.enqueue_chunked_text(&text);
        Ok(())
    }

    /// Queue a table built from self-describing rows.
    pub fn enqueue_rows<R: TableRow>(&self, rows: &[R]) -> MockDbResult<()> {
        let table = Table::from_rows(rows)?;
        self.push(QueuedResult::Table(table));
        Ok(())
    }

    /// Queue a fault to be raised when its turn comes.
    pub fn enqueue_fault(&self, fault: FaultDescriptor) {
        self.push(QueuedResult::Fault(fault));
    }

    /// Take the next pending result.
    ///
    /// # Errors
    ///
    /// [`MockDbError::QueueEmpty`] if nothing is pending.
    pub fn dequeue(&self) -> MockDbResult<QueuedResult> {
        self.inner
            .borrow_mut()
            .pending
            .pop_front()
            .ok_or(MockDbError::QueueEmpty)
    }

    /// Take the next pending table, raising a queued fault as an error.
    ///
    /// # Errors
    ///
    /// * [`MockDbError::QueueEmpty`] if nothing is pending
    /// * [`MockDbError::Sql`] if the next result is a fault
    pub(crate) fn dequeue_table(&self) -> MockDbResult<Table> {
        match self.dequeue()? {
            QueuedResult::Table(table) => Ok(table),
            QueuedResult::Fault(fault) => {
                debug!("ResultQueue: raising queued fault");
                Err(MockDbError::Sql(fault.into_fault()))
            }
        }
    }

    /// Like [`dequeue_table`](Self::dequeue_table), with `Ok(None)` for an empty queue.
    pub(crate) fn next_table(&self) -> MockDbResult<Option<Table>> {
        match self.dequeue_table() {
            Ok(table) => Ok(Some(table)),
            Err(MockDbError::QueueEmpty) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().pending.is_empty()
    }

    /// Drop every pending result.
    pub fn clear(&self) {
        self.inner.borrow_mut().pending.clear();
    }

    pub fn chunk_size(&self) -> usize {
        self.inner.borrow().chunk_size
    }

    /// Whether both handles point at the same queue.
    pub fn shares_with(&self, other: &ResultQueue) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

fn split_chunks(text: &str, chunk_size: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut remaining = text;
    while !remaining.trim().is_empty() {
        let split = remaining
            .char_indices()
            .nth(chunk_size)
            .map_or(remaining.len(), |(i, _)| i);
        let (chunk, rest) = remaining.split_at(split);
        chunks.push(chunk.to_string());
        remaining = rest;
    }
    chunks
}
