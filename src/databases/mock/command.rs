//! Commands executed against the scripted result queue.
//!
//! Command text and parameters are never interpreted. Every execution simply
//! takes the next queued result and shapes it for the execution mode that was
//! asked for. What was executed is appended to the owner's command log so
//! tests can assert on it afterwards.

use std::time::Duration;

use log::debug;
use strum::{Display, EnumString};
use uuid::Uuid;

use super::connection::Backing;
use super::parameter::Parameter;
use super::parameter_collection::ParameterCollection;
use super::reader::DataReader;
use super::transaction::Transaction;
use crate::errors::{MockDbError, MockDbResult};
use crate::value::Value;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString)]
pub enum CommandType {
    #[default]
    Text,
    StoredProcedure,
    TableDirect,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString)]
pub enum UpdateRowSource {
    #[default]
    None,
    OutputParameters,
    FirstReturnedRecord,
    Both,
}

/// How a command was executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ExecutionMode {
    Reader,
    Scalar,
    NonQuery,
}

/// One entry of the command log.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandRecord {
    pub text: String,
    pub command_type: CommandType,
    pub parameters: Vec<Parameter>,
    pub mode: ExecutionMode,
    pub connection_id: Uuid,
    pub transaction_id: Option<Uuid>,
}

/// A command bound to one connection's result queue.
///
/// # Examples
///
/// ```
/// use mockable_db::databases::mock::{Connection, Parameter};
///
/// let connection = Connection::new();
/// connection.results().enqueue_row_count(3);
///
/// let mut command = connection.create_command();
/// command.text = "DELETE FROM orders WHERE id = @id".into();
/// command.parameters.add(Parameter::named("@id", 9)).unwrap();
///
/// assert_eq!(command.execute_non_query().unwrap(), 3);
/// assert_eq!(command.execute_non_query().unwrap(), 0);
/// assert_eq!(connection.executed_commands().len(), 2);
/// ```
#[derive(Debug)]
pub struct Command {
    backing: Backing,
    connection_id: Uuid,
    transaction_id: Option<Uuid>,

    pub text: String,
    /// Zero means no limit
    pub timeout: Duration,
    pub command_type: CommandType,
    pub design_time_visible: bool,
    pub updated_row_source: UpdateRowSource,
    pub parameters: ParameterCollection,
}

impl Command {
    pub(crate) fn new(backing: Backing, connection_id: Uuid) -> Self {
        Self {
            backing,
            connection_id,
            transaction_id: None,
            text: String::new(),
            timeout: Duration::ZERO,
            command_type: CommandType::default(),
            design_time_visible: true,
            updated_row_source: UpdateRowSource::default(),
            parameters: ParameterCollection::new(),
        }
    }

    pub fn connection_id(&self) -> Uuid {
        self.connection_id
    }

    pub fn transaction_id(&self) -> Option<Uuid> {
        self.transaction_id
    }

    /// Enlist the command in a transaction of the same connection.
    pub fn set_transaction(&mut self, transaction: &Transaction) -> MockDbResult<()> {
        if transaction.connection_id() != self.connection_id {
            return Err(MockDbError::InvalidState(format!(
                "transaction {} belongs to connection {}, not {}",
                transaction.id(),
                transaction.connection_id(),
                self.connection_id
            )));
        }
        self.transaction_id = Some(transaction.id());
        Ok(())
    }

    pub fn clear_transaction(&mut self) {
        self.transaction_id = None;
    }

    /// A fresh parameter with default settings. It is not added to the collection.
    pub fn create_parameter(&self) -> Parameter {
        Parameter::new()
    }

    /// No-op; there is nothing running to cancel.
    pub fn cancel(&self) {}

    /// No-op; there is no server to prepare against.
    pub fn prepare(&self) {}

    fn record(&self, mode: ExecutionMode) {
        debug!(
            "Command: {} on connection {} ({} parameter(s))",
            mode,
            self.connection_id,
            self.parameters.len()
        );
        self.backing.commands.borrow_mut().push(CommandRecord {
            text: self.text.clone(),
            command_type: self.command_type,
            parameters: self.parameters.iter().cloned().collect(),
            mode,
            connection_id: self.connection_id,
            transaction_id: self.transaction_id,
        });
    }

    /// Hand the next queued result to a new reader.
    ///
    /// # Errors
    ///
    /// * [`MockDbError::Sql`] if the next result is a queued fault
    /// * [`MockDbError::QueueEmpty`] if nothing is queued
    pub fn execute_reader(&self) -> MockDbResult<DataReader> {
        self.record(ExecutionMode::Reader);
        DataReader::open(self.backing.results.clone())
    }

    /// First cell of the first row of the next queued result.
    ///
    /// `None` when that result has no rows or nothing is queued.
    pub fn execute_scalar(&self) -> MockDbResult<Option<Value>> {
        self.record(ExecutionMode::Scalar);
        self.first_cell()
    }

    /// First cell of the next queued result read as a row count.
    ///
    /// Zero when that result has no rows or nothing is queued.
    pub fn execute_non_query(&self) -> MockDbResult<i32> {
        self.record(ExecutionMode::NonQuery);
        match self.first_cell()? {
            Some(cell) => cell.to_row_count(),
            None => Ok(0),
        }
    }

    fn first_cell(&self) -> MockDbResult<Option<Value>> {
        let table = self.backing.results.next_table()?;
        Ok(table.and_then(|t| t.cell(0, 0).cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::databases::mock::Connection;
    use crate::fault::FaultDescriptor;
    use assert_matches::assert_matches;

    #[test]
    fn new_command_defaults() {
        let connection = Connection::new();
        let command = connection.create_command();

        assert!(command.text.is_empty());
        assert_eq!(command.timeout, Duration::ZERO);
        assert_eq!(command.command_type, CommandType::Text);
        assert!(command.design_time_visible);
        assert_eq!(command.updated_row_source, UpdateRowSource::None);
        assert!(command.parameters.is_empty());
        assert_eq!(command.transaction_id(), None);
        assert_eq!(command.connection_id(), connection.id());
    }

    #[test]
    fn scalar_is_none_without_rows() {
        let connection = Connection::new();
        connection.results().enqueue_table(None);
        let command = connection.create_command();

        assert_eq!(command.execute_scalar().unwrap(), None);
        assert_eq!(command.execute_scalar().unwrap(), None);
    }

    #[test]
    fn empty_queue_in_every_mode() {
        let connection = Connection::new();
        let command = connection.create_command();

        assert_matches!(command.execute_reader(), Err(MockDbError::QueueEmpty));
        assert_eq!(command.execute_scalar().unwrap(), None);
        assert_eq!(command.execute_non_query().unwrap(), 0);
        assert_eq!(connection.executed_commands().len(), 3);
    }

    #[test]
    fn non_query_rejects_non_integers() {
        let connection = Connection::new();
        connection.results().enqueue_scalar("three");
        let command = connection.create_command();

        assert_matches!(
            command.execute_non_query(),
            Err(MockDbError::InvalidCast { .. })
        );
    }

    #[test]
    fn faults_are_raised_in_every_mode() {
        let connection = Connection::new();
        for _ in 0..3 {
            connection.results().enqueue_fault(FaultDescriptor::default());
        }
        let command = connection.create_command();

        assert_matches!(command.execute_reader(), Err(MockDbError::Sql(_)));
        assert_matches!(command.execute_scalar(), Err(MockDbError::Sql(_)));
        assert_matches!(command.execute_non_query(), Err(MockDbError::Sql(_)));
        assert!(connection.results().is_empty());
    }

    #[test]
    fn executions_are_logged_with_their_transaction() {
        let connection = Connection::new();
        let tx = connection.begin_transaction();
        let mut command = connection.create_command();
        command.text = "SELECT 1".into();
        command.set_transaction(&tx).unwrap();
        command.parameters.add(Parameter::named("@a", 1)).unwrap();

        command.execute_scalar().unwrap();

        let log = connection.executed_commands();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].text, "SELECT 1");
        assert_eq!(log[0].mode, ExecutionMode::Scalar);
        assert_eq!(log[0].transaction_id, Some(tx.id()));
        assert_eq!(log[0].parameters[0].name, "@a");
    }

    #[test]
    fn foreign_transactions_are_rejected() {
        let first = Connection::new();
        let second = Connection::new();
        let tx = second.begin_transaction();

        let mut command = first.create_command();
        assert_matches!(command.set_transaction(&tx), Err(MockDbError::InvalidState(_)));
    }
}
