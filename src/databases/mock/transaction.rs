//! Transactions that only track how they ended.
//!
//! Nothing is ever written anywhere, so commit and rollback are pure state
//! transitions. Each transaction can be finished exactly once.

use log::debug;
use strum::{Display, EnumString};
use uuid::Uuid;

use crate::errors::{MockDbError, MockDbResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString)]
pub enum IsolationLevel {
    #[default]
    Unspecified,
    Chaos,
    ReadUncommitted,
    ReadCommitted,
    RepeatableRead,
    Serializable,
    Snapshot,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display)]
pub enum TransactionState {
    #[default]
    Pending,
    Committed,
    RolledBack,
}

#[derive(Debug)]
pub struct Transaction {
    id: Uuid,
    connection_id: Uuid,
    isolation_level: IsolationLevel,
    state: TransactionState,
}

impl Transaction {
    pub(crate) fn begin(connection_id: Uuid, isolation_level: IsolationLevel) -> Self {
        let id = Uuid::new_v4();
        debug!(
            "Transaction {}: begun on connection {} ({})",
            id, connection_id, isolation_level
        );
        Self {
            id,
            connection_id,
            isolation_level,
            state: TransactionState::Pending,
        }
    }

    fn finish(&mut self, outcome: TransactionState) -> MockDbResult<()> {
        if self.state != TransactionState::Pending {
            return Err(MockDbError::InvalidState(format!(
                "transaction {} is already {}",
                self.id, self.state
            )));
        }
        debug!("Transaction {}: {}", self.id, outcome);
        self.state = outcome;
        Ok(())
    }

    pub fn commit(&mut self) -> MockDbResult<()> {
        self.finish(TransactionState::Committed)
    }

    pub fn rollback(&mut self) -> MockDbResult<()> {
        self.finish(TransactionState::RolledBack)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn connection_id(&self) -> Uuid {
        self.connection_id
    }

    pub fn isolation_level(&self) -> IsolationLevel {
        self.isolation_level
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    pub fn is_committed(&self) -> bool {
        self.state == TransactionState::Committed
    }

    pub fn is_rolled_back(&self) -> bool {
        self.state == TransactionState::RolledBack
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn starts_pending() {
        let tx = Transaction::begin(Uuid::nil(), IsolationLevel::default());
        assert_eq!(tx.state(), TransactionState::Pending);
        assert_eq!(tx.isolation_level(), IsolationLevel::Unspecified);
        assert!(!tx.is_committed());
        assert!(!tx.is_rolled_back());
    }

    #[test]
    fn finishes_only_once() {
        let mut tx = Transaction::begin(Uuid::nil(), IsolationLevel::Serializable);
        tx.commit().unwrap();
        assert!(tx.is_committed());
        assert_matches!(tx.commit(), Err(MockDbError::InvalidState(_)));
        assert_matches!(tx.rollback(), Err(MockDbError::InvalidState(_)));
        assert!(!tx.is_rolled_back());

        let mut tx = Transaction::begin(Uuid::nil(), IsolationLevel::Snapshot);
        tx.rollback().unwrap();
        assert!(tx.is_rolled_back());
        assert_matches!(tx.commit(), Err(MockDbError::InvalidState(_)));
    }
}
