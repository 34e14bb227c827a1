//! Scripted database faults.
//!
//! A [`FaultDescriptor`] sits in the result queue like any table would. When
//! its turn comes, the command or reader that dequeued it turns it into a
//! [`SqlFault`] and returns it as [`MockDbError::Sql`](crate::errors::MockDbError::Sql)
//! instead of handing out rows.

use std::fmt;

use typed_builder::TypedBuilder;
use uuid::Uuid;

/// One structured server error carried by a fault.
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct SqlErrorRecord {
    #[builder(default)]
    pub number: i32,
    #[builder(default)]
    pub state: u8,
    #[builder(default)]
    pub severity: u8,
    #[builder(default, setter(into))]
    pub server: String,
    #[builder(setter(into))]
    pub message: String,
    #[builder(default, setter(into))]
    pub procedure: String,
    #[builder(default)]
    pub line_number: i32,
}

impl fmt::Display for SqlErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Msg {}, Level {}, State {}: {}",
            self.number, self.severity, self.state, self.message
        )
    }
}

/// A fault waiting in the result queue.
///
/// # Examples
///
/// ```
/// use mockable_db::fault::{FaultDescriptor, SqlErrorRecord};
///
/// let fault = FaultDescriptor::builder()
///     .message("deadlock victim")
///     .errors(vec![SqlErrorRecord::builder().number(1205).message("deadlock").build()])
///     .build();
/// assert_eq!(fault.message.as_deref(), Some("deadlock victim"));
/// ```
#[derive(Debug, Default, TypedBuilder)]
#[builder(doc)]
pub struct FaultDescriptor {
    /// Message of the raised fault
    #[builder(default, setter(into, strip_option))]
    pub message: Option<String>,

    /// Structured server errors
    #[builder(default)]
    pub errors: Vec<SqlErrorRecord>,

    /// Wrapped cause, surfaced through `Error::source`
    #[builder(default, setter(strip_option))]
    pub cause: Option<anyhow::Error>,

    /// Client connection the fault is attributed to
    #[builder(default = Uuid::nil())]
    pub connection_id: Uuid,
}

impl FaultDescriptor {
    /// Consume the descriptor, producing the fault it stands for.
    pub fn into_fault(self) -> SqlFault {
        SqlFault {
            message: self
                .message
                .unwrap_or_else(|| "A scripted database fault was raised".to_string()),
            errors: self.errors,
            cause: self.cause,
            connection_id: self.connection_id,
        }
    }
}

/// The error a queued [`FaultDescriptor`] raises.
#[derive(Debug)]
pub struct SqlFault {
    message: String,
    errors: Vec<SqlErrorRecord>,
    cause: Option<anyhow::Error>,
    connection_id: Uuid,
}

impl SqlFault {
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn errors(&self) -> &[SqlErrorRecord] {
        &self.errors
    }

    pub fn cause(&self) -> Option<&anyhow::Error> {
        self.cause.as_ref()
    }

    pub fn connection_id(&self) -> Uuid {
        self.connection_id
    }
}

impl fmt::Display for SqlFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SqlFault {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        let cause: &(dyn std::error::Error + 'static) = self.cause.as_ref()?.as_ref();
        Some(cause)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn defaults_produce_a_generic_fault() {
        let fault = FaultDescriptor::default().into_fault();
        assert!(!fault.message().is_empty());
        assert!(fault.errors().is_empty());
        assert!(fault.source().is_none());
        assert_eq!(fault.connection_id(), Uuid::nil());
    }

    #[test]
    fn cause_is_exposed_as_source() {
        let fault = FaultDescriptor::builder()
            .message("Test Message")
            .cause(anyhow::anyhow!("disk on fire"))
            .build()
            .into_fault();

        assert_eq!(fault.to_string(), "Test Message");
        assert_eq!(fault.source().unwrap().to_string(), "disk on fire");
    }
}
