use thiserror::Error;

use crate::fault::SqlFault;
use crate::value::ValueKind;

pub type MockDbResult<T> = Result<T, MockDbError>;

#[derive(Error, Debug)]
pub enum MockDbError {
    #[error("Type Mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Out Of Range: index {index} is out of range for length {len}")]
    OutOfRange { index: usize, len: usize },

    #[error("Null Argument: {0}")]
    NullArgument(&'static str),

    #[error("Invalid State: {0}")]
    InvalidState(String),

    #[error("Validation Error: {0}")]
    Validation(String),

    #[error("Null Not Allowed: column '{column}' does not allow nulls")]
    NullNotAllowed { column: String },

    #[error("Length Error: column '{column}' allows {max_length} characters, got {actual}")]
    Length {
        column: String,
        max_length: usize,
        actual: usize,
    },

    #[error("Invalid Cast: cannot read a {found} value as {requested}")]
    InvalidCast {
        requested: &'static str,
        found: ValueKind,
    },

    #[error("Result queue is empty")]
    QueueEmpty,

    #[error(transparent)]
    Sql(#[from] SqlFault),

    #[error(transparent)]
    Domain(#[from] anyhow::Error),

    #[error("Operation was cancelled")]
    Cancelled,

    #[error("Runtime Error: {0}")]
    Runtime(#[from] std::io::Error),

    #[error("Json Error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MockDbError {
    pub(crate) fn type_mismatch<E: ?Sized>(found: impl Into<String>) -> Self {
        MockDbError::TypeMismatch {
            expected: std::any::type_name::<E>().to_string(),
            found: found.into(),
        }
    }

    pub(crate) fn no_current_row() -> Self {
        MockDbError::InvalidState("no row is currently positioned".to_string())
    }
}
