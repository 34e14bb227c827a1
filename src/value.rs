//! Tagged cell values and their runtime kinds.
//!
//! Every cell held by a [`Table`](crate::table::Table), every parameter value and
//! every scalar handed back by a command is a [`Value`]. Its discriminant,
//! [`ValueKind`], is what column schemas declare and what table validation
//! compares against, so type checks are an explicit tag comparison rather than
//! anything reflective.
//!
//! # Examples
//!
//! ```
//! use mockable_db::value::{Value, ValueKind};
//!
//! let v = Value::from(42);
//! assert_eq!(v.kind(), ValueKind::Int32);
//! assert_eq!(v.as_i32().unwrap(), 42);
//!
//! let missing: Value = Option::<String>::None.into();
//! assert!(missing.is_null());
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use derive_more::From;
use serde::{Deserialize, Serialize};
use strum::EnumDiscriminants;
use uuid::Uuid;

use crate::errors::{MockDbError, MockDbResult};

/// A single loosely-typed cell value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, From, EnumDiscriminants)]
#[strum_discriminants(name(ValueKind))]
#[strum_discriminants(derive(strum::Display, strum::EnumString, strum::AsRefStr, Hash, Serialize, Deserialize))]
pub enum Value {
    #[default]
    #[from(skip)]
    Null,
    Bool(bool),
    Byte(u8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt32(u32),
    UInt64(u64),
    Float(f32),
    Double(f64),
    Char(char),
    String(String),
    DateTime(DateTime<Utc>),
    Guid(Uuid),
    Bytes(Vec<u8>),
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

macro_rules! impl_value_getters {
    ($($fn_name:ident => $variant:ident : $ty:ty),* $(,)?) => {
        $(
            #[doc = concat!("Returns the `", stringify!($ty), "` held by a `", stringify!($variant), "` value.")]
            pub fn $fn_name(&self) -> MockDbResult<$ty> {
                match self {
                    Value::$variant(v) => Ok(*v),
                    other => Err(MockDbError::InvalidCast {
                        requested: stringify!($ty),
                        found: other.kind(),
                    }),
                }
            }
        )*
    };
}

impl Value {
    /// The runtime kind of this value.
    pub fn kind(&self) -> ValueKind {
        ValueKind::from(self)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    impl_value_getters!(
        as_bool => Bool: bool,
        as_u8 => Byte: u8,
        as_i16 => Int16: i16,
        as_i32 => Int32: i32,
        as_i64 => Int64: i64,
        as_u32 => UInt32: u32,
        as_u64 => UInt64: u64,
        as_f32 => Float: f32,
        as_f64 => Double: f64,
        as_char => Char: char,
        as_datetime => DateTime: DateTime<Utc>,
        as_guid => Guid: Uuid
    );

    pub fn as_str(&self) -> MockDbResult<&str> {
        match self {
            Value::String(s) => Ok(s),
            other => Err(MockDbError::InvalidCast {
                requested: "&str",
                found: other.kind(),
            }),
        }
    }

    pub fn as_bytes(&self) -> MockDbResult<&[u8]> {
        match self {
            Value::Bytes(b) => Ok(b),
            other => Err(MockDbError::InvalidCast {
                requested: "&[u8]",
                found: other.kind(),
            }),
        }
    }

    /// Interprets any integer value as an `i32` row count.
    ///
    /// Wider integers are accepted as long as they fit.
    pub fn to_row_count(&self) -> MockDbResult<i32> {
        let cast_error = || MockDbError::InvalidCast {
            requested: "i32",
            found: self.kind(),
        };
        match self {
            Value::Byte(v) => Ok(i32::from(*v)),
            Value::Int16(v) => Ok(i32::from(*v)),
            Value::Int32(v) => Ok(*v),
            Value::Int64(v) => i32::try_from(*v).map_err(|_| cast_error()),
            Value::UInt32(v) => i32::try_from(*v).map_err(|_| cast_error()),
            Value::UInt64(v) => i32::try_from(*v).map_err(|_| cast_error()),
            _ => Err(cast_error()),
        }
    }

    /// Character length of a text value, used for `max_length` checks.
    pub(crate) fn text_len(&self) -> Option<usize> {
        match self {
            Value::String(s) => Some(s.chars().count()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Byte(v) => write!(f, "{}", v),
            Value::Int16(v) => write!(f, "{}", v),
            Value::Int32(v) => write!(f, "{}", v),
            Value::Int64(v) => write!(f, "{}", v),
            Value::UInt32(v) => write!(f, "{}", v),
            Value::UInt64(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Char(v) => write!(f, "{}", v),
            Value::String(v) => write!(f, "{}", v),
            Value::DateTime(v) => write!(f, "{}", v.to_rfc3339()),
            Value::Guid(v) => write!(f, "{}", v),
            Value::Bytes(v) => write!(f, "<{} bytes>", v.len()),
        }
    }
}

/// Maps a Rust type onto the column kind it is stored as.
///
/// Used by `#[derive(TableRow)]` to declare a column per field.
pub trait ColumnType {
    const KIND: ValueKind;
    const NULLABLE: bool = false;
}

macro_rules! impl_column_type {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl ColumnType for $ty {
                const KIND: ValueKind = ValueKind::$kind;
            }
        )*
    };
}

impl_column_type!(
    bool => Bool,
    u8 => Byte,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u32 => UInt32,
    u64 => UInt64,
    f32 => Float,
    f64 => Double,
    char => Char,
    String => String,
    DateTime<Utc> => DateTime,
    Uuid => Guid,
    Vec<u8> => Bytes
);

impl<T: ColumnType> ColumnType for Option<T> {
    const KIND: ValueKind = T::KIND;
    const NULLABLE: bool = true;
}
