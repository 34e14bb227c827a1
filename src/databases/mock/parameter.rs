//! Named, typed command parameters.

use std::sync::atomic::{AtomicU64, Ordering};

use derive_more::Display;
use strum::{EnumIter, EnumString};
use typed_builder::TypedBuilder;

use crate::value::Value;

static NEXT_PARAMETER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a [`Parameter`].
///
/// Clones share the identity of the parameter they were cloned from, so a
/// clone counts as the same instance for duplicate checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display("#{_0}")]
pub struct ParameterId(u64);

impl ParameterId {
    fn next() -> Self {
        ParameterId(NEXT_PARAMETER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Driver-neutral type tag of a parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, strum::Display, EnumString, EnumIter)]
pub enum DbType {
    AnsiString,
    Binary,
    Byte,
    Boolean,
    Currency,
    Date,
    DateTime,
    Decimal,
    Double,
    Guid,
    Int16,
    Int32,
    Int64,
    Object,
    SByte,
    Single,
    #[default]
    String,
    Time,
    UInt16,
    UInt32,
    UInt64,
    VarNumeric,
    AnsiStringFixedLength,
    StringFixedLength,
    Xml,
    DateTime2,
    DateTimeOffset,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, strum::Display, EnumString, EnumIter)]
pub enum ParameterDirection {
    #[default]
    Input,
    Output,
    InputOutput,
    ReturnValue,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, strum::Display, EnumString, EnumIter)]
pub enum DataRowVersion {
    Original,
    #[default]
    Current,
    Proposed,
    Default,
}

/// A single command parameter.
///
/// # Examples
///
/// ```
/// use mockable_db::databases::mock::{DbType, Parameter};
///
/// let mut p = Parameter::builder()
///     .name("@id")
///     .db_type(DbType::Int32)
///     .value(42)
///     .build();
/// assert_eq!(p.value.as_i32().unwrap(), 42);
///
/// p.reset_db_type();
/// assert_eq!(p.db_type, DbType::String);
/// ```
#[derive(Debug, Clone, PartialEq, TypedBuilder)]
#[builder(doc)]
pub struct Parameter {
    #[builder(default = ParameterId::next(), setter(skip))]
    id: ParameterId,

    /// Name, compared case-insensitively within a collection
    #[builder(default, setter(into))]
    pub name: String,

    #[builder(default)]
    pub db_type: DbType,

    #[builder(default)]
    pub direction: ParameterDirection,

    #[builder(default)]
    pub nullable: bool,

    #[builder(default)]
    pub size: i32,

    #[builder(default)]
    pub precision: u8,

    #[builder(default)]
    pub scale: u8,

    #[builder(default, setter(into))]
    pub source_column: String,

    #[builder(default)]
    pub source_column_null_mapping: bool,

    #[builder(default)]
    pub source_version: DataRowVersion,

    #[builder(default, setter(into))]
    pub value: Value,
}

impl Default for Parameter {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Parameter {
    /// A fresh input parameter of type `String` with a null value.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named<N: Into<String>, V: Into<Value>>(name: N, value: V) -> Self {
        Self::builder().name(name).value(value).build()
    }

    pub fn id(&self) -> ParameterId {
        self.id
    }

    /// Restore the default `String` type.
    pub fn reset_db_type(&mut self) {
        self.db_type = DbType::default();
    }

    /// Whether `other` is this very parameter (or a clone of it).
    pub fn is_same(&self, other: &Parameter) -> bool {
        self.id == other.id
    }
}
