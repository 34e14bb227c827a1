//! Tabular result payloads.
//!
//! A [`Table`] is an ordered list of [`Column`] definitions plus the rows that
//! conform to them. Every way of adding a row goes through the same checks, so
//! a table can never hold a row whose width, kinds, nullability or text lengths
//! disagree with its schema.
//!
//! # Examples
//!
//! ```
//! use mockable_db::table::{Column, Table};
//! use mockable_db::value::{Value, ValueKind};
//!
//! let table = Table::build(
//!     1..=3,
//!     vec![
//!         Column::new("Id", ValueKind::Int32),
//!         Column::builder().name("Label").kind(ValueKind::String).max_length(8).build(),
//!     ],
//!     |i| Some(vec![Value::from(i), Value::from(format!("row {i}"))]),
//! )
//! .unwrap();
//!
//! assert_eq!(table.row_count(), 3);
//! assert_eq!(table.ordinal("label"), Some(1));
//! ```

use serde::Serialize;
use typed_builder::TypedBuilder;

use crate::errors::{MockDbError, MockDbResult};
use crate::traits::row::TableRow;
use crate::value::{Value, ValueKind};

/// Schema entry for one column of a [`Table`].
#[derive(Debug, Clone, PartialEq, Serialize, TypedBuilder)]
#[builder(doc)]
pub struct Column {
    /// Column name, matched case-insensitively by ordinal lookups
    #[builder(setter(into))]
    pub name: String,

    /// Declared kind every non-null cell must carry
    pub kind: ValueKind,

    /// Whether null cells are accepted
    #[builder(default = true)]
    pub nullable: bool,

    /// Maximum character length for text cells
    #[builder(default, setter(strip_option))]
    pub max_length: Option<usize>,
}

impl Column {
    /// A nullable column with no length limit.
    pub fn new<N: Into<String>>(name: N, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            kind,
            nullable: true,
            max_length: None,
        }
    }

    fn check(&self, cell: &Value) -> MockDbResult<()> {
        if cell.is_null() {
            if !self.nullable {
                return Err(MockDbError::NullNotAllowed {
                    column: self.name.clone(),
                });
            }
            return Ok(());
        }

        if cell.kind() != self.kind {
            return Err(MockDbError::TypeMismatch {
                expected: format!("{} (column '{}')", self.kind, self.name),
                found: cell.kind().to_string(),
            });
        }

        if let (Some(max_length), Some(actual)) = (self.max_length, cell.text_len())
            && actual > max_length
        {
            return Err(MockDbError::Length {
                column: self.name.clone(),
                max_length,
                actual,
            });
        }

        Ok(())
    }
}

/// A named, schema-checked set of rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create a table with the given schema and no rows.
    ///
    /// Column names must be unique, compared case-insensitively.
    pub fn new<N: Into<String>>(name: N, columns: Vec<Column>) -> MockDbResult<Self> {
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| names_match(&c.name, &column.name)) {
                return Err(MockDbError::Duplicate(format!(
                    "column '{}' is declared more than once",
                    column.name
                )));
            }
        }

        Ok(Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        })
    }

    /// A table with no columns and no rows.
    pub fn empty() -> Self {
        Self {
            name: "Empty".to_string(),
            ..Default::default()
        }
    }

    /// Assemble a table whose rows are valid by construction.
    pub(crate) fn from_trusted<N: Into<String>>(
        name: N,
        columns: Vec<Column>,
        rows: Vec<Vec<Value>>,
    ) -> Self {
        Self {
            name: name.into(),
            columns,
            rows,
        }
    }

    /// One column, one row, typed after the value itself.
    pub(crate) fn single_cell(column: &str, value: Value) -> Self {
        Self::from_trusted(
            "Table",
            vec![Column::new(column, value.kind())],
            vec![vec![value]],
        )
    }

    /// Build a table by projecting every item into a row.
    ///
    /// # Errors
    ///
    /// * [`MockDbError::Validation`] if `columns` is empty or a projected row is
    ///   wider than the schema
    /// * [`MockDbError::NullArgument`] if `projector` returns `None`
    /// * [`MockDbError::NullNotAllowed`] if a short row leaves a non-nullable
    ///   column unfilled, or a cell is null in a non-nullable column
    /// * [`MockDbError::TypeMismatch`] if a cell's kind differs from its column
    /// * [`MockDbError::Length`] if a text cell exceeds its column's `max_length`
    pub fn build<T, I, F>(items: I, columns: Vec<Column>, mut projector: F) -> MockDbResult<Self>
    where
        I: IntoIterator<Item = T>,
        F: FnMut(T) -> Option<Vec<Value>>,
    {
        if columns.is_empty() {
            return Err(MockDbError::Validation(
                "a table needs at least one column".to_string(),
            ));
        }

        let mut table = Table::new("Table", columns)?;
        for item in items {
            let cells = projector(item).ok_or(MockDbError::NullArgument("projected row"))?;
            table.push_row(cells)?;
        }

        Ok(table)
    }

    /// Build a table from values that describe their own schema.
    pub fn from_rows<R: TableRow>(rows: &[R]) -> MockDbResult<Self> {
        Self::build(rows, R::columns(), |row| Some(row.to_row()))
    }

    /// Append one row, padding missing trailing cells with nulls.
    pub fn push_row(&mut self, mut cells: Vec<Value>) -> MockDbResult<()> {
        if cells.len() > self.columns.len() {
            return Err(MockDbError::Validation(format!(
                "row has {} cells but table '{}' declares {} columns",
                cells.len(),
                self.name,
                self.columns.len()
            )));
        }
        cells.resize(self.columns.len(), Value::Null);

        for (column, cell) in self.columns.iter().zip(&cells) {
            column.check(cell)?;
        }

        self.rows.push(cells);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of the first column whose name matches, ignoring case.
    pub fn ordinal(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| names_match(&c.name, name))
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(column))
    }
}

/// Case-insensitive name comparison shared by columns and parameters.
pub(crate) fn names_match(left: &str, right: &str) -> bool {
    left.to_lowercase() == right.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn two_columns() -> Vec<Column> {
        vec![
            Column::new("Column0", ValueKind::Int32),
            Column::new("Column1", ValueKind::String),
        ]
    }

    #[test]
    fn build_projects_each_item() {
        let table = Table::build(1..=5, two_columns(), |i| {
            Some(vec![Value::from(i), Value::from(i.to_string())])
        })
        .unwrap();

        assert_eq!(table.row_count(), 5);
        for (row, i) in table.rows().iter().zip(1..=5) {
            assert_eq!(row, &vec![Value::from(i), Value::from(i.to_string())]);
        }
    }

    #[test]
    fn build_without_columns_fails() {
        let err = Table::build(1..=5, vec![], |i: i32| Some(vec![Value::from(i)])).unwrap_err();
        assert_matches!(err, MockDbError::Validation(_));
    }

    #[test]
    fn build_with_too_many_cells_fails() {
        let err = Table::build(1..=5, vec![Column::new("Column0", ValueKind::Int32)], |i| {
            Some(vec![Value::from(i), Value::from(i.to_string())])
        })
        .unwrap_err();
        assert_matches!(err, MockDbError::Validation(_));
    }

    #[test]
    fn short_rows_fill_nullable_columns() {
        let mut columns = two_columns();
        columns.push(Column::builder().name("Column2").kind(ValueKind::String).nullable(true).build());

        let table = Table::build(1..=5, columns, |i| {
            Some(vec![Value::from(i), Value::from(i.to_string())])
        })
        .unwrap();

        assert!(table.rows().iter().all(|r| r.len() == 3 && r[2].is_null()));
    }

    #[test]
    fn short_rows_reject_non_nullable_columns() {
        let mut columns = two_columns();
        columns.push(Column::builder().name("Column2").kind(ValueKind::String).nullable(false).build());

        let err = Table::build(1..=5, columns, |i| {
            Some(vec![Value::from(i), Value::from(i.to_string())])
        })
        .unwrap_err();
        assert_matches!(err, MockDbError::NullNotAllowed { column } if column == "Column2");
    }

    #[test]
    fn wrong_kind_is_rejected() {
        let columns = vec![
            Column::new("Column0", ValueKind::Guid),
            Column::new("Column1", ValueKind::String),
        ];
        let err = Table::build(1..=5, columns, |i| {
            Some(vec![Value::from(i), Value::from(i.to_string())])
        })
        .unwrap_err();
        assert_matches!(err, MockDbError::TypeMismatch { .. });
    }

    #[test]
    fn text_longer_than_max_length_is_rejected() {
        let columns = vec![
            Column::new("Column0", ValueKind::Int32),
            Column::builder().name("Column1").kind(ValueKind::String).max_length(3).build(),
        ];
        let err = Table::build(1..=5, columns, |i| {
            Some(vec![Value::from(i), Value::from("1".repeat(i as usize))])
        })
        .unwrap_err();
        assert_matches!(
            err,
            MockDbError::Length { max_length: 3, actual: 4, .. }
        );
    }

    #[test]
    fn projector_returning_none_is_null_argument() {
        let err = Table::build(1..=5, two_columns(), |_| None).unwrap_err();
        assert_matches!(err, MockDbError::NullArgument(_));
    }

    #[test]
    fn duplicate_column_names_are_rejected() {
        let columns = vec![
            Column::new("Id", ValueKind::Int32),
            Column::new("ID", ValueKind::Int32),
        ];
        assert_matches!(Table::new("t", columns), Err(MockDbError::Duplicate(_)));
    }
}
