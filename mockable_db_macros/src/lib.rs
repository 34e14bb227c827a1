use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input, visit::Visit};

use crate::visitors::row_visitor::RowVisitor;

mod errors;
mod generators;
mod item_info;
mod visitors;

/// Derives `mockable_db::traits::row::TableRow` for a struct with named fields.
///
/// Every field becomes one column, in declaration order. The column's kind
/// comes from the field type's `ColumnType` impl, and `Option<T>` fields
/// produce nullable columns. Each row cell is a clone of the field converted
/// into a `Value`.
///
/// # Attributes
///
/// - `#[column(name = "...")]` - **Optional**. Overrides the column name, which
///   otherwise is the field name in UpperCamelCase
/// - `#[column(max_length = N)]` - **Optional**. Longest text the column accepts
/// - `#[column(skip)]` - **Optional**. Leaves the field out of the table
///
/// # Examples
///
/// ```ignore
/// use mockable_db::TableRow;
///
/// #[derive(TableRow)]
/// pub struct Invoice {
///     pub invoice_id: i64,           // column "InvoiceId", Int64, not null
///     #[column(name = "Ref", max_length = 12)]
///     pub reference: String,         // column "Ref", String, at most 12 chars
///     pub paid_on: Option<chrono::DateTime<chrono::Utc>>, // nullable DateTime
///     #[column(skip)]
///     pub cached_total: f64,
/// }
/// ```
#[proc_macro_derive(TableRow, attributes(column))]
pub fn table_row_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let mut visitor = RowVisitor::default();
    visitor.visit_derive_input(&input);

    if let Some(error) = visitor.error.take() {
        return error.to_compile_error().into();
    }

    visitor.generate_table_row_impl().into()
}
