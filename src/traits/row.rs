//! Types that know how to lay themselves out as a table row.

use crate::table::Column;
use crate::value::Value;

/// A value that describes its own column schema and projects itself into cells.
///
/// Usually derived:
///
/// ```
/// use mockable_db::TableRow;
/// use mockable_db::value::ValueKind;
///
/// #[derive(TableRow)]
/// struct Order {
///     order_id: i32,
///     #[column(name = "Customer", max_length = 40)]
///     customer_name: String,
///     shipped: Option<bool>,
/// }
///
/// let columns = Order::columns();
/// assert_eq!(columns[0].name, "OrderId");
/// assert_eq!(columns[1].name, "Customer");
/// assert_eq!(columns[1].max_length, Some(40));
/// assert_eq!(columns[2].kind, ValueKind::Bool);
/// assert!(columns[2].nullable);
/// ```
pub trait TableRow {
    fn columns() -> Vec<Column>;

    /// Cells in the same order as [`columns`](Self::columns).
    fn to_row(&self) -> Vec<Value>;
}
