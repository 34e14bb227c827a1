//! The seam data-access code depends on instead of a concrete driver.

use crate::databases::mock::DbType;
use crate::value::Value;

/// Hands out connections and driver-specific parameters.
///
/// Data-access code written against this trait can be handed a
/// [`MockDatabase`](crate::databases::mock::MockDatabase) in tests.
///
/// # Examples
///
/// ```
/// use mockable_db::databases::mock::{DbType, MockDatabase};
/// use mockable_db::traits::database::DatabaseFactory;
/// use mockable_db::value::Value;
///
/// fn count_orders<D>(db: &D) -> i32
/// where
///     D: DatabaseFactory<Connection = mockable_db::databases::mock::Connection>,
/// {
///     let connection = db.connection();
///     let command = connection.create_command();
///     command.execute_non_query().unwrap_or_default()
/// }
///
/// let db = MockDatabase::new();
/// db.results().enqueue_row_count(12);
/// assert_eq!(count_orders(&db), 12);
///
/// let p = db.create_sized_parameter("@name", DbType::AnsiString, 20, Value::from("x"));
/// assert_eq!(p.size, 20);
/// ```
pub trait DatabaseFactory {
    type Connection;
    type Parameter;

    fn connection(&self) -> Self::Connection;

    fn create_parameter(&self, name: &str, db_type: DbType, value: Value) -> Self::Parameter;

    fn create_sized_parameter(
        &self,
        name: &str,
        db_type: DbType,
        size: i32,
        value: Value,
    ) -> Self::Parameter;
}
