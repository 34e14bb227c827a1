pub mod database;
pub mod repository;
pub mod row;

// Re-export commonly used types
pub use database::DatabaseFactory;
pub use repository::{Keyed, Repository};
pub use row::TableRow;
