pub mod row_field;
