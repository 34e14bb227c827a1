pub mod table_row;
