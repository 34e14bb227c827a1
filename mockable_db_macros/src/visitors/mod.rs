pub mod row_visitor;
