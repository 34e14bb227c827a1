use proc_macro2::Span;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TableRowDeriveError {
    #[error("TableRow can only be derived for structs with named fields")]
    IncorrectRowType,
    #[error("Every field is skipped. A row needs at least one column")]
    NoColumns,
    #[error("Unknown column attribute '{0}'. Expected `name`, `max_length` or `skip`")]
    UnknownColumnAttribute(String),
    #[error("Duplicate column attribute '{0}'")]
    DuplicateColumnAttribute(&'static str),
    #[error("Column name must not be blank")]
    BlankColumnName,
}

impl TableRowDeriveError {
    pub fn spanned(self, span: Span) -> syn::Error {
        syn::Error::new(span, self)
    }
}
