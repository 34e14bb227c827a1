use syn::{Data, DeriveInput, Fields, Generics, Ident, visit::Visit};

use crate::{errors::TableRowDeriveError, item_info::row_field::RowFieldInfo};

#[derive(Default)]
pub struct RowVisitor<'ast> {
    pub name: Option<&'ast Ident>,
    pub generics: Option<&'ast Generics>,
    pub fields: Vec<RowFieldInfo<'ast>>,
    pub error: Option<syn::Error>,
}

impl<'a> Visit<'a> for RowVisitor<'a> {
    fn visit_derive_input(&mut self, i: &'a DeriveInput) {
        self.name = Some(&i.ident);
        self.generics = Some(&i.generics);

        let fields = match &i.data {
            Data::Struct(data) if matches!(data.fields, Fields::Named(_)) => &data.fields,
            _ => {
                self.push_error(TableRowDeriveError::IncorrectRowType.spanned(i.ident.span()));
                return;
            }
        };

        for field in fields {
            match RowFieldInfo::from_field(field) {
                Ok(Some(info)) => self.fields.push(info),
                Ok(None) => {}
                Err(e) => self.push_error(e),
            }
        }

        if self.fields.is_empty() && self.error.is_none() {
            self.push_error(TableRowDeriveError::NoColumns.spanned(i.ident.span()));
        }
    }
}

impl RowVisitor<'_> {
    /// Keep every error so the user sees all of them at once.
    fn push_error(&mut self, error: syn::Error) {
        match &mut self.error {
            Some(existing) => existing.combine(error),
            None => self.error = Some(error),
        }
    }
}
