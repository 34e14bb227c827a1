use heck::ToUpperCamelCase;
use syn::{Field, Ident, LitInt, LitStr, Type, ext::IdentExt, spanned::Spanned};

use crate::errors::TableRowDeriveError;

/// One struct field that becomes a column.
pub struct RowFieldInfo<'ast> {
    pub ident: &'ast Ident,
    pub ty: &'ast Type,
    pub column_name: String,
    pub max_length: Option<usize>,
}

impl<'ast> RowFieldInfo<'ast> {
    /// Parse the `#[column(...)]` attributes of a named field.
    ///
    /// Returns `Ok(None)` for fields marked `#[column(skip)]`.
    pub fn from_field(field: &'ast Field) -> syn::Result<Option<Self>> {
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| TableRowDeriveError::IncorrectRowType.spanned(field.span()))?;

        let mut name: Option<String> = None;
        let mut max_length: Option<usize> = None;
        let mut skip = false;

        for attr in field.attrs.iter().filter(|a| a.path().is_ident("column")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    if name.is_some() {
                        return Err(meta.error(TableRowDeriveError::DuplicateColumnAttribute("name")));
                    }
                    let lit: LitStr = meta.value()?.parse()?;
                    if lit.value().trim().is_empty() {
                        return Err(TableRowDeriveError::BlankColumnName.spanned(lit.span()));
                    }
                    name = Some(lit.value());
                    Ok(())
                } else if meta.path.is_ident("max_length") {
                    if max_length.is_some() {
                        return Err(meta.error(TableRowDeriveError::DuplicateColumnAttribute(
                            "max_length",
                        )));
                    }
                    let lit: LitInt = meta.value()?.parse()?;
                    max_length = Some(lit.base10_parse()?);
                    Ok(())
                } else if meta.path.is_ident("skip") {
                    skip = true;
                    Ok(())
                } else {
                    let path = meta
                        .path
                        .get_ident()
                        .map(|i| i.to_string())
                        .unwrap_or_default();
                    Err(meta.error(TableRowDeriveError::UnknownColumnAttribute(path)))
                }
            })?;
        }

        if skip {
            return Ok(None);
        }

        Ok(Some(Self {
            ident,
            ty: &field.ty,
            column_name: name.unwrap_or_else(|| ident.unraw().to_string().to_upper_camel_case()),
            max_length,
        }))
    }
}
