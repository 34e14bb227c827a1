use proc_macro2::{Literal, TokenStream};
use quote::quote;

use crate::visitors::row_visitor::RowVisitor;

impl RowVisitor<'_> {
    /// `impl ::mockable_db::traits::row::TableRow` for the visited struct.
    pub fn generate_table_row_impl(&self) -> TokenStream {
        let (Some(name), Some(generics)) = (self.name, self.generics) else {
            return TokenStream::new();
        };
        let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

        let columns = self.fields.iter().map(|f| {
            let column_name = &f.column_name;
            let ty = f.ty;
            let max_length = match f.max_length {
                Some(n) => {
                    let n = Literal::usize_unsuffixed(n);
                    quote! { ::std::option::Option::Some(#n) }
                }
                None => quote! { ::std::option::Option::None },
            };

            quote! {
                ::mockable_db::table::Column {
                    name: ::std::string::String::from(#column_name),
                    kind: <#ty as ::mockable_db::value::ColumnType>::KIND,
                    nullable: <#ty as ::mockable_db::value::ColumnType>::NULLABLE,
                    max_length: #max_length,
                }
            }
        });

        let cells = self.fields.iter().map(|f| {
            let ident = f.ident;
            quote! {
                ::mockable_db::value::Value::from(::std::clone::Clone::clone(&self.#ident))
            }
        });

        quote! {
            impl #impl_generics ::mockable_db::traits::row::TableRow for #name #ty_generics #where_clause {
                fn columns() -> ::std::vec::Vec<::mockable_db::table::Column> {
                    ::std::vec![#(#columns),*]
                }

                fn to_row(&self) -> ::std::vec::Vec<::mockable_db::value::Value> {
                    ::std::vec![#(#cells),*]
                }
            }
        }
    }
}
