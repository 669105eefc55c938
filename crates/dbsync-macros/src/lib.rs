//! Procedural macros for DbSync.
//!
//! `#[derive(Entity)]` turns a struct into an entity the query generators can
//! work with: it emits a static `EntityInfo` describing the table and one
//! `FieldInfo` per column, plus a `to_row` that reads the current values.
//! The descriptors are built once per type; nothing is inspected at runtime.

use proc_macro::TokenStream;
use syn::ext::IdentExt;

mod parse;
mod validate;

use parse::{EntityDef, parse_entity};

/// Derive macro for the `Entity` trait.
///
/// # Attributes
///
/// Struct level:
/// - `#[dbsync(table = "name")]` - Override table name (defaults to snake_case struct name)
/// - `#[dbsync(schema = "name")]` - Schema qualifying the table
/// - `#[dbsync(insert_with_id)]` - Keep identity columns in INSERT even when excluded
/// - `#[dbsync(identity_insert)]` - Request identity-insert handling from the dialect
///
/// Field level:
/// - `#[dbsync(key)]` - Use the column in UPDATE/DELETE predicates
/// - `#[dbsync(identity)]` - Column value is generated by the database
/// - `#[dbsync(excluded)]` - Leave the column out of INSERT
/// - `#[dbsync(column = "name")]` - Override column name
/// - `#[dbsync(skip)]` - Not a column at all
///
/// # Example
///
/// ```ignore
/// use dbsync::Entity;
///
/// #[derive(Entity)]
/// #[dbsync(table = "users")]
/// struct User {
///     #[dbsync(key, identity)]
///     id: i64,
///     name: String,
///     #[dbsync(column = "e mail")]
///     email: Option<String>,
/// }
/// ```
#[proc_macro_derive(Entity, attributes(dbsync))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);

    let entity = match parse_entity(&input) {
        Ok(e) => e,
        Err(e) => return e.to_compile_error().into(),
    };

    if let Err(e) = validate::validate_entity(&entity) {
        return e.to_compile_error().into();
    }

    generate_entity_impl(&entity).into()
}

fn generate_entity_impl(entity: &EntityDef) -> proc_macro2::TokenStream {
    let name = &entity.name;
    let table_name = &entity.table_name;
    let (impl_generics, ty_generics, where_clause) = entity.generics.split_for_impl();

    let field_infos = generate_field_infos(entity);
    let to_row_body = generate_to_row(entity);

    let schema = match &entity.schema {
        Some(schema) => quote::quote! { .schema(#schema) },
        None => quote::quote! {},
    };
    let insert_with_id = entity.insert_with_id;
    let identity_insert = entity.identity_insert;

    quote::quote! {
        impl #impl_generics dbsync_core::Entity for #name #ty_generics #where_clause {
            fn entity_info() -> &'static dbsync_core::EntityInfo {
                static FIELDS: &[dbsync_core::FieldInfo] = &[
                    #field_infos
                ];
                static INFO: dbsync_core::EntityInfo = dbsync_core::EntityInfo::new(#table_name, FIELDS)
                    #schema
                    .insert_with_id(#insert_with_id, #identity_insert);
                &INFO
            }

            fn to_row(&self) -> Vec<(&'static str, dbsync_core::Value)> {
                #to_row_body
            }
        }
    }
}

fn generate_field_infos(entity: &EntityDef) -> proc_macro2::TokenStream {
    let mut field_ts = Vec::new();

    for field in entity.column_fields() {
        let field_name = field.name.unraw().to_string();
        let column_name = &field.column_name;

        let mut info = quote::quote! {
            dbsync_core::FieldInfo::new(#field_name).column(#column_name)
        };
        if field.key {
            info = quote::quote! { #info.key() };
        }
        if field.identity {
            info = quote::quote! { #info.identity() };
        }
        if field.excluded {
            info = quote::quote! { #info.excluded() };
        }
        field_ts.push(info);
    }

    quote::quote! { #(#field_ts),* }
}

fn generate_to_row(entity: &EntityDef) -> proc_macro2::TokenStream {
    let mut conversions = Vec::new();

    for field in entity.column_fields() {
        let field_name = &field.name;
        let column_name = &field.column_name;

        if parse::is_option_type(&field.ty) {
            conversions.push(quote::quote! {
                (#column_name, match &self.#field_name {
                    Some(v) => dbsync_core::Value::from(v.clone()),
                    None => dbsync_core::Value::Null,
                })
            });
        } else {
            conversions.push(quote::quote! {
                (#column_name, dbsync_core::Value::from(self.#field_name.clone()))
            });
        }
    }

    quote::quote! {
        vec![#(#conversions),*]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::{DeriveInput, parse_quote};

    fn expand(input: DeriveInput) -> String {
        generate_entity_impl(&parse_entity(&input).unwrap()).to_string()
    }

    #[test]
    fn test_generated_impl_carries_metadata() {
        let out = expand(parse_quote! {
            #[dbsync(table = "users", schema = "main")]
            struct User {
                #[dbsync(key, identity)]
                id: i64,
                name: String,
            }
        });
        assert!(out.contains("dbsync_core :: Entity for User"));
        assert!(out.contains("\"users\""));
        assert!(out.contains(". schema (\"main\")"));
        assert!(out.contains(". key ()"));
        assert!(out.contains(". identity ()"));
    }

    #[test]
    fn test_skipped_fields_are_not_emitted() {
        let out = expand(parse_quote! {
            struct Note {
                id: i64,
                #[dbsync(skip)]
                scratch: String,
            }
        });
        assert!(!out.contains("scratch"));
    }

    #[test]
    fn test_option_fields_map_none_to_null() {
        let out = expand(parse_quote! {
            struct Note {
                id: i64,
                body: Option<String>,
            }
        });
        assert!(out.contains("Value :: Null"));
    }
}
