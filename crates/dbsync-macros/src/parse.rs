//! Parsing logic for the Entity derive macro.
//!
//! Extracts struct-level and field-level `#[dbsync(...)]` attributes from
//! the derive input into `EntityDef` and `FieldDef`.

use proc_macro2::Span;
use syn::{Attribute, Data, DeriveInput, Error, Field, Fields, Generics, Ident, Lit, Result, Type};

/// Parsed entity definition from a struct with `#[derive(Entity)]`.
#[derive(Debug)]
pub struct EntityDef {
    pub name: Ident,
    pub table_name: String,
    pub schema: Option<String>,
    pub insert_with_id: bool,
    pub identity_insert: bool,
    pub fields: Vec<FieldDef>,
    pub generics: Generics,
}

impl EntityDef {
    /// Fields that map to columns.
    pub fn column_fields(&self) -> Vec<&FieldDef> {
        self.fields.iter().filter(|f| !f.skip).collect()
    }
}

/// Parsed field definition.
#[derive(Debug)]
pub struct FieldDef {
    pub name: Ident,
    pub column_name: String,
    pub ty: Type,
    pub key: bool,
    pub identity: bool,
    pub excluded: bool,
    pub skip: bool,
}

pub fn parse_entity(input: &DeriveInput) -> Result<EntityDef> {
    let name = input.ident.clone();
    let generics = input.generics.clone();
    let attrs = parse_struct_attrs(&input.attrs)?;

    let fields = match &input.data {
        Data::Struct(data) => parse_fields(&data.fields)?,
        Data::Enum(_) => {
            return Err(Error::new_spanned(
                input,
                "Entity can only be derived for structs, not enums",
            ));
        }
        Data::Union(_) => {
            return Err(Error::new_spanned(
                input,
                "Entity can only be derived for structs, not unions",
            ));
        }
    };

    Ok(EntityDef {
        table_name: attrs
            .table_name
            .unwrap_or_else(|| to_snake_case(&name.to_string())),
        name,
        schema: attrs.schema,
        insert_with_id: attrs.insert_with_id,
        identity_insert: attrs.identity_insert,
        fields,
        generics,
    })
}

#[derive(Default)]
struct StructAttrs {
    table_name: Option<String>,
    schema: Option<String>,
    insert_with_id: bool,
    identity_insert: bool,
}

/// Parse struct-level `#[dbsync(...)]` attributes.
///
/// Supported keys: `table = "name"`, `schema = "name"`, `insert_with_id`,
/// `identity_insert`.
fn parse_struct_attrs(attrs: &[Attribute]) -> Result<StructAttrs> {
    let mut result = StructAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("dbsync") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("table") {
                if result.table_name.is_some() {
                    return Err(meta.error("duplicate dbsync attribute: table"));
                }
                result.table_name = Some(parse_str_value(&meta, "table name")?);
            } else if meta.path.is_ident("schema") {
                if result.schema.is_some() {
                    return Err(meta.error("duplicate dbsync attribute: schema"));
                }
                result.schema = Some(parse_str_value(&meta, "schema name")?);
            } else if meta.path.is_ident("insert_with_id") {
                result.insert_with_id = true;
            } else if meta.path.is_ident("identity_insert") {
                result.identity_insert = true;
            } else {
                return Err(meta.error(
                    "unknown dbsync attribute; expected one of: table, schema, insert_with_id, identity_insert",
                ));
            }
            Ok(())
        })?;
    }

    Ok(result)
}

fn parse_str_value(meta: &syn::meta::ParseNestedMeta<'_>, what: &str) -> Result<String> {
    let value: Lit = meta.value()?.parse()?;
    if let Lit::Str(lit_str) = value {
        Ok(lit_str.value())
    } else {
        Err(Error::new_spanned(
            value,
            format!("expected string literal for {what}"),
        ))
    }
}

/// Convert PascalCase to snake_case.
///
/// Examples:
/// - `User` -> `user`
/// - `TeamMember` -> `team_member`
/// - `HTTPServer` -> `http_server`
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let chars: Vec<char> = s.chars().collect();

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                let prev = chars[i - 1];
                let next = chars.get(i + 1).copied();
                let should_underscore = prev.is_lowercase()
                    || (prev.is_uppercase() && next.is_some_and(|n| n.is_lowercase()));
                if should_underscore {
                    result.push('_');
                }
            }
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }

    result
}

fn parse_fields(fields: &Fields) -> Result<Vec<FieldDef>> {
    match fields {
        Fields::Named(named) => named.named.iter().map(parse_field).collect(),
        Fields::Unnamed(_) => Err(Error::new(
            Span::call_site(),
            "Entity requires a struct with named fields, not a tuple struct",
        )),
        Fields::Unit => Err(Error::new(
            Span::call_site(),
            "Entity requires a struct with fields, not a unit struct",
        )),
    }
}

fn parse_field(field: &Field) -> Result<FieldDef> {
    let name = field
        .ident
        .clone()
        .ok_or_else(|| Error::new_spanned(field, "expected named field"))?;

    let attrs = parse_field_attrs(&field.attrs)?;
    let column_name = attrs.column.unwrap_or_else(|| name.to_string());

    Ok(FieldDef {
        name,
        column_name,
        ty: field.ty.clone(),
        key: attrs.key,
        identity: attrs.identity,
        excluded: attrs.excluded,
        skip: attrs.skip,
    })
}

#[derive(Default)]
struct FieldAttrs {
    column: Option<String>,
    key: bool,
    identity: bool,
    excluded: bool,
    skip: bool,
}

/// Parse all `#[dbsync(...)]` attributes on a field.
fn parse_field_attrs(attrs: &[Attribute]) -> Result<FieldAttrs> {
    let mut result = FieldAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("dbsync") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            let path = &meta.path;

            if path.is_ident("key") {
                result.key = true;
            } else if path.is_ident("identity") {
                result.identity = true;
            } else if path.is_ident("excluded") {
                result.excluded = true;
            } else if path.is_ident("skip") {
                result.skip = true;
            } else if path.is_ident("column") {
                result.column = Some(parse_str_value(&meta, "column name")?);
            } else {
                return Err(meta.error(
                    "unknown dbsync field attribute; expected one of: key, identity, excluded, skip, column",
                ));
            }
            Ok(())
        })?;
    }

    Ok(result)
}

/// Check if a type is `Option<T>`.
pub fn is_option_type(ty: &Type) -> bool {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            return segment.ident == "Option";
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("User"), "user");
        assert_eq!(to_snake_case("TeamMember"), "team_member");
        assert_eq!(to_snake_case("HTTPServer"), "http_server");
        assert_eq!(to_snake_case("UserID"), "user_id");
    }

    #[test]
    fn test_default_table_name_is_snake_case() {
        let input: DeriveInput = parse_quote! {
            struct OrderLine {
                id: i64,
            }
        };
        let def = parse_entity(&input).unwrap();
        assert_eq!(def.table_name, "order_line");
        assert_eq!(def.schema, None);
    }

    #[test]
    fn test_struct_attrs() {
        let input: DeriveInput = parse_quote! {
            #[dbsync(table = "users", schema = "main", insert_with_id, identity_insert)]
            struct User {
                id: i64,
            }
        };
        let def = parse_entity(&input).unwrap();
        assert_eq!(def.table_name, "users");
        assert_eq!(def.schema.as_deref(), Some("main"));
        assert!(def.insert_with_id);
        assert!(def.identity_insert);
    }

    #[test]
    fn test_field_attrs() {
        let input: DeriveInput = parse_quote! {
            struct User {
                #[dbsync(key, identity)]
                id: i64,
                #[dbsync(column = "full name")]
                name: String,
                #[dbsync(excluded)]
                created: String,
                #[dbsync(skip)]
                cache: Vec<u8>,
            }
        };
        let def = parse_entity(&input).unwrap();
        let id = &def.fields[0];
        assert!(id.key && id.identity && !id.excluded);
        assert_eq!(def.fields[1].column_name, "full name");
        assert!(def.fields[2].excluded);
        assert!(def.fields[3].skip);
        assert_eq!(def.column_fields().len(), 3);
    }

    #[test]
    fn test_unknown_attribute_errors() {
        let input: DeriveInput = parse_quote! {
            #[dbsync(tabel = "users")]
            struct User {
                id: i64,
            }
        };
        let err = parse_entity(&input).unwrap_err();
        assert!(err.to_string().contains("unknown dbsync attribute"));
    }

    #[test]
    fn test_duplicate_table_errors() {
        let input: DeriveInput = parse_quote! {
            #[dbsync(table = "a", table = "b")]
            struct User {
                id: i64,
            }
        };
        assert!(parse_entity(&input).is_err());
    }

    #[test]
    fn test_rejects_tuple_struct_and_enum() {
        let tuple: DeriveInput = parse_quote! { struct Pair(i64, i64); };
        assert!(parse_entity(&tuple).is_err());

        let en: DeriveInput = parse_quote! { enum Kind { A, B } };
        assert!(parse_entity(&en).is_err());
    }

    #[test]
    fn test_is_option_type() {
        let ty: Type = parse_quote!(Option<String>);
        assert!(is_option_type(&ty));
        let ty: Type = parse_quote!(String);
        assert!(!is_option_type(&ty));
    }
}
