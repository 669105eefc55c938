//! Compile-time checks for the Entity derive macro.

use std::collections::HashSet;

use syn::Error;

use crate::parse::EntityDef;

/// Validate a parsed entity, combining every problem into one error.
pub fn validate_entity(entity: &EntityDef) -> Result<(), Error> {
    let mut errors = Vec::new();

    if entity.column_fields().is_empty() {
        errors.push(Error::new(
            entity.name.span(),
            "Entity must have at least one non-skipped field",
        ));
    }

    if entity.table_name.trim().is_empty() {
        errors.push(Error::new(entity.name.span(), "table name cannot be empty"));
    }

    let mut seen = HashSet::new();
    for field in entity.column_fields() {
        if field.column_name.is_empty() {
            errors.push(Error::new(field.name.span(), "column name cannot be empty"));
        }
        if !seen.insert(field.column_name.as_str()) {
            errors.push(Error::new(
                field.name.span(),
                format!("duplicate column name '{}'", field.column_name),
            ));
        }
    }

    for field in &entity.fields {
        if field.skip && (field.key || field.identity || field.excluded) {
            errors.push(Error::new(
                field.name.span(),
                "skipped fields cannot also be key, identity or excluded",
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        let mut combined = errors.remove(0);
        for err in errors {
            combined.combine(err);
        }
        Err(combined)
    }
}
