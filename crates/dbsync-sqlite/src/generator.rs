//! SQLite query generator.
//!
//! Builds escaped clause fragments from entity metadata and renders them
//! through the statement templates. Nothing here touches the database.

use crate::templates::SQLITE_TEMPLATES;
use dbsync_core::{
    Entity, FieldInfo, QueryGenerator, Result, ValidationError, Value, column_equals, sql_literal,
};
use dbsync_template::{
    CommentBindings, QueryBindings, QueryTemplates, TemplateId, TemplateRenderer,
};
use serde::Serialize;
use std::path::Path;

/// Schema used when neither the caller nor the entity names one.
pub const DEFAULT_SCHEMA_NAME: &str = "main";

/// Generates SQLite statements from entity metadata.
///
/// Owns its template renderer. Call [`dispose`](Self::dispose) when done, or
/// let it drop at the end of its scope. A generator is not shared between
/// threads; create one per worker.
///
/// # Example
///
/// ```ignore
/// let generator = SqliteQueryGenerator::new()?;
/// let sql = generator.generate_delete_query(&user, &["id"])?;
/// generator.dispose();
/// ```
#[derive(Debug)]
pub struct SqliteQueryGenerator<R: TemplateRenderer = QueryTemplates> {
    renderer: R,
}

impl SqliteQueryGenerator<QueryTemplates> {
    /// A generator using the built-in SQLite templates.
    pub fn new() -> Result<Self> {
        Ok(Self::with_renderer(QueryTemplates::from_sources(&SQLITE_TEMPLATES)?))
    }

    /// A generator reading template overrides from `dir`.
    ///
    /// Files missing from `dir` fall back to the built-in bodies.
    pub fn from_template_dir(dir: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::with_renderer(QueryTemplates::load_dir(dir, &SQLITE_TEMPLATES)?))
    }
}

impl<R: TemplateRenderer> SqliteQueryGenerator<R> {
    pub fn with_renderer(renderer: R) -> Self {
        tracing::debug!("SQLite query generator created");
        Self { renderer }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Release the template renderer.
    pub fn dispose(self) {
        drop(self);
    }

    fn render<B: Serialize>(&self, id: TemplateId, bindings: &B) -> Result<String> {
        let sql = self.renderer.render_serialize(id, bindings)?;
        tracing::trace!(template = id.name(), sql = %sql, "Generated statement");
        Ok(sql)
    }

    /// Resolve `key_columns` to fields of `T`.
    ///
    /// An empty list falls back to the entity's declared key columns. Unknown
    /// names and an empty result are validation errors.
    fn key_fields<T: Entity>(&self, key_columns: &[&str]) -> Result<Vec<&'static FieldInfo>> {
        let info = T::entity_info();
        let mut errors = ValidationError::new();

        let names: Vec<&str> = if key_columns.is_empty() {
            let declared = info.key_columns();
            if !declared.is_empty() {
                tracing::warn!(
                    table = info.table_name,
                    keys = ?declared,
                    "No key columns given, using the entity's declared keys"
                );
            }
            declared
        } else {
            key_columns.to_vec()
        };

        if names.is_empty() {
            errors.add_min_items("key_columns", 1, 0);
        }

        let mut fields = Vec::with_capacity(names.len());
        for name in names {
            match info.field(name) {
                Some(field) => fields.push(field),
                None => errors.add_unknown_column(name, info.table_name),
            }
        }

        errors.into_result()?;
        Ok(fields)
    }

    fn where_clause<T: Entity>(entity: &T, keys: &[&'static FieldInfo]) -> Vec<String> {
        keys.iter()
            .map(|field| {
                let value = entity.value_of(field.column_name).unwrap_or(Value::Null);
                column_equals(field.column_name, &value, true)
            })
            .collect()
    }

    fn table_bindings<T: Entity>() -> QueryBindings {
        let info = T::entity_info();
        QueryBindings::new(info.table_name, info.schema.unwrap_or(DEFAULT_SCHEMA_NAME))
    }
}

fn is_listed(list: &[&str], field: &FieldInfo) -> bool {
    list.iter()
        .any(|name| *name == field.column_name || *name == field.name)
}

impl<R: TemplateRenderer> QueryGenerator for SqliteQueryGenerator<R> {
    #[tracing::instrument(level = "debug", skip(self, columns))]
    fn generate_select_query<T: Entity>(
        &self,
        table_name: &str,
        columns: &[&str],
        schema: Option<&str>,
    ) -> Result<String> {
        let mut errors = ValidationError::new();
        if table_name.trim().is_empty() {
            errors.add_required("table_name");
        }
        if columns.is_empty() {
            errors.add_min_items("columns", 1, 0);
        }
        for (i, column) in columns.iter().enumerate() {
            if column.trim().is_empty() {
                errors.add_required(format!("columns[{i}]"));
            }
        }
        errors.into_result()?;

        let schema = schema
            .filter(|s| !s.trim().is_empty())
            .or(T::entity_info().schema)
            .unwrap_or(DEFAULT_SCHEMA_NAME);

        let columns = columns
            .iter()
            .map(|c| self.escape_column(c).into_owned())
            .collect();

        self.render(
            TemplateId::Select,
            &QueryBindings::new(table_name, schema).columns(columns),
        )
    }

    #[tracing::instrument(level = "debug", skip_all, fields(table = T::entity_info().table_name))]
    fn generate_update_query<T: Entity>(
        &self,
        entity: &T,
        key_columns: &[&str],
        excluded_columns: &[&str],
        edited_properties: &[(&str, Value)],
    ) -> Result<String> {
        let info = T::entity_info();
        let keys = self.key_fields::<T>(key_columns)?;

        let mut errors = ValidationError::new();
        let mut set = Vec::with_capacity(edited_properties.len());
        for (name, value) in edited_properties {
            let Some(field) = info.field(name) else {
                errors.add_unknown_column(*name, info.table_name);
                continue;
            };
            if keys.iter().any(|k| k.column_name == field.column_name) {
                tracing::debug!(column = field.column_name, "Key column left out of SET");
                continue;
            }
            if is_listed(excluded_columns, field) {
                continue;
            }
            set.push(column_equals(field.column_name, value, false));
        }
        if errors.is_empty() && set.is_empty() {
            errors.add_custom(
                "edited_properties",
                "no column left to update after removing key and excluded columns",
            );
        }
        errors.into_result()?;

        let bindings = Self::table_bindings::<T>()
            .set(set)
            .where_clause(Self::where_clause(entity, &keys));
        self.render(TemplateId::Update, &bindings)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(table = T::entity_info().table_name))]
    fn generate_delete_query<T: Entity>(&self, entity: &T, key_columns: &[&str]) -> Result<String> {
        let keys = self.key_fields::<T>(key_columns)?;
        let bindings = Self::table_bindings::<T>().where_clause(Self::where_clause(entity, &keys));
        self.render(TemplateId::Delete, &bindings)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(table = T::entity_info().table_name))]
    fn generate_insert_query<T: Entity>(
        &self,
        entity: &T,
        key_columns: &[&str],
        excluded_columns: &[&str],
    ) -> Result<String> {
        let info = T::entity_info();
        let row = entity.to_row();

        let mut columns = Vec::with_capacity(info.fields.len());
        let mut values = Vec::with_capacity(info.fields.len());
        for field in info.fields {
            let excluded = field.excluded || field.identity || is_listed(excluded_columns, field);
            if excluded && !(field.identity && info.insert_with_id) {
                continue;
            }
            let value = row
                .iter()
                .find(|(name, _)| *name == field.column_name)
                .map_or(Value::Null, |(_, v)| v.clone());
            columns.push(self.escape_column(field.column_name).into_owned());
            values.push(sql_literal(&value));
        }

        let where_clause = if key_columns.is_empty() && info.key_columns().is_empty() {
            Vec::new()
        } else {
            Self::where_clause(entity, &self.key_fields::<T>(key_columns)?)
        };

        let bindings = Self::table_bindings::<T>()
            .columns(columns)
            .values(values)
            .where_clause(where_clause)
            .identity_insert(info.include_identity_insert);
        self.render(TemplateId::Insert, &bindings)
    }

    fn generate_comment(&self, comment: &str) -> Result<String> {
        if comment.trim().is_empty() {
            return Ok(String::new());
        }
        let mut bindings = CommentBindings::new(comment);
        if bindings.is_multi_line {
            // Text must not close the block comment early.
            bindings.comment = bindings.comment.replace("*/", "* /");
        }
        self.render(TemplateId::Comment, &bindings)
    }

    fn generate_batch_separator(&self) -> String {
        String::new()
    }

    fn get_condition<T: Entity>(&self, entity: &T, key_columns: &[&str]) -> Result<Vec<String>> {
        let keys = self.key_fields::<T>(key_columns)?;
        Ok(Self::where_clause(entity, &keys))
    }
}

impl<R: TemplateRenderer> Drop for SqliteQueryGenerator<R> {
    fn drop(&mut self) {
        tracing::debug!("SQLite query generator released");
    }
}
