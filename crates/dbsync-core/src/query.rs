//! Statement generation trait implemented by each provider adapter.

use crate::Result;
use crate::entity::Entity;
use crate::escape;
use crate::value::Value;
use std::borrow::Cow;

/// Renders CRUD statements and comments for one SQL dialect.
///
/// Every value and column name placed into the output goes through
/// [`escape_value`](QueryGenerator::escape_value) or
/// [`escape_column`](QueryGenerator::escape_column).
pub trait QueryGenerator {
    /// SELECT `columns` FROM the schema-qualified `table_name`.
    ///
    /// Fails before rendering anything when `table_name` is blank or
    /// `columns` is empty. A blank `schema` falls back to the entity's schema,
    /// then to the provider default.
    fn generate_select_query<T: Entity>(
        &self,
        table_name: &str,
        columns: &[&str],
        schema: Option<&str>,
    ) -> Result<String>;

    /// UPDATE with a SET clause built from `edited_properties` (in the given
    /// order) and a WHERE clause built from the key columns' current values.
    fn generate_update_query<T: Entity>(
        &self,
        entity: &T,
        key_columns: &[&str],
        excluded_columns: &[&str],
        edited_properties: &[(&str, Value)],
    ) -> Result<String>;

    /// DELETE with a WHERE clause built from the key columns.
    fn generate_delete_query<T: Entity>(&self, entity: &T, key_columns: &[&str]) -> Result<String>;

    /// INSERT of every non-excluded column of the entity.
    fn generate_insert_query<T: Entity>(
        &self,
        entity: &T,
        key_columns: &[&str],
        excluded_columns: &[&str],
    ) -> Result<String>;

    /// Single-line or block comment, chosen by whether `comment` spans lines.
    /// Blank input yields an empty string.
    fn generate_comment(&self, comment: &str) -> Result<String>;

    /// Text placed between statements of a batch script.
    fn generate_batch_separator(&self) -> String;

    /// `column = 'value'` predicates for each key column of `entity`.
    fn get_condition<T: Entity>(&self, entity: &T, key_columns: &[&str]) -> Result<Vec<String>>;

    fn escape_value<'a>(&self, input: &'a str) -> Cow<'a, str> {
        escape::escape_value(input)
    }

    fn escape_column<'a>(&self, input: &'a str) -> Cow<'a, str> {
        escape::escape_column(input)
    }
}
