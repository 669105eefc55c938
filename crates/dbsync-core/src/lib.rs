//! Core types and traits for the DbSync SQLite adapter.
//!
//! This crate provides the shared vocabulary of the adapter crates:
//!
//! - `Entity` trait and its static `EntityInfo`/`FieldInfo` metadata
//! - `Value`, `Row` and the `DataTable`/`DataSet` result containers
//! - `Database` and `QueryGenerator` traits implemented per provider
//! - Value and identifier escaping for generated SQL text
//! - The `Error` type shared by all crates

pub mod database;
pub mod entity;
pub mod error;
pub mod escape;
pub mod query;
pub mod row;
pub mod table;
pub mod value;

pub use database::{Database, DatabaseProvider};
pub use entity::{Entity, EntityInfo, FieldInfo};
pub use error::{
    ConnectionError, ConnectionErrorKind, Error, FieldValidationError, QueryError,
    QueryErrorKind, Result, TemplateError, TemplateErrorKind, TypeError, ValidationError,
    ValidationErrorKind,
};
pub use escape::{column_equals, escape_column, escape_value, sql_literal, unescape_value};
pub use query::QueryGenerator;
pub use row::{ColumnInfo, Row};
pub use table::{DataSet, DataTable};
pub use value::Value;
