//! DbSync - the SQLite adapter of a database synchronization toolkit.
//!
//! This crate bundles the pieces a synchronization tool needs to talk to a
//! SQLite file:
//!
//! - Entity metadata declared once per type with `#[derive(Entity)]`
//! - SQL text for SELECT, INSERT, UPDATE, DELETE and comments, rendered from
//!   templates that can be overridden per deployment
//! - A connection adapter that runs a query and hands back the full result
//!
//! # Quick Start
//!
//! ```ignore
//! use dbsync::prelude::*;
//!
//! #[derive(Entity)]
//! #[dbsync(table = "users")]
//! struct User {
//!     #[dbsync(key, identity)]
//!     id: i64,
//!     name: String,
//! }
//!
//! fn sync(conn: &SqliteConnection) -> Result<()> {
//!     let generator = SqliteQueryGenerator::new()?;
//!     let user = User { id: 1, name: "Ann".into() };
//!
//!     conn.execute_raw(&generator.generate_update_query(
//!         &user,
//!         &["id"],
//!         &[],
//!         &[("name", Value::from("Anne"))],
//!     )?)?;
//!
//!     let sql = generator.generate_select_query::<User>("users", &["id", "name"], None)?;
//!     let data = conn.execute_query(&sql, "users")?;
//!     generator.dispose();
//!     Ok(())
//! }
//! ```

pub use dbsync_core::{
    ColumnInfo, ConnectionError, ConnectionErrorKind, DataSet, DataTable, Database,
    DatabaseProvider, Entity, EntityInfo, Error, FieldInfo, FieldValidationError, QueryError,
    QueryErrorKind, QueryGenerator, Result, Row, TemplateError, TemplateErrorKind, TypeError,
    ValidationError, ValidationErrorKind, Value, column_equals, escape_column, escape_value,
    sql_literal, unescape_value,
};
pub use dbsync_macros::Entity;
pub use dbsync_sqlite::{
    CONNECTION_ERROR_PREFIX, DEFAULT_SCHEMA_NAME, OpenFlags, QUERY_ERROR_PREFIX, SQLITE_TEMPLATES,
    SqliteConfig, SqliteConnection, SqliteQueryGenerator, sqlite_version,
};
pub use dbsync_template::{
    CommentBindings, QueryBindings, QueryTemplates, Template, TemplateId, TemplateRenderer,
    TemplateSources,
};

/// Everything needed for typical use.
pub mod prelude {
    pub use crate::{
        DataSet, DataTable, Database, Entity, Error, QueryGenerator, Result, Row,
        SqliteConfig, SqliteConnection, SqliteQueryGenerator, Value,
    };
}
