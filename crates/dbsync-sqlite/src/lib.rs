//! SQLite adapter for DbSync.
//!
// FFI bindings require unsafe code - this is expected for database drivers
#![allow(unsafe_code)]
//!
//! Two independent pieces:
//!
//! - [`SqliteConnection`]: opens a database file per call, runs a query and
//!   returns the rows as a [`DataSet`](dbsync_core::DataSet), or checks that
//!   the file can be opened at all.
//! - [`SqliteQueryGenerator`]: renders SELECT, INSERT, UPDATE, DELETE and
//!   comment text for an [`Entity`](dbsync_core::Entity) from the built-in
//!   SQLite templates or from overrides on disk.
//!
//! # Example
//!
//! ```rust,ignore
//! use dbsync_core::{Database, QueryGenerator};
//! use dbsync_sqlite::{SqliteConnection, SqliteQueryGenerator};
//!
//! let conn = SqliteConnection::new("app.db");
//! conn.test_connection()?;
//!
//! let generator = SqliteQueryGenerator::new()?;
//! let sql = generator.generate_select_query::<User>("users", &["id", "name"], None)?;
//! let rows = conn.execute_query(&sql, "users")?;
//! ```
//!
//! # Type Mapping
//!
//! | SQLite storage class | `Value` |
//! |----------------------|---------|
//! | INTEGER | `BigInt` |
//! | REAL | `Double` |
//! | TEXT | `Text` |
//! | BLOB | `Bytes` |
//! | NULL | `Null` |

pub mod connection;
pub mod ffi;
pub mod generator;
pub mod templates;
pub mod types;

pub use connection::{
    CONNECTION_ERROR_PREFIX, OpenFlags, QUERY_ERROR_PREFIX, SqliteConfig, SqliteConnection,
};
pub use generator::{DEFAULT_SCHEMA_NAME, SqliteQueryGenerator};
pub use templates::SQLITE_TEMPLATES;

/// Re-export the SQLite library version.
pub fn sqlite_version() -> &'static str {
    ffi::version()
}

/// Re-export the SQLite library version number.
pub fn sqlite_version_number() -> i32 {
    ffi::version_number()
}
