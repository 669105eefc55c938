//! Database connection trait implemented by each provider adapter.

use crate::Result;
use crate::table::DataSet;
use std::fmt;

/// The database engines the synchronization toolkit knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatabaseProvider {
    SqlServer,
    MySql,
    PostgreSql,
    Sqlite,
}

impl DatabaseProvider {
    /// Human-readable provider name.
    pub const fn name(self) -> &'static str {
        match self {
            DatabaseProvider::SqlServer => "SQL Server",
            DatabaseProvider::MySql => "MySQL",
            DatabaseProvider::PostgreSql => "PostgreSQL",
            DatabaseProvider::Sqlite => "SQLite",
        }
    }
}

impl fmt::Display for DatabaseProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A database endpoint that can run ad-hoc queries.
///
/// Implementations open a fresh connection for every call and release it
/// before returning, on success and failure alike. There is no pooling and no
/// handle kept between calls.
pub trait Database {
    /// Which engine this adapter talks to.
    fn provider(&self) -> DatabaseProvider;

    /// The provider-specific connection descriptor. Pure, performs no I/O.
    fn connection_string(&self) -> String;

    /// Run `query` and return every result row in a table labelled `table_name`.
    ///
    /// Failures at any stage (open, prepare, step, read) are reported as one
    /// error; no partial table is returned.
    fn execute_query(&self, query: &str, table_name: &str) -> Result<DataSet>;

    /// Open and immediately close a connection.
    ///
    /// Returns `Ok(true)` on success. A failure is reported as an error,
    /// never as `Ok(false)`; callers wanting a plain boolean must recover
    /// from the error themselves.
    fn test_connection(&self) -> Result<bool>;
}
