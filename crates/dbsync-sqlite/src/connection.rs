//! SQLite connection adapter.
//!
//! A [`SqliteConnection`] holds only configuration. Every operation opens its
//! own handle, does its work and closes the handle again before returning;
//! the handle and statement guards below make the close happen on every exit
//! path, including errors.

// Allow casts in FFI code where we need to match C types exactly
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::borrow_as_ptr)]
#![allow(clippy::result_large_err)]

use crate::ffi;
use crate::types;
use dbsync_core::{
    ColumnInfo, ConnectionError, ConnectionErrorKind, DataSet, DataTable, Database,
    DatabaseProvider, Error, QueryError, QueryErrorKind, Result,
};
use std::ffi::{CString, c_char, c_int};
use std::marker::PhantomData;
use std::ptr;
use std::sync::Arc;

/// Prefix on every failure reported by [`SqliteConnection::test_connection`].
pub const CONNECTION_ERROR_PREFIX: &str = "Error testing connection: ";

/// Prefix on every failure reported by query execution.
pub const QUERY_ERROR_PREFIX: &str = "Error executing query: ";

/// Configuration for opening SQLite connections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqliteConfig {
    /// Path to the database file, or ":memory:" for an in-memory database.
    pub path: String,
    /// Open flags (read-only, read-write, create, etc.)
    pub flags: OpenFlags,
    /// Busy timeout in milliseconds.
    pub busy_timeout_ms: u32,
}

/// Flags controlling how the database is opened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenFlags {
    /// Open for reading only.
    pub read_only: bool,
    /// Open for reading and writing.
    pub read_write: bool,
    /// Create the database if it doesn't exist.
    pub create: bool,
    /// Enable URI filename interpretation.
    pub uri: bool,
    /// Open as a private in-memory database.
    pub memory: bool,
}

impl OpenFlags {
    /// Create flags for read-only access.
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Default::default()
        }
    }

    /// Create flags for read-write access (database must exist).
    pub fn read_write() -> Self {
        Self {
            read_write: true,
            ..Default::default()
        }
    }

    /// Create flags for read-write access with creation if needed.
    pub fn create_read_write() -> Self {
        Self {
            read_write: true,
            create: true,
            ..Default::default()
        }
    }

    /// Create flags for a private in-memory database.
    pub fn memory() -> Self {
        Self {
            memory: true,
            ..Self::create_read_write()
        }
    }

    fn is_default(self) -> bool {
        self == Self::create_read_write()
    }

    fn to_sqlite_flags(self) -> c_int {
        let mut flags = 0;

        if self.read_only {
            flags |= ffi::SQLITE_OPEN_READONLY;
        }
        if self.read_write {
            flags |= ffi::SQLITE_OPEN_READWRITE;
        }
        if self.create {
            flags |= ffi::SQLITE_OPEN_CREATE;
        }
        if self.uri {
            flags |= ffi::SQLITE_OPEN_URI;
        }
        if self.memory {
            flags |= ffi::SQLITE_OPEN_MEMORY;
        }

        // Default to read-write if no mode specified
        if flags & (ffi::SQLITE_OPEN_READONLY | ffi::SQLITE_OPEN_READWRITE) == 0 {
            flags |= ffi::SQLITE_OPEN_READWRITE | ffi::SQLITE_OPEN_CREATE;
        }

        flags
    }
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: ":memory:".to_string(),
            flags: OpenFlags::create_read_write(),
            busy_timeout_ms: 5000,
        }
    }
}

impl SqliteConfig {
    /// Create a new config for a file-based database.
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Create a new config for an in-memory database.
    pub fn memory() -> Self {
        Self::default()
    }

    /// Set open flags.
    pub fn flags(mut self, flags: OpenFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set busy timeout.
    pub fn busy_timeout(mut self, ms: u32) -> Self {
        self.busy_timeout_ms = ms;
        self
    }

    /// The `Data Source=...;` descriptor for this configuration.
    ///
    /// A `Mode=` entry is added only when the flags differ from the default
    /// read-write-create mode.
    pub fn connection_string(&self) -> String {
        let mut out = format!("Data Source={};", self.path);
        if self.flags.memory || self.path == ":memory:" {
            out.push_str("Mode=Memory;");
        } else if self.flags.read_only {
            out.push_str("Mode=ReadOnly;");
        } else if !self.flags.is_default() && self.flags.read_write && !self.flags.create {
            out.push_str("Mode=ReadWrite;");
        }
        out
    }
}

/// An open sqlite3 handle, closed on drop.
struct Handle {
    db: *mut ffi::sqlite3,
    path: String,
}

impl Handle {
    #[tracing::instrument(level = "debug", skip(config), fields(path = %config.path))]
    fn open(config: &SqliteConfig) -> Result<Self> {
        let c_path = CString::new(config.path.as_str()).map_err(|_| {
            Error::Connection(ConnectionError {
                kind: ConnectionErrorKind::InvalidPath,
                message: "Invalid path: contains null byte".to_string(),
                source: None,
            })
        })?;

        let mut db: *mut ffi::sqlite3 = ptr::null_mut();
        let flags = config.flags.to_sqlite_flags();

        // SAFETY: We pass valid pointers and check the return value
        let rc = unsafe { ffi::sqlite3_open_v2(c_path.as_ptr(), &mut db, flags, ptr::null()) };

        if rc != ffi::SQLITE_OK {
            let msg = if db.is_null() {
                ffi::error_string(rc).to_string()
            } else {
                // SAFETY: open_v2 hands back a handle even on failure; it must be closed
                unsafe {
                    let msg = ffi::errmsg(db);
                    ffi::sqlite3_close(db);
                    msg
                }
            };

            tracing::debug!(code = rc, error = %msg, "SQLite open failed");
            return Err(Error::Connection(ConnectionError {
                kind: ConnectionErrorKind::Connect,
                message: msg,
                source: None,
            }));
        }

        if config.busy_timeout_ms > 0 {
            // SAFETY: db is valid
            unsafe {
                ffi::sqlite3_busy_timeout(db, c_int::try_from(config.busy_timeout_ms).unwrap_or(c_int::MAX));
            }
        }

        tracing::debug!("SQLite handle opened");
        Ok(Self {
            db,
            path: config.path.clone(),
        })
    }

    /// Prepare the first statement of `sql`, returning it with the unparsed rest.
    fn prepare<'s>(&self, sql: &'s str) -> Result<(Option<Statement<'_>>, &'s str)> {
        let c_sql = CString::new(sql).map_err(|_| {
            Error::Query(QueryError {
                kind: QueryErrorKind::Syntax,
                sql: Some(sql.to_string()),
                message: "SQL contains null byte".to_string(),
                source: None,
            })
        })?;

        let len = c_int::try_from(c_sql.as_bytes().len()).map_err(|_| {
            Error::Query(QueryError {
                kind: QueryErrorKind::Syntax,
                sql: Some(sql.to_string()),
                message: "SQL text too long".to_string(),
                source: None,
            })
        })?;

        let mut stmt: *mut ffi::sqlite3_stmt = ptr::null_mut();
        let mut tail: *const c_char = ptr::null();

        // SAFETY: All pointers are valid
        let rc = unsafe { ffi::sqlite3_prepare_v2(self.db, c_sql.as_ptr(), len, &mut stmt, &mut tail) };

        if rc != ffi::SQLITE_OK {
            return Err(self.query_error(rc, sql));
        }

        let consumed = if tail.is_null() {
            sql.len()
        } else {
            // SAFETY: tail points into c_sql, at or after its start
            let offset = unsafe { tail.offset_from(c_sql.as_ptr()) };
            usize::try_from(offset).unwrap_or(sql.len())
        };
        let rest = sql.get(consumed..).unwrap_or_default();

        // Blank input or a lone comment prepares to no statement at all.
        if stmt.is_null() {
            return Ok((None, rest));
        }

        Ok((
            Some(Statement {
                stmt,
                _handle: PhantomData,
            }),
            rest,
        ))
    }

    fn exec(&self, sql: &str) -> Result<()> {
        let c_sql = CString::new(sql).map_err(|_| {
            Error::Query(QueryError {
                kind: QueryErrorKind::Syntax,
                sql: Some(sql.to_string()),
                message: "SQL contains null byte".to_string(),
                source: None,
            })
        })?;

        let mut errmsg: *mut std::ffi::c_char = ptr::null_mut();

        // SAFETY: All pointers are valid
        let rc = unsafe {
            ffi::sqlite3_exec(self.db, c_sql.as_ptr(), None, ptr::null_mut(), &mut errmsg)
        };

        if rc != ffi::SQLITE_OK {
            let message = if errmsg.is_null() {
                ffi::error_string(rc).to_string()
            } else {
                // SAFETY: errmsg was allocated by sqlite3_exec and must be freed by us
                unsafe {
                    let msg = std::ffi::CStr::from_ptr(errmsg)
                        .to_string_lossy()
                        .into_owned();
                    ffi::sqlite3_free(errmsg.cast());
                    msg
                }
            };

            return Err(Error::Query(QueryError {
                kind: error_code_to_kind(rc),
                sql: Some(sql.to_string()),
                message,
                source: None,
            }));
        }

        Ok(())
    }

    fn query_error(&self, rc: c_int, sql: &str) -> Error {
        // SAFETY: self.db is open for the lifetime of self
        let message = unsafe { ffi::errmsg(self.db) };
        // SAFETY: as above
        let code = unsafe { ffi::sqlite3_errcode(self.db) };
        Error::Query(QueryError {
            kind: error_code_to_kind(if code == ffi::SQLITE_OK { rc } else { code }),
            sql: Some(sql.to_string()),
            message,
            source: None,
        })
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        // SAFETY: db came from a successful open and is closed exactly once here.
        // Every Statement borrows the handle, so all are finalized by now.
        let rc = unsafe { ffi::sqlite3_close(self.db) };
        if rc == ffi::SQLITE_OK {
            tracing::debug!(path = %self.path, "SQLite handle closed");
        } else {
            tracing::warn!(path = %self.path, code = rc, "SQLite close failed");
        }
    }
}

/// A prepared statement, finalized on drop.
struct Statement<'h> {
    stmt: *mut ffi::sqlite3_stmt,
    _handle: PhantomData<&'h Handle>,
}

impl Statement<'_> {
    fn column_count(&self) -> c_int {
        // SAFETY: stmt is valid
        unsafe { ffi::sqlite3_column_count(self.stmt) }
    }

    fn step(&self) -> c_int {
        // SAFETY: stmt is valid
        unsafe { ffi::sqlite3_step(self.stmt) }
    }

    /// Step to completion, discarding any rows.
    fn run(&self, handle: &Handle, sql: &str) -> Result<()> {
        loop {
            match self.step() {
                ffi::SQLITE_ROW => {}
                ffi::SQLITE_DONE => return Ok(()),
                rc => return Err(handle.query_error(rc, sql)),
            }
        }
    }

    /// Step to completion, collecting every row into a table named `table_name`.
    fn load(&self, handle: &Handle, sql: &str, table_name: &str) -> Result<DataTable> {
        let col_count = self.column_count();
        let mut col_names = Vec::with_capacity(usize::try_from(col_count).unwrap_or_default());
        for i in 0..col_count {
            // SAFETY: stmt is valid, i is in range
            let name = unsafe { types::column_name(self.stmt, i) }.unwrap_or_else(|| format!("col{i}"));
            col_names.push(name);
        }
        let mut table = DataTable::new(table_name, Arc::new(ColumnInfo::new(col_names)));

        loop {
            match self.step() {
                ffi::SQLITE_ROW => {
                    let mut values = Vec::with_capacity(table.columns().len());
                    for i in 0..col_count {
                        // SAFETY: stmt is valid, we just got SQLITE_ROW
                        values.push(unsafe { types::read_column(self.stmt, i) });
                    }
                    table.push_values(values);
                }
                ffi::SQLITE_DONE => return Ok(table),
                rc => return Err(handle.query_error(rc, sql)),
            }
        }
    }
}

impl Drop for Statement<'_> {
    fn drop(&mut self) {
        // SAFETY: stmt is valid and finalized exactly once
        unsafe {
            ffi::sqlite3_finalize(self.stmt);
        }
    }
}

/// A SQLite database reachable through a file path.
///
/// Holds no open handle between calls. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct SqliteConnection {
    config: SqliteConfig,
}

impl SqliteConnection {
    /// A connection to the database file at `path`.
    ///
    /// Nothing is opened here; an empty or unusable path is reported by the
    /// first operation that opens the file.
    pub fn new(path: impl Into<String>) -> Self {
        Self::with_config(SqliteConfig::file(path))
    }

    pub fn with_config(config: SqliteConfig) -> Self {
        Self { config }
    }

    /// Get the database path.
    pub fn path(&self) -> &str {
        &self.config.path
    }

    pub fn config(&self) -> &SqliteConfig {
        &self.config
    }

    /// Execute one or more statements without reading results (DDL, DML batches).
    #[tracing::instrument(level = "debug", skip(self, sql))]
    pub fn execute_raw(&self, sql: &str) -> Result<()> {
        tracing::trace!(sql = %sql, "Executing raw SQL");
        let handle = Handle::open(&self.config).map_err(|e| wrap_failure(QUERY_ERROR_PREFIX, e))?;
        handle.exec(sql).map_err(|e| wrap_failure(QUERY_ERROR_PREFIX, e))
    }

    /// Run every statement of `sql` in order.
    ///
    /// Rows come from the first statement that returns columns; rows of later
    /// result sets are stepped through and dropped. Without such a statement
    /// the table has no columns.
    fn query_table(&self, sql: &str, table_name: &str) -> Result<DataTable> {
        let handle = Handle::open(&self.config)?;

        let mut table = None;
        let mut remaining = sql;
        let mut statements = 0usize;
        while !remaining.trim().is_empty() {
            let (stmt, rest) = handle.prepare(remaining)?;
            let Some(stmt) = stmt else {
                // An empty statement (a stray `;`) still advances the tail.
                if rest.len() == remaining.len() {
                    break;
                }
                remaining = rest;
                continue;
            };
            statements += 1;
            if table.is_none() && stmt.column_count() > 0 {
                table = Some(stmt.load(&handle, remaining, table_name)?);
            } else {
                stmt.run(&handle, remaining)?;
            }
            remaining = rest;
        }
        tracing::trace!(statements, "Statements executed");

        Ok(table.unwrap_or_else(|| DataTable::new(table_name, Arc::new(ColumnInfo::default()))))
    }
}

impl Database for SqliteConnection {
    fn provider(&self) -> DatabaseProvider {
        DatabaseProvider::Sqlite
    }

    fn connection_string(&self) -> String {
        self.config.connection_string()
    }

    #[tracing::instrument(level = "debug", skip(self, query), fields(path = %self.config.path))]
    fn execute_query(&self, query: &str, table_name: &str) -> Result<DataSet> {
        tracing::trace!(sql = %query, "Executing query");
        match self.query_table(query, table_name) {
            Ok(table) => {
                tracing::debug!(rows = table.row_count(), "Query complete");
                Ok(DataSet::from(table))
            }
            Err(e) => {
                tracing::debug!(error = %e, "Query failed");
                Err(wrap_failure(QUERY_ERROR_PREFIX, e))
            }
        }
    }

    #[tracing::instrument(level = "debug", skip(self), fields(path = %self.config.path))]
    fn test_connection(&self) -> Result<bool> {
        let handle = Handle::open(&self.config).map_err(|e| wrap_failure(CONNECTION_ERROR_PREFIX, e))?;
        drop(handle);
        Ok(true)
    }
}

/// Prefix the message of `err` while keeping its kind and SQL.
fn wrap_failure(prefix: &str, err: Error) -> Error {
    match err {
        Error::Connection(e) => Error::Connection(ConnectionError {
            message: format!("{prefix}{}", e.message),
            ..e
        }),
        Error::Query(e) => Error::Query(QueryError {
            message: format!("{prefix}{}", e.message),
            ..e
        }),
        other => Error::connection(ConnectionErrorKind::Connect, prefix, other),
    }
}

fn error_code_to_kind(code: c_int) -> QueryErrorKind {
    match code & 0xff {
        ffi::SQLITE_CONSTRAINT => QueryErrorKind::Constraint,
        ffi::SQLITE_BUSY | ffi::SQLITE_LOCKED => QueryErrorKind::Busy,
        ffi::SQLITE_PERM | ffi::SQLITE_AUTH | ffi::SQLITE_READONLY => QueryErrorKind::Permission,
        ffi::SQLITE_NOTFOUND => QueryErrorKind::NotFound,
        ffi::SQLITE_ERROR => QueryErrorKind::Syntax,
        _ => QueryErrorKind::Database,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbsync_core::Value;

    fn temp_db() -> (tempfile::TempDir, SqliteConnection) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        let conn = SqliteConnection::new(path.to_string_lossy().into_owned());
        (dir, conn)
    }

    #[test]
    fn test_connection_string() {
        let conn = SqliteConnection::new("/tmp/app.db");
        assert_eq!(conn.connection_string(), "Data Source=/tmp/app.db;");

        let ro = SqliteConnection::with_config(
            SqliteConfig::file("/tmp/app.db").flags(OpenFlags::read_only()),
        );
        assert_eq!(ro.connection_string(), "Data Source=/tmp/app.db;Mode=ReadOnly;");

        let rw = SqliteConnection::with_config(
            SqliteConfig::file("/tmp/app.db").flags(OpenFlags::read_write()),
        );
        assert_eq!(rw.connection_string(), "Data Source=/tmp/app.db;Mode=ReadWrite;");

        let mem = SqliteConnection::with_config(SqliteConfig::memory());
        assert_eq!(mem.connection_string(), "Data Source=:memory:;Mode=Memory;");
    }

    #[test]
    fn test_provider() {
        assert_eq!(SqliteConnection::new("x.db").provider(), DatabaseProvider::Sqlite);
    }

    #[test]
    fn test_test_connection_creates_file() {
        let (dir, conn) = temp_db();
        assert!(conn.test_connection().unwrap());
        assert!(dir.path().join("test.db").exists());
    }

    #[test]
    fn test_test_connection_invalid_path_is_error() {
        let conn = SqliteConnection::new("/nonexistent_dir/nested/db.sqlite");
        let err = conn.test_connection().unwrap_err();
        assert!(err.is_connection_error());
        assert!(
            err.to_string().contains(CONNECTION_ERROR_PREFIX),
            "unexpected message: {err}"
        );
    }

    #[test]
    fn test_read_only_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.db");
        let conn = SqliteConnection::with_config(
            SqliteConfig::file(path.to_string_lossy().into_owned()).flags(OpenFlags::read_only()),
        );
        assert!(conn.test_connection().is_err());
    }

    #[test]
    fn test_execute_query_reads_all_rows() {
        let (_dir, conn) = temp_db();
        conn.execute_raw(
            "CREATE TABLE items (id INTEGER PRIMARY KEY, name TEXT, price REAL, data BLOB);
             INSERT INTO items VALUES (1, 'apple', 1.5, X'0102');
             INSERT INTO items VALUES (2, NULL, 2.0, NULL);",
        )
        .unwrap();

        let set = conn
            .execute_query("SELECT id, name, price, data FROM items ORDER BY id", "items")
            .unwrap();
        let table = set.table("items").unwrap();
        assert_eq!(table.columns(), ["id", "name", "price", "data"]);
        assert_eq!(table.row_count(), 2);

        let first = &table.rows()[0];
        assert_eq!(first.get_by_name("id"), Some(&Value::BigInt(1)));
        assert_eq!(first.get_by_name("name"), Some(&Value::Text("apple".into())));
        assert_eq!(first.get_by_name("price"), Some(&Value::Double(1.5)));
        assert_eq!(first.get_by_name("data"), Some(&Value::Bytes(vec![1, 2])));

        let second = &table.rows()[1];
        assert_eq!(second.get_by_name("name"), Some(&Value::Null));
        assert_eq!(second.get_named::<Option<String>>("name").unwrap(), None);
    }

    #[test]
    fn test_execute_query_empty_result_keeps_columns() {
        let (_dir, conn) = temp_db();
        conn.execute_raw("CREATE TABLE t (a INTEGER, b TEXT)").unwrap();
        let set = conn.execute_query("SELECT a, b FROM t", "t").unwrap();
        let table = set.first().unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns(), ["a", "b"]);
    }

    #[test]
    fn test_execute_query_failure_is_wrapped() {
        let (_dir, conn) = temp_db();
        let err = conn.execute_query("SELECT * FROM missing_table", "x").unwrap_err();
        let message = err.to_string();
        assert!(message.contains(QUERY_ERROR_PREFIX), "unexpected message: {message}");
        assert!(message.contains("no such table"), "unexpected message: {message}");
        assert_eq!(err.sql(), Some("SELECT * FROM missing_table"));
    }

    #[test]
    fn test_execute_query_open_failure_is_wrapped() {
        let conn = SqliteConnection::new("/nonexistent_dir/nested/db.sqlite");
        let err = conn.execute_query("SELECT 1", "one").unwrap_err();
        assert!(err.is_connection_error());
        assert!(err.to_string().contains(QUERY_ERROR_PREFIX));
    }

    #[test]
    fn test_execute_raw_constraint_violation() {
        let (_dir, conn) = temp_db();
        conn.execute_raw("CREATE TABLE u (id INTEGER PRIMARY KEY); INSERT INTO u VALUES (1);")
            .unwrap();
        let err = conn.execute_raw("INSERT INTO u VALUES (1)").unwrap_err();
        assert!(matches!(
            err,
            Error::Query(QueryError {
                kind: QueryErrorKind::Constraint,
                ..
            })
        ));
    }

    #[test]
    fn test_execute_query_runs_every_statement() {
        let (_dir, conn) = temp_db();
        conn.execute_raw("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT)")
            .unwrap();

        let set = conn
            .execute_query(
                "INSERT INTO users VALUES (1, 'a'); SELECT id, name FROM users;",
                "users",
            )
            .unwrap();
        let table = set.table("users").unwrap();
        assert_eq!(table.columns(), ["id", "name"]);
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.rows()[0].get_by_name("name"), Some(&Value::Text("a".into())));
    }

    #[test]
    fn test_execute_query_statements_after_result_still_run() {
        let (_dir, conn) = temp_db();
        conn.execute_raw("CREATE TABLE users (id INTEGER PRIMARY KEY); INSERT INTO users VALUES (1);")
            .unwrap();

        let set = conn
            .execute_query("SELECT id FROM users; DROP TABLE users;", "u")
            .unwrap();
        assert_eq!(set.table("u").map(DataTable::row_count), Some(1));

        let remaining = conn
            .execute_query("SELECT name FROM sqlite_master WHERE name = 'users'", "m")
            .unwrap();
        assert_eq!(remaining.table("m").map(DataTable::row_count), Some(0));
    }

    #[test]
    fn test_execute_query_first_result_set_wins() {
        let (_dir, conn) = temp_db();
        let set = conn
            .execute_query("SELECT 1 AS one; ; SELECT 2 AS two, 3 AS three; -- done", "r")
            .unwrap();
        let table = set.table("r").unwrap();
        assert_eq!(table.columns(), ["one"]);
        assert_eq!(table.rows()[0].get_by_name("one"), Some(&Value::BigInt(1)));
    }

    #[test]
    fn test_execute_query_later_failure_is_reported() {
        let (_dir, conn) = temp_db();
        let err = conn
            .execute_query("SELECT 1; SELECT * FROM missing_table", "x")
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains(QUERY_ERROR_PREFIX), "unexpected message: {message}");
        assert!(message.contains("no such table"), "unexpected message: {message}");
    }

    #[test]
    fn test_busy_timeout_beyond_c_int_is_clamped() {
        let (dir, _) = temp_db();
        let path = dir.path().join("slow.db");
        let conn = SqliteConnection::with_config(
            SqliteConfig::file(path.to_string_lossy().into_owned()).busy_timeout(u32::MAX),
        );
        assert!(conn.test_connection().unwrap());
        let set = conn.execute_query("SELECT 1 AS one", "one").unwrap();
        assert_eq!(set.table("one").map(DataTable::row_count), Some(1));
    }

    #[test]
    fn test_blank_query_yields_empty_table() {
        let (_dir, conn) = temp_db();
        let set = conn.execute_query("   ", "blank").unwrap();
        assert_eq!(set.first().map(DataTable::row_count), Some(0));
    }
}
