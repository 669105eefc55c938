//! Low-level bindings to libsqlite3.
//!
//! Re-exports the subset of `libsqlite3-sys` the adapter uses, plus a few
//! safe helpers for static strings the library hands out.

use std::ffi::{CStr, c_int};

pub use libsqlite3_sys::{sqlite3, sqlite3_stmt};

// Result codes
pub use libsqlite3_sys::{
    SQLITE_AUTH, SQLITE_BUSY, SQLITE_CANTOPEN, SQLITE_CONSTRAINT, SQLITE_DONE, SQLITE_ERROR,
    SQLITE_LOCKED, SQLITE_NOTFOUND, SQLITE_OK, SQLITE_PERM, SQLITE_READONLY, SQLITE_ROW,
};

// sqlite3_open_v2 flags
pub use libsqlite3_sys::{
    SQLITE_OPEN_CREATE, SQLITE_OPEN_MEMORY, SQLITE_OPEN_READONLY, SQLITE_OPEN_READWRITE,
    SQLITE_OPEN_URI,
};

// Fundamental data types
pub use libsqlite3_sys::{SQLITE_BLOB, SQLITE_FLOAT, SQLITE_INTEGER, SQLITE_NULL, SQLITE_TEXT};

pub use libsqlite3_sys::{
    sqlite3_busy_timeout, sqlite3_close, sqlite3_column_blob, sqlite3_column_bytes,
    sqlite3_column_count, sqlite3_column_double, sqlite3_column_int64, sqlite3_column_name,
    sqlite3_column_text, sqlite3_column_type, sqlite3_errcode, sqlite3_errmsg, sqlite3_exec,
    sqlite3_finalize, sqlite3_free, sqlite3_open_v2, sqlite3_prepare_v2, sqlite3_step,
};

/// Get the SQLite library version as a string.
pub fn version() -> &'static str {
    // SAFETY: sqlite3_libversion returns a static string
    unsafe {
        let ptr = libsqlite3_sys::sqlite3_libversion();
        CStr::from_ptr(ptr).to_str().unwrap_or("unknown")
    }
}

/// Get the SQLite library version as a number.
pub fn version_number() -> i32 {
    // SAFETY: sqlite3_libversion_number is always safe to call
    unsafe { libsqlite3_sys::sqlite3_libversion_number() }
}

/// Convert an SQLite result code to a human-readable string.
pub fn error_string(code: c_int) -> &'static str {
    // SAFETY: sqlite3_errstr returns a static string for any code
    unsafe {
        let ptr = libsqlite3_sys::sqlite3_errstr(code);
        if ptr.is_null() {
            return "unknown error";
        }
        CStr::from_ptr(ptr).to_str().unwrap_or("unknown error")
    }
}

/// The most recent error message recorded on `db`.
///
/// # Safety
/// `db` must be a handle returned by `sqlite3_open_v2` that has not been closed.
pub unsafe fn errmsg(db: *mut sqlite3) -> String {
    // SAFETY: caller guarantees db is valid; errmsg never returns a dangling pointer
    unsafe {
        let ptr = sqlite3_errmsg(db);
        if ptr.is_null() {
            return "unknown error".to_string();
        }
        CStr::from_ptr(ptr).to_string_lossy().into_owned()
    }
}
