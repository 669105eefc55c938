//! Value and identifier escaping for generated SQL text.
//!
//! Every value and column name that the query generator embeds in statement
//! text goes through one of these functions.

use crate::value::Value;
use std::borrow::Cow;
use std::fmt::Write;

/// Escape a string for use inside a single-quoted SQL literal.
///
/// Every single quote is doubled (`'` → `''`). Input without quotes is
/// returned borrowed and unchanged.
///
/// # Examples
///
/// ```
/// use dbsync_core::escape_value;
///
/// assert_eq!(escape_value("O'Brien"), "O''Brien");
/// assert_eq!(escape_value("plain"), "plain");
/// ```
#[inline]
pub fn escape_value(input: &str) -> Cow<'_, str> {
    if input.contains('\'') {
        Cow::Owned(input.replace('\'', "''"))
    } else {
        Cow::Borrowed(input)
    }
}

/// Reverse [`escape_value`]: collapse every doubled single quote.
#[inline]
pub fn unescape_value(input: &str) -> Cow<'_, str> {
    if input.contains("''") {
        Cow::Owned(input.replace("''", "'"))
    } else {
        Cow::Borrowed(input)
    }
}

/// Escape a column name for use in generated SQL.
///
/// Names containing a space are wrapped in double quotes; all other names
/// are returned unchanged.
///
/// # Examples
///
/// ```
/// use dbsync_core::escape_column;
///
/// assert_eq!(escape_column("first name"), "\"first name\"");
/// assert_eq!(escape_column("id"), "id");
/// ```
#[inline]
pub fn escape_column(input: &str) -> Cow<'_, str> {
    if input.contains(' ') {
        Cow::Owned(format!("\"{input}\""))
    } else {
        Cow::Borrowed(input)
    }
}

/// Render a value as a SQL literal.
///
/// - NULL renders as the bare keyword `NULL`
/// - binary data renders as a hex blob literal `X'..'`
/// - everything else renders as a quoted, escaped string literal
pub fn sql_literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bytes(bytes) => {
            let mut out = String::with_capacity(bytes.len() * 2 + 3);
            out.push_str("X'");
            for b in bytes {
                let _ = write!(out, "{b:02X}");
            }
            out.push('\'');
            out
        }
        other => {
            let text = other.to_text().unwrap_or_default();
            format!("'{}'", escape_value(&text))
        }
    }
}

/// Render a `column = literal` assignment or predicate.
///
/// With `predicate` set, a NULL value renders as `column IS NULL` since
/// `= NULL` never matches a row.
pub fn column_equals(column: &str, value: &Value, predicate: bool) -> String {
    let column = escape_column(column);
    if predicate && value.is_null() {
        format!("{column} IS NULL")
    } else {
        format!("{column} = {}", sql_literal(value))
    }
}
