//! In-memory tabular results.
//!
//! A query executed through a [`Database`](crate::Database) is fully read into
//! a [`DataTable`] before the connection is released, and handed back to the
//! caller wrapped in a [`DataSet`].

use crate::row::{ColumnInfo, Row};
use crate::value::Value;
use std::sync::Arc;

/// A named, fully materialized result table.
#[derive(Debug, Clone)]
pub struct DataTable {
    name: String,
    columns: Arc<ColumnInfo>,
    rows: Vec<Row>,
}

impl DataTable {
    /// Create an empty table with the given label and columns.
    pub fn new(name: impl Into<String>, columns: Arc<ColumnInfo>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row of values in column order.
    pub fn push_values(&mut self, values: Vec<Value>) {
        self.rows
            .push(Row::with_columns(Arc::clone(&self.columns), values));
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        self.columns.names()
    }

    pub fn column_info(&self) -> Arc<ColumnInfo> {
        Arc::clone(&self.columns)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

/// A collection of result tables.
#[derive(Debug, Clone, Default)]
pub struct DataSet {
    tables: Vec<DataTable>,
}

impl DataSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_table(&mut self, table: DataTable) {
        self.tables.push(table);
    }

    /// Look up a table by its label.
    pub fn table(&self, name: &str) -> Option<&DataTable> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn tables(&self) -> &[DataTable] {
        &self.tables
    }

    /// The first table, which is the only one for single-query results.
    pub fn first(&self) -> Option<&DataTable> {
        self.tables.first()
    }

    pub fn into_tables(self) -> Vec<DataTable> {
        self.tables
    }
}

impl From<DataTable> for DataSet {
    fn from(table: DataTable) -> Self {
        Self {
            tables: vec![table],
        }
    }
}
