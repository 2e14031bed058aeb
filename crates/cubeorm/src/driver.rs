//! Driver boundary.
//!
//! A [`Driver`] opens connections from a [`DbConfig`]; a [`Connection`] runs
//! SQL text and hands rows back untouched. [`PgDriver`](crate::PgDriver) is
//! the bundled implementation; anything else (MySQL, a test double) plugs in
//! by implementing these two traits.

use crate::config::DbConfig;
use crate::error::{OrmError, OrmResult};
use crate::render::Dialect;
use serde::Serialize;
use std::sync::Arc;

/// Opens connections.
#[async_trait::async_trait]
pub trait Driver: Send + Sync {
    /// Open a new connection using `config`.
    async fn connect(&self, config: &DbConfig) -> OrmResult<Arc<dyn Connection>>;

    /// SQL dialect the rendered statements must follow.
    fn dialect(&self) -> Dialect {
        Dialect::MySql
    }
}

/// A live database connection.
#[async_trait::async_trait]
pub trait Connection: Send + Sync {
    /// Run a SQL text statement and return its rows.
    async fn execute(&self, sql: &str) -> OrmResult<Rows>;

    /// Run a statement with bound parameters.
    ///
    /// The default implementation refuses, so drivers without parameter
    /// support only need [`Connection::execute`].
    async fn execute_bound(&self, sql: &str, params: &[Param]) -> OrmResult<Rows> {
        let _ = (sql, params);
        Err(OrmError::invalid_argument(
            "bound parameters are not supported by this connection",
        ))
    }

    /// Close the connection.
    async fn close(&self) -> OrmResult<()>;

    /// `false` once the driver has observed the connection failing.
    fn is_healthy(&self) -> bool {
        true
    }
}

/// A bound parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<bool> for Param {
    fn from(v: bool) -> Self {
        Param::Bool(v)
    }
}

impl From<i32> for Param {
    fn from(v: i32) -> Self {
        Param::Int(i64::from(v))
    }
}

impl From<i64> for Param {
    fn from(v: i64) -> Self {
        Param::Int(v)
    }
}

impl From<u32> for Param {
    fn from(v: u32) -> Self {
        Param::Int(i64::from(v))
    }
}

impl From<f64> for Param {
    fn from(v: f64) -> Self {
        Param::Float(v)
    }
}

impl From<&str> for Param {
    fn from(v: &str) -> Self {
        Param::Text(v.to_string())
    }
}

impl From<String> for Param {
    fn from(v: String) -> Self {
        Param::Text(v)
    }
}

impl<T: Into<Param>> From<Option<T>> for Param {
    fn from(v: Option<T>) -> Self {
        v.map_or(Param::Null, Into::into)
    }
}

/// One result row: column names with their textual values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Option<String>>,
}

impl Row {
    pub fn new(columns: Vec<String>, values: Vec<Option<String>>) -> Self {
        Self { columns, values }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Option<String>] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of the first column named `column`. `None` for a missing column
    /// or a SQL NULL.
    pub fn get(&self, column: &str) -> Option<&str> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.get_idx(idx)
    }

    pub fn get_idx(&self, idx: usize) -> Option<&str> {
        self.values.get(idx)?.as_deref()
    }
}

/// Everything a statement returned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Rows {
    pub rows: Vec<Row>,
    /// Rows changed by INSERT/UPDATE/DELETE, as reported by the driver.
    pub affected_rows: u64,
}

impl Rows {
    pub fn new(rows: Vec<Row>, affected_rows: u64) -> Self {
        Self { rows, affected_rows }
    }

    /// A result carrying only an affected-row count.
    pub fn affected(affected_rows: u64) -> Self {
        Self {
            rows: Vec::new(),
            affected_rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }
}

impl IntoIterator for Rows {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a Rows {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
