//! SQL text rendering.
//!
//! Everything here is pure string assembly over a table name and the
//! accumulated [`Clauses`]. Nothing is escaped: `where`, `order`, `group` and
//! literal values are pasted in as given. The bound-parameter renderers
//! (`insert_bound`, `update_bound`) keep the same clause shape and only swap
//! values for placeholders.

pub mod args;

pub use args::{Assignments, BoundFields, Fields, Terms};

use crate::driver::Param;
use crate::error::{OrmError, OrmResult};
use std::fmt;

/// SQL flavour used for the few clauses that differ between servers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Dialect {
    /// `LIMIT <start>,<length>`, `FROM DUAL`, `?` placeholders.
    #[default]
    MySql,
    /// `LIMIT <length> OFFSET <start>`, no `DUAL`, `$n` placeholders.
    Postgres,
}

impl Dialect {
    fn limit(self, start: i64, length: i64) -> String {
        match self {
            Dialect::MySql => format!("{start},{length}"),
            Dialect::Postgres => format!("{length} OFFSET {start}"),
        }
    }

    fn placeholder(self, n: usize) -> String {
        match self {
            Dialect::MySql => "?".to_string(),
            Dialect::Postgres => format!("${n}"),
        }
    }

    fn dual(self) -> &'static str {
        match self {
            Dialect::MySql => " FROM DUAL",
            Dialect::Postgres => "",
        }
    }
}

/// Clause state accumulated by a [`Model`](crate::Model).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Clauses {
    pub(crate) filter: Option<String>,
    pub(crate) order: Option<String>,
    pub(crate) group: Option<String>,
    /// `(start, length)`, only stored when `start >= 0 && length > 0`.
    pub(crate) limit: Option<(i64, i64)>,
}

impl Clauses {
    fn push_where(&self, sql: &mut String) {
        if let Some(filter) = &self.filter {
            sql.push_str(" WHERE ");
            sql.push_str(filter);
        }
    }
}

/// A rendered statement ready for execution.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    sql: String,
    params: Vec<Param>,
    task: bool,
}

impl Statement {
    /// A literal (unbound) statement, not in task mode.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
            task: false,
        }
    }

    pub fn with_params(mut self, params: Vec<Param>) -> Self {
        self.params = params;
        self
    }

    /// Wrap execution in BEGIN/COMMIT/ROLLBACK.
    pub fn with_task(mut self, task: bool) -> Self {
        self.task = task;
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn is_task(&self) -> bool {
        self.task
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

/// `SELECT COUNT(*) FROM <table>[ WHERE ..];`
pub(crate) fn count(table: &str, clauses: &Clauses) -> String {
    let mut sql = format!("SELECT COUNT(*) FROM {table}");
    clauses.push_where(&mut sql);
    sql.push(';');
    sql
}

/// `SELECT SUM(<column>) FROM <table>[ WHERE ..];`
pub(crate) fn sum(table: &str, column: &str, clauses: &Clauses) -> OrmResult<String> {
    if column.is_empty() {
        return Err(OrmError::invalid_argument("sum requires a column"));
    }
    let mut sql = format!("SELECT SUM({column}) FROM {table}");
    clauses.push_where(&mut sql);
    sql.push(';');
    Ok(sql)
}

/// `SELECT <columns|*> FROM <table>[ WHERE][ GROUP BY][ ORDER BY][ LIMIT];`
pub(crate) fn select(table: &str, columns: &Terms, clauses: &Clauses, dialect: Dialect) -> String {
    let columns = if columns.is_empty() {
        "*".to_string()
    } else {
        columns.join()
    };
    let mut sql = format!("SELECT {columns} FROM {table}");
    clauses.push_where(&mut sql);
    if let Some(group) = &clauses.group {
        sql.push_str(" GROUP BY ");
        sql.push_str(group);
    }
    if let Some(order) = &clauses.order {
        sql.push_str(" ORDER BY ");
        sql.push_str(order);
    }
    if let Some((start, length)) = clauses.limit {
        sql.push_str(" LIMIT ");
        sql.push_str(&dialect.limit(start, length));
    }
    sql.push(';');
    sql
}

/// `UPDATE <table> SET <assignments>[ WHERE ..];`
pub(crate) fn update(table: &str, assignments: &Assignments, clauses: &Clauses) -> OrmResult<String> {
    if assignments.is_empty() {
        return Err(OrmError::invalid_argument("update requires at least one assignment"));
    }
    let mut sql = format!("UPDATE {table} SET {}", assignments.render());
    clauses.push_where(&mut sql);
    sql.push(';');
    Ok(sql)
}

/// `DELETE FROM <table>[ WHERE ..];`
pub(crate) fn delete(table: &str, clauses: &Clauses) -> String {
    let mut sql = format!("DELETE FROM {table}");
    clauses.push_where(&mut sql);
    sql.push(';');
    sql
}

/// Plain `INSERT .. VALUES (..)` without a filter, otherwise the
/// insert-if-absent form guarded by `NOT EXISTS` over that filter.
pub(crate) fn insert(table: &str, fields: &Fields, clauses: &Clauses, dialect: Dialect) -> OrmResult<String> {
    if fields.is_empty() {
        return Err(OrmError::invalid_argument("insert requires at least one field"));
    }
    Ok(insert_shape(
        table,
        &fields.columns().join(","),
        &fields.values().join(","),
        clauses,
        dialect,
    ))
}

/// `insert` with placeholders in place of the literal values.
pub(crate) fn insert_bound(
    table: &str,
    fields: BoundFields,
    clauses: &Clauses,
    dialect: Dialect,
) -> OrmResult<(String, Vec<Param>)> {
    if fields.is_empty() {
        return Err(OrmError::invalid_argument("insert requires at least one field"));
    }
    let columns = fields.columns().join(",");
    let placeholders = (1..=fields.len())
        .map(|n| dialect.placeholder(n))
        .collect::<Vec<_>>()
        .join(",");
    let sql = insert_shape(table, &columns, &placeholders, clauses, dialect);
    Ok((sql, fields.into_params()))
}

/// `update` with placeholders in place of the literal values.
pub(crate) fn update_bound(
    table: &str,
    fields: BoundFields,
    clauses: &Clauses,
    dialect: Dialect,
) -> OrmResult<(String, Vec<Param>)> {
    if fields.is_empty() {
        return Err(OrmError::invalid_argument("update requires at least one assignment"));
    }
    let sets = fields
        .columns()
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{c}={}", dialect.placeholder(i + 1)))
        .collect::<Vec<_>>()
        .join(",");
    let mut sql = format!("UPDATE {table} SET {sets}");
    clauses.push_where(&mut sql);
    sql.push(';');
    Ok((sql, fields.into_params()))
}

fn insert_shape(table: &str, columns: &str, values: &str, clauses: &Clauses, dialect: Dialect) -> String {
    let mut sql = format!("INSERT INTO {table} ({columns})");
    match &clauses.filter {
        Some(filter) => {
            let key = first_key(filter);
            sql.push_str(&format!(
                " SELECT {values}{} WHERE NOT EXISTS(SELECT {key} FROM {table} WHERE {filter})",
                dialect.dual()
            ));
        }
        None => sql.push_str(&format!(" VALUES ({values})")),
    }
    sql.push(';');
    sql
}

/// Left-hand side of the first `=` in `filter`.
///
/// Only meaningful for a single `col=value` predicate; compound filters
/// such as `a=1 and b=2` still yield `a`, which is what gets selected.
pub(crate) fn first_key(filter: &str) -> &str {
    filter.split_once('=').map_or(filter, |(key, _)| key).trim()
}

#[cfg(test)]
mod tests;
