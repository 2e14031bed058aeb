//! Per-table fluent statement builder.
//!
//! A [`Model`] is bound to one table and collects `where`, `order`, `group`
//! and `limit` state through chained modifiers. Each modifier takes the
//! builder by value and hands it back; each terminal operation consumes it and
//! runs exactly one statement.
//!
//! ```ignore
//! let rows = db
//!     .model("user")
//!     .where_clause("team=3")
//!     .order_by(["score DESC", "id ASC"])
//!     .limit(0, 10)
//!     .select(["id", "username"])
//!     .await?;
//!
//! db.model("user")
//!     .task()
//!     .where_clause("username=\"lin\"")
//!     .insert([("username", "\"lin\""), ("phone", "123")])
//!     .await?;
//! ```
//!
//! Values are pasted into the SQL text verbatim. Use
//! [`Model::insert_bound`] / [`Model::update_bound`] to send values as
//! parameters instead.

use crate::connection::Database;
use crate::driver::Rows;
use crate::error::{OrmError, OrmResult};
use crate::render::{self, Assignments, BoundFields, Clauses, Fields, Statement, Terms};

/// Statement builder for one table.
#[must_use = "a Model does nothing until a terminal operation is awaited"]
pub struct Model<'db> {
    db: &'db Database,
    table: String,
    clauses: Clauses,
    task: bool,
}

impl<'db> Model<'db> {
    pub(crate) fn new(db: &'db Database, table: String) -> Self {
        Self {
            db,
            table,
            clauses: Clauses::default(),
            task: false,
        }
    }

    /// Fully-qualified table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn is_task(&self) -> bool {
        self.task
    }

    // ==================== Modifiers ====================

    /// Run the terminal statement inside BEGIN/COMMIT, rolling back on error.
    pub fn task(mut self) -> Self {
        self.task = true;
        self
    }

    /// Set the raw WHERE expression. An empty expression keeps the previous one.
    pub fn where_clause(mut self, expr: impl Into<String>) -> Self {
        let expr = expr.into();
        if !expr.is_empty() {
            self.clauses.filter = Some(expr);
        }
        self
    }

    /// Set ORDER BY from one term or a sequence joined with `,`.
    pub fn order_by(mut self, spec: impl Into<Terms>) -> Self {
        let spec = spec.into();
        if !spec.is_empty() {
            self.clauses.order = Some(spec.join());
        }
        self
    }

    /// Set GROUP BY from one term or a sequence joined with `,`.
    pub fn group_by(mut self, spec: impl Into<Terms>) -> Self {
        let spec = spec.into();
        if !spec.is_empty() {
            self.clauses.group = Some(spec.join());
        }
        self
    }

    /// Set LIMIT. Ignored unless `start >= 0 && length > 0`.
    pub fn limit(mut self, start: i64, length: i64) -> Self {
        if start >= 0 && length > 0 {
            self.clauses.limit = Some((start, length));
        }
        self
    }

    // ==================== Rendering ====================

    fn statement(&self, sql: String) -> Statement {
        Statement::new(sql).with_task(self.task)
    }

    pub fn to_count_sql(&self) -> Statement {
        self.statement(render::count(&self.table, &self.clauses))
    }

    pub fn to_sum_sql(&self, column: &str) -> OrmResult<Statement> {
        render::sum(&self.table, column, &self.clauses).map(|sql| self.statement(sql))
    }

    pub fn to_select_sql(&self, columns: impl Into<Terms>) -> Statement {
        self.statement(render::select(
            &self.table,
            &columns.into(),
            &self.clauses,
            self.db.dialect(),
        ))
    }

    pub fn to_update_sql(&self, assignments: impl Into<Assignments>) -> OrmResult<Statement> {
        render::update(&self.table, &assignments.into(), &self.clauses).map(|sql| self.statement(sql))
    }

    pub fn to_delete_sql(&self) -> Statement {
        self.statement(render::delete(&self.table, &self.clauses))
    }

    pub fn to_insert_sql(&self, fields: impl Into<Fields>) -> OrmResult<Statement> {
        render::insert(&self.table, &fields.into(), &self.clauses, self.db.dialect())
            .map(|sql| self.statement(sql))
    }

    pub fn to_insert_bound_sql(&self, fields: BoundFields) -> OrmResult<Statement> {
        let (sql, params) = render::insert_bound(&self.table, fields, &self.clauses, self.db.dialect())?;
        Ok(self.statement(sql).with_params(params))
    }

    pub fn to_update_bound_sql(&self, fields: BoundFields) -> OrmResult<Statement> {
        let (sql, params) = render::update_bound(&self.table, fields, &self.clauses, self.db.dialect())?;
        Ok(self.statement(sql).with_params(params))
    }

    // ==================== Terminals ====================

    /// `SELECT COUNT(*) FROM <table>[ WHERE ..];`
    pub async fn count(self) -> OrmResult<Rows> {
        let stmt = self.to_count_sql();
        self.db.execute(stmt).await
    }

    /// `SELECT SUM(<column>) FROM <table>[ WHERE ..];`
    ///
    /// Fails with [`OrmError::InvalidArgument`] for an empty column, without
    /// touching the connection.
    pub async fn sum(self, column: &str) -> OrmResult<Rows> {
        let stmt = self.to_sum_sql(column)?;
        self.db.execute(stmt).await
    }

    /// [`Model::sum`] for a column that may be absent.
    pub async fn sum_opt(self, column: Option<&str>) -> OrmResult<Rows> {
        match column {
            Some(column) => self.sum(column).await,
            None => Err(OrmError::invalid_argument("sum requires a column")),
        }
    }

    /// `SELECT * ...` with every accumulated clause.
    pub async fn select_all(self) -> OrmResult<Rows> {
        self.select(Terms::new()).await
    }

    /// `SELECT <columns> ...` with every accumulated clause. Empty columns
    /// render `*`.
    pub async fn select(self, columns: impl Into<Terms>) -> OrmResult<Rows> {
        let stmt = self.to_select_sql(columns);
        self.db.execute(stmt).await
    }

    /// `UPDATE <table> SET ..[ WHERE ..];`
    pub async fn update(self, assignments: impl Into<Assignments>) -> OrmResult<Rows> {
        let stmt = self.to_update_sql(assignments)?;
        self.db.execute(stmt).await
    }

    /// `DELETE FROM <table>[ WHERE ..];`
    pub async fn delete(self) -> OrmResult<Rows> {
        let stmt = self.to_delete_sql();
        self.db.execute(stmt).await
    }

    /// `INSERT INTO <table> (..) VALUES (..);`, or the insert-if-absent form
    /// when a where expression is set.
    pub async fn insert(self, fields: impl Into<Fields>) -> OrmResult<Rows> {
        let stmt = self.to_insert_sql(fields)?;
        self.db.execute(stmt).await
    }

    /// [`Model::insert`] with values sent as parameters.
    pub async fn insert_bound(self, fields: BoundFields) -> OrmResult<Rows> {
        let stmt = self.to_insert_bound_sql(fields)?;
        self.db.execute(stmt).await
    }

    /// [`Model::update`] with values sent as parameters.
    pub async fn update_bound(self, fields: BoundFields) -> OrmResult<Rows> {
        let stmt = self.to_update_bound_sql(fields)?;
        self.db.execute(stmt).await
    }
}

impl std::fmt::Debug for Model<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("table", &self.table)
            .field("clauses", &self.clauses)
            .field("task", &self.task)
            .finish()
    }
}
