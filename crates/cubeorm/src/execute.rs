//! Statement execution with optional task (transaction) wrapping.
//!
//! Task mode runs
//!
//! ```text
//! BEGIN;  ->  <statement>  ->  COMMIT;
//!   \             \
//!    +-------------+-> ROLLBACK;  (original error returned)
//! ```
//!
//! A failing `ROLLBACK;` is logged and never replaces the original error.

use crate::connection::{Database, Slot};
use crate::driver::{Connection, Param, Rows};
use crate::error::OrmResult;
use crate::render::Statement;

const BEGIN: &str = "BEGIN;";
const COMMIT: &str = "COMMIT;";
const ROLLBACK: &str = "ROLLBACK;";

impl Database {
    /// Run a rendered statement, connecting first if needed.
    ///
    /// The connection lock is held until the statement (and its
    /// transaction envelope, in task mode) has finished.
    pub async fn execute(&self, statement: Statement) -> OrmResult<Rows> {
        let mut slot = self.slot.lock().await;
        let conn = self.ensure_connection(&mut slot).await?;
        if !statement.is_task() {
            return self.issue(conn.as_ref(), statement.sql(), statement.params(), false).await;
        }

        let guard = TaskGuard::arm(&mut slot);
        let result = self.run_task(conn.as_ref(), &statement).await;
        guard.disarm();
        result
    }

    async fn run_task(&self, conn: &dyn Connection, statement: &Statement) -> OrmResult<Rows> {
        if let Err(err) = self.issue(conn, BEGIN, &[], true).await {
            self.rollback(conn).await;
            return Err(err);
        }
        match self.issue(conn, statement.sql(), statement.params(), true).await {
            Ok(rows) => {
                self.issue(conn, COMMIT, &[], true).await?;
                Ok(rows)
            }
            Err(err) => {
                self.rollback(conn).await;
                Err(err)
            }
        }
    }

    /// Run raw SQL text, optionally as a task.
    pub async fn query(&self, sql: &str, task: bool) -> OrmResult<Rows> {
        self.execute(Statement::new(sql).with_task(task)).await
    }

    async fn rollback(&self, conn: &dyn Connection) {
        if let Err(err) = self.issue(conn, ROLLBACK, &[], true).await {
            tracing::warn!(target: "cubeorm.sql", error = %err, "rollback failed");
        }
    }

    async fn issue(&self, conn: &dyn Connection, sql: &str, params: &[Param], task: bool) -> OrmResult<Rows> {
        self.log.append(&format!("{sql} task: {task}"));
        tracing::debug!(target: "cubeorm.sql", sql, task, param_count = params.len(), "issuing statement");
        let result = if params.is_empty() {
            conn.execute(sql).await
        } else {
            conn.execute_bound(sql, params).await
        };
        if let Err(err) = &result {
            tracing::debug!(target: "cubeorm.sql", sql, error = %err, "statement failed");
        }
        result
    }
}

/// Drops the shared connection if a task future is abandoned between
/// `BEGIN;` and its `COMMIT;`/`ROLLBACK;`. Closing the session makes the
/// server abort the open transaction, and the next caller reconnects.
struct TaskGuard<'a> {
    slot: &'a mut Slot,
    armed: bool,
}

impl<'a> TaskGuard<'a> {
    fn arm(slot: &'a mut Slot) -> Self {
        Self { slot, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for TaskGuard<'_> {
    fn drop(&mut self) {
        if self.armed && self.slot.take().is_some() {
            tracing::warn!(target: "cubeorm.connection", "task cancelled mid-transaction, dropping connection");
        }
    }
}
