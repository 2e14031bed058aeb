//! # cubeorm
//!
//! A small fluent SQL statement builder over one lazily opened connection.
//!
//! ## Features
//!
//! - **Fluent builder**: `db.model("user").where_clause("..").order_by("..").select_all()`
//! - **Lazy connection**: opened by the first statement, reopened after close or failure
//! - **Task mode**: `.task()` wraps the statement in `BEGIN;` / `COMMIT;` / `ROLLBACK;`
//! - **Serialized execution**: concurrent callers never interleave inside a transaction
//! - **Execution log**: every issued statement is timestamped into a drainable buffer
//! - **Pluggable drivers**: ships a `tokio-postgres` driver; anything else implements [`Driver`]
//!
//! ## Example
//!
//! ```ignore
//! use cubeorm::{Database, DbConfig, Fields};
//!
//! let db = Database::postgres(DbConfig::new().port(5432).table_prefix("cube_"));
//!
//! // SELECT username,phone FROM cube_user WHERE phone=123 ORDER BY username ASC LIMIT 2 OFFSET 0;
//! let rows = db
//!     .model("user")
//!     .where_clause("phone=123")
//!     .order_by("username ASC")
//!     .limit(0, 2)
//!     .select(["username", "phone"])
//!     .await?;
//!
//! // Insert only if no row matches the filter, inside a transaction.
//! db.model("user")
//!     .task()
//!     .where_clause("username='lin'")
//!     .insert(Fields::new().set("username", "'lin'").set("phone", 123))
//!     .await?;
//!
//! println!("{}", db.drain_log());
//! db.close().await?;
//! ```
//!
//! Literal values are concatenated into the SQL text without escaping. Callers
//! are responsible for quoting, or should use [`Model::insert_bound`] and
//! [`Model::update_bound`].

pub mod config;
pub mod connection;
pub mod driver;
pub mod error;
mod execute;
pub mod log;
pub mod model;
pub mod pg;
pub mod render;

#[cfg(test)]
mod mock;

pub use config::DbConfig;
pub use connection::Database;
pub use driver::{Connection, Driver, Param, Row, Rows};
pub use error::{OrmError, OrmResult};
pub use log::LogSink;
pub use model::Model;
pub use pg::PgDriver;
pub use render::{Assignments, BoundFields, Dialect, Fields, Statement, Terms};

// Re-exported so driver implementations can use the same attribute.
pub use async_trait::async_trait;
