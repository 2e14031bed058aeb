//! The `Database` context: configuration, the single shared connection and
//! the log sink.
//!
//! # Example
//!
//! ```ignore
//! use cubeorm::{Database, DbConfig};
//!
//! let db = Database::postgres(DbConfig::from_env()?);
//! let rows = db.model("user").where_clause("phone=123").select_all().await?;
//! db.close().await?;
//! ```

use crate::config::DbConfig;
use crate::driver::{Connection, Driver};
use crate::error::OrmResult;
use crate::log::LogSink;
use crate::model::Model;
use crate::pg::PgDriver;
use crate::render::Dialect;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::Mutex;

/// Connection slot guarded for the full duration of one execution.
pub(crate) type Slot = Option<Arc<dyn Connection>>;

/// Owns the configuration and at most one live connection.
///
/// The connection is opened lazily by the first statement and reused
/// afterwards. All statements are serialized on it: a task-mode call holds
/// the connection from `BEGIN;` until `COMMIT;`/`ROLLBACK;`, so concurrent
/// callers never land inside each other's transactions.
pub struct Database {
    driver: Arc<dyn Driver>,
    config: RwLock<DbConfig>,
    pub(crate) slot: Mutex<Slot>,
    pub(crate) log: LogSink,
}

impl Database {
    /// Create a context over `driver`. Nothing is connected yet.
    pub fn new(driver: impl Driver + 'static, config: DbConfig) -> Self {
        Self::with_driver(Arc::new(driver), config)
    }

    /// Create a context over a shared driver.
    pub fn with_driver(driver: Arc<dyn Driver>, config: DbConfig) -> Self {
        Self {
            driver,
            config: RwLock::new(config),
            slot: Mutex::new(None),
            log: LogSink::new(),
        }
    }

    /// Create a context using the bundled Postgres driver.
    pub fn postgres(config: DbConfig) -> Self {
        Self::new(PgDriver::new(), config)
    }

    /// Replace the configuration wholesale.
    ///
    /// A connection that is already open stays open; the new settings apply
    /// from the next connection attempt.
    pub fn configure(&self, config: DbConfig) {
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config;
    }

    /// A copy of the current configuration.
    pub fn config(&self) -> DbConfig {
        self.config.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Dialect of the underlying driver.
    pub fn dialect(&self) -> Dialect {
        self.driver.dialect()
    }

    /// Start a statement on `prefix + base`.
    pub fn open_table(&self, base: &str) -> Model<'_> {
        let table = self
            .config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .table_name(base);
        Model::new(self, table)
    }

    /// Alias for [`Database::open_table`].
    pub fn model(&self, base: &str) -> Model<'_> {
        self.open_table(base)
    }

    /// Whether a connection handle is currently held.
    pub async fn is_connected(&self) -> bool {
        self.slot.lock().await.is_some()
    }

    /// Close and forget the connection, if any. Always succeeds; a failure
    /// while closing is only logged.
    pub async fn close(&self) -> OrmResult<()> {
        let conn = self.slot.lock().await.take();
        if let Some(conn) = conn {
            if let Err(err) = conn.close().await {
                tracing::warn!(target: "cubeorm.connection", error = %err, "error while closing connection");
            } else {
                tracing::debug!(target: "cubeorm.connection", "connection closed");
            }
        }
        Ok(())
    }

    /// Read and clear the execution log.
    pub fn drain_log(&self) -> String {
        self.log.drain()
    }

    /// Return the live connection in `slot`, opening one if the slot is
    /// empty or its connection has failed.
    ///
    /// On failure the slot is left empty, so the next call tries again.
    pub(crate) async fn ensure_connection(&self, slot: &mut Slot) -> OrmResult<Arc<dyn Connection>> {
        if let Some(conn) = slot.as_ref() {
            if conn.is_healthy() {
                return Ok(Arc::clone(conn));
            }
            tracing::warn!(target: "cubeorm.connection", "dropping failed connection");
            *slot = None;
        }

        let config = self.config();
        tracing::debug!(
            target: "cubeorm.connection",
            host = %config.host,
            port = config.port,
            database = %config.database,
            "connecting"
        );
        let conn = self.driver.connect(&config).await?;
        *slot = Some(Arc::clone(&conn));
        Ok(conn)
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("config", &self.config())
            .field("dialect", &self.dialect())
            .finish_non_exhaustive()
    }
}
