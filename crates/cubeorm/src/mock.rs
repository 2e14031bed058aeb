//! Scripted in-memory driver for unit tests.

use crate::config::DbConfig;
use crate::driver::{Connection, Driver, Param, Row, Rows};
use crate::error::{OrmError, OrmResult};
use crate::render::Dialect;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct State {
    issued: Mutex<Vec<String>>,
    bound: Mutex<Vec<(String, usize)>>,
    failures: Mutex<Vec<(String, String)>>,
    hangs: Mutex<Vec<String>>,
    connect_failures: AtomicUsize,
    connects: AtomicUsize,
    closes: AtomicUsize,
    generation: AtomicUsize,
}

/// Shared handle for configuring the driver and inspecting what it saw.
#[derive(Clone, Default)]
pub(crate) struct Script {
    state: Arc<State>,
    dialect: Dialect,
}

impl Script {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn postgres() -> Self {
        Self {
            dialect: Dialect::Postgres,
            ..Self::default()
        }
    }

    pub(crate) fn driver(&self) -> ScriptedDriver {
        ScriptedDriver(self.clone())
    }

    /// Every statement sent, in order.
    pub(crate) fn issued(&self) -> Vec<String> {
        self.state.issued.lock().unwrap().clone()
    }

    /// Statements sent through the bound path, with their parameter count.
    pub(crate) fn bound(&self) -> Vec<(String, usize)> {
        self.state.bound.lock().unwrap().clone()
    }

    /// Reject any statement containing `fragment`.
    pub(crate) fn fail_when(&self, fragment: &str, message: &str) {
        self.state
            .failures
            .lock()
            .unwrap()
            .push((fragment.to_string(), message.to_string()));
    }

    /// Never answer a statement containing `fragment`.
    pub(crate) fn hang_when(&self, fragment: &str) {
        self.state.hangs.lock().unwrap().push(fragment.to_string());
    }

    pub(crate) fn fail_next_connects(&self, n: usize) {
        self.state.connect_failures.store(n, Ordering::SeqCst);
    }

    /// Connection attempts, successful or not.
    pub(crate) fn connects(&self) -> usize {
        self.state.connects.load(Ordering::SeqCst)
    }

    pub(crate) fn closes(&self) -> usize {
        self.state.closes.load(Ordering::SeqCst)
    }

    /// Mark every connection opened so far as failed.
    pub(crate) fn break_connections(&self) {
        self.state.generation.fetch_add(1, Ordering::SeqCst);
    }
}

pub(crate) struct ScriptedDriver(Script);

#[async_trait::async_trait]
impl Driver for ScriptedDriver {
    async fn connect(&self, _config: &DbConfig) -> OrmResult<Arc<dyn Connection>> {
        let state = &self.0.state;
        state.connects.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        let pending = state.connect_failures.load(Ordering::SeqCst);
        if pending > 0 {
            state.connect_failures.store(pending - 1, Ordering::SeqCst);
            return Err(OrmError::connect("connection refused"));
        }
        Ok(Arc::new(ScriptedConnection {
            state: Arc::clone(state),
            generation: state.generation.load(Ordering::SeqCst),
        }))
    }

    fn dialect(&self) -> Dialect {
        self.0.dialect
    }
}

struct ScriptedConnection {
    state: Arc<State>,
    generation: usize,
}

impl ScriptedConnection {
    async fn hang_if_scripted(&self, sql: &str) {
        let hangs = self.state.hangs.lock().unwrap().iter().any(|f| sql.contains(f.as_str()));
        if hangs {
            self.state.issued.lock().unwrap().push(sql.to_string());
            std::future::pending::<()>().await;
        }
    }

    fn run(&self, sql: &str) -> OrmResult<Rows> {
        self.state.issued.lock().unwrap().push(sql.to_string());
        let failures = self.state.failures.lock().unwrap();
        if let Some((_, message)) = failures.iter().find(|(fragment, _)| sql.contains(fragment.as_str())) {
            return Err(OrmError::driver(message.clone()));
        }
        Ok(Rows::new(
            vec![Row::new(vec!["sql".to_string()], vec![Some(sql.to_string())])],
            1,
        ))
    }
}

#[async_trait::async_trait]
impl Connection for ScriptedConnection {
    async fn execute(&self, sql: &str) -> OrmResult<Rows> {
        tokio::task::yield_now().await;
        self.hang_if_scripted(sql).await;
        self.run(sql)
    }

    async fn execute_bound(&self, sql: &str, params: &[Param]) -> OrmResult<Rows> {
        tokio::task::yield_now().await;
        self.state
            .bound
            .lock()
            .unwrap()
            .push((sql.to_string(), params.len()));
        self.run(sql)
    }

    async fn close(&self) -> OrmResult<()> {
        self.state.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn is_healthy(&self) -> bool {
        self.generation == self.state.generation.load(Ordering::SeqCst)
    }
}
