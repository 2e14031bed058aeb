//! `tokio-postgres` driver.
//!
//! Literal statements go through the simple query protocol, so rows come
//! back as text exactly like any other driver. Bound statements use the
//! extended protocol and report only the affected row count.
//!
//! The connection future runs on its own task; when it ends (server
//! shutdown, network drop) the connection reports itself unhealthy and the
//! next statement reconnects.

use crate::config::DbConfig;
use crate::driver::{Connection, Driver, Param, Row, Rows};
use crate::error::{OrmError, OrmResult};
use crate::render::Dialect;
use bytes::BytesMut;
use std::error::Error;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};
use tokio_postgres::{NoTls, SimpleQueryMessage};

/// Postgres driver over a plain (`NoTls`) TCP connection.
#[derive(Debug, Clone, Default)]
pub struct PgDriver {
    application_name: Option<String>,
}

impl PgDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `name` as `application_name` to the server.
    pub fn application_name(mut self, name: impl Into<String>) -> Self {
        self.application_name = Some(name.into());
        self
    }

    fn pg_config(&self, config: &DbConfig) -> tokio_postgres::Config {
        let mut pg = tokio_postgres::Config::new();
        pg.host(config.host.as_str())
            .port(config.port)
            .user(config.user.as_str())
            .dbname(config.database.as_str());
        if !config.password.is_empty() {
            pg.password(config.password.as_str());
        }
        if let Some(name) = &self.application_name {
            pg.application_name(name.as_str());
        }
        pg
    }
}

#[async_trait::async_trait]
impl Driver for PgDriver {
    async fn connect(&self, config: &DbConfig) -> OrmResult<Arc<dyn Connection>> {
        let (client, connection) = self
            .pg_config(config)
            .connect(NoTls)
            .await
            .map_err(|e| OrmError::connect(e.to_string()))?;

        let healthy = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&healthy);
        tokio::spawn(async move {
            if let Err(err) = connection.await {
                tracing::warn!(target: "cubeorm.connection", error = %err, "postgres connection failed");
            }
            flag.store(false, Ordering::Release);
        });

        Ok(Arc::new(PgConnection { client, healthy }))
    }

    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }
}

struct PgConnection {
    client: tokio_postgres::Client,
    healthy: Arc<AtomicBool>,
}

#[async_trait::async_trait]
impl Connection for PgConnection {
    async fn execute(&self, sql: &str) -> OrmResult<Rows> {
        let messages = self.client.simple_query(sql).await?;
        let mut out = Rows::default();
        for message in messages {
            match message {
                SimpleQueryMessage::Row(row) => {
                    let columns = row.columns().iter().map(|c| c.name().to_string()).collect();
                    let values = (0..row.len()).map(|i| row.get(i).map(str::to_string)).collect();
                    out.rows.push(Row::new(columns, values));
                }
                SimpleQueryMessage::CommandComplete(n) => out.affected_rows += n,
                _ => {}
            }
        }
        Ok(out)
    }

    async fn execute_bound(&self, sql: &str, params: &[Param]) -> OrmResult<Rows> {
        let refs: Vec<&(dyn ToSql + Sync)> = params.iter().map(|p| p as &(dyn ToSql + Sync)).collect();
        let affected = self.client.execute(sql, &refs).await?;
        Ok(Rows::affected(affected))
    }

    async fn close(&self) -> OrmResult<()> {
        // The socket closes once the last handle to the client is dropped.
        self.healthy.store(false, Ordering::Release);
        Ok(())
    }

    fn is_healthy(&self) -> bool {
        self.healthy.load(Ordering::Acquire) && !self.client.is_closed()
    }
}

/// Integers and floats narrow to `INT2`/`INT4`/`FLOAT4` columns and fail
/// when the value is out of range for the narrower type. Narrowing to
/// `FLOAT4` rounds to the nearest `f32`. Any other mismatch between the
/// variant and the server's parameter type is rejected with `WrongType`.
impl ToSql for Param {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            Param::Null => Ok(IsNull::Yes),
            Param::Bool(v) => v.to_sql_checked(ty, out),
            Param::Int(v) if *ty == Type::INT2 => i16::try_from(*v)?.to_sql_checked(ty, out),
            Param::Int(v) if *ty == Type::INT4 => i32::try_from(*v)?.to_sql_checked(ty, out),
            Param::Int(v) => v.to_sql_checked(ty, out),
            Param::Float(v) if *ty == Type::FLOAT4 => {
                let narrow = *v as f32;
                if v.is_finite() && !narrow.is_finite() {
                    return Err(format!("{v} is out of range for real").into());
                }
                narrow.to_sql_checked(ty, out)
            }
            Param::Float(v) => v.to_sql_checked(ty, out),
            Param::Text(v) => v.as_str().to_sql_checked(ty, out),
        }
    }

    // Null binds to any type; the other variants are checked in `to_sql`.
    fn accepts(ty: &Type) -> bool {
        let _ = ty;
        true
    }

    to_sql_checked!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pg_config_maps_fields() {
        let config = DbConfig::new()
            .host("db.local")
            .port(5433)
            .user("app")
            .password("secret")
            .database("shop");
        let pg = PgDriver::new().application_name("cubeorm-test").pg_config(&config);
        assert_eq!(pg.get_ports(), &[5433]);
        assert_eq!(pg.get_user(), Some("app"));
        assert_eq!(pg.get_dbname(), Some("shop"));
        assert_eq!(pg.get_password(), Some(&b"secret"[..]));
        assert_eq!(pg.get_application_name(), Some("cubeorm-test"));
    }

    #[test]
    fn empty_password_is_not_sent() {
        let pg = PgDriver::new().pg_config(&DbConfig::default());
        assert_eq!(pg.get_password(), None);
    }

    #[test]
    fn driver_reports_postgres_dialect() {
        assert_eq!(PgDriver::new().dialect(), Dialect::Postgres);
    }

    #[test]
    fn int_param_narrows_to_column_type() {
        let mut buf = BytesMut::new();
        Param::Int(7).to_sql(&Type::INT4, &mut buf).unwrap();
        assert_eq!(&buf[..], &7_i32.to_be_bytes());

        let mut buf = BytesMut::new();
        assert!(Param::Int(i64::MAX).to_sql(&Type::INT2, &mut buf).is_err());
    }

    #[test]
    fn null_param_is_null() {
        let mut buf = BytesMut::new();
        assert!(matches!(Param::Null.to_sql(&Type::TEXT, &mut buf).unwrap(), IsNull::Yes));
    }

    #[test]
    fn mismatched_param_is_rejected() {
        let mut buf = BytesMut::new();
        assert!(Param::Int(7).to_sql_checked(&Type::TEXT, &mut buf).is_err());
        assert!(Param::Text("abc".to_string()).to_sql_checked(&Type::INT4, &mut buf).is_err());
        assert!(Param::Bool(true).to_sql_checked(&Type::INT8, &mut buf).is_err());
        assert!(buf.is_empty());
    }

    #[test]
    fn text_param_binds_to_text_types() {
        let mut buf = BytesMut::new();
        Param::Text("abc".to_string()).to_sql_checked(&Type::VARCHAR, &mut buf).unwrap();
        assert_eq!(&buf[..], b"abc");
    }

    #[test]
    fn float_param_narrows_within_range() {
        let mut buf = BytesMut::new();
        Param::Float(0.5).to_sql_checked(&Type::FLOAT4, &mut buf).unwrap();
        assert_eq!(&buf[..], &0.5_f32.to_be_bytes());

        let mut buf = BytesMut::new();
        assert!(Param::Float(1e300).to_sql_checked(&Type::FLOAT4, &mut buf).is_err());
    }
}
