//! Connection configuration.
//!
//! `DbConfig` carries everything needed to open a connection plus the table
//! name prefix applied by [`Database::model`](crate::Database::model). It can
//! be built in code, parsed from TOML, or read from `CUBEORM_*` environment
//! variables.
//!
//! ```toml
//! host = "127.0.0.1"
//! port = 3306
//! user = "root"
//! password = ""
//! database = "system"
//! table_prefix = "cube_"
//! ```

use crate::error::{OrmError, OrmResult};
use serde::Deserialize;
use std::fmt;
use std::path::Path;

/// Environment variable prefix read by [`DbConfig::from_env`].
pub const ENV_PREFIX: &str = "CUBEORM_";

/// Database connection configuration.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    #[serde(alias = "db")]
    pub database: String,
    /// Prepended to every base table name handed to `Database::model`.
    #[serde(alias = "prefix")]
    pub table_prefix: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: String::new(),
            database: "system".to_string(),
            table_prefix: "cube_".to_string(),
        }
    }
}

// The password never reaches logs through `{:?}`.
impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .field("table_prefix", &self.table_prefix)
            .finish()
    }
}

impl DbConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the host.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the user name.
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    /// Set the password.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Set the database name.
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Set the table name prefix.
    pub fn table_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.table_prefix = prefix.into();
        self
    }

    /// Fully-qualified table name for `base`.
    pub fn table_name(&self, base: &str) -> String {
        format!("{}{}", self.table_prefix, base)
    }

    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(raw: &str) -> OrmResult<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Read and parse a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> OrmResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            OrmError::config(format!("failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&raw)
            .map_err(|e| OrmError::config(format!("failed to parse config file {}: {e}", path.display())))
    }

    /// Build from `CUBEORM_HOST`, `CUBEORM_PORT`, `CUBEORM_USER`,
    /// `CUBEORM_PASSWORD`, `CUBEORM_DATABASE` and `CUBEORM_TABLE_PREFIX`.
    /// Unset variables keep their defaults.
    pub fn from_env() -> OrmResult<Self> {
        Self::from_lookup(|key| std::env::var(format!("{ENV_PREFIX}{key}")).ok())
    }

    /// Build from an arbitrary key lookup (keys without the `CUBEORM_` prefix).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> OrmResult<Self> {
        let mut config = Self::default();
        if let Some(host) = lookup("HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|e| OrmError::config(format!("invalid {ENV_PREFIX}PORT {port:?}: {e}")))?;
        }
        if let Some(user) = lookup("USER") {
            config.user = user;
        }
        if let Some(password) = lookup("PASSWORD") {
            config.password = password;
        }
        if let Some(database) = lookup("DATABASE") {
            config.database = database;
        }
        if let Some(prefix) = lookup("TABLE_PREFIX") {
            config.table_prefix = prefix;
        }
        Ok(config)
    }
}
