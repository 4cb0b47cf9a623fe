//! Connection settings.
//!
//! Settings come from the environment (`DATABASE_HOST`, `DATABASE_PORT`,
//! `DATABASE_NAME`, `DATABASE_USER`, `DATABASE_PASSWORD`, `DATABASE_SSLMODE`)
//! or from the `[database]` table of a TOML file:
//!
//! ```toml
//! [database]
//! host = "localhost"
//! port = 5432
//! database = "ads"
//! user = "postgres"
//! password = "postgres"
//! ```

use std::path::Path;

use orma_core::{OrmaError, Result};
use serde::Deserialize;

const DEFAULT_PORT: u16 = 5432;

fn default_port() -> u16 {
    DEFAULT_PORT
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatabaseConfig {
    /// Host address
    pub host: String,
    /// Port number (default: 5432)
    #[serde(default = "default_port")]
    pub port: u16,
    /// Database name
    #[serde(alias = "dbname")]
    pub database: String,
    /// Username
    #[serde(alias = "username")]
    pub user: String,
    /// Password
    #[serde(default)]
    pub password: String,
    /// SSL mode: `disable`, `prefer` or `require`
    #[serde(default, alias = "sslmode")]
    pub ssl_mode: Option<String>,
}

#[derive(Deserialize)]
struct ConfigFile {
    database: DatabaseConfig,
}

impl DatabaseConfig {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        database: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            database: database.into(),
            user: user.into(),
            password: password.into(),
            ssl_mode: None,
        }
    }

    pub fn ssl_mode(mut self, mode: impl Into<String>) -> Self {
        self.ssl_mode = Some(mode.into());
        self
    }

    /// Reads `DATABASE_*` variables from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads `DATABASE_*` variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| OrmaError::Config(format!("{} is not set", key)))
        };

        let port = match lookup("DATABASE_PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| OrmaError::Config(format!("DATABASE_PORT is not a port: {:?}", raw)))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            host: required("DATABASE_HOST")?,
            port,
            database: required("DATABASE_NAME")?,
            user: required("DATABASE_USER")?,
            password: lookup("DATABASE_PASSWORD").unwrap_or_default(),
            ssl_mode: lookup("DATABASE_SSLMODE"),
        })
    }

    /// Parses the `[database]` table of a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| OrmaError::Config(e.to_string()))?;
        Ok(file.database)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| OrmaError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// libpq-style connection string, with values quoted where needed.
    pub fn connection_string(&self) -> String {
        let mut s = format!(
            "host={} port={} user={} password={} dbname={}",
            quote(&self.host),
            self.port,
            quote(&self.user),
            quote(&self.password),
            quote(&self.database)
        );
        if let Some(ref ssl) = self.ssl_mode {
            s.push_str(&format!(" sslmode={}", quote(ssl)));
        }
        s
    }

    #[cfg(feature = "postgres-sync")]
    pub fn to_pg_config(&self) -> Result<postgres::Config> {
        use postgres::config::SslMode;

        let mut config = postgres::Config::new();
        config
            .host(&self.host)
            .port(self.port)
            .dbname(&self.database)
            .user(&self.user);
        if !self.password.is_empty() {
            config.password(&self.password);
        }
        if let Some(mode) = &self.ssl_mode {
            let mode = match mode.as_str() {
                "disable" => SslMode::Disable,
                "prefer" => SslMode::Prefer,
                "require" => SslMode::Require,
                other => return Err(OrmaError::Config(format!("unsupported sslmode {:?}", other))),
            };
            config.ssl_mode(mode);
        }
        Ok(config)
    }
}

fn quote(value: &str) -> String {
    if !value.is_empty() && !value.contains([' ', '\'', '\\']) {
        return value.to_string();
    }
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}
