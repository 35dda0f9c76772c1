use std::env;
use std::time::Duration;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;
use sqlx::postgres::PgPoolOptions;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub authentication: AuthenticationConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Deserialize, Clone)]
pub struct AuthenticationConfig {
    pub signing_key: String,
}

impl std::fmt::Debug for AuthenticationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticationConfig")
            .field("signing_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub connection: ConnectionConfig,
    pub credential: DatabaseCredential,
    pub migration_credential: DatabaseCredential,
    pub primary: DatabaseInstance,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ConnectionConfig {
    pub max_open: u32,
    /// Ceiling on idle connections. The sqlx pool has no such limit, so this
    /// is only reported; `max_idle_time_secs` is what closes idle connections.
    pub max_idle: u32,
    pub max_idle_time_secs: u64,
}

impl ConnectionConfig {
    pub fn max_idle_time(&self) -> Duration {
        Duration::from_secs(self.max_idle_time_secs)
    }

    /// Pool sizing. No connections are kept open while the pool is idle.
    pub fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_open)
            .idle_timeout(self.max_idle_time())
    }
}

#[derive(Deserialize, Clone)]
pub struct DatabaseCredential {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for DatabaseCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseCredential")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseInstance {
    pub host: String,
    pub port: u16,
    pub database: String,
}

impl DatabaseConfig {
    /// Connection options for the application user.
    pub fn connect_options(&self) -> PgConnectOptions {
        self.options_for(&self.credential)
    }

    /// Connection options for the user that owns the schema.
    pub fn migration_connect_options(&self) -> PgConnectOptions {
        self.options_for(&self.migration_credential)
    }

    fn options_for(&self, credential: &DatabaseCredential) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.primary.host)
            .port(self.primary.port)
            .database(&self.primary.database)
            .username(&credential.username)
            .password(&credential.password)
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (AUTHENTICATION__SIGNING_KEY, DATABASE__PRIMARY__HOST, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    ///
    /// Every key is required; a missing one fails the load.
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: DATABASE__PRIMARY__HOST=db overrides database.primary.host
            .add_source(Environment::default().separator("__").try_parsing(true))
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        Ok(config)
    }
}
