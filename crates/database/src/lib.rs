use std::{env, error::Error, time::Duration};

use async_trait::async_trait;
use queries::convert_error;
use sqlx::{postgres::PgPoolOptions, Transaction};
use weather_station::database::{
    context, Database, DatabaseAutocommit, DatabaseOperations, DatabaseTransaction,
    Result,
};

pub mod data_model;
pub mod queries;

const DEFAULT_MAX_CONNECTIONS: u32 = 8;
const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

pub struct DatabaseConnectionInfo {
    pub username: String,
    pub password: String,
    pub hostname: String,
    pub port: u16,
    pub database: String,
}

impl DatabaseConnectionInfo {
    pub fn from_env() -> Option<Self> {
        let username = env::var("DATABASE_USER").ok()?;
        let password = env::var("DATABASE_PASSWORD").ok()?;
        let hostname = env::var("DATABASE_HOST").ok()?;
        let port: u16 = env::var("DATABASE_PORT").ok()?.parse().ok()?;
        let database = env::var("DATABASE_NAME").ok()?;
        Some(Self {
            username,
            password,
            hostname,
            port,
            database,
        })
    }

    pub fn postgres_url(self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.hostname, self.port, self.database
        )
    }
}

/// Where and how to connect.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    pub fn new<S: Into<String>>(url: S) -> Self {
        Self {
            url: url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
        }
    }

    /// `DATABASE_URL` takes precedence over the single `DATABASE_*` parts.
    /// `DATABASE_MAX_CONNECTIONS` optionally sizes the pool.
    pub fn from_env() -> Option<Self> {
        let url = env::var("DATABASE_URL")
            .ok()
            .or_else(|| DatabaseConnectionInfo::from_env().map(|info| info.postgres_url()))?;
        let mut config = Self::new(url);
        if let Some(max) = env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|max| max.parse().ok())
        {
            config.max_connections = max;
        }
        Some(config)
    }
}

impl From<DatabaseConnectionInfo> for DatabaseConfig {
    fn from(info: DatabaseConnectionInfo) -> Self {
        Self::new(info.postgres_url())
    }
}

#[derive(Debug, Clone)]
pub struct PgDatabase {
    connection: sqlx::PgPool,
}

pub struct PgDatabaseTransaction<'a> {
    tx: Transaction<'a, sqlx::Postgres>,
}

#[async_trait]
impl<'a> DatabaseTransaction for PgDatabaseTransaction<'a> {
    async fn commit(self) -> Result<()> {
        self.tx.commit().await.map_err(convert_error(context::TRANSACTION))
    }

    async fn rollback(self) -> Result<()> {
        self.tx
            .rollback()
            .await
            .map_err(convert_error(context::TRANSACTION))
    }
}

impl<'a> DatabaseOperations for PgDatabaseTransaction<'a> {}

pub struct PgDatabaseAutocommit {
    pool: sqlx::PgPool,
}

impl DatabaseOperations for PgDatabaseAutocommit {}

impl DatabaseAutocommit for PgDatabaseAutocommit {}

impl PgDatabase {
    /// Connects and brings the schema up to date.
    pub async fn connect(
        config: DatabaseConfig,
    ) -> std::result::Result<Self, Box<dyn Error + Send + Sync>> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(&config.url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        log::info!(
            "connected to database (max {} connections)",
            config.max_connections
        );

        Ok(Self { connection: pool })
    }

    pub fn pool(&self) -> &sqlx::PgPool {
        &self.connection
    }
}

#[async_trait]
impl Database for PgDatabase {
    type Transaction = PgDatabaseTransaction<'static>;
    type Autocommit = PgDatabaseAutocommit;

    fn auto(&self) -> Self::Autocommit {
        PgDatabaseAutocommit {
            pool: self.connection.clone(),
        }
    }

    async fn transaction(&self) -> Result<Self::Transaction> {
        let tx: Transaction<'_, sqlx::Postgres> = self
            .connection
            .begin()
            .await
            .map_err(convert_error(context::TRANSACTION))?;

        Ok(PgDatabaseTransaction { tx })
    }
}
