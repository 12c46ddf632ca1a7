use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from the storage layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Invalid table name: {0}")]
    InvalidTableName(String),

    #[error("Expense {0} not found")]
    NotFound(i64),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Owns the connection pool for the expenses database
#[derive(Clone)]
pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    /// Table used outside of tests
    pub const EXPENSES_TABLE: &'static str = "expenses";

    /// Open the pool and verify connectivity
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let redacted = Self::redact_url(&config.url)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(&config.url)
            .await?;

        info!(database = %redacted, max_connections = config.max_connections, "Connected to database");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the expenses table if it does not exist yet
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        Self::create_table(&self.pool, Self::EXPENSES_TABLE).await
    }

    /// Idempotent `CREATE TABLE` for an expenses-shaped table
    pub async fn create_table(pool: &PgPool, table: &str) -> Result<(), DatabaseError> {
        if !Self::is_valid_table_name(table) {
            return Err(DatabaseError::InvalidTableName(table.to_string()));
        }

        let query = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id BIGSERIAL PRIMARY KEY,
                title TEXT,
                amount FLOAT8,
                note TEXT,
                tags TEXT[]
            )",
            Self::quote_identifier(table)
        );
        sqlx::query(&query).execute(pool).await?;

        info!("Ensured table exists: {}", table);
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }

    /// Quote SQL identifier to prevent injection
    pub(crate) fn quote_identifier(name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    /// Table names are restricted to [a-z0-9_], starting with a letter
    pub(crate) fn is_valid_table_name(name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(c) if c.is_ascii_lowercase() => {}
            _ => return false,
        }
        name.len() <= 63 && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    }

    /// Connection string with the password masked, for logging
    fn redact_url(raw: &str) -> Result<String, DatabaseError> {
        let mut url = url::Url::parse(raw).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        if url.password().is_some() {
            url.set_password(Some("***"))
                .map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        }
        Ok(url.into())
    }
}
