use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::Expense;

/// Persistence operations the HTTP layer depends on.
///
/// Implementations must report a missing row as `DatabaseError::NotFound`
/// and every other failure as some other variant; nothing is retried.
#[async_trait]
pub trait ExpenseStore: Send + Sync {
    /// Insert a new expense. The input `id` is ignored.
    async fn create(&self, expense: Expense) -> Result<Expense, DatabaseError>;

    async fn get(&self, id: i64) -> Result<Expense, DatabaseError>;

    /// Replace every field of the row identified by `expense.id`.
    async fn update(&self, expense: Expense) -> Result<Expense, DatabaseError>;

    /// All expenses ordered by id. Empty table yields an empty vec.
    async fn list(&self) -> Result<Vec<Expense>, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}

/// PostgreSQL-backed store. Every read casts `id` to BIGINT so tables created
/// with a SERIAL (INT4) id decode the same as BIGSERIAL ones.
pub struct ExpenseRepository {
    table_name: String,
    pool: PgPool,
}

impl ExpenseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            table_name: DatabaseManager::EXPENSES_TABLE.to_string(),
            pool,
        }
    }

    /// Repository over another expenses-shaped table
    pub fn with_table(pool: PgPool, table_name: impl Into<String>) -> Result<Self, DatabaseError> {
        let table_name = table_name.into();
        if !DatabaseManager::is_valid_table_name(&table_name) {
            return Err(DatabaseError::InvalidTableName(table_name));
        }
        Ok(Self { table_name, pool })
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    fn table(&self) -> String {
        DatabaseManager::quote_identifier(&self.table_name)
    }
}

#[async_trait]
impl ExpenseStore for ExpenseRepository {
    async fn create(&self, expense: Expense) -> Result<Expense, DatabaseError> {
        let sql = format!(
            "INSERT INTO {} (title, amount, note, tags) VALUES ($1, $2, $3, $4) \
             RETURNING id::BIGINT AS id, title, amount, note, tags",
            self.table()
        );

        let created = sqlx::query_as::<_, Expense>(&sql)
            .bind(&expense.title)
            .bind(expense.amount)
            .bind(&expense.note)
            .bind(&expense.tags)
            .fetch_one(&self.pool)
            .await?;

        debug!(id = created.id, "Created expense");
        Ok(created)
    }

    async fn get(&self, id: i64) -> Result<Expense, DatabaseError> {
        let sql = format!(
            "SELECT id::BIGINT AS id, title, amount, note, tags FROM {} WHERE id = $1",
            self.table()
        );

        sqlx::query_as::<_, Expense>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DatabaseError::NotFound(id))
    }

    async fn update(&self, expense: Expense) -> Result<Expense, DatabaseError> {
        let sql = format!(
            "UPDATE {} SET title = $2, amount = $3, note = $4, tags = $5 WHERE id = $1 \
             RETURNING id::BIGINT AS id, title, amount, note, tags",
            self.table()
        );

        let updated = sqlx::query_as::<_, Expense>(&sql)
            .bind(expense.id)
            .bind(&expense.title)
            .bind(expense.amount)
            .bind(&expense.note)
            .bind(&expense.tags)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DatabaseError::NotFound(expense.id))?;

        debug!(id = updated.id, "Updated expense");
        Ok(updated)
    }

    async fn list(&self) -> Result<Vec<Expense>, DatabaseError> {
        let sql = format!(
            "SELECT id::BIGINT AS id, title, amount, note, tags FROM {} ORDER BY id",
            self.table()
        );

        let expenses = sqlx::query_as::<_, Expense>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(expenses)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
