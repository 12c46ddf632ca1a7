use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::database::{DatabaseError, Expense, ExpenseStore};
use crate::state::AppState;

/// In-memory expense store for handler tests
#[derive(Default)]
pub struct MemoryExpenseStore {
    rows: RwLock<BTreeMap<i64, Expense>>,
    next_id: RwLock<i64>,
    calls: AtomicUsize,
}

impl MemoryExpenseStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Number of store operations invoked so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ExpenseStore for MemoryExpenseStore {
    async fn create(&self, expense: Expense) -> Result<Expense, DatabaseError> {
        self.record_call();
        let mut next_id = self.next_id.write().await;
        *next_id += 1;
        let created = expense.with_id(*next_id);
        self.rows.write().await.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get(&self, id: i64) -> Result<Expense, DatabaseError> {
        self.record_call();
        self.rows
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(DatabaseError::NotFound(id))
    }

    async fn update(&self, expense: Expense) -> Result<Expense, DatabaseError> {
        self.record_call();
        let mut rows = self.rows.write().await;
        match rows.get_mut(&expense.id) {
            Some(row) => {
                *row = expense.clone();
                Ok(expense)
            }
            None => Err(DatabaseError::NotFound(expense.id)),
        }
    }

    async fn list(&self) -> Result<Vec<Expense>, DatabaseError> {
        self.record_call();
        Ok(self.rows.read().await.values().cloned().collect())
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

/// Store whose every operation fails as if the database were unreachable
pub struct FailingExpenseStore;

impl FailingExpenseStore {
    fn failure() -> DatabaseError {
        DatabaseError::Sqlx(sqlx::Error::PoolTimedOut)
    }
}

#[async_trait]
impl ExpenseStore for FailingExpenseStore {
    async fn create(&self, _expense: Expense) -> Result<Expense, DatabaseError> {
        Err(Self::failure())
    }

    async fn get(&self, _id: i64) -> Result<Expense, DatabaseError> {
        Err(Self::failure())
    }

    async fn update(&self, _expense: Expense) -> Result<Expense, DatabaseError> {
        Err(Self::failure())
    }

    async fn list(&self) -> Result<Vec<Expense>, DatabaseError> {
        Err(Self::failure())
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Err(Self::failure())
    }
}

pub fn memory_state() -> (AppState, Arc<MemoryExpenseStore>) {
    let store = MemoryExpenseStore::new();
    (AppState::new(store.clone()), store)
}

pub fn failing_state() -> AppState {
    AppState::new(Arc::new(FailingExpenseStore))
}
