use std::sync::Arc;

use crate::database::ExpenseStore;

/// Shared handler state; cloned per request
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ExpenseStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn ExpenseStore>) -> Self {
        Self { store }
    }
}
