pub mod manager;
pub mod models;
pub mod repository;
pub mod tags;

pub use manager::{DatabaseError, DatabaseManager};
pub use models::Expense;
pub use repository::{ExpenseRepository, ExpenseStore};
pub use tags::Tags;
