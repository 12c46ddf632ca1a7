// Route handlers, one module per resource
pub mod expenses;
pub mod health;
