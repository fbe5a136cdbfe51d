pub mod db;
pub mod models;
pub mod store;

pub use store::SqliteBudgetStore;
