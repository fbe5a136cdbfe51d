pub mod budget;
pub mod category;
pub mod expense;

pub use budget::Budget;
pub use category::Category;
pub use expense::Expense;
