use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub expense_id: i64,
    pub category_id: i64,
    pub amount: Decimal,
    pub spent_on: NaiveDate,
    pub description: Option<String>,
}
