use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A monthly budget line joined with its category name.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Budget {
    pub budget_id: i64,
    pub category_id: i64,
    pub category_name: String,
    pub year: i64,
    pub month: i64,
    pub amount: String, // decimal text, as stored
}

impl Budget {
    /// `None` when the stored text is not a decimal.
    pub fn limit(&self) -> Option<Decimal> {
        Decimal::from_str(self.amount.trim()).ok()
    }
}
