use async_trait::async_trait;
use serde_json::Value;
use sqlx::{Pool, Sqlite};

use crate::alerts::{BudgetStore, Scope};
use crate::database::db::queries;
use crate::error::AppError;

/// Budget store backed by the local SQLite database.
#[derive(Clone)]
pub struct SqliteBudgetStore {
    pool: Pool<Sqlite>,
}

impl SqliteBudgetStore {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BudgetStore for SqliteBudgetStore {
    async fn fetch_budget_snapshots(&self, year: i32, month: u32) -> Result<Vec<Value>, AppError> {
        let scope = Scope::new(year, month)?;
        let snapshots = queries::budget_snapshots(&self.pool, scope).await?;
        tracing::debug!(%scope, count = snapshots.len(), "Fetched budget snapshots");
        Ok(snapshots)
    }
}
