// src/backend/handlers.rs
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::alerts::{compute_alerts, visible_window, AlertWindow, DismissalLedger, Scope};
use crate::backend::AppState;
use crate::database::db::queries;
use crate::error::AppError;

#[derive(Debug, Deserialize, Serialize)]
pub struct UpsertBudget {
    pub category: String,
    pub year: i32,
    pub month: u32,
    pub limit: Decimal,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CreateExpense {
    pub category: String,
    pub amount: Decimal,
    pub spent_on: NaiveDate,
    pub description: Option<String>,
}

fn category_name(raw: &str) -> Result<&str, AppError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::Validation("category is required".into()));
    }
    Ok(name)
}

fn positive(amount: Decimal, field: &str) -> Result<Decimal, AppError> {
    if amount <= Decimal::ZERO {
        return Err(AppError::Validation(format!("{field} must be positive, got {amount}")));
    }
    Ok(amount)
}

pub async fn snapshots_handler(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
) -> Result<Json<Vec<Value>>, AppError> {
    let scope = Scope::new(year, month)?;
    let snapshots = queries::budget_snapshots(&state.db, scope).await?;
    Ok(Json(snapshots))
}

/// Stateless view: dismissals live in the client's session, so the server
/// always filters through an empty ledger.
pub async fn alerts_handler(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
) -> Result<Json<AlertWindow>, AppError> {
    let scope = Scope::new(year, month)?;
    let snapshots = queries::budget_snapshots(&state.db, scope).await?;
    let ranked = compute_alerts(&snapshots);
    Ok(Json(visible_window(&ranked, &DismissalLedger::new(), state.alerts.max_visible)))
}

pub async fn upsert_budget_handler(
    State(state): State<AppState>,
    Json(payload): Json<UpsertBudget>,
) -> Result<Json<Value>, AppError> {
    let scope = Scope::new(payload.year, payload.month)?;
    let name = category_name(&payload.category)?;
    let limit = positive(payload.limit, "limit")?;

    let category_id = queries::get_or_create_category(&state.db, name).await?;
    let budget_id = queries::upsert_budget(&state.db, category_id, scope, limit).await?;
    tracing::info!(%scope, category = name, %limit, budget_id, "Budget saved");

    Ok(Json(json!({ "budget_id": budget_id })))
}

pub async fn create_expense_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateExpense>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let name = category_name(&payload.category)?;
    let amount = positive(payload.amount, "amount")?;

    let category_id = queries::get_or_create_category(&state.db, name).await?;
    let expense_id = queries::record_expense(
        &state.db,
        category_id,
        amount,
        payload.spent_on,
        payload.description.as_deref(),
    )
    .await?;
    tracing::info!(category = name, %amount, spent_on = %payload.spent_on, expense_id, "Expense recorded");

    Ok((StatusCode::CREATED, Json(json!({ "expense_id": expense_id }))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AlertConfig;
    use crate::database::db::{connection, migrate};
    use std::str::FromStr;

    async fn state() -> AppState {
        let db = connection::memory_pool().await.unwrap();
        migrate::run_migrations(&db).await.unwrap();
        AppState { db, alerts: AlertConfig::default() }
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[tokio::test]
    async fn budget_and_expenses_show_up_as_alert() {
        let state = state().await;

        upsert_budget_handler(
            State(state.clone()),
            Json(UpsertBudget { category: "Food".into(), year: 2026, month: 10, limit: dec("500") }),
        )
        .await
        .unwrap();

        for amount in ["300", "100"] {
            let (status, _) = create_expense_handler(
                State(state.clone()),
                Json(CreateExpense {
                    category: "Food".into(),
                    amount: dec(amount),
                    spent_on: NaiveDate::from_ymd_opt(2026, 10, 3).unwrap(),
                    description: None,
                }),
            )
            .await
            .unwrap();
            assert_eq!(status, StatusCode::CREATED);
        }

        let Json(window) = alerts_handler(State(state.clone()), Path((2026, 10))).await.unwrap();
        assert_eq!(window.overflow_count, 0);
        assert_eq!(window.visible.len(), 1);
        assert_eq!(window.visible[0].message, "Food budget is 80.0% used. $100.00 remaining.");

        let Json(snapshots) = snapshots_handler(State(state), Path((2026, 10))).await.unwrap();
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0]["spent"], json!(400.0));
    }

    #[tokio::test]
    async fn rejects_bad_input() {
        let state = state().await;

        let err = snapshots_handler(State(state.clone()), Path((2026, 13))).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = upsert_budget_handler(
            State(state.clone()),
            Json(UpsertBudget { category: "Food".into(), year: 2026, month: 1, limit: dec("0") }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = create_expense_handler(
            State(state),
            Json(CreateExpense {
                category: "  ".into(),
                amount: dec("12.50"),
                spent_on: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
                description: None,
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
