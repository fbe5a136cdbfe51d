use axum::{
    routing::{get, post, put},
    Router,
};
use crate::backend::{handlers, AppState};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/budgets", put(handlers::upsert_budget_handler))
        .route("/api/budgets/:year/:month/snapshots", get(handlers::snapshots_handler))
        .route("/api/budgets/:year/:month/alerts", get(handlers::alerts_handler))
        .route("/api/expenses", post(handlers::create_expense_handler))
}
