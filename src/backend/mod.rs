mod handlers;
mod routes;

use axum::{routing::get, Router};
use sqlx::{Pool, Sqlite};
use std::net::SocketAddr;

use crate::config::AlertConfig;
use crate::error::AppError;

#[derive(Clone)]
pub struct AppState {
    pub db: Pool<Sqlite>,
    pub alerts: AlertConfig,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "Backend is running" }))
        .merge(routes::api_routes())
        .with_state(state)
}

pub async fn run_server(pool: Pool<Sqlite>, addr: SocketAddr, alerts: AlertConfig) -> Result<(), AppError> {
    let state = AppState { db: pool, alerts };

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app(state)).await?;

    Ok(())
}
