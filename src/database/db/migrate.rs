use sqlx::{Pool, Sqlite};

use crate::error::AppError;

pub async fn run_migrations(pool: &Pool<Sqlite>) -> Result<(), AppError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::debug!("Migrations applied");
    Ok(())
}
