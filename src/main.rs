// src/main.rs
use std::env;
use std::path::Path;

use budget_alerts::config::AppConfig;
use budget_alerts::database::db::{connection, migrate, queries};
use budget_alerts::{backend, cli, logging};
use dotenvy::dotenv;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = AppConfig::from_env()?;
    let args: Vec<String> = env::args().collect();
    let server_mode = args.len() > 1 && args[1] == "server";

    // The TUI owns the terminal, so its logs go to a file.
    let _log_guard = if server_mode {
        logging::init_stdout();
        None
    } else {
        Some(logging::init_file(Path::new(&config.log_file)))
    };

    let pool = connection::get_db_pool(&config.database_url).await?;
    migrate::run_migrations(&pool).await?;
    queries::seed_fixed_categories(&pool).await?;

    if server_mode {
        tracing::info!("Starting backend server...");
        backend::run_server(pool, config.bind_addr, config.alerts).await?;
    } else {
        tracing::info!("Starting CLI...");
        cli::run(pool, config.alerts).await?;
    }
    Ok(())
}
