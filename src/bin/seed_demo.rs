use std::str::FromStr;

use budget_alerts::alerts::{compute_alerts, Scope};
use budget_alerts::config::AppConfig;
use budget_alerts::database::db::{connection, migrate, queries};
use dotenvy::dotenv;
use rust_decimal::Decimal;

/// Marks seeded expenses so a re-run replaces them instead of stacking.
const DEMO_NOTE: &str = "demo";

/// (category, monthly limit, expenses): one row per severity tier plus a
/// couple that stay under the warning threshold.
const DEMO: &[(&str, &str, &[&str])] = &[
    ("Dining Out", "300.00", &["120.00", "95.50", "110.00"]),    // critical
    ("Groceries", "600.00", &["210.00", "180.00", "165.25"]),    // danger
    ("Utilities", "250.00", &["140.00", "62.40"]),               // warning
    ("Entertainment", "150.00", &["45.00"]),                     // fine
    ("Gas", "200.00", &["60.00", "38.75"]),                      // fine
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = AppConfig::from_env()?;
    let pool = connection::get_db_pool(&config.database_url).await?;
    migrate::run_migrations(&pool).await?;
    println!("Migrations ran successfully!");

    queries::seed_fixed_categories(&pool).await?;

    let scope = Scope::current();
    let first_day = scope.first_day();
    println!("\n--- Seeding budgets for {} ---", scope);

    let removed = queries::delete_expenses_by_description(&pool, scope, DEMO_NOTE).await?;
    if removed > 0 {
        println!("   > Cleared {removed} demo expenses from a previous run");
    }

    for (category, limit, expenses) in DEMO {
        let category_id = queries::get_or_create_category(&pool, category).await?;
        let budget_id = queries::upsert_budget(&pool, category_id, scope, Decimal::from_str(limit)?).await?;
        println!("   > {category}: budget #{budget_id} = {limit}");

        for (i, amount) in expenses.iter().enumerate() {
            let spent_on = first_day + chrono::Duration::days(i as i64);
            queries::record_expense(&pool, category_id, Decimal::from_str(amount)?, spent_on, Some(DEMO_NOTE)).await?;
        }
    }

    println!("\n--- Alerts for {} ---", scope);
    let snapshots = queries::budget_snapshots(&pool, scope).await?;
    for alert in compute_alerts(&snapshots) {
        println!("   {} [{}] {}", alert.icon, alert.severity, alert.message);
    }

    Ok(())
}
