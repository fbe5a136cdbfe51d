use std::collections::HashMap;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use sqlx::{Pool, Row, Sqlite};

use crate::alerts::Scope;
use crate::database::models::{Budget, Category, Expense};

/*
SQL for the budget store: categories, monthly budgets, expenses, and the
per-month budget-vs-spend snapshots handed to the alert engine.
 */

/// Expense categories every fresh database starts with.
pub const FIXED_CATEGORIES: &[(&str, &str)] = &[
    ("Housing", "🏠"),
    ("Utilities", "💡"),
    ("Groceries", "🛒"),
    ("Dining Out", "🍽️"),
    ("Insurance", "🛡️"),
    ("Gas", "⛽"),
    ("Vehicle Maintenance", "🔧"),
    ("Entertainment", "🎬"),
    ("Subscriptions", "📺"),
    ("Recreation Activities", "🏕️"),
    ("Pet Care", "🐾"),
    ("Tax - Medical", "🩺"),
    ("Tax - Donation", "🎁"),
    ("Other", "📦"),
];

/*==========Category Queries=========== */

pub async fn seed_fixed_categories(pool: &Pool<Sqlite>) -> Result<(), sqlx::Error> {
    for (name, icon) in FIXED_CATEGORIES {
        sqlx::query("INSERT OR IGNORE INTO categories (category_name, icon) VALUES (?, ?)")
            .bind(*name)
            .bind(*icon)
            .execute(pool)
            .await?;
    }
    Ok(())
}

// Look a category up by name, creating it when missing
pub async fn get_or_create_category(pool: &Pool<Sqlite>, category_name: &str) -> Result<i64, sqlx::Error> {
    sqlx::query("INSERT OR IGNORE INTO categories (category_name) VALUES (?)")
        .bind(category_name)
        .execute(pool)
        .await?;

    sqlx::query_scalar::<_, i64>("SELECT category_id FROM categories WHERE category_name = ?")
        .bind(category_name)
        .fetch_one(pool)
        .await
}

pub async fn get_all_categories(pool: &Pool<Sqlite>) -> Result<Vec<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>(
        "SELECT category_id, category_name, icon FROM categories ORDER BY category_name ASC",
    )
    .fetch_all(pool)
    .await
}

/*==========Budget Queries=========== */

// One budget per category and month; setting it again replaces the amount
pub async fn upsert_budget(
    pool: &Pool<Sqlite>,
    category_id: i64,
    scope: Scope,
    amount: Decimal,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO budgets (category_id, year, month, amount)
        VALUES (?, ?, ?, ?)
        ON CONFLICT (category_id, year, month) DO UPDATE SET amount = excluded.amount
        RETURNING budget_id
        "#,
    )
    .bind(category_id)
    .bind(i64::from(scope.year))
    .bind(i64::from(scope.month))
    .bind(amount.to_string())
    .fetch_one(pool)
    .await
}

pub async fn list_budgets(pool: &Pool<Sqlite>, scope: Scope) -> Result<Vec<Budget>, sqlx::Error> {
    sqlx::query_as::<_, Budget>(
        r#"
        SELECT
            b.budget_id,
            b.category_id,
            c.category_name,
            b.year,
            b.month,
            b.amount
        FROM budgets b
        JOIN categories c ON c.category_id = b.category_id
        WHERE b.year = ? AND b.month = ?
        ORDER BY b.budget_id ASC
        "#,
    )
    .bind(i64::from(scope.year))
    .bind(i64::from(scope.month))
    .fetch_all(pool)
    .await
}

/*==========Expense Queries=========== */

pub async fn record_expense(
    pool: &Pool<Sqlite>,
    category_id: i64,
    amount: Decimal,
    spent_on: NaiveDate,
    description: Option<&str>,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO expenses (category_id, amount, spent_on, description)
        VALUES (?, ?, ?, ?)
        RETURNING expense_id
        "#,
    )
    .bind(category_id)
    .bind(amount.to_string())
    .bind(spent_on.format("%Y-%m-%d").to_string())
    .bind(description)
    .fetch_one(pool)
    .await
}

// Removes the month's expenses carrying exactly this description; returns how many went
pub async fn delete_expenses_by_description(
    pool: &Pool<Sqlite>,
    scope: Scope,
    description: &str,
) -> Result<u64, sqlx::Error> {
    let (start, end) = scope.date_range();

    let result = sqlx::query("DELETE FROM expenses WHERE spent_on >= ? AND spent_on < ? AND description = ?")
        .bind(start)
        .bind(end)
        .bind(description)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

// Every expense dated inside the scope's month
pub async fn list_expenses(pool: &Pool<Sqlite>, scope: Scope) -> Result<Vec<Expense>, sqlx::Error> {
    let (start, end) = scope.date_range();

    sqlx::query(
        r#"
        SELECT expense_id, category_id, amount, spent_on, description
        FROM expenses
        WHERE spent_on >= ? AND spent_on < ?
        ORDER BY spent_on ASC, expense_id ASC
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(|row| {
        let amount_text: String = row.get("amount");
        let amount = Decimal::from_str(&amount_text)
            .map_err(|e| sqlx::Error::Decode(format!("Invalid Decimal format for amount: {}", e).into()))?;

        let spent_on_text: String = row.get("spent_on");
        let spent_on = NaiveDate::parse_from_str(&spent_on_text, "%Y-%m-%d")
            .map_err(|e| sqlx::Error::Decode(format!("Invalid date for spent_on: {}", e).into()))?;

        Ok(Expense {
            expense_id: row.get("expense_id"),
            category_id: row.get("category_id"),
            amount,
            spent_on,
            description: row.get("description"),
        })
    })
    .collect::<Result<Vec<Expense>, sqlx::Error>>()
}

/*==========Snapshot Queries=========== */

/// Budget-vs-spend readings for one month as the JSON objects the alert
/// engine consumes: `{id, category, limit, spent}`. A budget amount that
/// is not a decimal is passed through as text; the engine drops it.
pub async fn budget_snapshots(pool: &Pool<Sqlite>, scope: Scope) -> Result<Vec<Value>, sqlx::Error> {
    let budgets = list_budgets(pool, scope).await?;
    let expenses = list_expenses(pool, scope).await?;

    let mut spent_by_category: HashMap<i64, Decimal> = HashMap::new();
    for e in expenses {
        *spent_by_category.entry(e.category_id).or_insert(Decimal::ZERO) += e.amount;
    }

    let snapshots = budgets
        .iter()
        .map(|b| {
            let spent = spent_by_category.get(&b.category_id).copied().unwrap_or(Decimal::ZERO);
            let limit = match b.limit() {
                Some(limit) => decimal_json(limit),
                None => Value::String(b.amount.clone()),
            };
            json!({
                "id": b.budget_id,
                "category": b.category_name,
                "limit": limit,
                "spent": decimal_json(spent),
            })
        })
        .collect();

    Ok(snapshots)
}

fn decimal_json(d: Decimal) -> Value {
    d.to_f64().map(Value::from).unwrap_or(Value::Null)
}
