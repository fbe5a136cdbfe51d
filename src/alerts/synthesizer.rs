use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::severity::{classify, Severity};

pub const ALERT_ID_PREFIX: &str = "budget-alert-";

/// One category's budget-vs-spend reading for a month, after validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSnapshot {
    pub id: i64,
    pub category: String,
    pub limit: f64,
    pub spent: f64,
}

/// Why a raw snapshot was dropped.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot is not an object")]
    NotAnObject,
    #[error("snapshot is missing `{0}`")]
    MissingField(&'static str),
    #[error("`{field}` is not a finite number: {value}")]
    NotANumber { field: &'static str, value: String },
    #[error("`limit` must be positive, got {0}")]
    NonPositiveLimit(f64),
}

impl BudgetSnapshot {
    /// Percentage of the limit already spent.
    pub fn progress(&self) -> f64 {
        self.spent / self.limit * 100.0
    }
}

impl TryFrom<&Value> for BudgetSnapshot {
    type Error = SnapshotError;

    fn try_from(raw: &Value) -> Result<Self, Self::Error> {
        let obj = raw.as_object().ok_or(SnapshotError::NotAnObject)?;

        let id = obj
            .get("id")
            .and_then(Value::as_i64)
            .ok_or(SnapshotError::MissingField("id"))?;

        let category = obj
            .get("category")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or(SnapshotError::MissingField("category"))?
            .to_string();

        let limit = finite_number(obj.get("limit"), "limit")?;
        if limit <= 0.0 {
            return Err(SnapshotError::NonPositiveLimit(limit));
        }
        let spent = finite_number(obj.get("spent"), "spent")?;

        Ok(Self { id, category, limit, spent })
    }
}

/// Only JSON numbers are accepted; strings (even numeric ones) and other
/// types are rejected along with non-finite values.
fn finite_number(value: Option<&Value>, field: &'static str) -> Result<f64, SnapshotError> {
    let value = match value {
        None | Some(Value::Null) => return Err(SnapshotError::MissingField(field)),
        Some(v) => v,
    };
    match value.as_f64() {
        Some(n) if n.is_finite() => Ok(n),
        _ => Err(SnapshotError::NotANumber { field, value: value.to_string() }),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub category: String,
    pub severity: Severity,
    pub progress: f64,
    pub spent: f64,
    pub limit: f64,
    pub remaining: f64,
    pub message: String,
    pub icon: String,
}

pub fn alert_id(snapshot_id: i64) -> String {
    format!("{ALERT_ID_PREFIX}{snapshot_id}")
}

/// Lenient entry point for raw store output: `None` for malformed
/// snapshots and for snapshots below the warning threshold.
pub fn synthesize(raw: &Value) -> Option<Alert> {
    try_synthesize(raw).ok().flatten()
}

/// Like [`synthesize`] but reports why a snapshot was dropped, so the
/// caller can log it.
pub fn try_synthesize(raw: &Value) -> Result<Option<Alert>, SnapshotError> {
    let snapshot = BudgetSnapshot::try_from(raw)?;
    Ok(synthesize_snapshot(&snapshot))
}

pub fn synthesize_snapshot(snapshot: &BudgetSnapshot) -> Option<Alert> {
    let progress = snapshot.progress();
    let severity = classify(progress);
    let remaining = snapshot.limit - snapshot.spent;
    // half away from zero, same as fmt_currency
    let shown = (progress * 10.0).round() / 10.0;

    let message = match severity {
        Severity::None => return None,
        Severity::Warning => format!(
            "{} budget is {:.1}% used. {} remaining.",
            snapshot.category,
            shown,
            fmt_currency(remaining)
        ),
        Severity::Danger => format!(
            "{} budget is {:.1}% used. Only {} left!",
            snapshot.category,
            shown,
            fmt_currency(remaining)
        ),
        Severity::Critical => format!(
            "{} budget exceeded! {} over budget.",
            snapshot.category,
            fmt_currency(remaining.abs())
        ),
    };

    Some(Alert {
        id: alert_id(snapshot.id),
        category: snapshot.category.clone(),
        severity,
        progress,
        spent: snapshot.spent,
        limit: snapshot.limit,
        remaining,
        message,
        icon: severity.icon().to_string(),
    })
}

/// `$1,234.50` style, two decimals, minus sign ahead of the dollar sign.
pub fn fmt_currency(amount: f64) -> String {
    let cents = (amount * 100.0).round();
    let negative = cents < 0.0;
    let fixed = format!("{:.2}", cents.abs() / 100.0);
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}${}.{}", if negative { "-" } else { "" }, grouped, frac)
}
