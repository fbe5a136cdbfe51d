//! Budget alert engine: snapshots in, ranked and dismissible threshold
//! alerts out.
//!
//! - `severity`: progress percentage → tier
//! - `synthesizer`: snapshot validation and alert text
//! - `ranker`: stable most-severe-first ordering
//! - `ledger`: per-scope dismissals with override on worsening
//! - `window`: visible cap with overflow count
//! - `orchestrator`: debounced fetch state machine tying it all together

use serde_json::Value;

pub mod ledger;
pub mod orchestrator;
pub mod ranker;
pub mod scope;
pub mod severity;
pub mod synthesizer;
pub mod window;

pub use ledger::{DismissalEntry, DismissalLedger};
pub use orchestrator::{AlertEngine, AlertView, BudgetStore, RefreshState};
pub use ranker::rank;
pub use scope::Scope;
pub use severity::{classify, Severity};
pub use synthesizer::{synthesize, try_synthesize, Alert, BudgetSnapshot, SnapshotError};
pub use window::{overflow_label, window, AlertWindow};

/// Synthesizes every raw snapshot and ranks the result. Malformed
/// snapshots are logged and skipped; the rest are unaffected.
pub fn compute_alerts(snapshots: &[Value]) -> Vec<Alert> {
    let mut alerts = Vec::with_capacity(snapshots.len());
    for raw in snapshots {
        match try_synthesize(raw) {
            Ok(Some(alert)) => alerts.push(alert),
            Ok(None) => {}
            Err(e) => tracing::warn!(snapshot = %raw, "Dropping budget snapshot: {}", e),
        }
    }
    rank(&alerts)
}

/// Ledger filter followed by the windower, over already ranked alerts.
pub fn visible_window(ranked: &[Alert], ledger: &DismissalLedger, limit: usize) -> AlertWindow {
    let shown: Vec<Alert> = ranked
        .iter()
        .filter(|a| ledger.is_visible(&a.id, a.severity))
        .cloned()
        .collect();
    window(shown, limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn malformed_snapshot_costs_exactly_one_alert() {
        let snapshots = vec![
            json!({"id": 1, "category": "Food", "limit": 500, "spent": 550}),
            json!({"id": 2, "category": "Gas", "limit": "invalid", "spent": 90}),
            json!({"id": 3, "category": "Rent", "limit": 100, "spent": 95}),
            json!(null),
            json!({"id": 4, "category": "Fun", "limit": 100, "spent": 85}),
        ];
        let alerts = compute_alerts(&snapshots);
        assert_eq!(alerts.len(), 3);
        let severities: Vec<Severity> = alerts.iter().map(|a| a.severity).collect();
        assert_eq!(severities, [Severity::Critical, Severity::Danger, Severity::Warning]);
    }

    #[test]
    fn dismissed_alerts_are_filtered_before_windowing() {
        let snapshots: Vec<Value> = (1..=7)
            .map(|i| json!({"id": i, "category": format!("C{i}"), "limit": 100, "spent": 100 + i}))
            .collect();
        let ranked = compute_alerts(&snapshots);

        let mut ledger = DismissalLedger::new();
        let w = visible_window(&ranked, &ledger, 5);
        assert_eq!((w.visible.len(), w.overflow_count), (5, 2));

        ledger.dismiss("budget-alert-1", Severity::Critical);
        let w = visible_window(&ranked, &ledger, 5);
        assert_eq!((w.visible.len(), w.overflow_count), (5, 1));
        assert_eq!(w.visible[0].id, "budget-alert-2");
    }
}
