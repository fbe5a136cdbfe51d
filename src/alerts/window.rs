use serde::Serialize;

use super::synthesizer::Alert;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertWindow {
    pub visible: Vec<Alert>,
    pub overflow_count: usize,
}

/// "and N more" line, only when something was cut off.
pub fn overflow_label(overflow_count: usize) -> Option<String> {
    (overflow_count > 0).then(|| format!("and {overflow_count} more"))
}

/// Keeps the first `limit` alerts of an already ranked and filtered list.
pub fn window(mut alerts: Vec<Alert>, limit: usize) -> AlertWindow {
    let overflow_count = alerts.len().saturating_sub(limit);
    alerts.truncate(limit);
    AlertWindow { visible: alerts, overflow_count }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::synthesizer::synthesize;
    use serde_json::json;

    fn alerts(n: i64) -> Vec<Alert> {
        (0..n)
            .map(|i| synthesize(&json!({"id": i, "category": "Misc", "limit": 10, "spent": 11})).unwrap())
            .collect()
    }

    #[test]
    fn caps_and_counts_overflow() {
        let w = window(alerts(7), 5);
        assert_eq!(w.visible.len(), 5);
        assert_eq!(w.overflow_count, 2);
        assert_eq!(w.visible[0].id, "budget-alert-0");
        assert_eq!(overflow_label(w.overflow_count).as_deref(), Some("and 2 more"));
    }

    #[test]
    fn short_lists_have_no_overflow() {
        let w = window(alerts(3), 5);
        assert_eq!(w.visible.len(), 3);
        assert_eq!(w.overflow_count, 0);
        assert!(overflow_label(w.overflow_count).is_none());

        let empty = window(Vec::new(), 5);
        assert_eq!(empty, AlertWindow::default());
    }
}
