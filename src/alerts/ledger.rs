use std::collections::HashMap;

use super::severity::Severity;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DismissalEntry {
    pub alert_id: String,
    pub severity_at_dismissal: Severity,
}

/// Session-scoped record of dismissed alerts. An entry suppresses its alert
/// until the alert's current severity climbs above the dismissed one; the
/// entry itself stays, so sliding back down keeps the alert hidden.
#[derive(Debug, Default, Clone)]
pub struct DismissalLedger {
    entries: HashMap<String, DismissalEntry>,
}

impl DismissalLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites the entry for `alert_id`.
    pub fn dismiss(&mut self, alert_id: &str, current_severity: Severity) {
        self.entries.insert(
            alert_id.to_string(),
            DismissalEntry {
                alert_id: alert_id.to_string(),
                severity_at_dismissal: current_severity,
            },
        );
    }

    pub fn is_visible(&self, alert_id: &str, current_severity: Severity) -> bool {
        match self.entries.get(alert_id) {
            None => true,
            Some(entry) => current_severity > entry.severity_at_dismissal,
        }
    }

    /// Forget every dismissal; called once per newly observed scope.
    pub fn reset_for_scope(&mut self) {
        self.entries.clear();
    }

    pub fn entry(&self, alert_id: &str) -> Option<&DismissalEntry> {
        self.entries.get(alert_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
