use std::fmt;

use serde::{Deserialize, Serialize};

pub const WARNING_THRESHOLD: f64 = 80.0;
pub const DANGER_THRESHOLD: f64 = 90.0;
pub const CRITICAL_THRESHOLD: f64 = 100.0;

/// Alert tier derived from spend progress. Declaration order is the
/// severity order, so the derived `Ord` is the one the ranker and the
/// dismissal ledger compare with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    None,
    Warning,
    Danger,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::None => "none",
            Severity::Warning => "warning",
            Severity::Danger => "danger",
            Severity::Critical => "critical",
        }
    }

    /// Severity-keyed icon tag.
    pub fn icon(&self) -> &'static str {
        match self {
            Severity::None => "",
            Severity::Warning => "⚠️",
            Severity::Danger => "❗",
            Severity::Critical => "🛑",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress percentage to tier. Lower edges are inclusive; NaN and
/// negative progress fall through to `None`.
pub fn classify(progress: f64) -> Severity {
    if progress >= CRITICAL_THRESHOLD {
        Severity::Critical
    } else if progress >= DANGER_THRESHOLD {
        Severity::Danger
    } else if progress >= WARNING_THRESHOLD {
        Severity::Warning
    } else {
        Severity::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_land_on_lower_edge() {
        assert_eq!(classify(79.999), Severity::None);
        assert_eq!(classify(80.0), Severity::Warning);
        assert_eq!(classify(89.999), Severity::Warning);
        assert_eq!(classify(90.0), Severity::Danger);
        assert_eq!(classify(99.999), Severity::Danger);
        assert_eq!(classify(100.0), Severity::Critical);
    }

    #[test]
    fn low_and_odd_progress_is_none() {
        assert_eq!(classify(0.0), Severity::None);
        assert_eq!(classify(-25.0), Severity::None);
        assert_eq!(classify(f64::NAN), Severity::None);
        assert_eq!(classify(1_000.0), Severity::Critical);
    }

    #[test]
    fn tiers_are_totally_ordered() {
        assert!(Severity::None < Severity::Warning);
        assert!(Severity::Warning < Severity::Danger);
        assert!(Severity::Danger < Severity::Critical);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Severity::Danger).unwrap(), "\"danger\"");
    }
}
