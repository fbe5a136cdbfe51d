use super::synthesizer::Alert;

/// Most severe first. `sort_by` is stable, so alerts of equal severity keep
/// their input order. The input slice is left untouched.
pub fn rank(alerts: &[Alert]) -> Vec<Alert> {
    let mut ranked = alerts.to_vec();
    ranked.sort_by(|a, b| b.severity.cmp(&a.severity));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::synthesizer::synthesize;
    use serde_json::json;

    fn alert(id: i64, spent: f64) -> Alert {
        synthesize(&json!({"id": id, "category": format!("Cat{id}"), "limit": 100, "spent": spent})).unwrap()
    }

    fn ids(alerts: &[Alert]) -> Vec<&str> {
        alerts.iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn equal_severity_keeps_input_order() {
        let a = alert(1, 95.0); // danger
        let b = alert(2, 85.0); // warning
        let c = alert(3, 92.0); // danger
        let ranked = rank(&[a, b, c]);
        assert_eq!(ids(&ranked), ["budget-alert-1", "budget-alert-3", "budget-alert-2"]);
    }

    #[test]
    fn critical_danger_warning_regardless_of_input_order() {
        let warning = alert(1, 82.0);
        let critical = alert(2, 130.0);
        let danger = alert(3, 91.0);

        let orders = [
            vec![warning.clone(), critical.clone(), danger.clone()],
            vec![danger.clone(), warning.clone(), critical.clone()],
            vec![critical.clone(), danger.clone(), warning.clone()],
        ];
        for input in orders {
            let ranked = rank(&input);
            assert_eq!(ids(&ranked), ["budget-alert-2", "budget-alert-3", "budget-alert-1"]);
        }
    }

    #[test]
    fn input_is_not_reordered() {
        let input = vec![alert(1, 81.0), alert(2, 120.0)];
        let _ = rank(&input);
        assert_eq!(ids(&input), ["budget-alert-1", "budget-alert-2"]);
    }
}
