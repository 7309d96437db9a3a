//! Query functions for filtering decision feeds

use chrono::{DateTime, Utc};

use railctl_core::{Category, Decision, Station};

/// Decisions whose validity window contains `now`, newest first.
pub fn active_at(decisions: &[Decision], now: DateTime<Utc>) -> Vec<&Decision> {
    newest_first(decisions.iter().filter(|d| d.is_active_at(now)).collect())
}

/// Decisions addressed to `station`, newest first.
pub fn targeting(decisions: &[Decision], station: Station) -> Vec<&Decision> {
    newest_first(
        decisions
            .iter()
            .filter(|d| d.targets_station(station))
            .collect(),
    )
}

/// Decisions addressed to `station` that it has not acknowledged yet.
pub fn pending_for(decisions: &[Decision], station: Station) -> Vec<&Decision> {
    targeting(decisions, station)
        .into_iter()
        .filter(|d| {
            d.acknowledgements
                .get(&station)
                .map(|a| !a.acknowledged)
                .unwrap_or(false)
        })
        .collect()
}

/// Track-closure decisions, structured or text-only, newest first.
pub fn closures(decisions: &[Decision]) -> Vec<&Decision> {
    newest_first(
        decisions
            .iter()
            .filter(|d| d.meta.as_ref().map(|m| m.is_closure()).unwrap_or(false))
            .collect(),
    )
}

pub fn in_category(decisions: &[Decision], category: Category) -> Vec<&Decision> {
    newest_first(decisions.iter().filter(|d| d.category == category).collect())
}

fn newest_first(mut results: Vec<&Decision>) -> Vec<&Decision> {
    results.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use railctl_core::{DecisionMeta, Line, NewDecision, Priority, TrackClosure};

    fn issue(message: &str, targets: Vec<Station>, created: DateTime<Utc>) -> Decision {
        Decision::issue(
            NewDecision {
                message: Some(message.into()),
                category: Some(Category::Movement),
                priority: Some(Priority::Normal),
                targets,
                ..Default::default()
            },
            created,
        )
        .unwrap()
    }

    #[test]
    fn active_at_respects_window() {
        let t0 = Utc::now();
        let mut expired = issue("old", vec![Station::Gurap], t0);
        expired.expires_at = Some(t0 + Duration::minutes(5));
        let mut future = issue("later", vec![Station::Gurap], t0);
        future.effective_at = t0 + Duration::hours(1);
        let current = issue("now", vec![Station::Gurap], t0 + Duration::seconds(1));

        let all = vec![expired, future, current];
        let at = t0 + Duration::minutes(10);
        let active: Vec<_> = active_at(&all, at).iter().map(|d| d.message.as_str()).collect();
        assert_eq!(active, vec!["now"]);
    }

    #[test]
    fn targeting_and_pending() {
        let t0 = Utc::now();
        let mut a = issue("a", vec![Station::Gurap, Station::Belmuri], t0);
        let b = issue("b", vec![Station::Belmuri], t0 + Duration::seconds(1));
        let c = issue("c", vec![Station::Saktigarh], t0 + Duration::seconds(2));
        a.acknowledge(Station::Belmuri, t0).unwrap();

        let all = vec![a, b, c];
        let for_belmuri: Vec<_> = targeting(&all, Station::Belmuri)
            .iter()
            .map(|d| d.message.as_str())
            .collect();
        assert_eq!(for_belmuri, vec!["b", "a"]);

        let pending: Vec<_> = pending_for(&all, Station::Belmuri)
            .iter()
            .map(|d| d.message.as_str())
            .collect();
        assert_eq!(pending, vec!["b"]);
    }

    #[test]
    fn closures_include_text_only_records() {
        let t0 = Utc::now();
        let structured = Decision::issue(
            TrackClosure {
                line: Line::UpMain,
                from: Station::Gurap,
                to: Some(Station::Jhapandanga),
            }
            .into_new_decision(None),
            t0,
        )
        .unwrap();
        let mut legacy = issue("legacy", vec![Station::Belmuri], t0 + Duration::seconds(1));
        legacy.meta = Some(DecisionMeta {
            track_closure: Some("Reverse closed at Belmuri".into()),
            ..Default::default()
        });
        let plain = issue("plain", vec![Station::Belmuri], t0);

        let all = vec![structured, legacy, plain];
        let found: Vec<_> = closures(&all).iter().map(|d| d.message.as_str()).collect();
        assert_eq!(found, vec!["legacy", "Track closure"]);
        assert_eq!(in_category(&all, Category::Maintenance).len(), 1);
    }
}
