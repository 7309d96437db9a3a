use anyhow::Result;
use chrono::Utc;

use railctl_core::{Category, Decision, Station};
use railctl_store::{query, DecisionStore};

use super::{discover_store, print_decision_line};

#[derive(Debug, Default)]
pub struct Filter {
    pub active: bool,
    pub station: Option<Station>,
    pub pending: bool,
    pub closures: bool,
    pub category: Option<Category>,
}

impl Filter {
    fn apply<'a>(&self, decisions: &'a [Decision]) -> Vec<&'a Decision> {
        let mut selected: Vec<&Decision> = match (self.station, self.pending, self.category) {
            (Some(station), true, _) => query::pending_for(decisions, station),
            (Some(station), false, _) => query::targeting(decisions, station),
            (None, _, Some(category)) => query::in_category(decisions, category),
            (None, _, None) => decisions.iter().collect(),
        };
        if let Some(category) = self.category {
            selected.retain(|d| d.category == category);
        }
        if self.active {
            let now = Utc::now();
            selected.retain(|d| d.is_active_at(now));
        }
        if self.closures {
            selected.retain(|d| d.meta.as_ref().is_some_and(|m| m.is_closure()));
        }
        selected
    }
}

pub fn run(filter: Filter, max_count: usize, json: bool) -> Result<()> {
    let store = discover_store()?;
    let decisions = store.list()?;
    let selected: Vec<&Decision> = filter
        .apply(&decisions)
        .into_iter()
        .take(max_count)
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&selected)?);
        return Ok(());
    }

    if selected.is_empty() {
        println!("No decisions yet.");
        return Ok(());
    }
    for d in selected {
        print_decision_line(d);
    }
    Ok(())
}
