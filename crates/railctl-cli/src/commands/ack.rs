use anyhow::{Context, Result};

use railctl_core::Station;
use railctl_store::DecisionStore;

use super::discover_store;

pub fn run(id: String, station: Station, json: bool) -> Result<()> {
    let store = discover_store()?;
    let decision = store
        .resolve(&id)
        .with_context(|| format!("decision '{}' not found", id))?;
    let decision = store.acknowledge(&decision.id, station)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&decision)?);
    } else {
        let (done, total) = decision.ack_progress();
        println!(
            "{} acknowledged {} ({}/{})",
            station,
            decision.id.short(),
            done,
            total
        );
    }
    Ok(())
}
