use anyhow::{Context, Result};

use railctl_store::DecisionStore;

use super::discover_store;

pub fn run(id: String) -> Result<()> {
    let store = discover_store()?;
    let decision = store
        .resolve(&id)
        .with_context(|| format!("decision '{}' not found", id))?;
    store.delete(&decision.id)?;
    println!("Withdrew decision {}: {}", decision.id.short(), decision.message);
    Ok(())
}
