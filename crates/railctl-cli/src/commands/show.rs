use anyhow::{Context, Result};

use railctl_store::DecisionStore;

use super::{discover_store, print_decision};

pub fn run(id: String, json: bool) -> Result<()> {
    let store = discover_store()?;
    let decision = store
        .resolve(&id)
        .with_context(|| format!("decision '{}' not found", id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&decision)?);
        return Ok(());
    }
    print_decision(&decision);
    Ok(())
}
