use anyhow::Result;
use chrono::Utc;

use railctl_core::project;
use railctl_store::DecisionStore;

use super::discover_store;

pub fn run(json: bool) -> Result<()> {
    let store = discover_store()?;
    let decisions = store.list()?;
    let section = project(&decisions, Utc::now());

    if json {
        let output = serde_json::json!({
            "at": section.at,
            "activeDecisions": section.active_decisions,
            "lines": section.lines,
            "live": section.live(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Active decisions: {}", section.active_decisions);
    for line in &section.lines {
        println!(
            "{:<10} {:<10} load {}",
            line.line.name(),
            line.bucket.name(),
            line.load
        );
    }
    Ok(())
}
