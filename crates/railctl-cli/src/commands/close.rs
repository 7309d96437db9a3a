use anyhow::Result;

use railctl_core::{Line, Station, TrackClosure};
use railctl_store::DecisionStore;

use super::discover_store;

pub fn run(
    line: Line,
    from: Station,
    to: Option<Station>,
    author: Option<String>,
    json: bool,
) -> Result<()> {
    let store = discover_store()?;
    let closure = TrackClosure { line, from, to };
    let label = closure.label();
    let decision = store.create(closure.into_new_decision(author))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&decision)?);
    } else {
        println!("[{}] {}", decision.id.short(), label);
    }
    Ok(())
}
