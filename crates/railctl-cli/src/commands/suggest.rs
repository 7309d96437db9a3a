use anyhow::{anyhow, Result};

use railctl_planner::heuristic;

use super::{apply_alternative, discover_store, live_state, print_alternatives, TrainArgs};

pub fn run(train: TrainArgs, json: bool) -> Result<()> {
    let store = discover_store()?;
    let live = live_state(&store)?;
    let inputs = train.inputs();

    // Ask for whichever detail is still missing, in form order.
    let (priority, destination) = match (inputs.priority(), inputs.destination()) {
        (Some(p), Some(d)) => (p, d),
        _ => {
            let question = heuristic::next_question(&inputs).unwrap_or("Train details are incomplete.");
            return Err(anyhow!("{}", question));
        }
    };

    let summary = heuristic::live_summary(&live);
    let alternatives = heuristic::suggest(&live, priority, destination);
    let applied = apply_alternative(&store, &train, &inputs, &alternatives)?;

    if json {
        let output = serde_json::json!({
            "summary": summary,
            "alternatives": alternatives,
            "applied": applied,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", summary);
    print_alternatives(&alternatives);
    if let Some(decision) = applied {
        println!();
        println!("[{}] {}", decision.id.short(), decision.message);
    }
    Ok(())
}
