use std::time::Duration;

use anyhow::{Context, Result};

use railctl_planner::{GeminiConfig, PlanRequest, Planner};

use super::{apply_alternative, discover_store, live_state, print_alternatives, TrainArgs};

pub fn run(
    train: TrainArgs,
    api_key: Option<String>,
    model: String,
    timeout_secs: u64,
    json: bool,
) -> Result<()> {
    let store = discover_store()?;
    let request = PlanRequest {
        live: live_state(&store)?,
        inputs: train.inputs(),
    };

    let config = api_key
        .filter(|k| !k.trim().is_empty())
        .map(|key| {
            GeminiConfig::new(key)
                .with_model(model)
                .with_timeout(Duration::from_secs(timeout_secs))
        });
    let planner = Planner::from_gemini(config)?;

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    let response = runtime.block_on(planner.plan(&request))?;
    tracing::debug!(alternatives = response.alternatives.len(), "plan received");

    let applied = apply_alternative(&store, &train, &request.inputs, &response.alternatives)?;

    if json {
        let output = serde_json::json!({
            "alternatives": response.alternatives,
            "applied": applied,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_alternatives(&response.alternatives);
    if let Some(decision) = applied {
        println!();
        println!("[{}] {}", decision.id.short(), decision.message);
    }
    Ok(())
}
