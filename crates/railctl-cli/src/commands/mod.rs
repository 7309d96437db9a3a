pub mod ack;
pub mod close;
pub mod init;
pub mod issue;
pub mod list;
pub mod occupancy;
pub mod plan;
pub mod show;
pub mod status;
pub mod suggest;
pub mod withdraw;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use std::env;

use railctl_core::{project, Alternative, Decision, DecisionDraft, LiveState, Priority, Station};
use railctl_planner::{heuristic, TrainInputs};
use railctl_store::{DecisionStore, FileStore};

/// Locate the store by searching upward from the working directory.
pub fn discover_store() -> Result<FileStore> {
    let cwd = env::current_dir().context("failed to get current directory")?;
    FileStore::discover(&cwd).context("not a railctl store (run `railctl init`)")
}

pub fn live_state(store: &dyn DecisionStore) -> Result<LiveState> {
    let decisions = store.list()?;
    Ok(project(&decisions, Utc::now()).live())
}

/// Train details shared by `suggest` and `plan`.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Free-text description, e.g. "critical express for Masagram"
    pub text: Vec<String>,

    #[arg(long)]
    pub priority: Option<Priority>,

    #[arg(long)]
    pub destination: Option<Station>,

    /// Current position, e.g. "Belmuri"
    #[arg(long)]
    pub position: Option<String>,

    /// Issue a decision from the alternative with this key
    #[arg(long)]
    pub apply: Option<String>,

    /// Consist number recorded when applying
    #[arg(long)]
    pub consist_no: Option<String>,
}

impl TrainArgs {
    /// Text-derived inputs, overridden by explicit flags.
    pub fn inputs(&self) -> TrainInputs {
        let mut inputs = heuristic::parse_inputs(&self.text.join(" "));
        inputs.merge(TrainInputs {
            priority: self.priority.map(|p| p.name().to_string()),
            destination: self.destination.map(|s| s.name().to_string()),
            current_position: self.position.clone(),
        });
        inputs
    }
}

/// Issue the alternative named by `--apply` as a decision.
pub fn apply_alternative(
    store: &dyn DecisionStore,
    train: &TrainArgs,
    inputs: &TrainInputs,
    alternatives: &[Alternative],
) -> Result<Option<Decision>> {
    let key = match &train.apply {
        Some(key) => key,
        None => return Ok(None),
    };
    let alt = alternatives
        .iter()
        .find(|a| &a.key == key)
        .with_context(|| format!("no alternative with key '{}'", key))?;

    let mut draft = DecisionDraft {
        consist_no: train.consist_no.clone(),
        consist_destination: inputs.destination.clone(),
        current_position: inputs.current_position.clone(),
        ..Default::default()
    };
    draft.apply_alternative(inputs.priority(), alt);
    let decision = store.create(draft.into_new_decision())?;
    Ok(Some(decision))
}

pub fn print_alternatives(alternatives: &[Alternative]) {
    if alternatives.is_empty() {
        println!("No alternatives suggested.");
        return;
    }
    for alt in alternatives {
        println!("{}", alt);
        if !alt.explanation.is_empty() {
            println!("    {}", alt.explanation);
        }
    }
}

pub fn print_decision_line(d: &Decision) {
    let (done, total) = d.ack_progress();
    println!(
        "{}  {:<8} {:<11} acks {}/{}  {}",
        d.id.short(),
        d.priority.name(),
        d.category.name(),
        done,
        total,
        d.message
    );
}

pub fn print_decision(d: &Decision) {
    let (done, total) = d.ack_progress();
    println!("decision {}", d.id);
    println!("Author:    {}", d.author);
    println!("Created:   {}", d.created_at.format("%Y-%m-%d %H:%M:%S %Z"));
    println!("Effective: {}", d.effective_at.format("%Y-%m-%d %H:%M:%S %Z"));
    if let Some(exp) = d.expires_at {
        println!("Expires:   {}", exp.format("%Y-%m-%d %H:%M:%S %Z"));
    }
    println!("Priority:  {}", d.priority);
    println!("Category:  {}", d.category);
    println!();
    println!("    {}", d.message);
    println!();
    println!("Acknowledgements ({}/{}):", done, total);
    for (station, ack) in &d.acknowledgements {
        match ack.at {
            Some(at) if ack.acknowledged => {
                println!("  [x] {} at {}", station, at.format("%H:%M:%S"))
            }
            _ => println!("  [ ] {}", station),
        }
    }
    if let Some(meta) = &d.meta {
        if let Some(label) = &meta.track_closure {
            println!();
            println!("Closure: {}", label);
        }
        if let Some(consist) = &meta.consist_no {
            println!("Consist: {}", consist);
        }
    }
}
