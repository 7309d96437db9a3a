use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, Utc};
use clap::Args;

use railctl_core::{Category, DecisionDraft, Directive, Line, Priority, Station};
use railctl_store::DecisionStore;

use super::discover_store;

#[derive(Args, Debug)]
pub struct IssueArgs {
    /// pass, halt or stable
    #[arg(long, default_value = "pass")]
    pub directive: Directive,

    /// Line to pass through on
    #[arg(long)]
    pub line: Option<Line>,

    /// Station whose loop the train is stabled in
    #[arg(long)]
    pub loop_station: Option<Station>,

    /// Loop number at the loop station (defaults to 1)
    #[arg(long, requires = "loop_station")]
    pub loop_id: Option<u32>,

    /// Train / consist number
    #[arg(long)]
    pub consist_no: Option<String>,

    #[arg(long)]
    pub consist_destination: Option<String>,

    /// Where the train is now, e.g. "Passing Belmuri"
    #[arg(long)]
    pub position: Option<String>,

    #[arg(long, default_value = "Normal")]
    pub priority: Priority,

    #[arg(long, default_value = "Movement")]
    pub category: Category,

    /// Target station (repeatable); every station when omitted
    #[arg(long = "target")]
    pub targets: Vec<Station>,

    #[arg(long)]
    pub author: Option<String>,

    /// Use this text instead of the composed directive
    #[arg(short, long)]
    pub message: Option<String>,

    /// RFC 3339 start of validity (default: now)
    #[arg(long)]
    pub effective_at: Option<DateTime<Utc>>,

    /// RFC 3339 end of validity
    #[arg(long, conflicts_with = "valid_for")]
    pub expires_at: Option<DateTime<Utc>>,

    /// Minutes of validity from the effective time
    #[arg(long)]
    pub valid_for: Option<i64>,
}

impl IssueArgs {
    fn into_draft(self) -> Result<DecisionDraft> {
        let mut draft = DecisionDraft {
            directive: self.directive,
            pass_through_line: self.line,
            priority: self.priority,
            category: self.category,
            consist_no: self.consist_no,
            consist_destination: self.consist_destination,
            current_position: self.position,
            message: self.message,
            effective_at: self.effective_at,
            expires_at: self.expires_at,
            ..Default::default()
        };
        if let Some(station) = self.loop_station {
            if !station.is_loop_station() {
                bail!("{} has no loop", station);
            }
            draft.select_loop_station(station);
            if let Some(id) = self.loop_id {
                draft.loop_id = Some(id);
            }
            let count = station.loop_count();
            if let Some(id) = draft.loop_id.filter(|id| *id == 0 || *id > count) {
                if count == 0 {
                    bail!("{} has no numbered loop lines, cannot use loop {}", station, id);
                }
                bail!("{} has loops 1..={}, not {}", station, count, id);
            }
        }
        if !self.targets.is_empty() {
            draft.targets = self.targets;
        }
        if let Some(author) = self.author {
            draft.author = author;
        }
        if let Some(minutes) = self.valid_for {
            if minutes <= 0 {
                bail!("--valid-for must be a positive number of minutes");
            }
            let start = draft.effective_at.unwrap_or_else(Utc::now);
            let expires = Duration::try_minutes(minutes)
                .and_then(|span| start.checked_add_signed(span))
                .with_context(|| format!("--valid-for {} minutes is out of range", minutes))?;
            draft.effective_at = Some(start);
            draft.expires_at = Some(expires);
        }
        Ok(draft)
    }
}

pub fn run(args: IssueArgs, json: bool) -> Result<()> {
    let store = discover_store()?;
    let draft = args.into_draft()?;
    let decision = store.create(draft.into_new_decision())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&decision)?);
    } else {
        println!(
            "[{}] {} ({} stations)",
            decision.id.short(),
            decision.message,
            decision.targets.len()
        );
    }
    Ok(())
}
