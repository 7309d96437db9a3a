use anyhow::Result;
use chrono::Utc;

use railctl_core::projection::StationState;
use railctl_core::project;
use railctl_store::DecisionStore;

use super::discover_store;

pub fn run(search: Option<String>, json: bool) -> Result<()> {
    let store = discover_store()?;
    let decisions = store.list()?;
    let section = project(&decisions, Utc::now());
    let stations: Vec<&StationState> = match search.as_deref() {
        Some(q) => section.search(q),
        None => section.stations.iter().collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&stations)?);
        return Ok(());
    }

    if stations.is_empty() {
        println!("No stations match.");
        return Ok(());
    }

    for s in stations {
        let code = s.code.as_deref().map(|c| format!(" ({})", c)).unwrap_or_default();
        println!("{}{}: {}", s.station, code, s.status);
        for l in &s.loops {
            match &l.train {
                Some(train) => println!("  Loop {}: {} ({})", l.id, l.status, train),
                None => println!("  Loop {}: {}", l.id, l.status),
            }
        }
        for (line, status) in &s.line_status {
            println!("  {}: {}", line, status);
        }
    }
    Ok(())
}
