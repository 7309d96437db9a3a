//! Offline strategy suggestions and free-text input parsing.

use railctl_core::{Alternative, Directive, Line, LiveState, Priority, Station};

use crate::request::TrainInputs;

const POSITION_MARKERS: [&str; 3] = ["at", "near", "passing"];

/// Pull priority, destination and position out of a controller's message,
/// e.g. "critical goods for Masagram passing Belmuri".
///
/// The last priority word wins. The destination is the first station named,
/// in line order. The position is the trailing text after "at", "near" or
/// "passing" when that text is only letters and spaces.
pub fn parse_inputs(text: &str) -> TrainInputs {
    let lower = text.to_lowercase();

    let priority = [
        ("low", Priority::Low),
        ("normal", Priority::Normal),
        ("medium", Priority::Normal),
        ("high", Priority::High),
        ("critical", Priority::Critical),
    ]
    .into_iter()
    .filter(|(word, _)| lower.contains(word))
    .last()
    .map(|(_, p)| p.name().to_string());

    TrainInputs {
        priority,
        destination: Station::find_in_text(text).map(|s| s.name().to_string()),
        current_position: trailing_position(text),
    }
}

fn trailing_position(text: &str) -> Option<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    for (i, word) in words.iter().enumerate() {
        if !POSITION_MARKERS.contains(&word.to_lowercase().as_str()) {
            continue;
        }
        let rest = &words[i + 1..];
        if !rest.is_empty() && rest.iter().all(|w| w.chars().all(|c| c.is_ascii_alphabetic())) {
            return Some(rest.join(" "));
        }
    }
    None
}

/// The question to ask next when inputs are incomplete.
pub fn next_question(inputs: &TrainInputs) -> Option<&'static str> {
    if inputs.priority().is_none() {
        Some("What's the train priority?")
    } else if inputs.destination().is_none() {
        Some("Destination station?")
    } else if inputs
        .current_position
        .as_deref()
        .map_or(true, |p| p.trim().is_empty())
    {
        Some("Current position (e.g., 'Passing Belmuri' or 'At Masagram')?")
    } else {
        None
    }
}

/// One-line summary of line loads and blocks.
pub fn live_summary(live: &LiveState) -> String {
    let blocked: Vec<&str> = live.blocked_lines().iter().map(|l| l.name()).collect();
    format!(
        "Live occupancy: Up {}, Down {}, Reverse {}. Blocked: {}.",
        live.load(Line::UpMain),
        live.load(Line::DownMain),
        live.load(Line::Reverse),
        if blocked.is_empty() {
            "None".to_string()
        } else {
            blocked.join(", ")
        }
    )
}

/// Rule-based strategies for a train, without a model.
///
/// Passes on the least-loaded open line and loops at the destination when
/// it has loops, otherwise at the first loop station.
pub fn suggest(live: &LiveState, priority: Priority, destination: Station) -> Vec<Alternative> {
    let best = live.best_line();
    let loop_at = if destination.is_loop_station() {
        destination
    } else {
        Station::LOOP_STATIONS[0]
    };
    let best_name = best.map(|l| l.name()).unwrap_or("available line");

    let mut list = Vec::with_capacity(4);

    if let Some(line) = best {
        list.push(Alternative {
            key: format!("pass-{}", line),
            title: format!("Pass-through via {}", line),
            directive: Directive::Pass,
            pass_through_line: Some(line),
            loop_station: None,
            loop_id: None,
            explanation: format!("Lowest live load on {}. Suitable for {} priority.", line, priority),
        });
    }

    list.push(Alternative {
        key: format!("cross-{}", loop_at),
        title: format!("Crossing at {}", loop_at),
        directive: Directive::Stable,
        pass_through_line: None,
        loop_station: Some(loop_at),
        loop_id: Some(1),
        explanation: format!(
            "Hold at {} loop to allow opposing movement to pass safely, then proceed.",
            loop_at
        ),
    });

    list.push(Alternative {
        key: format!("precedence-{}", best.map(|l| l.name()).unwrap_or("line")),
        title: "Precedence to higher-priority movement".to_string(),
        directive: if best.is_some() {
            Directive::Pass
        } else {
            Directive::Stable
        },
        pass_through_line: best,
        loop_station: best.is_none().then_some(loop_at),
        loop_id: best.is_none().then_some(1),
        explanation: if priority.yields() {
            format!(
                "Yield by waiting at {} to clear main line, then proceed via {}.",
                loop_at, best_name
            )
        } else {
            format!(
                "Proceed via {} and instruct lower-priority movements to hold.",
                best_name
            )
        },
    });

    list.push(Alternative {
        key: format!("overtake-{}", loop_at),
        title: format!("Overtake at {}", loop_at),
        directive: Directive::Stable,
        pass_through_line: None,
        loop_station: Some(loop_at),
        loop_id: Some(1),
        explanation: format!(
            "Stage at {} to allow faster consist to overtake, reducing following delays.",
            loop_at
        ),
    });

    list
}
