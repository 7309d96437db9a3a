use railctl_core::{Line, Station};

use crate::request::PlanRequest;

/// Render the planning prompt for the model.
pub fn build_prompt(request: &PlanRequest) -> String {
    let live = &request.live;
    let blocked: Vec<&str> = live.blocked_lines().iter().map(|l| l.name()).collect();
    let blocked = if blocked.is_empty() {
        "None".to_string()
    } else {
        blocked.join(", ")
    };
    let loop_stations: Vec<&str> = Station::LOOP_STATIONS.iter().map(|s| s.name()).collect();
    let field = |v: &Option<String>| v.clone().unwrap_or_else(|| "unknown".to_string());

    format!(
        r#"You are a rail traffic assistant for an Indian Railways section controller.
Current live loads per line (number of active movements queued or passing):
- Up Main: {up}
- Down Main: {down}
- Reverse: {reverse}
Blocked lines: {blocked}.
Train context:
- Priority: {priority}
- Destination: {destination}
- Current position: {position}

Task: Propose safe and efficient strategies considering Indian railway operations terminology:
- pass_through: best line to pass now
- crossing: use loop station to cross an opposing movement
- precedence: give way to higher-priority or take precedence if critical
- overtake: plan an overtake using suitable loop
Only consider loop stations from this list: [{loops}].

Return STRICT JSON with this schema and nothing else:
{{
  "alternatives": [
    {{
      "key": string,
      "title": string,
      "directive": "pass" | "halt" | "stable",
      "passThroughLine": "Up Main" | "Down Main" | "Reverse" | null,
      "loopStation": "Chandanpur" | "Masagram" | "Gurap" | "Saktigarh" | null,
      "loopId": number | null,
      "explanation": string
    }}
  ]
}}"#,
        up = live.load(Line::UpMain),
        down = live.load(Line::DownMain),
        reverse = live.load(Line::Reverse),
        blocked = blocked,
        priority = field(&request.inputs.priority),
        destination = field(&request.inputs.destination),
        position = field(&request.inputs.current_position),
        loops = loop_stations.join(", "),
    )
}
