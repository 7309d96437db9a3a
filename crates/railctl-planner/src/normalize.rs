//! Coercion of untrusted model output into typed alternatives.

use serde_json::Value;

use railctl_core::{Alternative, Directive, Line, Station};

/// Alternatives from a parsed model reply. Anything other than an object
/// with an `alternatives` array yields nothing.
pub fn normalize_reply(reply: Option<&Value>) -> Vec<Alternative> {
    match reply.and_then(|v| v.get("alternatives")).and_then(Value::as_array) {
        Some(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| normalize_alternative(i, item))
            .collect(),
        None => Vec::new(),
    }
}

pub fn normalize_alternative(index: usize, item: &Value) -> Alternative {
    let field = |name: &str| item.get(name).filter(|v| !v.is_null());

    Alternative {
        key: field("key")
            .map(stringify)
            .unwrap_or_else(|| format!("alt-{}", index + 1)),
        title: field("title")
            .map(stringify)
            .unwrap_or_else(|| "Alternative".to_string()),
        directive: match field("directive").and_then(Value::as_str) {
            Some("halt") => Directive::Halt,
            Some("stable") => Directive::Stable,
            _ => Directive::Pass,
        },
        pass_through_line: field("passThroughLine")
            .and_then(Value::as_str)
            .and_then(|s| Line::ALL.into_iter().find(|l| l.name() == s)),
        loop_station: field("loopStation")
            .and_then(Value::as_str)
            .and_then(|s| Station::LOOP_STATIONS.into_iter().find(|st| st.name() == s)),
        loop_id: field("loopId").and_then(loop_id),
        explanation: field("explanation").map(stringify).unwrap_or_default(),
    }
}

fn stringify(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Loop numbers are small non-negative integers; other numbers are dropped.
fn loop_id(v: &Value) -> Option<u32> {
    if let Some(n) = v.as_u64() {
        return u32::try_from(n).ok();
    }
    let f = v.as_f64()?;
    if f >= 0.0 && f.fract() == 0.0 && f <= f64::from(u32::MAX) {
        Some(f as u32)
    } else {
        None
    }
}
