use serde_json::Value;

/// Parse model output as JSON, falling back to the first balanced
/// `{...}` block that parses. A `{` that never closes is skipped, so a
/// complete object nested after it is still found. Braces inside string
/// literals are ignored.
pub fn parse_model_text(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Some(value);
    }

    let mut search_from = 0;
    while let Some(offset) = trimmed[search_from..].find('{') {
        let start = search_from + offset;
        if let Some(len) = balanced_end(&trimmed[start..]) {
            if let Ok(value) = serde_json::from_str::<Value>(&trimmed[start..start + len]) {
                return Some(value);
            }
        }
        search_from = start + 1;
    }
    None
}

/// Byte length of the object starting at `s[0] == '{'`, if it closes.
fn balanced_end(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in s.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn whole_text_json() {
        let v = parse_model_text(r#" {"alternatives": []} "#).unwrap();
        assert_eq!(v, json!({"alternatives": []}));
    }

    #[test]
    fn embedded_block_with_prose() {
        let text = "Here is your plan: {\"alternatives\":[{\"title\":\"T\"}]} Hope it helps {ok}";
        let v = parse_model_text(text).unwrap();
        assert_eq!(v["alternatives"][0]["title"], "T");
    }

    #[test]
    fn braces_inside_strings_are_ignored() {
        let text = r#"note: {"explanation": "keep } clear {", "n": 1} trailing"#;
        let v = parse_model_text(text).unwrap();
        assert_eq!(v["explanation"], "keep } clear {");
    }

    #[test]
    fn fenced_code_block() {
        let text = "```json\n{\"alternatives\": [{\"key\": \"a\"}]}\n```";
        let v = parse_model_text(text).unwrap();
        assert_eq!(v["alternatives"][0]["key"], "a");
    }

    #[test]
    fn skips_unparsable_block() {
        let text = "{not json} then {\"a\": 1}";
        assert_eq!(parse_model_text(text).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn unclosed_brace_before_complete_block() {
        let text = r#"Plan {draft: see below {"alternatives":[{"key":"a"}]}"#;
        let v = parse_model_text(text).unwrap();
        assert_eq!(v["alternatives"][0]["key"], "a");
    }

    #[test]
    fn garbage_yields_none() {
        assert!(parse_model_text("no json here").is_none());
        assert!(parse_model_text("{\"open\": ").is_none());
        assert!(parse_model_text("").is_none());
    }
}
