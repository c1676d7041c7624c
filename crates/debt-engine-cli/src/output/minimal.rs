use serde_json::{Map, Value};

/// Print just the headline answer.
///
/// Comparisons print the recommended strategy with its savings; loan
/// outputs print the installment. Anything else falls back to the first
/// field of the result.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result_obj {
        Value::Object(map) => println!("{}", headline(map)),
        other => println!("{}", format_minimal(other)),
    }
}

fn headline(map: &Map<String, Value>) -> String {
    if let Some(strategy) = map.get("recommended") {
        return format!(
            "{} (saves {} interest, {} months)",
            format_minimal(strategy),
            map.get("interest_saved").map(format_minimal).unwrap_or_default(),
            map.get("months_saved").map(format_minimal).unwrap_or_default(),
        );
    }

    if let Some(installment) = map.get("installment").filter(|v| !v.is_null()) {
        return format_minimal(installment);
    }

    match map.iter().next() {
        Some((key, val)) => format!("{}: {}", key, format_minimal(val)),
        None => String::new(),
    }
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_comparison_headline() {
        let v = json!({"recommended": "avalanche", "interest_saved": "198.85", "months_saved": 2});
        assert_eq!(
            headline(v.as_object().unwrap()),
            "avalanche (saves 198.85 interest, 2 months)"
        );
    }

    #[test]
    fn test_installment_headline() {
        let v = json!({"installment": "8884.88", "interest_portion": "1000.00"});
        assert_eq!(headline(v.as_object().unwrap()), "8884.88");
    }
}
