use serde_json::Value;

/// Print just the key answer value from the output.
///
/// Heuristic: the deal summary's headline fields in order of priority, then
/// the first field of whatever object is present.
pub fn print_minimal(value: &Value) {
    // Unwrap the envelope, then prefer the summary block of an evaluation
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);
    let result_obj = result_obj
        .as_object()
        .and_then(|m| m.get("summary"))
        .unwrap_or(result_obj);

    let priority_keys = [
        "irr",
        "npv",
        "payback_month",
        "terminal_cumulative_fcf",
        "blended_gross_margin_pct",
    ];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_minimal(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
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
