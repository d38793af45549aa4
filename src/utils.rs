// src/utils.rs
use serde_json::Value;

/// Loose presence test used for both inbound aliases and webhook fields:
/// null, `false`, `0` and `""` count as absent.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_falsy_values() {
        for value in [json!(null), json!(false), json!(0), json!(0.0), json!("")] {
            assert!(!is_truthy(&value), "{} should be falsy", value);
        }
    }

    #[test]
    fn test_truthy_values() {
        for value in [json!(true), json!(-1), json!(" "), json!([]), json!({})] {
            assert!(is_truthy(&value), "{} should be truthy", value);
        }
    }
}
