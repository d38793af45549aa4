// src/services/reply_normalizer.rs
// Extracts a single reply string from the shapes the automation webhook is
// known to answer with.

use crate::error::NormalizeError;
use crate::utils::is_truthy;
use serde_json::Value;

/// Which branch produced the reply, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyShape {
    /// `[{"output": ...}, ...]`
    ArrayOutput,
    /// `{"output": ...}`
    ObjectOutput,
    /// `{"reply": "<string, possibly JSON>"}`
    StringReply,
    /// JSON that matched nothing above.
    Fallback,
    /// Non-JSON content type, body used verbatim.
    PlainText,
}

/// Non-fatal events raised while normalizing. They never change the outcome
/// into an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizeDiagnostic {
    /// `reply` was a string but not valid JSON; the raw string was used.
    ReplyNotJson { reply: String, error: String },
    /// No recognized field matched; the reply is a best-effort rendering.
    UnrecognizedPayload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedReply {
    pub text: String,
    pub shape: ReplyShape,
    pub diagnostic: Option<NormalizeDiagnostic>,
}

/// A decoded JSON payload tagged with the branch it belongs to.
enum Payload<'a> {
    ArrayOutput(&'a Value),
    ObjectOutput(&'a Value),
    StringReply(&'a str),
    Fallback(&'a Value),
}

pub fn is_json_content_type(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("application/json")
}

/// Normalizes a successful webhook response body.
///
/// Only a body that claims to be JSON but fails to decode is an error; every
/// decodable shape yields some string.
pub fn normalize_reply(content_type: &str, body: &str) -> Result<NormalizedReply, NormalizeError> {
    if !is_json_content_type(content_type) {
        return Ok(NormalizedReply {
            text: body.to_string(),
            shape: ReplyShape::PlainText,
            diagnostic: None,
        });
    }

    let payload: Value = serde_json::from_str(body)?;
    Ok(normalize_json(&payload))
}

pub fn normalize_json(payload: &Value) -> NormalizedReply {
    let normalized = match classify(payload) {
        Payload::ArrayOutput(output) => NormalizedReply {
            text: coerce_to_string(output),
            shape: ReplyShape::ArrayOutput,
            diagnostic: None,
        },
        Payload::ObjectOutput(output) => NormalizedReply {
            text: coerce_to_string(output),
            shape: ReplyShape::ObjectOutput,
            diagnostic: None,
        },
        Payload::StringReply(reply) => {
            let (text, diagnostic) = resolve_string_reply(reply);
            NormalizedReply {
                text,
                shape: ReplyShape::StringReply,
                diagnostic,
            }
        }
        Payload::Fallback(payload) => {
            tracing::info!(
                payload = %payload,
                "No recognized webhook reply format, using fallback"
            );
            let text = present_field(payload, "text")
                .or_else(|| present_field(payload, "message"))
                .map(coerce_to_string)
                .unwrap_or_else(|| payload.to_string());
            NormalizedReply {
                text,
                shape: ReplyShape::Fallback,
                diagnostic: Some(NormalizeDiagnostic::UnrecognizedPayload),
            }
        }
    };

    tracing::debug!(shape = ?normalized.shape, "Normalized webhook reply");
    normalized
}

fn classify(payload: &Value) -> Payload<'_> {
    if let Some(output) = payload
        .as_array()
        .and_then(|items| items.first())
        .and_then(|first| truthy_field(first, "output"))
    {
        return Payload::ArrayOutput(output);
    }

    if let Some(output) = truthy_field(payload, "output") {
        return Payload::ObjectOutput(output);
    }

    if let Some(reply) = payload
        .get("reply")
        .and_then(Value::as_str)
        .filter(|reply| !reply.is_empty())
    {
        return Payload::StringReply(reply);
    }

    Payload::Fallback(payload)
}

/// Older workflows double-encode their answer inside `reply`.
fn resolve_string_reply(reply: &str) -> (String, Option<NormalizeDiagnostic>) {
    let parsed: Value = match serde_json::from_str(reply) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(error = %e, reply = %reply, "Failed to parse reply JSON");
            return (
                reply.to_string(),
                Some(NormalizeDiagnostic::ReplyNotJson {
                    reply: reply.to_string(),
                    error: e.to_string(),
                }),
            );
        }
    };

    if let Some(first) = parsed
        .get("response")
        .and_then(Value::as_array)
        .and_then(|items| items.first())
    {
        let text = truthy_field(first, "output")
            .map(coerce_to_string)
            .unwrap_or_default();
        return (text, None);
    }

    if let Some(output) = truthy_field(&parsed, "output") {
        return (coerce_to_string(output), None);
    }

    (reply.to_string(), None)
}

/// Field lookup for the precedence checks: null, `false`, `0` and `""` count
/// as missing.
fn truthy_field<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.get(key).filter(|field| is_truthy(field))
}

/// Field lookup for the fallback chain, which only skips null or missing fields.
fn present_field<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.get(key).filter(|field| !field.is_null())
}

fn coerce_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const JSON: &str = "application/json; charset=utf-8";

    fn normalize(payload: Value) -> NormalizedReply {
        normalize_reply(JSON, &payload.to_string()).unwrap()
    }

    #[test]
    fn test_array_output_wins() {
        let reply = normalize(json!([{"output": "A", "text": "ignored"}]));
        assert_eq!(reply.text, "A");
        assert_eq!(reply.shape, ReplyShape::ArrayOutput);
        assert_eq!(reply.diagnostic, None);
    }

    #[test]
    fn test_object_output() {
        let reply = normalize(json!({"output": "B", "reply": "ignored"}));
        assert_eq!(reply.text, "B");
        assert_eq!(reply.shape, ReplyShape::ObjectOutput);
    }

    #[test]
    fn test_nested_response_array_in_reply_string() {
        let reply = normalize(json!({"reply": "{\"response\":[{\"output\":\"C\"}]}"}));
        assert_eq!(reply.text, "C");
        assert_eq!(reply.shape, ReplyShape::StringReply);
        assert_eq!(reply.diagnostic, None);
    }

    #[test]
    fn test_nested_response_without_output_is_empty() {
        let reply = normalize(json!({"reply": "{\"response\":[{\"other\":1}]}"}));
        assert_eq!(reply.text, "");
    }

    #[test]
    fn test_nested_output_in_reply_string() {
        let reply = normalize(json!({"reply": "{\"output\":\"D\"}"}));
        assert_eq!(reply.text, "D");
    }

    #[test]
    fn test_reply_json_without_known_fields_returns_raw_reply() {
        let raw = "{\"answer\":\"E\"}";
        let reply = normalize(json!({ "reply": raw }));
        assert_eq!(reply.text, raw);
        assert_eq!(reply.diagnostic, None);
    }

    #[test]
    fn test_reply_not_json_is_reported_but_not_fatal() {
        let reply = normalize(json!({"reply": "not json"}));
        assert_eq!(reply.text, "not json");
        assert_eq!(reply.shape, ReplyShape::StringReply);
        assert!(matches!(
            reply.diagnostic,
            Some(NormalizeDiagnostic::ReplyNotJson { ref reply, .. }) if reply == "not json"
        ));
    }

    #[test]
    fn test_fallback_prefers_text_then_message() {
        assert_eq!(normalize(json!({"text": "T", "message": "M"})).text, "T");
        assert_eq!(normalize(json!({"message": "M"})).text, "M");
    }

    #[test]
    fn test_fallback_keeps_empty_text() {
        // Only null/missing is skipped in the fallback chain.
        assert_eq!(normalize(json!({"text": "", "message": "M"})).text, "");
    }

    #[test]
    fn test_fallback_serializes_whole_payload() {
        let reply = normalize(json!({"status": "queued", "id": 7}));
        assert_eq!(reply.text, r#"{"status":"queued","id":7}"#);
        assert_eq!(reply.shape, ReplyShape::Fallback);
        assert_eq!(reply.diagnostic, Some(NormalizeDiagnostic::UnrecognizedPayload));
    }

    #[test]
    fn test_empty_array_falls_back() {
        let reply = normalize(json!([]));
        assert_eq!(reply.text, "[]");
        assert_eq!(reply.shape, ReplyShape::Fallback);
    }

    #[test]
    fn test_falsy_output_is_skipped() {
        let reply = normalize(json!({"output": "", "reply": "fallthrough"}));
        assert_eq!(reply.text, "fallthrough");
        assert_eq!(reply.shape, ReplyShape::StringReply);
    }

    #[test]
    fn test_non_string_output_is_stringified() {
        assert_eq!(normalize(json!({"output": 42})).text, "42");
        assert_eq!(normalize(json!([{"output": {"a": 1}}])).text, r#"{"a":1}"#);
    }

    #[test]
    fn test_plain_text_is_verbatim() {
        let reply = normalize_reply("text/plain", "plain text reply").unwrap();
        assert_eq!(reply.text, "plain text reply");
        assert_eq!(reply.shape, ReplyShape::PlainText);
    }

    #[test]
    fn test_plain_text_is_not_parsed() {
        let reply = normalize_reply("", r#"{"output":"x"}"#).unwrap();
        assert_eq!(reply.text, r#"{"output":"x"}"#);
    }

    #[test]
    fn test_malformed_json_body_is_an_error() {
        assert!(normalize_reply(JSON, "{not json").is_err());
    }
}
