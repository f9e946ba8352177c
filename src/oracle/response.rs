//! Strict parsing of oracle replies. Anything that does not fit the contract is
//! rejected as a whole so the caller can retry or fall back.

use serde::Deserialize;
use serde_json::Value;

use crate::models::{Action, Decision, Intent};
use crate::oracle::OracleError;

/// Confidence ceiling for replies whose intent had to be coerced to `unknown`.
const COERCED_CONFIDENCE_CAP: f64 = 0.5;

#[derive(Debug, Deserialize)]
struct RawReply {
    intent: String,
    confidence: Value,
    reasoning: String,
    action: String,
    #[serde(default, alias = "nudge_message")]
    message: Option<String>,
}

pub fn parse_reply(body: &str) -> Result<Decision, OracleError> {
    let value: Value = serde_json::from_str(body)?;
    if !value.is_object() {
        return Err(OracleError::Invalid("reply is not a JSON object".into()));
    }

    let raw: RawReply = serde_json::from_value(value)
        .map_err(|err| OracleError::Invalid(format!("reply is missing required fields: {err}")))?;

    let mut confidence = parse_confidence(&raw.confidence)?;

    let intent = match Intent::parse(&raw.intent) {
        Some(intent) => intent,
        None => {
            confidence = confidence.min(COERCED_CONFIDENCE_CAP);
            Intent::Unknown
        }
    };

    let action = Action::parse(&raw.action)
        .ok_or_else(|| OracleError::Invalid(format!("unsupported action '{}'", raw.action)))?;

    let message = raw
        .message
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty());

    Ok(Decision {
        intent,
        confidence,
        reasoning: raw.reasoning,
        action,
        message,
    })
}

fn parse_confidence(value: &Value) -> Result<f64, OracleError> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(confidence) if confidence.is_finite() && (0.0..=1.0).contains(&confidence) => {
            Ok(confidence)
        }
        _ => Err(OracleError::Invalid(format!(
            "confidence must be a number in [0, 1], got {value}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_reply() {
        let decision = parse_reply(
            r#"{"intent":"Unproductive","confidence":0.75,"reasoning":"video","action":"nudge","nudge_message":"Back to it?"}"#,
        )
        .unwrap();

        assert_eq!(decision.intent, Intent::Unproductive);
        assert_eq!(decision.confidence, 0.75);
        assert_eq!(decision.action, Action::Nudge);
        assert_eq!(decision.message.as_deref(), Some("Back to it?"));
    }

    #[test]
    fn unknown_intent_is_coerced_and_capped() {
        let decision = parse_reply(
            r#"{"intent":"distracted","confidence":0.9,"reasoning":"?","action":"none"}"#,
        )
        .unwrap();
        assert_eq!(decision.intent, Intent::Unknown);
        assert_eq!(decision.confidence, 0.5);
    }

    #[test]
    fn accepts_numeric_string_confidence() {
        let decision = parse_reply(
            r#"{"intent":"neutral","confidence":"0.4","reasoning":"mixed","action":"none"}"#,
        )
        .unwrap();
        assert_eq!(decision.confidence, 0.4);
    }

    #[test]
    fn rejects_schema_violations() {
        let cases = [
            r#"{"intent":"neutral","confidence":0.4,"action":"none"}"#,
            r#"{"intent":"neutral","confidence":1.4,"reasoning":"x","action":"none"}"#,
            r#"{"intent":"neutral","confidence":"high","reasoning":"x","action":"none"}"#,
            r#"{"intent":"neutral","confidence":0.4,"reasoning":"x","action":"shout"}"#,
            r#"["intent"]"#,
        ];
        for body in cases {
            assert!(
                matches!(parse_reply(body), Err(OracleError::Invalid(_))),
                "{body}"
            );
        }
    }

    #[test]
    fn malformed_json_is_its_own_error() {
        assert!(matches!(
            parse_reply("{not json"),
            Err(OracleError::Malformed(_))
        ));
    }

    #[test]
    fn blank_message_is_dropped() {
        let decision = parse_reply(
            r#"{"intent":"unproductive","confidence":0.8,"reasoning":"x","action":"nudge","message":"  "}"#,
        )
        .unwrap();
        assert!(decision.message.is_none());
    }
}
