use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Productive,
    Neutral,
    Unproductive,
    Unknown,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Productive => "productive",
            Intent::Neutral => "neutral",
            Intent::Unproductive => "unproductive",
            Intent::Unknown => "unknown",
        }
    }

    /// Case-insensitive lookup; `None` for anything outside the four intents.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "productive" => Some(Intent::Productive),
            "neutral" => Some(Intent::Neutral),
            "unproductive" => Some(Intent::Unproductive),
            "unknown" => Some(Intent::Unknown),
            _ => None,
        }
    }
}

impl Default for Intent {
    fn default() -> Self {
        Intent::Unknown
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    None,
    Nudge,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::None => "none",
            Action::Nudge => "nudge",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" => Some(Action::None),
            "nudge" => Some(Action::Nudge),
            _ => None,
        }
    }
}

/// What actually reached the user for a cycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DeliveredAction {
    None,
    Nudge,
    /// The decision asked for a nudge but the rate limiter refused it.
    Suppressed,
}

/// Which tier produced the decision for a cycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DecisionSource {
    /// Confident local classification; never nudges.
    Local,
    Oracle,
    /// Oracle unreachable, last good oracle decision reused.
    Cached,
    /// Oracle unreachable and nothing cached.
    Fallback,
}

/// Output of the local classifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Classification {
    pub intent: Intent,
    pub confidence: f64,
    pub reasoning: String,
    pub escalate: bool,
}

impl Classification {
    pub fn new(intent: Intent, confidence: f64, reasoning: impl Into<String>, escalate: bool) -> Self {
        Self {
            intent,
            confidence,
            reasoning: reasoning.into(),
            escalate,
        }
    }
}

/// Canonical decision shared by the oracle client, post-processor and actuator.
///
/// Once post-processed, `message.is_some()` holds exactly when `action == Nudge`.
/// Raw oracle decisions may carry a nudge without a message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Decision {
    pub intent: Intent,
    pub confidence: f64,
    pub reasoning: String,
    pub action: Action,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Decision {
    /// The fallback served when the oracle is unreachable and nothing is cached.
    pub fn oracle_unavailable() -> Self {
        Self::unknown("oracle unavailable")
    }

    pub fn unknown(reasoning: impl Into<String>) -> Self {
        Self {
            intent: Intent::Unknown,
            confidence: 0.0,
            reasoning: reasoning.into(),
            action: Action::None,
            message: None,
        }
    }

    /// A quiet decision mirroring a confident local classification.
    pub fn from_local(classification: &Classification) -> Self {
        Self {
            intent: classification.intent,
            confidence: classification.confidence,
            reasoning: classification.reasoning.clone(),
            action: Action::None,
            message: None,
        }
    }

    pub fn is_nudge(&self) -> bool {
        self.action == Action::Nudge
    }

    pub fn has_consistent_message(&self) -> bool {
        self.is_nudge() == self.message.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_parse_is_case_insensitive() {
        assert_eq!(Intent::parse(" Productive "), Some(Intent::Productive));
        assert_eq!(Intent::parse("UNPRODUCTIVE"), Some(Intent::Unproductive));
        assert_eq!(Intent::parse("distracted"), None);
    }

    #[test]
    fn fallback_decision_is_quiet_unknown() {
        let fallback = Decision::oracle_unavailable();
        assert_eq!(fallback.intent, Intent::Unknown);
        assert_eq!(fallback.confidence, 0.0);
        assert_eq!(fallback.action, Action::None);
        assert!(fallback.message.is_none());
        assert!(fallback.has_consistent_message());
    }

    #[test]
    fn local_decisions_never_nudge() {
        let local = Classification::new(Intent::Unproductive, 0.99, "all games", false);
        let decision = Decision::from_local(&local);
        assert_eq!(decision.action, Action::None);
        assert_eq!(decision.intent, Intent::Unproductive);
    }
}
