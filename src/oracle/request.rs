use serde::{Deserialize, Serialize};

use crate::models::{ActivitySummary, Classification, Intent};
use crate::temporal::{TemporalContext, TimePeriod};

/// The local verdict forwarded to the oracle as a hint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocalAssessment {
    pub intent: Intent,
    pub confidence: f64,
    pub reasoning: String,
}

impl From<&Classification> for LocalAssessment {
    fn from(classification: &Classification) -> Self {
        Self {
            intent: classification.intent,
            confidence: classification.confidence,
            reasoning: classification.reasoning.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequestContext {
    pub time_period: TimePeriod,
    pub consecutive_escalation_failures: u32,
    pub timestamp: String,
}

/// Body posted to the oracle's `/analyze` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OracleRequest {
    pub activity_summary: ActivitySummary,
    pub goals: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_classification: Option<LocalAssessment>,
    pub context: RequestContext,
}

impl OracleRequest {
    pub fn build(
        summary: &ActivitySummary,
        goals: &[String],
        local: Option<&Classification>,
        temporal: &TemporalContext,
        consecutive_escalation_failures: u32,
    ) -> Self {
        Self {
            activity_summary: summary.clone(),
            goals: goals.to_vec(),
            local_classification: local.map(LocalAssessment::from),
            context: RequestContext {
                time_period: temporal.period,
                consecutive_escalation_failures,
                timestamp: temporal.now.to_rfc3339(),
            },
        }
    }
}
