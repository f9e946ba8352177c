use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Decision, Intent};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PipelineStatus {
    Observing,
    Summarizing,
    Analyzing,
    Deciding,
    Acting,
    Reflecting,
    Stopped,
}

impl Default for PipelineStatus {
    fn default() -> Self {
        PipelineStatus::Observing
    }
}

/// Counters owned by the running pipeline. Only the pipeline writes them.
#[derive(Debug, Clone, Default)]
pub struct PipelineState {
    pub status: PipelineStatus,
    pub consecutive_escalation_failures: u32,
    pub dismissal_count: u32,
    pub productive_streak: u32,
    pub loop_count: u64,
    pub nudges_delivered: u64,
    pub nudges_suppressed: u64,
    pub last_known_good: Option<Decision>,
    pub focus_context: String,
}

impl PipelineState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self, current: &Decision, last_updated: DateTime<Utc>) -> AgentSnapshot {
        AgentSnapshot {
            status: self.status,
            is_active: self.status != PipelineStatus::Stopped,
            intent: current.intent,
            confidence: current.confidence,
            focus_context: self.focus_context.clone(),
            loop_count: self.loop_count,
            productive_streak: self.productive_streak,
            dismissal_count: self.dismissal_count,
            consecutive_escalation_failures: self.consecutive_escalation_failures,
            nudges_delivered: self.nudges_delivered,
            nudges_suppressed: self.nudges_suppressed,
            last_updated,
        }
    }
}

/// Point-in-time copy of the agent handed to inspectors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgentSnapshot {
    pub status: PipelineStatus,
    pub is_active: bool,
    pub intent: Intent,
    pub confidence: f64,
    pub focus_context: String,
    pub loop_count: u64,
    pub productive_streak: u32,
    pub dismissal_count: u32,
    pub consecutive_escalation_failures: u32,
    pub nudges_delivered: u64,
    pub nudges_suppressed: u64,
    pub last_updated: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_copies_counters() {
        let mut state = PipelineState::new();
        state.loop_count = 4;
        state.productive_streak = 2;
        state.focus_context = "Focused on VSCode".into();

        let snapshot = state.snapshot(&Decision::unknown("waiting"), Utc::now());
        assert!(snapshot.is_active);
        assert_eq!(snapshot.status, PipelineStatus::Observing);
        assert_eq!(snapshot.loop_count, 4);
        assert_eq!(snapshot.intent, Intent::Unknown);

        state.status = PipelineStatus::Stopped;
        assert!(!state.snapshot(&Decision::unknown("done"), Utc::now()).is_active);
    }

    #[test]
    fn snapshot_serializes_camel_case() {
        let snapshot = PipelineState::new().snapshot(&Decision::unknown("x"), Utc::now());
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["status"], "observing");
        assert!(json.get("focusContext").is_some());
        assert!(json.get("nudgesDelivered").is_some());
    }
}
