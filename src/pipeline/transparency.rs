//! Bounded decision history and the read-only view handed to inspectors.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::{Classification, Decision, DecisionSource, DeliveredAction};
use crate::temporal::TimePeriod;

use super::state::{AgentSnapshot, PipelineState};

pub const DEFAULT_TIMELINE_CAPACITY: usize = 50;

/// One completed cycle as shown in the transparency timeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub decision: Decision,
    pub delivered: DeliveredAction,
    pub source: DecisionSource,
    pub local: Classification,
    pub time_period: TimePeriod,
    /// Apps in the period, longest first.
    pub apps_observed: Vec<String>,
    pub focus_context: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suppressed_reason: Option<String>,
}

/// Fixed-capacity log; the oldest record is evicted first.
#[derive(Debug, Clone)]
pub struct TransparencyLog {
    capacity: usize,
    records: VecDeque<DecisionRecord>,
}

impl TransparencyLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            records: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, record: DecisionRecord) {
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn latest(&self) -> Option<&DecisionRecord> {
        self.records.back()
    }

    /// Oldest first.
    pub fn to_vec(&self) -> Vec<DecisionRecord> {
        self.records.iter().cloned().collect()
    }
}

impl Default for TransparencyLog {
    fn default() -> Self {
        Self::new(DEFAULT_TIMELINE_CAPACITY)
    }
}

struct InspectorView {
    snapshot: AgentSnapshot,
    last_decision: Decision,
    timeline: TransparencyLog,
}

/// Write side of the inspector view. Owned by the pipeline only.
pub(crate) struct ViewPublisher {
    inner: Arc<Mutex<InspectorView>>,
}

impl ViewPublisher {
    pub(crate) fn new(capacity: usize, state: &PipelineState) -> Self {
        let last_decision = Decision::unknown("no activity analyzed yet");
        Self {
            inner: Arc::new(Mutex::new(InspectorView {
                snapshot: state.snapshot(&last_decision, Utc::now()),
                last_decision,
                timeline: TransparencyLog::new(capacity),
            })),
        }
    }

    pub(crate) fn inspector(&self) -> PipelineInspector {
        PipelineInspector {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Refresh the snapshot without touching the last decision.
    pub(crate) async fn publish_state(&self, state: &PipelineState) {
        let mut view = self.inner.lock().await;
        let snapshot = state.snapshot(&view.last_decision, Utc::now());
        view.snapshot = snapshot;
    }

    /// Commit a finished cycle: record, last decision and snapshot change together.
    pub(crate) async fn publish_cycle(&self, state: &PipelineState, record: DecisionRecord) {
        let mut view = self.inner.lock().await;
        view.last_decision = record.decision.clone();
        view.snapshot = state.snapshot(&record.decision, record.timestamp);
        view.timeline.push(record);
    }
}

/// Read-only handle on the agent. Every accessor returns a copy.
#[derive(Clone)]
pub struct PipelineInspector {
    inner: Arc<Mutex<InspectorView>>,
}

impl PipelineInspector {
    pub async fn snapshot(&self) -> AgentSnapshot {
        self.inner.lock().await.snapshot.clone()
    }

    pub async fn last_decision(&self) -> Decision {
        self.inner.lock().await.last_decision.clone()
    }

    /// Oldest first.
    pub async fn timeline(&self) -> Vec<DecisionRecord> {
        self.inner.lock().await.timeline.to_vec()
    }

    pub async fn latest_record(&self) -> Option<DecisionRecord> {
        self.inner.lock().await.timeline.latest().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Intent;

    fn record(reasoning: &str) -> DecisionRecord {
        DecisionRecord {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            decision: Decision::unknown(reasoning),
            delivered: DeliveredAction::None,
            source: DecisionSource::Fallback,
            local: Classification::new(Intent::Unknown, 0.0, "nothing", true),
            time_period: TimePeriod::Morning,
            apps_observed: vec!["Blender".into()],
            focus_context: "Focused on Blender".into(),
            suppressed_reason: None,
        }
    }

    #[test]
    fn evicts_oldest_when_full() {
        let mut log = TransparencyLog::new(3);
        for i in 0..5 {
            log.push(record(&format!("cycle {i}")));
        }
        let reasons: Vec<String> = log.to_vec().into_iter().map(|r| r.decision.reasoning).collect();
        assert_eq!(reasons, vec!["cycle 2", "cycle 3", "cycle 4"]);
        assert_eq!(log.latest().map(|r| r.decision.reasoning.as_str()), Some("cycle 4"));
    }

    #[test]
    fn zero_capacity_still_keeps_latest() {
        let mut log = TransparencyLog::new(0);
        log.push(record("a"));
        log.push(record("b"));
        assert_eq!(log.len(), 1);
    }

    #[tokio::test]
    async fn inspector_starts_with_explanatory_unknown() {
        let publisher = ViewPublisher::new(5, &PipelineState::new());
        let inspector = publisher.inspector();

        let last = inspector.last_decision().await;
        assert_eq!(last.intent, Intent::Unknown);
        assert_eq!(last.confidence, 0.0);
        assert!(!last.reasoning.is_empty());
        assert!(inspector.timeline().await.is_empty());
    }

    #[tokio::test]
    async fn inspector_copies_are_detached() {
        let publisher = ViewPublisher::new(5, &PipelineState::new());
        let inspector = publisher.inspector();

        let mut state = PipelineState::new();
        state.loop_count = 1;
        publisher.publish_cycle(&state, record("first")).await;

        let mut timeline = inspector.timeline().await;
        timeline.clear();
        let mut snapshot = inspector.snapshot().await;
        snapshot.loop_count = 99;

        assert_eq!(inspector.timeline().await.len(), 1);
        assert_eq!(inspector.snapshot().await.loop_count, 1);
        assert_eq!(inspector.last_decision().await.reasoning, "first");
    }
}
