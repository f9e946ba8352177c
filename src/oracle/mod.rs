//! Escalation path to the remote reasoning oracle: retries with exponential
//! backoff, then the last good decision, then a quiet `unknown` fallback.

pub mod backoff;
pub mod demo;
pub mod request;
pub mod response;
pub mod transport;

use std::sync::Arc;

use thiserror::Error;

pub use backoff::RetryPolicy;
pub use demo::DemoOracleTransport;
pub use request::{LocalAssessment, OracleRequest, RequestContext};
pub use transport::{HttpOracleTransport, OracleTransport};

use crate::models::{ActivitySummary, Classification, Decision, DecisionSource};
use crate::temporal::TemporalContext;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("oracle transport failed: {0}")]
    Transport(String),
    #[error("oracle answered with HTTP status {0}")]
    Status(u16),
    #[error("oracle reply is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("oracle reply violates the decision schema: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Escalation {
    pub decision: Decision,
    pub source: DecisionSource,
    pub attempts: u32,
}

pub struct ReasoningOracleClient {
    transport: Arc<dyn OracleTransport>,
    goals: Vec<String>,
    retry: RetryPolicy,
    last_good: Option<Decision>,
    consecutive_failures: u32,
}

impl ReasoningOracleClient {
    pub fn new(transport: Arc<dyn OracleTransport>, goals: Vec<String>, retry: RetryPolicy) -> Self {
        log_info!(
            "oracle client ready: {} (max {} attempts)",
            transport.describe(),
            retry.max_attempts
        );
        Self {
            transport,
            goals,
            retry,
            last_good: None,
            consecutive_failures: 0,
        }
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn cached_decision(&self) -> Option<&Decision> {
        self.last_good.as_ref()
    }

    pub async fn health_check(&self) -> bool {
        self.transport.health_check().await
    }

    /// Ask the oracle for a decision. Never fails: exhausted retries yield the
    /// cached decision or [`Decision::oracle_unavailable`].
    pub async fn analyze(
        &mut self,
        summary: &ActivitySummary,
        local: &Classification,
        temporal: &TemporalContext,
    ) -> Decision {
        self.escalate(summary, Some(local), temporal).await.decision
    }

    pub async fn escalate(
        &mut self,
        summary: &ActivitySummary,
        local: Option<&Classification>,
        temporal: &TemporalContext,
    ) -> Escalation {
        let request = OracleRequest::build(
            summary,
            &self.goals,
            local,
            temporal,
            self.consecutive_failures,
        );

        let max_attempts = self.retry.max_attempts.max(1);
        for attempt in 0..max_attempts {
            match self.request_once(&request).await {
                Ok(decision) => {
                    self.consecutive_failures = 0;
                    self.last_good = Some(decision.clone());
                    return Escalation {
                        decision,
                        source: DecisionSource::Oracle,
                        attempts: attempt + 1,
                    };
                }
                Err(err) => {
                    log_warn!(
                        "oracle request failed (attempt {}/{}): {err}",
                        attempt + 1,
                        max_attempts
                    );
                    if attempt + 1 < max_attempts {
                        tokio::time::sleep(self.retry.delay_for(attempt)).await;
                    }
                }
            }
        }

        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        log_error!(
            "oracle unreachable after {} attempts ({} escalation(s) failed in a row)",
            max_attempts,
            self.consecutive_failures
        );

        match &self.last_good {
            Some(cached) => {
                log_info!("serving cached oracle decision");
                Escalation {
                    decision: cached.clone(),
                    source: DecisionSource::Cached,
                    attempts: max_attempts,
                }
            }
            None => Escalation {
                decision: Decision::oracle_unavailable(),
                source: DecisionSource::Fallback,
                attempts: max_attempts,
            },
        }
    }

    async fn request_once(&self, request: &OracleRequest) -> Result<Decision, OracleError> {
        let body = self.transport.send(request).await?;
        response::parse_reply(&body)
    }
}
