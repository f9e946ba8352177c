use std::sync::Arc;

use uuid::Uuid;

use crate::actuator::{ActuatorConfig, Denial, NudgeActuator, NudgeSurface};
use crate::classifier::{ClassifierConfig, LocalClassifier};
use crate::models::{
    ActivitySummary, Classification, Decision, DecisionSource, DeliveredAction, Intent,
    SummaryError,
};
use crate::oracle::{OracleTransport, ReasoningOracleClient, RetryPolicy};
use crate::postprocess::{DecisionPostProcessor, EscalationContext, PostProcessorConfig};
use crate::settings::AgentSettings;
use crate::temporal::{Clock, SystemClock, TemporalContext};

use super::state::{PipelineState, PipelineStatus};
use super::transparency::{DecisionRecord, PipelineInspector, ViewPublisher};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

/// Result of one completed cycle.
#[derive(Debug, Clone)]
pub struct CycleOutcome {
    pub local: Classification,
    /// Post-processed decision. Its action stays `Nudge` even when delivery was refused.
    pub decision: Decision,
    pub delivered: DeliveredAction,
    pub source: DecisionSource,
    pub denial: Option<Denial>,
    pub temporal: TemporalContext,
}

/// Everything the pipeline needs, built by whoever owns the agent.
pub struct PipelineParts {
    /// Goal named in synthesized nudge messages.
    pub primary_goal: Option<String>,
    pub classifier: LocalClassifier,
    pub oracle: ReasoningOracleClient,
    pub post_processor: DecisionPostProcessor,
    pub actuator: NudgeActuator,
    pub surface: Arc<dyn NudgeSurface>,
    pub clock: Arc<dyn Clock>,
    pub productive_streak_reset: u32,
    pub transparency_capacity: usize,
}

impl PipelineParts {
    pub fn from_settings(
        settings: &AgentSettings,
        transport: Arc<dyn OracleTransport>,
        surface: Arc<dyn NudgeSurface>,
    ) -> Self {
        Self {
            primary_goal: settings.primary_goal().map(String::from),
            classifier: LocalClassifier::with_overrides(
                ClassifierConfig::from(&settings.thresholds),
                &settings.custom_productive_apps,
                &settings.custom_unproductive_apps,
            ),
            oracle: ReasoningOracleClient::new(
                transport,
                settings.goals.clone(),
                RetryPolicy::from(&settings.oracle),
            ),
            post_processor: DecisionPostProcessor::new(PostProcessorConfig::from(
                &settings.thresholds,
            )),
            actuator: NudgeActuator::new(ActuatorConfig::from(&settings.rate_limit)),
            surface,
            clock: Arc::new(SystemClock),
            productive_streak_reset: settings.thresholds.productive_streak_reset,
            transparency_capacity: settings.transparency_capacity,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

/// One agent's decision stream: classify, escalate if needed, post-process,
/// rate-limit, record. Cycles never overlap because every step takes `&mut self`.
pub struct DecisionPipeline {
    primary_goal: Option<String>,
    classifier: LocalClassifier,
    oracle: ReasoningOracleClient,
    post_processor: DecisionPostProcessor,
    actuator: NudgeActuator,
    surface: Arc<dyn NudgeSurface>,
    clock: Arc<dyn Clock>,
    productive_streak_reset: u32,
    state: PipelineState,
    view: ViewPublisher,
}

impl DecisionPipeline {
    pub fn new(parts: PipelineParts) -> Self {
        let state = PipelineState::new();
        let view = ViewPublisher::new(parts.transparency_capacity, &state);
        Self {
            primary_goal: parts.primary_goal,
            classifier: parts.classifier,
            oracle: parts.oracle,
            post_processor: parts.post_processor,
            actuator: parts.actuator,
            surface: parts.surface,
            clock: parts.clock,
            productive_streak_reset: parts.productive_streak_reset.max(1),
            state,
            view,
        }
    }

    pub fn inspector(&self) -> PipelineInspector {
        self.view.inspector()
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// Direct access to the rate limiter, for embedders that track nudges
    /// delivered outside the pipeline.
    pub fn actuator_mut(&mut self) -> &mut NudgeActuator {
        &mut self.actuator
    }

    pub async fn record_dismissal(&mut self) {
        self.actuator.record_dismissal();
        self.state.dismissal_count = self.actuator.dismissal_count();
        log_info!(
            "nudge dismissed ({} dismissal(s) pending)",
            self.state.dismissal_count
        );
        self.view.publish_state(&self.state).await;
    }

    pub async fn record_acknowledgement(&mut self) {
        self.actuator.reset_dismissals();
        self.state.dismissal_count = 0;
        log_info!("nudge acknowledged, dismissal back-off cleared");
        self.view.publish_state(&self.state).await;
    }

    pub async fn stop(&mut self) {
        self.set_status(PipelineStatus::Stopped).await;
    }

    /// Run one full cycle for a completed period. A malformed summary skips the
    /// cycle; every valid summary yields a decision.
    pub async fn run_cycle(
        &mut self,
        summary: ActivitySummary,
    ) -> Result<CycleOutcome, SummaryError> {
        let temporal = self.clock.temporal_context();

        self.set_status(PipelineStatus::Summarizing).await;
        if let Err(err) = summary.validate() {
            log_warn!("skipping cycle: {err}");
            self.set_status(PipelineStatus::Observing).await;
            return Err(err);
        }
        self.state.focus_context = match summary.top_app() {
            Some(app) => format!("Focused on {app}"),
            None => "No activity".to_string(),
        };

        self.set_status(PipelineStatus::Analyzing).await;
        let local = self
            .classifier
            .classify_summary(&summary.app_breakdown, &summary.top_windows);
        log_info!(
            "local: {} @ {:.2} (escalate: {}) - {}",
            local.intent.as_str(),
            local.confidence,
            local.escalate,
            local.reasoning
        );

        let (raw, source) = if local.escalate {
            let escalation = self.oracle.escalate(&summary, Some(&local), &temporal).await;
            self.state.consecutive_escalation_failures = self.oracle.consecutive_failures();
            self.state.last_known_good = self.oracle.cached_decision().cloned();
            (escalation.decision, escalation.source)
        } else {
            (Decision::from_local(&local), DecisionSource::Local)
        };

        self.set_status(PipelineStatus::Deciding).await;
        let context = EscalationContext {
            temporal,
            fatigue_count: self.oracle.consecutive_failures(),
            primary_goal: self.primary_goal.clone(),
        };
        let decision = self.post_processor.process(raw, &context);

        self.set_status(PipelineStatus::Acting).await;
        let (delivered, denial) = self.actuate(&decision, &temporal);

        self.set_status(PipelineStatus::Reflecting).await;
        self.reflect(&decision, delivered);

        let record = DecisionRecord {
            id: Uuid::new_v4(),
            timestamp: temporal.now,
            decision: decision.clone(),
            delivered,
            source,
            local: local.clone(),
            time_period: temporal.period,
            apps_observed: summary.apps_by_duration(),
            focus_context: self.state.focus_context.clone(),
            suppressed_reason: denial.map(|d| d.to_string()),
        };
        self.state.status = PipelineStatus::Observing;
        self.view.publish_cycle(&self.state, record).await;

        log_info!(
            "cycle {} done: {} @ {:.2}, action {}, delivered {:?} via {:?}",
            self.state.loop_count,
            decision.intent.as_str(),
            decision.confidence,
            decision.action.as_str(),
            delivered,
            source
        );

        Ok(CycleOutcome {
            local,
            decision,
            delivered,
            source,
            denial,
            temporal,
        })
    }

    fn actuate(
        &mut self,
        decision: &Decision,
        temporal: &TemporalContext,
    ) -> (DeliveredAction, Option<Denial>) {
        if !decision.is_nudge() {
            return (DeliveredAction::None, None);
        }

        match self.actuator.check_at(temporal.now) {
            Ok(()) => {
                let message = decision.message.as_deref().unwrap_or_default();
                if let Err(err) = self.surface.deliver(message, &decision.reasoning) {
                    log_error!("nudge delivery failed: {err:?}");
                }
                self.actuator.record_nudge_at(temporal.now);
                (DeliveredAction::Nudge, None)
            }
            Err(denial) => {
                log_info!("nudge suppressed by rate limiter: {denial}");
                (DeliveredAction::Suppressed, Some(denial))
            }
        }
    }

    fn reflect(&mut self, decision: &Decision, delivered: DeliveredAction) {
        self.state.loop_count += 1;

        match delivered {
            DeliveredAction::Nudge => self.state.nudges_delivered += 1,
            DeliveredAction::Suppressed => self.state.nudges_suppressed += 1,
            DeliveredAction::None => {}
        }

        if decision.intent == Intent::Productive {
            self.state.productive_streak += 1;
            if self.state.productive_streak >= self.productive_streak_reset
                && self.actuator.dismissal_count() > 0
            {
                log_info!(
                    "{} productive cycles in a row, clearing dismissals",
                    self.state.productive_streak
                );
                self.actuator.reset_dismissals();
            }
        } else {
            self.state.productive_streak = 0;
        }
        self.state.dismissal_count = self.actuator.dismissal_count();
    }

    async fn set_status(&mut self, status: PipelineStatus) {
        self.state.status = status;
        self.view.publish_state(&self.state).await;
    }
}
