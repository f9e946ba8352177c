//! Safety rules applied to every decision before it can reach the user.
//!
//! Rules only ever turn a nudge into silence. They may append notes to the
//! reasoning but never drop the original explanation.

use crate::models::{Action, Decision, Intent};
use crate::settings::ThresholdSettings;
use crate::temporal::TemporalContext;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_debug;

const NUDGE_TEMPLATES: &[&str] = &[
    "Ready to get back to {goal}? You've got this.",
    "Quick check-in: how is {goal} coming along?",
    "Breaks are good. When you're ready, {goal} is waiting.",
    "Gentle reminder: you wanted to focus on {goal} today.",
];

const FALLBACK_GOAL: &str = "your goals";

#[derive(Debug, Clone)]
pub struct PostProcessorConfig {
    pub min_nudge_confidence: f64,
    pub fatigue_nudges: u32,
    pub late_start_hour: u32,
    pub late_end_hour: u32,
}

impl Default for PostProcessorConfig {
    fn default() -> Self {
        Self::from(&ThresholdSettings::default())
    }
}

impl From<&ThresholdSettings> for PostProcessorConfig {
    fn from(thresholds: &ThresholdSettings) -> Self {
        Self {
            min_nudge_confidence: thresholds.min_nudge_confidence,
            fatigue_nudges: thresholds.fatigue_nudges,
            late_start_hour: thresholds.late_start_hour,
            late_end_hour: thresholds.late_end_hour,
        }
    }
}

/// What the caller knows about the moment the decision is applied to.
#[derive(Debug, Clone)]
pub struct EscalationContext {
    pub temporal: TemporalContext,
    /// Escalations that failed back to back. While the oracle cannot answer,
    /// the same cached nudge would otherwise repeat every cycle.
    pub fatigue_count: u32,
    pub primary_goal: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DecisionPostProcessor {
    config: PostProcessorConfig,
    nudge_counter: u64,
}

impl DecisionPostProcessor {
    pub fn new(config: PostProcessorConfig) -> Self {
        Self {
            config,
            nudge_counter: 0,
        }
    }

    /// Nudge decisions that survived post-processing so far.
    pub fn nudge_counter(&self) -> u64 {
        self.nudge_counter
    }

    pub fn process(&mut self, raw: Decision, context: &EscalationContext) -> Decision {
        let Decision {
            intent,
            confidence,
            mut reasoning,
            action,
            message,
        } = raw;

        let asked_to_nudge = action == Action::Nudge;
        let mut should_nudge = asked_to_nudge;

        if confidence < self.config.min_nudge_confidence {
            should_nudge = false;
            if asked_to_nudge {
                reasoning.push_str(" [nudge suppressed: low confidence]");
                log_debug!("low confidence ({confidence:.2}) suppressed a nudge");
            }
        }

        if context.fatigue_count >= self.config.fatigue_nudges {
            should_nudge = false;
            if asked_to_nudge {
                reasoning.push_str(" [nudge suppressed: avoiding nudge fatigue]");
                log_debug!(
                    "fatigue count {} suppressed a nudge",
                    context.fatigue_count
                );
            }
        }

        if intent == Intent::Unproductive
            && context
                .temporal
                .is_within_late_hours(self.config.late_start_hour, self.config.late_end_hour)
        {
            should_nudge = false;
            if asked_to_nudge {
                reasoning.push_str(" [nudge suppressed: late hours are leisure time]");
                log_debug!(
                    "late hour {} suppressed a nudge",
                    context.temporal.local_hour
                );
            }
        }

        let (action, message) = if should_nudge {
            let message = match message.filter(|m| !m.trim().is_empty()) {
                Some(message) => message,
                None => self.synthesize_message(context.primary_goal.as_deref()),
            };
            self.nudge_counter += 1;
            (Action::Nudge, Some(message))
        } else {
            (Action::None, None)
        };

        Decision {
            intent,
            confidence,
            reasoning,
            action,
            message,
        }
    }

    fn synthesize_message(&self, goal: Option<&str>) -> String {
        let goal = goal
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .unwrap_or(FALLBACK_GOAL);
        let index = (self.nudge_counter % NUDGE_TEMPLATES.len() as u64) as usize;
        NUDGE_TEMPLATES[index].replace("{goal}", goal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn context(hour: u32, fatigue_count: u32) -> EscalationContext {
        EscalationContext {
            temporal: TemporalContext::at(Utc::now(), hour),
            fatigue_count,
            primary_goal: Some("coding".into()),
        }
    }

    fn decision(intent: Intent, confidence: f64, action: Action, message: Option<&str>) -> Decision {
        Decision {
            intent,
            confidence,
            reasoning: "oracle says so".into(),
            action,
            message: message.map(String::from),
        }
    }

    fn sample_decisions() -> Vec<Decision> {
        let mut all = Vec::new();
        for intent in [
            Intent::Productive,
            Intent::Neutral,
            Intent::Unproductive,
            Intent::Unknown,
        ] {
            for confidence in [0.0, 0.3, 0.59, 0.6, 0.75, 1.0] {
                for action in [Action::None, Action::Nudge] {
                    for message in [None, Some("hey")] {
                        all.push(decision(intent, confidence, action, message));
                    }
                }
            }
        }
        all
    }

    #[test]
    fn confident_nudge_passes_with_its_message() {
        let mut processor = DecisionPostProcessor::default();
        let out = processor.process(
            decision(Intent::Unproductive, 0.75, Action::Nudge, Some("Back to work?")),
            &context(10, 0),
        );
        assert_eq!(out.action, Action::Nudge);
        assert_eq!(out.message.as_deref(), Some("Back to work?"));
        assert_eq!(out.reasoning, "oracle says so");
    }

    #[test]
    fn low_confidence_suppresses_and_explains() {
        let mut processor = DecisionPostProcessor::default();
        let out = processor.process(
            decision(Intent::Unproductive, 0.59, Action::Nudge, Some("hey")),
            &context(10, 0),
        );
        assert_eq!(out.action, Action::None);
        assert!(out.message.is_none());
        assert!(out.reasoning.starts_with("oracle says so"));
        assert!(out.reasoning.contains("low confidence"));
    }

    #[test]
    fn fatigue_suppresses_after_two_failed_escalations() {
        let mut processor = DecisionPostProcessor::default();
        let out = processor.process(
            decision(Intent::Unproductive, 0.9, Action::Nudge, None),
            &context(10, 2),
        );
        assert_eq!(out.action, Action::None);
        assert!(out.reasoning.contains("fatigue"));

        let out = processor.process(
            decision(Intent::Unproductive, 0.9, Action::Nudge, None),
            &context(10, 1),
        );
        assert_eq!(out.action, Action::Nudge);
    }

    #[test]
    fn late_hours_spare_unproductive_intent_only() {
        let mut processor = DecisionPostProcessor::default();
        for hour in [22, 23, 0, 5] {
            let out = processor.process(
                decision(Intent::Unproductive, 0.9, Action::Nudge, None),
                &context(hour, 0),
            );
            assert_eq!(out.action, Action::None, "hour {hour}");
        }

        let out = processor.process(
            decision(Intent::Neutral, 0.9, Action::Nudge, None),
            &context(23, 0),
        );
        assert_eq!(out.action, Action::Nudge);

        let out = processor.process(
            decision(Intent::Unproductive, 0.9, Action::Nudge, None),
            &context(6, 0),
        );
        assert_eq!(out.action, Action::Nudge);
    }

    #[test]
    fn synthesized_messages_rotate_and_use_goal() {
        let mut processor = DecisionPostProcessor::default();
        let messages: Vec<String> = (0..NUDGE_TEMPLATES.len() + 1)
            .map(|_| {
                processor
                    .process(
                        decision(Intent::Unproductive, 0.8, Action::Nudge, None),
                        &context(10, 0),
                    )
                    .message
                    .unwrap()
            })
            .collect();

        assert!(messages.iter().all(|m| m.contains("coding")));
        assert_ne!(messages[0], messages[1]);
        assert_eq!(messages[0], messages[NUDGE_TEMPLATES.len()]);
        assert_eq!(processor.nudge_counter(), NUDGE_TEMPLATES.len() as u64 + 1);
    }

    #[test]
    fn missing_goal_uses_generic_wording() {
        let mut processor = DecisionPostProcessor::default();
        let mut ctx = context(10, 0);
        ctx.primary_goal = None;
        let out = processor.process(
            decision(Intent::Unproductive, 0.8, Action::Nudge, None),
            &ctx,
        );
        assert!(out.message.unwrap().contains(FALLBACK_GOAL));
    }

    #[test]
    fn none_stays_none_and_never_loosens() {
        for hour in [3, 10, 23] {
            for fatigue in [0, 1, 2, 5] {
                for raw in sample_decisions() {
                    let mut processor = DecisionPostProcessor::default();
                    let was_none = raw.action == Action::None;
                    let original_reasoning = raw.reasoning.clone();
                    let out = processor.process(raw, &context(hour, fatigue));

                    if was_none {
                        assert_eq!(out.action, Action::None);
                    }
                    assert!(out.has_consistent_message());
                    assert!(out.reasoning.starts_with(&original_reasoning));
                }
            }
        }
    }

    #[test]
    fn processing_twice_is_stable() {
        let mut processor = DecisionPostProcessor::default();
        for raw in sample_decisions() {
            let once = processor.process(raw, &context(23, 0));
            let twice = processor.process(once.clone(), &context(23, 0));
            assert_eq!(once.action, twice.action);
            assert!(twice.has_consistent_message());
        }
    }
}
