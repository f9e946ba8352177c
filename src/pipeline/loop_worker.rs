use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::models::ActivitySummary;

use super::cycle::DecisionPipeline;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

/// What the user did with the last nudge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NudgeFeedback {
    Dismissed,
    Acknowledged,
}

/// Drive the pipeline until cancelled or the summary stream closes.
///
/// A cycle that has started always runs to completion; cancellation is only
/// observed between cycles. The pipeline is handed back for the session summary.
pub async fn agent_loop(
    mut pipeline: DecisionPipeline,
    mut summaries: mpsc::Receiver<ActivitySummary>,
    mut feedback: mpsc::Receiver<NudgeFeedback>,
    cancel_token: CancellationToken,
) -> DecisionPipeline {
    loop {
        tokio::select! {
            biased;

            _ = cancel_token.cancelled() => {
                log_info!("agent loop shutting down");
                break;
            }
            Some(event) = feedback.recv() => {
                match event {
                    NudgeFeedback::Dismissed => pipeline.record_dismissal().await,
                    NudgeFeedback::Acknowledged => pipeline.record_acknowledgement().await,
                }
            }
            received = summaries.recv() => {
                match received {
                    Some(summary) => {
                        if let Err(err) = pipeline.run_cycle(summary).await {
                            log_debug!("cycle skipped: {err}");
                        }
                    }
                    None => {
                        log_warn!("activity source closed, stopping agent loop");
                        break;
                    }
                }
            }
        }
    }

    pipeline.stop().await;
    pipeline
}
