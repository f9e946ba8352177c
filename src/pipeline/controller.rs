use anyhow::{bail, Context, Result};
use log::info;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::models::ActivitySummary;

use super::cycle::DecisionPipeline;
use super::loop_worker::{agent_loop, NudgeFeedback};
use super::transparency::PipelineInspector;

const FEEDBACK_BUFFER: usize = 16;

/// Owns the background agent task and the handles used to talk to it.
pub struct AgentController {
    handle: Option<JoinHandle<DecisionPipeline>>,
    cancel_token: Option<CancellationToken>,
    feedback_tx: Option<mpsc::Sender<NudgeFeedback>>,
}

impl AgentController {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
            feedback_tx: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn start(
        &mut self,
        pipeline: DecisionPipeline,
        summaries: mpsc::Receiver<ActivitySummary>,
        cancel_token: CancellationToken,
    ) -> Result<PipelineInspector> {
        if self.handle.is_some() {
            bail!("agent already running");
        }

        let inspector = pipeline.inspector();
        let (feedback_tx, feedback_rx) = mpsc::channel(FEEDBACK_BUFFER);
        let handle = tokio::spawn(agent_loop(
            pipeline,
            summaries,
            feedback_rx,
            cancel_token.clone(),
        ));

        info!("agent loop started");
        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        self.feedback_tx = Some(feedback_tx);
        Ok(inspector)
    }

    pub async fn send_feedback(&self, feedback: NudgeFeedback) -> Result<()> {
        let Some(tx) = &self.feedback_tx else {
            bail!("agent is not running");
        };
        tx.send(feedback)
            .await
            .context("agent loop stopped accepting feedback")
    }

    /// Cancel the loop, let any running cycle finish, and return the pipeline.
    pub async fn stop(&mut self) -> Result<Option<DecisionPipeline>> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
        self.feedback_tx = None;

        match self.handle.take() {
            Some(handle) => handle
                .await
                .context("agent loop task failed to join")
                .map(Some),
            None => Ok(None),
        }
    }
}

impl Default for AgentController {
    fn default() -> Self {
        Self::new()
    }
}
