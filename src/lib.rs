pub mod actuator;
pub mod classifier;
pub mod models;
pub mod observer;
pub mod oracle;
pub mod pipeline;
pub mod postprocess;
pub mod settings;
pub mod temporal;
mod utils;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use log::{info, warn};
use tokio::sync::mpsc;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use actuator::ConsoleSurface;
use oracle::{DemoOracleTransport, HttpOracleTransport, OracleTransport};
use pipeline::{AgentController, DecisionPipeline, PipelineParts};
use settings::{AgentSettings, SettingsStore};

const DEFAULT_SETTINGS_FILE: &str = "nudgeflow.json";
const SUMMARY_BUFFER: usize = 8;
const SAMPLE_INTERVAL_SECS: u64 = 5;
/// Demo mode shortens the aggregation period so decisions show up quickly.
const DEMO_PERIOD_SECS: u64 = 30;

fn settings_path() -> PathBuf {
    std::env::var("NUDGEFLOW_SETTINGS")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_SETTINGS_FILE))
}

fn build_transport(settings: &AgentSettings) -> Result<Arc<dyn OracleTransport>> {
    if settings.demo_mode {
        return Ok(Arc::new(DemoOracleTransport));
    }
    Ok(Arc::new(HttpOracleTransport::new(&settings.oracle)?))
}

/// Run the agent until Ctrl-C, then log a session summary.
pub async fn run() -> Result<()> {
    // RUST_LOG wins; info otherwise
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("nudgeflow starting up...");

    let store = SettingsStore::new(settings_path())?;
    let settings = store.settings();
    info!(
        "goals: {:?}, oracle: {}, demo mode: {}",
        settings.goals, settings.oracle.url, settings.demo_mode
    );

    let transport = build_transport(&settings)?;
    let parts = PipelineParts::from_settings(&settings, transport, Arc::new(ConsoleSurface));
    if !parts.oracle.health_check().await {
        warn!(
            "oracle at {} is not reachable yet; escalations will fall back until it is",
            settings.oracle.url
        );
    }

    let pipeline = DecisionPipeline::new(parts);

    let cancel_token = CancellationToken::new();
    let (summary_tx, summary_rx) = mpsc::channel(SUMMARY_BUFFER);

    let period_secs = if settings.demo_mode {
        DEMO_PERIOD_SECS
    } else {
        settings.period_secs.max(1)
    };
    let observer = tokio::spawn(observer::demo_activity_loop(
        Duration::from_secs(period_secs),
        Duration::from_secs(SAMPLE_INTERVAL_SECS.min(period_secs)),
        summary_tx,
        cancel_token.clone(),
    ));

    let mut controller = AgentController::new();
    controller.start(pipeline, summary_rx, cancel_token.clone())?;
    info!("observing activity in {period_secs}s periods; press Ctrl-C to stop");

    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for Ctrl-C: {err}");
    }
    info!("shutdown requested");
    cancel_token.cancel();

    let pipeline = controller.stop().await?;
    if let Err(err) = observer.await {
        warn!("activity source task failed to join: {err}");
    }

    if let Some(pipeline) = pipeline {
        let state = pipeline.state();
        info!(
            "session summary: {} cycles, {} nudges delivered, {} suppressed, productive streak {}",
            state.loop_count, state.nudges_delivered, state.nudges_suppressed, state.productive_streak
        );
    }

    Ok(())
}
