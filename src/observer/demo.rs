use chrono::Utc;
use rand::Rng;
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::models::ActivitySummary;

use super::aggregator::{ActivityAggregator, WindowSample};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

const DEMO_WINDOWS: &[(&str, &str)] = &[
    ("Visual Studio Code", "main.rs - nudgeflow"),
    ("Google Chrome", "Stack Overflow - tokio select"),
    ("Slack", "team-engineering"),
    ("Visual Studio Code", "cycle.rs - nudgeflow"),
    ("Spotify", "Focus Flow Playlist"),
    ("YouTube", "Cat Videos"),
    ("Visual Studio Code", "README.md - nudgeflow"),
    ("Microsoft Teams", "Standup Meeting"),
];

/// Chance per sample that the simulated user moves to the next window.
const SWITCH_PROBABILITY: f64 = 0.2;

/// Scripted stand-in for OS window capture.
#[derive(Debug, Clone, Default)]
pub struct DemoWindowSource {
    index: usize,
}

impl DemoWindowSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> (&'static str, &'static str) {
        DEMO_WINDOWS[self.index % DEMO_WINDOWS.len()]
    }

    pub fn advance(&mut self) {
        self.index = (self.index + 1) % DEMO_WINDOWS.len();
    }

    /// Return the foreground window, occasionally rotating first.
    pub fn sample(&mut self) -> (&'static str, &'static str) {
        if rand::thread_rng().gen_bool(SWITCH_PROBABILITY) {
            self.advance();
        }
        self.current()
    }
}

/// Sample the demo windows every `sample_every` and emit a summary every `period`.
pub async fn demo_activity_loop(
    period: Duration,
    sample_every: Duration,
    summaries: mpsc::Sender<ActivitySummary>,
    cancel_token: CancellationToken,
) {
    let mut source = DemoWindowSource::new();
    let mut aggregator = ActivityAggregator::new(Utc::now());
    let mut period_started = Instant::now();

    let mut ticker = tokio::time::interval(sample_every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let (app, title) = source.sample();
                if aggregator.record(WindowSample::new(app, title, Utc::now())) {
                    log_info!("switched to {app}");
                }

                if period_started.elapsed() >= period {
                    let summary = aggregator.finish(Utc::now());
                    period_started = Instant::now();
                    log_info!(
                        "period closed: {} apps, {} switches",
                        summary.app_breakdown.len(),
                        summary.switch_count
                    );
                    // The pipeline may still be busy; the channel buffers for it.
                    if summaries.send(summary).await.is_err() {
                        log_warn!("agent stopped listening, ending demo activity");
                        break;
                    }
                }
            }
            _ = cancel_token.cancelled() => {
                log_info!("demo activity source shutting down");
                break;
            }
        }
    }
}
