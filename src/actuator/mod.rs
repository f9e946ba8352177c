pub mod surface;

use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Duration, Utc};

pub use surface::{ConsoleSurface, NudgeSurface};

use crate::settings::RateLimitSettings;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_debug;

#[derive(Debug, Clone)]
pub struct ActuatorConfig {
    pub min_interval: Duration,
    pub max_per_window: usize,
    pub window: Duration,
    pub dismissal_threshold: u32,
}

impl Default for ActuatorConfig {
    fn default() -> Self {
        Self::from(&RateLimitSettings::default())
    }
}

impl From<&RateLimitSettings> for ActuatorConfig {
    fn from(settings: &RateLimitSettings) -> Self {
        Self {
            min_interval: Duration::seconds(settings.min_interval_secs),
            max_per_window: settings.max_per_window,
            window: Duration::seconds(settings.window_secs),
            dismissal_threshold: settings.dismissal_threshold,
        }
    }
}

/// Why the actuator refused to interrupt the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    HourlyCap,
    TooSoon,
    Dismissed,
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Denial::HourlyCap => write!(f, "hourly nudge limit reached"),
            Denial::TooSoon => write!(f, "too soon after the previous nudge"),
            Denial::Dismissed => write!(f, "recent nudges were dismissed"),
        }
    }
}

/// Rate limiter guarding actual nudge delivery.
#[derive(Debug, Clone, Default)]
pub struct NudgeActuator {
    config: ActuatorConfig,
    history: VecDeque<DateTime<Utc>>,
    dismissal_count: u32,
}

impl NudgeActuator {
    pub fn new(config: ActuatorConfig) -> Self {
        Self {
            config,
            history: VecDeque::new(),
            dismissal_count: 0,
        }
    }

    pub fn can_nudge(&mut self) -> bool {
        self.can_nudge_at(Utc::now())
    }

    pub fn can_nudge_at(&mut self, now: DateTime<Utc>) -> bool {
        match self.check_at(now) {
            Ok(()) => true,
            Err(denial) => {
                log_debug!("nudge blocked: {denial}");
                false
            }
        }
    }

    /// Purge expired history, then test every limit. The first failing rule wins.
    pub fn check_at(&mut self, now: DateTime<Utc>) -> Result<(), Denial> {
        self.purge(now);

        if self.history.len() >= self.config.max_per_window {
            return Err(Denial::HourlyCap);
        }

        if let Some(last) = self.history.back() {
            if now - *last < self.config.min_interval {
                return Err(Denial::TooSoon);
            }
        }

        if self.dismissal_count >= self.config.dismissal_threshold {
            return Err(Denial::Dismissed);
        }

        Ok(())
    }

    pub fn record_nudge(&mut self) {
        self.record_nudge_at(Utc::now());
    }

    pub fn record_nudge_at(&mut self, at: DateTime<Utc>) {
        self.history.push_back(at);
    }

    pub fn record_dismissal(&mut self) {
        self.dismissal_count = self.dismissal_count.saturating_add(1);
    }

    pub fn reset_dismissals(&mut self) {
        self.dismissal_count = 0;
    }

    pub fn dismissal_count(&self) -> u32 {
        self.dismissal_count
    }

    /// Nudges recorded inside the rolling window ending at `now`.
    pub fn nudges_in_window(&mut self, now: DateTime<Utc>) -> usize {
        self.purge(now);
        self.history.len()
    }

    fn purge(&mut self, now: DateTime<Utc>) {
        while let Some(oldest) = self.history.front() {
            if now - *oldest >= self.config.window {
                self.history.pop_front();
            } else {
                break;
            }
        }
    }
}
