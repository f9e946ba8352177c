use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of window titles an observer may attach to one summary.
pub const MAX_TOP_WINDOWS: usize = 5;

/// Aggregated activity for one observation period, as produced by the observer.
///
/// Field names follow the observer's wire format; `total_duration_seconds` and
/// `activity_switches` are accepted as aliases.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivitySummary {
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    #[serde(alias = "total_duration_seconds")]
    pub total_duration: f64,
    pub app_breakdown: HashMap<String, f64>,
    #[serde(default)]
    pub top_windows: Vec<String>,
    #[serde(default, alias = "activity_switches")]
    pub switch_count: u32,
}

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("activity summary is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("period ends ({end}) before it starts ({start})")]
    InvertedPeriod {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    #[error("total duration must be a finite non-negative number, got {0}")]
    InvalidTotalDuration(f64),
    #[error("duration for app '{app}' must be a finite non-negative number, got {seconds}")]
    InvalidAppDuration { app: String, seconds: f64 },
    #[error("app breakdown contains an empty app name")]
    EmptyAppName,
    #[error("summary carries {0} top windows, at most 5 are allowed")]
    TooManyWindows(usize),
}

impl ActivitySummary {
    /// Parse the observer's JSON form and validate it in one step.
    pub fn from_json(raw: &str) -> Result<Self, SummaryError> {
        let summary: ActivitySummary = serde_json::from_str(raw)?;
        summary.validate()?;
        Ok(summary)
    }

    pub fn validate(&self) -> Result<(), SummaryError> {
        if self.period_end < self.period_start {
            return Err(SummaryError::InvertedPeriod {
                start: self.period_start,
                end: self.period_end,
            });
        }

        if !self.total_duration.is_finite() || self.total_duration < 0.0 {
            return Err(SummaryError::InvalidTotalDuration(self.total_duration));
        }

        for (app, seconds) in &self.app_breakdown {
            if app.trim().is_empty() {
                return Err(SummaryError::EmptyAppName);
            }
            if !seconds.is_finite() || *seconds < 0.0 {
                return Err(SummaryError::InvalidAppDuration {
                    app: app.clone(),
                    seconds: *seconds,
                });
            }
        }

        if self.top_windows.len() > MAX_TOP_WINDOWS {
            return Err(SummaryError::TooManyWindows(self.top_windows.len()));
        }

        Ok(())
    }

    /// Seconds attributed to apps; approximately `total_duration`.
    pub fn tracked_seconds(&self) -> f64 {
        self.app_breakdown.values().sum()
    }

    /// The app with the most time in this period.
    pub fn top_app(&self) -> Option<&str> {
        self.app_breakdown
            .iter()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(app, _)| app.as_str())
    }

    /// App names ordered by time spent, longest first.
    pub fn apps_by_duration(&self) -> Vec<String> {
        let mut apps: Vec<(&String, &f64)> = self.app_breakdown.iter().collect();
        apps.sort_by(|a, b| b.1.total_cmp(a.1).then_with(|| a.0.cmp(b.0)));
        apps.into_iter().map(|(app, _)| app.clone()).collect()
    }
}
