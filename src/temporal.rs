use chrono::{DateTime, Local, Timelike, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TimePeriod {
    Morning,
    Lunch,
    Afternoon,
    Evening,
    LateNight,
}

impl TimePeriod {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=11 => TimePeriod::Morning,
            12..=13 => TimePeriod::Lunch,
            14..=17 => TimePeriod::Afternoon,
            18..=21 => TimePeriod::Evening,
            _ => TimePeriod::LateNight,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimePeriod::Morning => "morning",
            TimePeriod::Lunch => "lunch",
            TimePeriod::Afternoon => "afternoon",
            TimePeriod::Evening => "evening",
            TimePeriod::LateNight => "late_night",
        }
    }
}

/// One reading of "now", taken at the start of a cycle and shared by every stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemporalContext {
    pub now: DateTime<Utc>,
    /// Hour of day on the user's local clock, 0..24.
    pub local_hour: u32,
    pub period: TimePeriod,
}

impl TemporalContext {
    pub fn from_local(now: DateTime<Local>) -> Self {
        let local_hour = now.hour();
        Self {
            now: now.with_timezone(&Utc),
            local_hour,
            period: TimePeriod::from_hour(local_hour),
        }
    }

    /// Build a context for an explicit instant and local hour.
    pub fn at(now: DateTime<Utc>, local_hour: u32) -> Self {
        let local_hour = local_hour % 24;
        Self {
            now,
            local_hour,
            period: TimePeriod::from_hour(local_hour),
        }
    }

    /// True when the local hour falls in `[start, 24) ∪ [0, end)`.
    pub fn is_within_late_hours(&self, start: u32, end: u32) -> bool {
        if start <= end {
            self.local_hour >= start && self.local_hour < end
        } else {
            self.local_hour >= start || self.local_hour < end
        }
    }
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;

    fn temporal_context(&self) -> TemporalContext {
        TemporalContext::from_local(self.now())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}
