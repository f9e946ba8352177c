use crate::settings::ThresholdSettings;

/// Tunable thresholds for the local classifier.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Summary share of productive time above which no escalation happens.
    pub productive_ratio: f64,

    /// Summary share of distracting time above which the period is unproductive.
    pub unproductive_ratio: f64,

    /// Time on a distracting app below this still reads as a short break.
    pub short_break_secs: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            productive_ratio: 0.7,
            unproductive_ratio: 0.5,
            short_break_secs: 300.0,
        }
    }
}

impl From<&ThresholdSettings> for ClassifierConfig {
    fn from(thresholds: &ThresholdSettings) -> Self {
        Self {
            productive_ratio: thresholds.productive_ratio,
            unproductive_ratio: thresholds.unproductive_ratio,
            short_break_secs: thresholds.short_break_secs,
        }
    }
}
