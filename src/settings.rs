use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OracleSettings {
    pub url: String,
    pub timeout_secs: u64,
    pub max_attempts: u32,
    /// First retry delay; doubles on every further attempt.
    pub backoff_base_ms: u64,
    /// Upper bound of the random delay added to each backoff.
    pub backoff_jitter_ms: u64,
}

impl Default for OracleSettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080".into(),
            timeout_secs: 30,
            max_attempts: 3,
            backoff_base_ms: 1_000,
            backoff_jitter_ms: 1_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RateLimitSettings {
    pub min_interval_secs: i64,
    pub max_per_window: usize,
    pub window_secs: i64,
    pub dismissal_threshold: u32,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            min_interval_secs: 600,
            max_per_window: 3,
            window_secs: 3_600,
            dismissal_threshold: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ThresholdSettings {
    /// Decisions below this confidence never nudge.
    pub min_nudge_confidence: f64,
    /// Consecutive delivered nudges that trigger fatigue suppression.
    pub fatigue_nudges: u32,
    pub productive_ratio: f64,
    pub unproductive_ratio: f64,
    /// Seconds on a distracting app before it stops counting as a short break.
    pub short_break_secs: f64,
    pub late_start_hour: u32,
    pub late_end_hour: u32,
    /// Productive cycles in a row needed to clear the dismissal back-off.
    pub productive_streak_reset: u32,
}

impl Default for ThresholdSettings {
    fn default() -> Self {
        Self {
            min_nudge_confidence: 0.6,
            fatigue_nudges: 2,
            productive_ratio: 0.7,
            unproductive_ratio: 0.5,
            short_break_secs: 300.0,
            late_start_hour: 22,
            late_end_hour: 6,
            productive_streak_reset: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AgentSettings {
    pub goals: Vec<String>,
    pub custom_productive_apps: Vec<String>,
    pub custom_unproductive_apps: Vec<String>,
    pub oracle: OracleSettings,
    pub rate_limit: RateLimitSettings,
    pub thresholds: ThresholdSettings,
    pub period_secs: u64,
    pub transparency_capacity: usize,
    pub demo_mode: bool,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            goals: vec!["coding".into(), "learning".into(), "writing".into()],
            custom_productive_apps: Vec::new(),
            custom_unproductive_apps: Vec::new(),
            oracle: OracleSettings::default(),
            rate_limit: RateLimitSettings::default(),
            thresholds: ThresholdSettings::default(),
            period_secs: 300,
            transparency_capacity: 50,
            demo_mode: false,
        }
    }
}

impl AgentSettings {
    pub fn primary_goal(&self) -> Option<&str> {
        self.goals.first().map(String::as_str)
    }

    /// Apply `NUDGEFLOW_*` environment overrides on top of file values.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(goals) = lookup("NUDGEFLOW_GOALS") {
            let parsed = parse_goals(&goals);
            if !parsed.is_empty() {
                self.goals = parsed;
            }
        }
        if let Some(url) = lookup("NUDGEFLOW_ORACLE_URL") {
            if !url.trim().is_empty() {
                self.oracle.url = url.trim().trim_end_matches('/').to_string();
            }
        }
        if let Some(demo) = lookup("NUDGEFLOW_DEMO") {
            self.demo_mode = demo == "1" || demo.eq_ignore_ascii_case("true");
        }
    }
}

fn parse_goals(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|goal| !goal.is_empty())
        .map(String::from)
        .collect()
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<AgentSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let mut data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse settings in {}", path.display()))?
        } else {
            AgentSettings::default()
        };
        data.apply_env_overrides();

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn settings(&self) -> AgentSettings {
        match self.data.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", self.path.display()))?;
        let mut data: AgentSettings = serde_json::from_str(&contents)?;
        data.apply_env_overrides();
        let mut guard = match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = data;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn partial_file_keeps_defaults() {
        let raw = r#"{ "goals": ["thesis"], "rate_limit": { "max_per_window": 5 } }"#;
        let settings: AgentSettings = serde_json::from_str(raw).unwrap();
        assert_eq!(settings.goals, vec!["thesis"]);
        assert_eq!(settings.rate_limit.max_per_window, 5);
        assert_eq!(settings.rate_limit.min_interval_secs, 600);
        assert_eq!(settings.thresholds.min_nudge_confidence, 0.6);
        assert_eq!(settings.oracle.max_attempts, 3);
    }

    #[test]
    fn env_overrides_replace_goals_and_url() {
        let env: HashMap<&str, &str> = [
            ("NUDGEFLOW_GOALS", " reading, , exercise "),
            ("NUDGEFLOW_ORACLE_URL", "https://oracle.example/"),
            ("NUDGEFLOW_DEMO", "TRUE"),
        ]
        .into_iter()
        .collect();

        let mut settings = AgentSettings::default();
        settings.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(settings.goals, vec!["reading", "exercise"]);
        assert_eq!(settings.oracle.url, "https://oracle.example");
        assert!(settings.demo_mode);
        assert_eq!(settings.primary_goal(), Some("reading"));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = std::env::temp_dir().join(format!(
            "nudgeflow-missing-{}.json",
            uuid::Uuid::new_v4()
        ));
        let store = SettingsStore::new(path).unwrap();
        assert_eq!(store.settings().period_secs, 300);
    }

    #[test]
    fn reads_and_reloads_file() {
        let path = std::env::temp_dir().join(format!("nudgeflow-{}.json", uuid::Uuid::new_v4()));
        fs::write(&path, r#"{ "period_secs": 60 }"#).unwrap();
        let store = SettingsStore::new(path.clone()).unwrap();
        assert_eq!(store.settings().period_secs, 60);

        fs::write(&path, r#"{ "period_secs": 120 }"#).unwrap();
        store.reload().unwrap();
        assert_eq!(store.settings().period_secs, 120);
        let _ = fs::remove_file(path);
    }
}
