//! Zero-latency, rule-based classification of apps and activity summaries.

pub mod config;
pub mod rules;
pub mod scoring;

use std::collections::{HashMap, HashSet};

pub use config::ClassifierConfig;
pub use rules::AppCategory;

use crate::models::{Classification, Intent};

use rules::{is_browser_or_neutral, is_builtin_productive, is_builtin_unproductive, is_code_editor};
use scoring::{count_keywords_in, score_title};

#[derive(Debug, Clone, Default)]
pub struct LocalClassifier {
    config: ClassifierConfig,
    custom_productive: HashSet<String>,
    custom_unproductive: HashSet<String>,
}

impl LocalClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            config,
            custom_productive: HashSet::new(),
            custom_unproductive: HashSet::new(),
        }
    }

    pub fn with_overrides<P, U>(config: ClassifierConfig, productive: P, unproductive: U) -> Self
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
        U: IntoIterator,
        U::Item: AsRef<str>,
    {
        let mut classifier = Self::new(config);
        for app in productive {
            classifier.add_productive_app(app.as_ref());
        }
        for app in unproductive {
            classifier.add_unproductive_app(app.as_ref());
        }
        classifier
    }

    pub fn add_productive_app(&mut self, app_name: &str) {
        self.custom_productive.insert(app_name.trim().to_lowercase());
    }

    pub fn add_unproductive_app(&mut self, app_name: &str) {
        self.custom_unproductive.insert(app_name.trim().to_lowercase());
    }

    /// Place an app in a category. User overrides win over the built-in tables.
    pub fn categorize(&self, app_name: &str) -> AppCategory {
        let app_lower = app_name.trim().to_lowercase();

        if self.custom_productive.contains(&app_lower) {
            AppCategory::CustomProductive
        } else if self.custom_unproductive.contains(&app_lower) {
            AppCategory::CustomUnproductive
        } else if is_builtin_productive(&app_lower) {
            AppCategory::Productive
        } else if is_builtin_unproductive(&app_lower) {
            AppCategory::Unproductive
        } else if is_browser_or_neutral(&app_lower) {
            AppCategory::Browser
        } else {
            AppCategory::Unknown
        }
    }

    /// Classify a single app/window observation.
    pub fn classify(
        &self,
        app_name: &str,
        window_title: &str,
        duration_seconds: f64,
    ) -> Classification {
        match self.categorize(app_name) {
            AppCategory::CustomProductive => Classification::new(
                Intent::Productive,
                0.95,
                format!("'{app_name}' is on your productive list"),
                false,
            ),
            AppCategory::CustomUnproductive => Classification::new(
                Intent::Unproductive,
                0.95,
                format!("'{app_name}' is on your distraction list"),
                false,
            ),
            AppCategory::Productive => {
                if is_code_editor(&app_name.to_lowercase()) {
                    Classification::new(
                        Intent::Productive,
                        0.92,
                        format!("'{app_name}' is a development tool"),
                        false,
                    )
                } else {
                    Classification::new(
                        Intent::Productive,
                        0.85,
                        format!("'{app_name}' is normally used for work"),
                        false,
                    )
                }
            }
            AppCategory::Unproductive => {
                if duration_seconds < self.config.short_break_secs {
                    Classification::new(
                        Intent::Neutral,
                        0.70,
                        format!("short stop on '{app_name}' looks like a normal break"),
                        true,
                    )
                } else {
                    Classification::new(
                        Intent::Unproductive,
                        0.80,
                        format!(
                            "{:.1} min on '{app_name}'",
                            duration_seconds / 60.0
                        ),
                        true,
                    )
                }
            }
            AppCategory::Browser => score_title(app_name, window_title),
            AppCategory::Unknown => Classification::new(
                Intent::Unknown,
                0.0,
                format!("'{app_name}' is not a known app"),
                true,
            ),
        }
    }

    /// Classify a whole period from the share of time spent in each category.
    ///
    /// Browsers and unknown apps count toward neither ratio.
    pub fn classify_summary(
        &self,
        app_breakdown: &HashMap<String, f64>,
        top_windows: &[String],
    ) -> Classification {
        if app_breakdown.is_empty() {
            return Classification::new(Intent::Unknown, 0.0, "no activity to classify", true);
        }

        let mut total = 0.0;
        let mut productive = 0.0;
        let mut unproductive = 0.0;

        for (app_name, seconds) in app_breakdown {
            total += seconds;
            let category = self.categorize(app_name);
            if category.counts_as_productive() {
                productive += seconds;
            } else if category.counts_as_unproductive() {
                unproductive += seconds;
            }
        }

        let (productive_ratio, unproductive_ratio) = if total > 0.0 {
            (productive / total, unproductive / total)
        } else {
            (0.0, 0.0)
        };

        if productive_ratio > self.config.productive_ratio {
            return Classification::new(
                Intent::Productive,
                productive_ratio.min(0.90),
                format!("{:.0}% of time in productive apps", productive_ratio * 100.0),
                false,
            );
        }

        if unproductive_ratio > self.config.unproductive_ratio {
            return Classification::new(
                Intent::Unproductive,
                unproductive_ratio.min(0.85),
                format!(
                    "{:.0}% of time in distracting apps",
                    unproductive_ratio * 100.0
                ),
                true,
            );
        }

        let mut reasoning = format!(
            "mixed activity: {:.0}% productive, {:.0}% distracting",
            productive_ratio * 100.0,
            unproductive_ratio * 100.0
        );
        match count_keywords_in(top_windows).lean() {
            Some(Intent::Productive) => reasoning.push_str("; window titles lean toward work"),
            Some(_) => reasoning.push_str("; window titles lean toward distraction"),
            None => {}
        }

        Classification::new(Intent::Neutral, 0.60, reasoning, true)
    }
}
