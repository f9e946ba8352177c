use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::models::{ActivitySummary, MAX_TOP_WINDOWS};

const MAX_TITLE_CHARS: usize = 100;

/// One foreground-window observation.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSample {
    pub app_name: String,
    pub window_title: String,
    pub timestamp: DateTime<Utc>,
}

impl WindowSample {
    pub fn new(app_name: &str, window_title: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            app_name: app_name.to_string(),
            window_title: sanitize_title(window_title),
            timestamp,
        }
    }
}

/// Folds window samples into one [`ActivitySummary`] per period.
///
/// Each sample's app is credited with the time until the next sample; the
/// open interval is closed when the period is finished.
#[derive(Debug, Clone)]
pub struct ActivityAggregator {
    period_start: DateTime<Utc>,
    current: Option<WindowSample>,
    app_durations: HashMap<String, f64>,
    window_titles: Vec<String>,
    switch_count: u32,
}

impl ActivityAggregator {
    pub fn new(period_start: DateTime<Utc>) -> Self {
        Self {
            period_start,
            current: None,
            app_durations: HashMap::new(),
            window_titles: Vec::new(),
            switch_count: 0,
        }
    }

    pub fn period_start(&self) -> DateTime<Utc> {
        self.period_start
    }

    /// Record a sample. Returns true when the foreground app changed.
    pub fn record(&mut self, sample: WindowSample) -> bool {
        let mut switched = false;

        if let Some(previous) = self.current.take() {
            self.credit(&previous, sample.timestamp);
            if previous.app_name != sample.app_name {
                switched = true;
                self.switch_count += 1;
                self.remember_title(&previous.window_title);
            }
        }

        self.current = Some(sample);
        switched
    }

    /// Close the period at `period_end` and start the next one there.
    pub fn finish(&mut self, period_end: DateTime<Utc>) -> ActivitySummary {
        if let Some(current) = self.current.take() {
            self.credit(&current, period_end);
            self.remember_title(&current.window_title);
            // The foreground window carries over into the next period.
            self.current = Some(WindowSample {
                timestamp: period_end,
                ..current
            });
        }

        let total = (period_end - self.period_start).num_milliseconds().max(0) as f64 / 1000.0;
        let summary = ActivitySummary {
            period_start: self.period_start,
            period_end,
            total_duration: total,
            app_breakdown: std::mem::take(&mut self.app_durations),
            top_windows: std::mem::take(&mut self.window_titles),
            switch_count: self.switch_count,
        };

        self.period_start = period_end;
        self.switch_count = 0;
        summary
    }

    fn credit(&mut self, sample: &WindowSample, until: DateTime<Utc>) {
        let seconds = (until - sample.timestamp).num_milliseconds().max(0) as f64 / 1000.0;
        *self.app_durations.entry(sample.app_name.clone()).or_insert(0.0) += seconds;
    }

    fn remember_title(&mut self, title: &str) {
        if title.is_empty() || self.window_titles.len() >= MAX_TOP_WINDOWS {
            return;
        }
        if !self.window_titles.iter().any(|t| t == title) {
            self.window_titles.push(title.to_string());
        }
    }
}

/// Mask email addresses, drop Windows directory prefixes, and cap the length.
pub fn sanitize_title(title: &str) -> String {
    let masked: Vec<String> = title
        .split(' ')
        .map(|word| {
            if looks_like_email(word) {
                "[email]".to_string()
            } else {
                strip_directories(word).to_string()
            }
        })
        .collect();

    masked.join(" ").trim().chars().take(MAX_TITLE_CHARS).collect()
}

fn looks_like_email(word: &str) -> bool {
    match word.split_once('@') {
        Some((user, domain)) => !user.is_empty() && domain.contains('.'),
        None => false,
    }
}

fn strip_directories(word: &str) -> &str {
    let bytes = word.as_bytes();
    let is_drive_path =
        bytes.len() > 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'\\';
    if !is_drive_path {
        return word;
    }
    match word.rfind('\\') {
        Some(index) => &word[index + 1..],
        None => word,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn credits_time_until_next_sample() {
        let start = Utc::now();
        let mut aggregator = ActivityAggregator::new(start);

        assert!(!aggregator.record(WindowSample::new("VSCode", "main.rs", start)));
        assert!(aggregator.record(WindowSample::new(
            "YouTube",
            "Cat videos",
            start + Duration::seconds(120)
        )));
        let summary = aggregator.finish(start + Duration::seconds(300));

        assert_eq!(summary.app_breakdown["VSCode"], 120.0);
        assert_eq!(summary.app_breakdown["YouTube"], 180.0);
        assert_eq!(summary.total_duration, 300.0);
        assert_eq!(summary.switch_count, 1);
        assert_eq!(summary.top_windows, vec!["main.rs", "Cat videos"]);
        assert!(summary.validate().is_ok());
    }

    #[test]
    fn next_period_starts_where_the_last_ended() {
        let start = Utc::now();
        let mut aggregator = ActivityAggregator::new(start);
        aggregator.record(WindowSample::new("vim", "notes", start));
        aggregator.finish(start + Duration::seconds(60));

        let second = aggregator.finish(start + Duration::seconds(90));
        assert_eq!(second.period_start, start + Duration::seconds(60));
        assert_eq!(second.app_breakdown["vim"], 30.0);
        assert_eq!(second.switch_count, 0);
    }

    #[test]
    fn keeps_at_most_five_distinct_titles() {
        let start = Utc::now();
        let mut aggregator = ActivityAggregator::new(start);
        for i in 0..8 {
            let app = if i % 2 == 0 { "vim" } else { "Slack" };
            aggregator.record(WindowSample::new(
                app,
                &format!("title {i}"),
                start + Duration::seconds(i * 10),
            ));
        }
        let summary = aggregator.finish(start + Duration::seconds(100));
        assert_eq!(summary.top_windows.len(), MAX_TOP_WINDOWS);
        assert_eq!(summary.switch_count, 7);
    }

    #[test]
    fn sanitizes_emails_and_paths() {
        assert_eq!(
            sanitize_title("Inbox - jane.doe@example.com - Mail"),
            "Inbox - [email] - Mail"
        );
        assert_eq!(
            sanitize_title(r"C:\Users\jane\report.docx - Word"),
            "report.docx - Word"
        );
        assert_eq!(sanitize_title(&"x".repeat(300)).len(), 100);
    }
}
