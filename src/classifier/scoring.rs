use crate::classifier::rules::{DISTRACTION_KEYWORDS, PRODUCTIVE_KEYWORDS};
use crate::models::{Classification, Intent};

/// Keyword hits found in one or more window titles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeywordHits {
    pub productive: usize,
    pub distraction: usize,
}

impl KeywordHits {
    pub fn lean(&self) -> Option<Intent> {
        if self.productive > self.distraction {
            Some(Intent::Productive)
        } else if self.distraction > self.productive {
            Some(Intent::Unproductive)
        } else {
            None
        }
    }
}

pub fn count_keywords(title: &str) -> KeywordHits {
    let title_lower = title.to_lowercase();
    KeywordHits {
        productive: PRODUCTIVE_KEYWORDS
            .iter()
            .filter(|kw| title_lower.contains(*kw))
            .count(),
        distraction: DISTRACTION_KEYWORDS
            .iter()
            .filter(|kw| title_lower.contains(*kw))
            .count(),
    }
}

/// Sum keyword hits across several titles.
pub fn count_keywords_in(titles: &[String]) -> KeywordHits {
    titles
        .iter()
        .map(|title| count_keywords(title))
        .fold(KeywordHits::default(), |acc, hits| KeywordHits {
            productive: acc.productive + hits.productive,
            distraction: acc.distraction + hits.distraction,
        })
}

/// Classify a browser or neutral app from its window title alone.
///
/// Productive titles start at 0.75 and gain 0.05 per hit up to 0.90, escalating
/// below 0.85. Distracting titles start at 0.70 up to 0.85 and always escalate.
pub fn score_title(app_name: &str, title: &str) -> Classification {
    let hits = count_keywords(title);

    match hits.lean() {
        Some(Intent::Productive) => {
            let confidence = (0.75 + 0.05 * hits.productive as f64).min(0.90);
            Classification::new(
                Intent::Productive,
                confidence,
                format!(
                    "window title looks like work ({} work keyword(s))",
                    hits.productive
                ),
                confidence < 0.85,
            )
        }
        Some(_) => {
            let confidence = (0.70 + 0.05 * hits.distraction as f64).min(0.85);
            Classification::new(
                Intent::Unproductive,
                confidence,
                format!(
                    "window title looks like a distraction ({} distraction keyword(s))",
                    hits.distraction
                ),
                true,
            )
        }
        None => Classification::new(
            Intent::Neutral,
            0.50,
            format!("title of '{app_name}' does not reveal what is being done"),
            true,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn productive_title_confidence_grows_with_hits() {
        let one = score_title("Chrome", "Rust docs");
        assert_eq!(one.intent, Intent::Productive);
        assert!((one.confidence - 0.80).abs() < 1e-9);
        assert!(one.escalate);

        let many = score_title("Chrome", "GitHub pull request: merge branch - docs");
        assert_eq!(many.intent, Intent::Productive);
        assert!((many.confidence - 0.90).abs() < 1e-9);
        assert!(!many.escalate);
    }

    #[test]
    fn distraction_title_always_escalates() {
        let c = score_title("Firefox", "YouTube - funny cats");
        assert_eq!(c.intent, Intent::Unproductive);
        assert!((c.confidence - 0.80).abs() < 1e-9);
        assert!(c.escalate);

        let capped = score_title(
            "Firefox",
            "youtube twitch reddit meme funny viral trending game",
        );
        assert!((capped.confidence - 0.85).abs() < 1e-9);
    }

    #[test]
    fn tie_or_silence_is_neutral() {
        let silent = score_title("Safari", "New Tab");
        assert_eq!(silent.intent, Intent::Neutral);
        assert_eq!(silent.confidence, 0.50);
        assert!(silent.escalate);

        let tied = score_title("Safari", "github - youtube");
        assert_eq!(tied.intent, Intent::Neutral);
    }

    #[test]
    fn sums_hits_across_titles() {
        let titles = vec!["main.rs - crate".to_string(), "Twitch stream".to_string()];
        let hits = count_keywords_in(&titles);
        assert_eq!(hits.productive, 1);
        assert_eq!(hits.distraction, 2);
        assert_eq!(hits.lean(), Some(Intent::Unproductive));
    }
}
