use async_trait::async_trait;
use serde_json::json;

use crate::oracle::{OracleError, OracleRequest, OracleTransport};

const DEMO_PRODUCTIVE: &[&str] = &["code", "vscode", "visual studio code", "pycharm", "terminal"];
const DEMO_DISTRACTING: &[&str] = &["youtube", "spotify", "discord", "reddit"];

/// Offline stand-in for the oracle that answers from app-name heuristics.
#[derive(Debug, Default, Clone)]
pub struct DemoOracleTransport;

fn share_matching(request: &OracleRequest, markers: &[&str]) -> f64 {
    let breakdown = &request.activity_summary.app_breakdown;
    let total: f64 = breakdown.values().sum();
    if total <= 0.0 {
        return 0.0;
    }
    let matched: f64 = breakdown
        .iter()
        .filter(|(app, _)| {
            let app_lower = app.to_lowercase();
            markers.iter().any(|marker| app_lower.contains(marker))
        })
        .map(|(_, seconds)| seconds)
        .sum();
    matched / total
}

#[async_trait]
impl OracleTransport for DemoOracleTransport {
    async fn send(&self, request: &OracleRequest) -> Result<String, OracleError> {
        let productive = share_matching(request, DEMO_PRODUCTIVE);
        let distracting = share_matching(request, DEMO_DISTRACTING);
        let goal = request
            .goals
            .first()
            .map(String::as_str)
            .unwrap_or("your goals");

        let reply = if productive > 0.7 {
            json!({
                "intent": "productive",
                "confidence": 0.88,
                "reasoning": format!("[demo] {:.0}% of time in development tools", productive * 100.0),
                "action": "none",
            })
        } else if distracting > 0.4 {
            json!({
                "intent": "unproductive",
                "confidence": 0.75,
                "reasoning": format!("[demo] {:.0}% of time in entertainment apps", distracting * 100.0),
                "action": "nudge",
                "message": format!("You wanted to focus on {goal}. Ready to get back to it?"),
            })
        } else {
            json!({
                "intent": "neutral",
                "confidence": 0.65,
                "reasoning": "[demo] mixed activity, could be research or a break",
                "action": "none",
            })
        };

        Ok(reply.to_string())
    }

    fn describe(&self) -> String {
        "demo oracle".into()
    }
}
