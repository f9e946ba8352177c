use std::time::Duration;

use async_trait::async_trait;

use crate::oracle::{OracleError, OracleRequest};
use crate::settings::OracleSettings;

const HEALTH_TIMEOUT_SECS: u64 = 5;

/// The wire to the reasoning oracle. Implementations return the raw reply body;
/// validation happens in the client so every transport is held to one contract.
#[async_trait]
pub trait OracleTransport: Send + Sync {
    async fn send(&self, request: &OracleRequest) -> Result<String, OracleError>;

    async fn health_check(&self) -> bool {
        true
    }

    fn describe(&self) -> String;
}

/// JSON-over-HTTP oracle: `POST {base}/analyze`, `GET {base}/health`.
pub struct HttpOracleTransport {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpOracleTransport {
    pub fn new(settings: &OracleSettings) -> Result<Self, OracleError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|err| OracleError::Transport(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            http_client,
            base_url: settings.url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl OracleTransport for HttpOracleTransport {
    async fn send(&self, request: &OracleRequest) -> Result<String, OracleError> {
        let response = self
            .http_client
            .post(self.endpoint("analyze"))
            .json(request)
            .send()
            .await
            .map_err(|err| OracleError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(OracleError::Status(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|err| OracleError::Transport(format!("failed to read reply body: {err}")))
    }

    async fn health_check(&self) -> bool {
        match self
            .http_client
            .get(self.endpoint("health"))
            .timeout(Duration::from_secs(HEALTH_TIMEOUT_SECS))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                log::warn!("oracle health check failed: {err}");
                false
            }
        }
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_strips_trailing_slash() {
        let settings = OracleSettings {
            url: "http://localhost:8080/".into(),
            ..OracleSettings::default()
        };
        let transport = HttpOracleTransport::new(&settings).unwrap();
        assert_eq!(transport.endpoint("analyze"), "http://localhost:8080/analyze");
        assert_eq!(transport.describe(), "http://localhost:8080");
    }

    #[tokio::test]
    async fn unreachable_oracle_is_a_transport_error() {
        let settings = OracleSettings {
            url: "http://127.0.0.1:9".into(),
            timeout_secs: 2,
            ..OracleSettings::default()
        };
        let transport = HttpOracleTransport::new(&settings).unwrap();
        let request: OracleRequest = serde_json::from_str(
            r#"{
                "activity_summary": {
                    "period_start": "2026-01-02T10:00:00Z",
                    "period_end": "2026-01-02T10:05:00Z",
                    "total_duration": 300,
                    "app_breakdown": {"VSCode": 300},
                    "top_windows": [],
                    "switch_count": 0
                },
                "goals": ["coding"],
                "context": {
                    "time_period": "morning",
                    "consecutive_escalation_failures": 0,
                    "timestamp": "2026-01-02T10:05:00Z"
                }
            }"#,
        )
        .unwrap();

        assert!(matches!(
            transport.send(&request).await,
            Err(OracleError::Transport(_))
        ));
        assert!(!transport.health_check().await);
    }
}
