// Report API repository implementation
use crate::application::report_repository::ReportRepository;
use crate::domain::report::{Report, ScheduledReport};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpReportRepository {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: Vec<T>,
}

impl HttpReportRepository {
    pub fn new(base_url: String, token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build report API client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            client,
        })
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let url = self.build_url(path);
        tracing::debug!("Fetching {}", url);

        let mut request = self.client.get(&url).header("Accept", "application/json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Report API request failed with status {}: {}", status, body);
        }

        let envelope = response
            .json::<DataEnvelope<T>>()
            .await
            .context("Failed to parse report API response")?;

        Ok(envelope.data)
    }
}

#[async_trait]
impl ReportRepository for HttpReportRepository {
    async fn list_reports(&self) -> Result<Vec<Report>> {
        self.fetch("reports").await
    }

    async fn list_scheduled_reports(&self) -> Result<Vec<ScheduledReport>> {
        self.fetch("reports/scheduled").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_normalizes_slashes() {
        let repo = HttpReportRepository::new(
            "http://localhost:2998/".to_string(),
            None,
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(repo.build_url("reports"), "http://localhost:2998/api/reports");
        assert_eq!(
            repo.build_url("/reports/scheduled"),
            "http://localhost:2998/api/reports/scheduled"
        );
    }

    #[test]
    fn test_envelope_parses_scheduled_reports() {
        let body = r#"{"data": [{"id": "schedule_1", "title": "Monthly Financial Report",
            "reportType": "FINANCIAL", "frequency": "monthly", "nextRun": "2024-02-01",
            "isActive": true}]}"#;
        let envelope: DataEnvelope<ScheduledReport> = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.data.len(), 1);
        assert!(envelope.data[0].is_active);
    }

    #[tokio::test]
    async fn test_unreachable_peer_is_an_error() {
        let repo = HttpReportRepository::new(
            "http://127.0.0.1:9".to_string(),
            Some("token".to_string()),
            Duration::from_millis(200),
        )
        .unwrap();
        assert!(repo.list_reports().await.is_err());
    }
}
