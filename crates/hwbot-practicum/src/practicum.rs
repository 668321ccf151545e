//! Homework status API client.
//!
//! One `GET <endpoint>?from_date=<ts>` per call, authorized with an OAuth
//! token. No internal retries: the poll loop's schedule is the retry policy.

use async_trait::async_trait;
use hwbot_core::{error::HomeworkError, traits::StatusSource};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

/// Status source backed by the review-status HTTP endpoint.
pub struct PracticumClient {
    client: reqwest::Client,
    endpoint: String,
    token: String,
    timeout: Duration,
}

impl PracticumClient {
    /// Create from config values.
    pub fn from_config(endpoint: String, token: String, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            token,
            timeout,
        }
    }
}

#[async_trait]
impl StatusSource for PracticumClient {
    fn name(&self) -> &str {
        "practicum"
    }

    async fn fetch_statuses(&self, from_date: i64) -> Result<serde_json::Value, HomeworkError> {
        debug!("practicum: GET {} from_date={from_date}", self.endpoint);

        let resp = self
            .client
            .get(&self.endpoint)
            .header("Authorization", format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| HomeworkError::RequestFailure(format!("API request failed: {e}")))?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(HomeworkError::RequestFailure(format!(
                "API returned status {}",
                status.as_u16()
            )));
        }

        let bytes = resp.bytes().await.map_err(|e| {
            HomeworkError::RequestFailure(format!("failed to read API response: {e}"))
        })?;

        serde_json::from_slice(&bytes)
            .map_err(|e| HomeworkError::MalformedPayload(format!("failed to decode JSON: {e}")))
    }
}
