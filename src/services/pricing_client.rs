//! Pricing service client for the estimation REST API.
//!
//! Provides type-safe methods for:
//! - Job creation (pricing a job specification)
//! - Recent job listing
//! - Job detail lookup
//! - Portfolio analytics

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, instrument};
use url::Url;

use super::PricingBackend;
use crate::config::validate_base_url;
use crate::domain::{
    decode_job_record, AnalyticsSummary, Bid, CreateJobRequest, HistoryEntry, JobListResponse,
};
use crate::error::{ApiError, ApiResult};

/// Client for the pricing service.
#[derive(Clone)]
pub struct PricingClient {
    client: Client,
    base_url: Url,
}

impl PricingClient {
    /// Create a new pricing service client.
    pub fn new(base_url: &str, timeout_seconds: u64) -> Result<Self> {
        let base_url = validate_base_url(base_url)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        tracing::info!(base_url = %base_url, "Pricing client initialized");

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build `{base}/{segments...}`; each segment is percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Make a GET request to the pricing service.
    async fn get(&self, url: Url) -> ApiResult<Value> {
        debug!(url = %url, "Pricing service request");

        let response = self.client.get(url).send().await.map_err(|e| {
            error!(error = %e, "Pricing service request failed");
            ApiError::Transport(e.to_string())
        })?;

        read_body(response).await
    }

    /// Make a POST request to the pricing service.
    async fn post<T: Serialize>(&self, url: Url, body: &T) -> ApiResult<Value> {
        debug!(url = %url, "Pricing service request");

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Pricing service request failed");
                ApiError::Transport(e.to_string())
            })?;

        read_body(response).await
    }
}

/// Turn a response into JSON, or into the matching error kind.
async fn read_body(response: Response) -> ApiResult<Value> {
    let status = response.status();

    if status.is_success() {
        // Body bytes first: a broken body is a transport failure, a bad one is malformed.
        let bytes = response.bytes().await.map_err(ApiError::from)?;
        serde_json::from_slice(&bytes).map_err(|e| {
            error!(error = %e, "Failed to parse pricing service response");
            ApiError::Malformed(e.to_string())
        })
    } else {
        let detail = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| body.get("detail").and_then(Value::as_str).map(str::to_string));

        debug!(status = %status, detail = ?detail, "Pricing service returned error status");

        Err(ApiError::Rejected {
            status: status.as_u16(),
            detail,
        })
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> ApiResult<T> {
    serde_json::from_value(value).map_err(|e| ApiError::Malformed(e.to_string()))
}

fn decode_record<T: DeserializeOwned>(value: Value) -> ApiResult<T> {
    decode_job_record(value).map_err(|e| ApiError::Malformed(e.to_string()))
}

#[async_trait]
impl PricingBackend for PricingClient {
    #[instrument(skip(self, request), fields(trade = %request.trade))]
    async fn create_job(&self, request: &CreateJobRequest) -> ApiResult<Bid> {
        let body = self.post(self.endpoint(&["jobs"]), request).await?;
        decode_record(body)
    }

    #[instrument(skip(self))]
    async fn list_jobs(&self, limit: u32) -> ApiResult<Vec<HistoryEntry>> {
        let mut url = self.endpoint(&["jobs"]);
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());

        let envelope: JobListResponse = decode(self.get(url).await?)?;
        envelope.items.into_iter().map(decode_record).collect()
    }

    #[instrument(skip(self))]
    async fn get_job(&self, job_id: &str) -> ApiResult<Bid> {
        let body = self.get(self.endpoint(&["jobs", job_id])).await?;
        decode_record(body)
    }

    #[instrument(skip(self))]
    async fn analytics_summary(&self) -> ApiResult<AnalyticsSummary> {
        let body = self
            .get(self.endpoint(&["jobs", "analytics", "summary"]))
            .await?;
        decode(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_extend_base_path() {
        let client = PricingClient::new("http://localhost:8000/api/v1/", 5).unwrap();
        assert_eq!(
            client.endpoint(&["jobs"]).as_str(),
            "http://localhost:8000/api/v1/jobs"
        );
        assert_eq!(
            client
                .endpoint(&["jobs", "analytics", "summary"])
                .as_str(),
            "http://localhost:8000/api/v1/jobs/analytics/summary"
        );
    }

    #[test]
    fn job_ids_are_percent_encoded() {
        let client = PricingClient::new("http://localhost:8000/api/v1", 5).unwrap();
        assert_eq!(
            client.endpoint(&["jobs", "a/b c"]).as_str(),
            "http://localhost:8000/api/v1/jobs/a%2Fb%20c"
        );
    }

    #[test]
    fn rejects_relative_base_url() {
        assert!(PricingClient::new("/api/v1", 5).is_err());
    }

    #[test]
    fn malformed_record_maps_to_malformed_error() {
        let result = decode_record::<Bid>(serde_json::json!({ "job_id": "job-1" }));
        assert!(matches!(result, Err(ApiError::Malformed(_))));
    }
}
