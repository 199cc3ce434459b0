//! Service layer for the external pricing service.
//!
//! The workspace talks to the service only through [`PricingBackend`], so the
//! reqwest client can be swapped for an in-memory double.

pub mod pricing_client;

pub use pricing_client::PricingClient;

use async_trait::async_trait;

use crate::domain::{AnalyticsSummary, Bid, CreateJobRequest, HistoryEntry};
use crate::error::ApiResult;

/// Request/response contract of the pricing service.
#[async_trait]
pub trait PricingBackend: Send + Sync {
    /// `POST /jobs`
    async fn create_job(&self, request: &CreateJobRequest) -> ApiResult<Bid>;

    /// `GET /jobs?limit={limit}`
    async fn list_jobs(&self, limit: u32) -> ApiResult<Vec<HistoryEntry>>;

    /// `GET /jobs/{id}`
    async fn get_job(&self, job_id: &str) -> ApiResult<Bid>;

    /// `GET /jobs/analytics/summary`
    async fn analytics_summary(&self) -> ApiResult<AnalyticsSummary>;
}
