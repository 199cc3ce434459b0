use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use super::lenient_timestamp;

/// Material line item priced by the service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaterialItem {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    #[serde(default)]
    pub unit_cost: f64,
    pub total_cost: f64,
}

/// Labor cost details
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct LaborBreakdown {
    pub hours: f64,
    pub rate: f64,
    pub total: f64,
}

/// Cost allocation summary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CostBreakdown {
    pub materials: f64,
    pub labor: f64,
    pub overhead: f64,
    pub profit: f64,
    #[serde(default)]
    pub subtotal: f64,
    #[serde(default)]
    pub weather_modifier: f64,
}

/// Normalized dimensional metrics for the job
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ProjectMetrics {
    #[serde(default)]
    pub length_ft: Option<f64>,
    #[serde(default)]
    pub width_ft: Option<f64>,
    #[serde(default)]
    pub depth_ft: Option<f64>,
    #[serde(default)]
    pub area_sqft: Option<f64>,
    #[serde(default)]
    pub linear_ft: Option<f64>,
    #[serde(default)]
    pub volume_cuft: Option<f64>,
    #[serde(default)]
    pub volume_cy: Option<f64>,
}

/// Resolved location metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct LocationDetails {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

/// Priced estimate returned by the pricing service.
///
/// Never mutated after receipt; a later fetch replaces it wholesale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bid {
    pub job_id: String,
    pub trade: String,
    pub location: String,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    pub total_bid: f64,
    pub profit_margin: f64,
    pub profit_amount: f64,
    #[serde(default)]
    pub weather_modifier: f64,
    #[serde(default)]
    pub material_total: f64,
    #[serde(default)]
    pub labor_total: f64,
    #[serde(default)]
    pub overhead: f64,
    pub cost_breakdown: CostBreakdown,
    #[serde(default)]
    pub metrics: ProjectMetrics,
    pub labor: LaborBreakdown,
    #[serde(default)]
    pub materials: Vec<MaterialItem>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub location_details: Option<LocationDetails>,
}

impl Bid {
    /// Pretty JSON used for copy and download.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn export_file_name(&self) -> String {
        format!("bid-{}.json", self.job_id)
    }
}

/// Lightweight job summary used for the recent-bids list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub job_id: String,
    pub trade: String,
    pub location: String,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    pub total_bid: f64,
    #[serde(default)]
    pub profit_margin: Option<f64>,
    #[serde(default)]
    pub material_total: Option<f64>,
    #[serde(default)]
    pub labor_total: Option<f64>,
    #[serde(default)]
    pub cost_breakdown: Option<CostBreakdown>,
    #[serde(default)]
    pub metrics: Option<ProjectMetrics>,
}

impl From<&Bid> for HistoryEntry {
    fn from(bid: &Bid) -> Self {
        Self {
            job_id: bid.job_id.clone(),
            trade: bid.trade.clone(),
            location: bid.location.clone(),
            timestamp: bid.timestamp,
            total_bid: bid.total_bid,
            profit_margin: Some(bid.profit_margin),
            material_total: Some(bid.material_total),
            labor_total: Some(bid.labor_total),
            cost_breakdown: Some(bid.cost_breakdown.clone()),
            metrics: Some(bid.metrics.clone()),
        }
    }
}

/// Response envelope for `GET /jobs`
#[derive(Debug, Clone, Deserialize)]
pub struct JobListResponse {
    #[serde(default)]
    pub items: Vec<Value>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
}

/// Copy `_timestamp` into `timestamp` when the canonical field is missing.
pub fn normalize_job_record(record: &mut Value) {
    let Some(object) = record.as_object_mut() else {
        return;
    };

    let missing = object.get("timestamp").map_or(true, Value::is_null);
    if missing {
        if let Some(alternate) = object.get("_timestamp").cloned() {
            object.insert("timestamp".to_string(), alternate);
        }
    }
}

/// Decode a job-shaped record (bid or history entry) after normalization.
pub fn decode_job_record<T: DeserializeOwned>(mut record: Value) -> serde_json::Result<T> {
    normalize_job_record(&mut record);
    serde_json::from_value(record)
}
