use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::lenient_timestamp;

/// Job count for one trade
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TradeCount {
    pub trade: String,
    pub count: u64,
}

/// Portfolio statistics computed by the pricing service.
///
/// Read through as-is; nothing here is recomputed locally.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyticsSummary {
    pub total_jobs: u64,
    pub average_bid: f64,
    pub average_profit_margin: f64,
    pub average_material_cost: f64,
    pub average_labor_cost: f64,
    #[serde(default)]
    pub top_trades: Vec<TradeCount>,
    #[serde(default)]
    pub recent_locations: Vec<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl AnalyticsSummary {
    pub fn is_empty(&self) -> bool {
        self.total_jobs == 0
    }
}
