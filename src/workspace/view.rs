//! Display-ready projections of bids, history and analytics.
//!
//! Everything here is a pure function of its input snapshot.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::domain::{AnalyticsSummary, Bid, HistoryEntry};

// ============================================================================
// Formatting
// ============================================================================

/// Format an amount as US dollars with two decimals and thousands separators.
///
/// `None` and non-finite amounts format as `$0.00`.
pub fn format_currency(amount: Option<f64>) -> String {
    let value = amount.filter(|v| v.is_finite()).unwrap_or(0.0);

    let (negative, digits) = match Decimal::from_f64(value) {
        Some(value) => {
            let mut rounded =
                value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            rounded.rescale(2);
            (
                rounded.is_sign_negative() && !rounded.is_zero(),
                rounded.abs().to_string(),
            )
        }
        // Outside Decimal's range; no cents survive at this magnitude anyway.
        None => (value < 0.0, format!("{:.2}", value.abs())),
    };
    let (whole, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    format!(
        "{}${}.{}",
        if negative { "-" } else { "" },
        group_thousands(whole),
        cents
    )
}

/// Percent to one decimal, e.g. `0.153` -> `"15.3%"`.
pub fn format_percent(ratio: f64) -> String {
    let ratio = if ratio.is_finite() { ratio } else { 0.0 };
    format!("{:.1}%", ratio * 100.0)
}

fn group_thousands(whole: &str) -> String {
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

fn format_quantity(value: f64) -> String {
    let text = format!("{value:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

// ============================================================================
// Cost breakdown
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CostCategory {
    Materials,
    Labor,
    Overhead,
    Profit,
}

impl CostCategory {
    pub const ORDER: [CostCategory; 4] = [
        CostCategory::Materials,
        CostCategory::Labor,
        CostCategory::Overhead,
        CostCategory::Profit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CostCategory::Materials => "Materials",
            CostCategory::Labor => "Labor",
            CostCategory::Overhead => "Overhead",
            CostCategory::Profit => "Profit",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownEntry {
    pub category: CostCategory,
    pub label: &'static str,
    pub amount: f64,
    pub formatted: String,
    pub percent_of_total: u32,
}

/// The four cost categories with their rounded share of the total.
///
/// A zero (or unusable) total gives every category 0%.
pub fn breakdown(bid: &Bid) -> Vec<BreakdownEntry> {
    let costs = &bid.cost_breakdown;
    let amounts = [costs.materials, costs.labor, costs.overhead, costs.profit];
    let total: f64 = amounts.iter().map(|a| usable(*a)).sum();

    CostCategory::ORDER
        .into_iter()
        .zip(amounts)
        .map(|(category, amount)| {
            let percent_of_total = if total > 0.0 && total.is_finite() {
                (usable(amount) / total * 100.0).round() as u32
            } else {
                0
            };
            BreakdownEntry {
                category,
                label: category.label(),
                amount,
                formatted: format_currency(Some(amount)),
                percent_of_total,
            }
        })
        .collect()
}

fn usable(amount: f64) -> f64 {
    if amount.is_finite() && amount > 0.0 {
        amount
    } else {
        0.0
    }
}

// ============================================================================
// Bid view
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRow {
    pub label: &'static str,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialRow {
    pub name: String,
    pub quantity: String,
    pub unit: String,
    pub total_cost: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BidView {
    pub job_id: String,
    pub trade: String,
    pub location: String,
    pub total_bid: String,
    pub profit_amount: String,
    pub profit_margin: String,
    pub weather_modifier: String,
    pub breakdown: Vec<BreakdownEntry>,
    pub metrics: Vec<MetricRow>,
    pub materials: Vec<MaterialRow>,
    pub labor: String,
    pub location_lines: Vec<String>,
    pub steps: Vec<String>,
}

impl BidView {
    pub fn from_bid(bid: &Bid) -> Self {
        let m = &bid.metrics;
        let metrics = vec![
            MetricRow { label: "Length", value: m.length_ft },
            MetricRow { label: "Width", value: m.width_ft },
            MetricRow { label: "Depth", value: m.depth_ft },
            MetricRow { label: "Area", value: m.area_sqft },
            MetricRow { label: "Perimeter", value: m.linear_ft },
            MetricRow { label: "Volume (cu ft)", value: m.volume_cuft },
            MetricRow { label: "Volume (cu yd)", value: m.volume_cy },
        ];

        let materials = bid
            .materials
            .iter()
            .map(|item| MaterialRow {
                name: item.name.clone(),
                quantity: format_quantity(item.quantity),
                unit: item.unit.clone(),
                total_cost: format_currency(Some(item.total_cost)),
            })
            .collect();

        Self {
            job_id: bid.job_id.clone(),
            trade: bid.trade.clone(),
            location: bid.location.clone(),
            total_bid: format_currency(Some(bid.total_bid)),
            profit_amount: format_currency(Some(bid.profit_amount)),
            profit_margin: format_percent(bid.profit_margin),
            weather_modifier: format_percent(bid.weather_modifier),
            breakdown: breakdown(bid),
            metrics,
            materials,
            labor: format!(
                "{} hours @ {} per hour",
                format_quantity(bid.labor.hours),
                format_currency(Some(bid.labor.rate))
            ),
            location_lines: location_lines(bid),
            steps: bid.steps.clone(),
        }
    }
}

fn location_lines(bid: &Bid) -> Vec<String> {
    let Some(details) = &bid.location_details else {
        return Vec::new();
    };

    let name = details
        .display_name
        .clone()
        .unwrap_or_else(|| bid.location.clone());

    let region = match (&details.state, &details.country) {
        (Some(state), Some(country)) => format!("{state}, {country}"),
        (Some(state), None) => state.clone(),
        (None, Some(country)) => format!(", {country}"),
        (None, None) => String::new(),
    };

    vec![name, region]
}

// ============================================================================
// History and analytics
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRow {
    pub job_id: String,
    pub trade: String,
    pub location: String,
    pub timestamp: Option<String>,
    pub total_bid: String,
    pub active: bool,
}

pub fn history_rows(entries: &[HistoryEntry], selected: Option<&str>) -> Vec<HistoryRow> {
    entries
        .iter()
        .map(|entry| HistoryRow {
            job_id: entry.job_id.clone(),
            trade: entry.trade.clone(),
            location: entry.location.clone(),
            timestamp: entry
                .timestamp
                .map(|ts| ts.format("%Y-%m-%d %H:%M UTC").to_string()),
            total_bid: format_currency(Some(entry.total_bid)),
            active: selected == Some(entry.job_id.as_str()),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsView {
    pub total_jobs: u64,
    pub average_bid: String,
    pub average_margin: String,
    pub average_material_cost: String,
    pub average_labor_cost: String,
    pub top_trades: Vec<(String, u64)>,
    pub recent_locations: Vec<String>,
}

impl AnalyticsView {
    /// `None` until at least one bid exists.
    pub fn from_summary(summary: Option<&AnalyticsSummary>) -> Option<Self> {
        let summary = summary.filter(|s| !s.is_empty())?;

        Some(Self {
            total_jobs: summary.total_jobs,
            average_bid: format_currency(Some(summary.average_bid)),
            average_margin: format_percent(summary.average_profit_margin),
            average_material_cost: format_currency(Some(summary.average_material_cost)),
            average_labor_cost: format_currency(Some(summary.average_labor_cost)),
            top_trades: summary
                .top_trades
                .iter()
                .map(|t| (t.trade.clone(), t.count))
                .collect(),
            recent_locations: summary.recent_locations.clone(),
        })
    }
}
