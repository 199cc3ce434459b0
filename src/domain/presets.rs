//! Trade presets
//!
//! Static defaults used to pre-populate the job form for each trade.

use serde::{Deserialize, Serialize};

/// Trades the pricing service knows how to estimate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Trade {
    #[default]
    Concrete,
    Electrical,
    Plumbing,
    Hvac,
    Landscaping,
}

impl Trade {
    pub const ALL: [Trade; 5] = [
        Trade::Concrete,
        Trade::Electrical,
        Trade::Plumbing,
        Trade::Hvac,
        Trade::Landscaping,
    ];

    /// Identifier used on the wire and in the trade picker.
    pub fn id(self) -> &'static str {
        match self {
            Trade::Concrete => "concrete",
            Trade::Electrical => "electrical",
            Trade::Plumbing => "plumbing",
            Trade::Hvac => "hvac",
            Trade::Landscaping => "landscaping",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|trade| trade.id() == id)
    }

    pub fn preset(self) -> &'static TradePreset {
        &PRESETS[self as usize]
    }
}

impl std::fmt::Display for Trade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Defaults and guidance for one trade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradePreset {
    pub trade: Trade,
    pub label: &'static str,
    pub description: &'static str,
    pub default_materials: &'static [&'static str],
    pub default_margin: f64,
    pub margin_guidance: &'static str,
}

impl TradePreset {
    pub fn materials(&self) -> Vec<String> {
        self.default_materials.iter().map(|m| m.to_string()).collect()
    }
}

// Indexed by `Trade as usize`; keep in declaration order.
static PRESETS: [TradePreset; 5] = [
    TradePreset {
        trade: Trade::Concrete,
        label: "Concrete",
        description: "Ideal for flatwork, slabs, and footings with consistent production rates.",
        default_materials: &["concrete mix", "rebar", "gravel"],
        default_margin: 0.15,
        margin_guidance: "Residential flatwork often carries a 12-18% margin depending on risk.",
    },
    TradePreset {
        trade: Trade::Electrical,
        label: "Electrical",
        description: "Branch circuits, lighting packages, and small tenant improvements.",
        default_materials: &["electrical wire", "breaker panel", "plywood"],
        default_margin: 0.18,
        margin_guidance: "Include time for inspections and fixture allowances when setting margin.",
    },
    TradePreset {
        trade: Trade::Plumbing,
        label: "Plumbing",
        description: "Supply and waste rough-in with fixture trims for medium scopes.",
        default_materials: &["copper pipe", "pvc pipe", "plywood"],
        default_margin: 0.17,
        margin_guidance: "Consider material volatility for copper and specialty fittings.",
    },
    TradePreset {
        trade: Trade::Hvac,
        label: "HVAC",
        description: "Package systems, mini-splits, and ducted distribution.",
        default_materials: &["ductwork", "thermostat", "heat pump"],
        default_margin: 0.2,
        margin_guidance: "Include commissioning hours and refrigerant handling requirements.",
    },
    TradePreset {
        trade: Trade::Landscaping,
        label: "Landscaping",
        description: "Planting beds, irrigation, and softscape enhancements.",
        default_materials: &["landscape fabric", "garden soil", "sprinkler head"],
        default_margin: 0.16,
        margin_guidance: "Account for site access and weather allowances for exterior work.",
    },
];

/// Look up a preset by trade identifier.
///
/// Unknown identifiers resolve to the default (concrete) preset.
pub fn lookup(trade_id: &str) -> &'static TradePreset {
    Trade::from_id(trade_id).unwrap_or_default().preset()
}

pub fn all() -> &'static [TradePreset] {
    &PRESETS
}
