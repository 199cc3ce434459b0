//! Job specification domain types
//!
//! The user-editable description of a prospective job and the payload sent to
//! the pricing service when it is submitted.

use serde::{Deserialize, Deserializer, Serialize};

use super::presets::Trade;

pub const DEFAULT_LOCATION: &str = "Fort Dodge, IA";

/// Margin used when the form carries no usable number at submit time.
pub const FALLBACK_MARGIN: f64 = 0.15;

pub const MAX_MARGIN: f64 = 0.5;

/// Dimension fields of the job form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionField {
    Length,
    Width,
    Depth,
}

impl DimensionField {
    pub const ALL: [DimensionField; 3] = [Self::Length, Self::Width, Self::Depth];

    pub fn label(self) -> &'static str {
        match self {
            Self::Length => "Length",
            Self::Width => "Width",
            Self::Depth => "Depth",
        }
    }
}

/// Raw dimension text as typed, in feet.
///
/// Kept as strings so transient entries ("", "1.", "-") survive editing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionInput {
    pub length: String,
    pub width: String,
    pub depth: String,
}

impl Default for DimensionInput {
    fn default() -> Self {
        Self {
            length: "20".to_string(),
            width: "10".to_string(),
            depth: "0.5".to_string(),
        }
    }
}

impl DimensionInput {
    pub fn get(&self, field: DimensionField) -> &str {
        match field {
            DimensionField::Length => &self.length,
            DimensionField::Width => &self.width,
            DimensionField::Depth => &self.depth,
        }
    }

    pub fn set(&mut self, field: DimensionField, raw: String) {
        match field {
            DimensionField::Length => self.length = raw,
            DimensionField::Width => self.width = raw,
            DimensionField::Depth => self.depth = raw,
        }
    }

    /// Numeric view of the raw text; anything unparsable counts as zero.
    pub fn values(&self) -> Dimensions {
        Dimensions {
            length: coerce_number(&self.length),
            width: coerce_number(&self.width),
            depth: coerce_number(&self.depth),
        }
    }
}

/// Numeric dimensions in feet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub depth: f64,
}

/// Editable job specification owned by the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSpecification {
    pub trade: Trade,
    pub location: String,
    pub dimensions: DimensionInput,
    #[serde(deserialize_with = "unique_materials")]
    pub(crate) materials: Vec<String>,
    pub margin: f64,
}

impl Default for JobSpecification {
    fn default() -> Self {
        let trade = Trade::default();
        let preset = trade.preset();
        Self {
            trade,
            location: DEFAULT_LOCATION.to_string(),
            dimensions: DimensionInput::default(),
            materials: preset.materials(),
            margin: preset.default_margin,
        }
    }
}

impl JobSpecification {
    /// Switch trade, loading its preset materials and margin.
    ///
    /// Location and dimensions are carried over untouched.
    pub fn with_trade(self, trade: Trade) -> Self {
        let preset = trade.preset();
        Self {
            trade,
            materials: preset.materials(),
            margin: preset.default_margin,
            ..self
        }
    }

    /// Materials in insertion order. Never empty strings, never duplicates.
    pub fn materials(&self) -> &[String] {
        &self.materials
    }

    pub fn has_material(&self, material: &str) -> bool {
        self.materials.iter().any(|m| m == material)
    }

    /// Append a trimmed material. Blank and already-listed names are ignored.
    pub fn with_material(mut self, material: &str) -> Self {
        push_unique(&mut self.materials, material);
        self
    }

    pub fn without_material(mut self, material: &str) -> Self {
        self.materials.retain(|m| m != material);
        self
    }
}

fn push_unique(materials: &mut Vec<String>, material: &str) {
    let material = material.trim();
    if !material.is_empty() && !materials.iter().any(|m| m == material) {
        materials.push(material.to_string());
    }
}

fn unique_materials<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<String>::deserialize(deserializer)?;
    let mut materials = Vec::with_capacity(raw.len());
    for material in &raw {
        push_unique(&mut materials, material);
    }
    Ok(materials)
}

/// Request payload for `POST /jobs`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateJobRequest {
    pub trade: String,
    pub location: String,
    pub dimensions: Dimensions,
    pub materials: Vec<String>,
    pub margin: f64,
}

impl From<&JobSpecification> for CreateJobRequest {
    fn from(spec: &JobSpecification) -> Self {
        let margin = if spec.margin.is_finite() {
            spec.margin
        } else {
            FALLBACK_MARGIN
        };

        Self {
            trade: spec.trade.id().to_string(),
            location: spec.location.clone(),
            dimensions: spec.dimensions.values(),
            materials: spec.materials.clone(),
            margin,
        }
    }
}

fn coerce_number(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}
