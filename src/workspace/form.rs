//! Form state updates
//!
//! Each [`FormUpdate`] is a partial edit of the job specification. Applying
//! one is pure and keeps the specification's invariants: materials are
//! unique and non-empty, and margin stays within `[0, MAX_MARGIN]`.

use crate::domain::{DimensionField, JobSpecification, Trade, MAX_MARGIN};

#[derive(Debug, Clone, PartialEq)]
pub enum FormUpdate {
    /// Switch trade and load its preset materials and margin.
    Trade(Trade),
    Location(String),
    /// Raw text for one dimension; empty and partial entries are kept as typed.
    Dimension(DimensionField, String),
    Margin(f64),
    AddMaterial(String),
    RemoveMaterial(String),
}

impl JobSpecification {
    pub fn apply(self, update: FormUpdate) -> Self {
        match update {
            FormUpdate::Trade(trade) => self.with_trade(trade),
            FormUpdate::Location(location) => Self { location, ..self },
            FormUpdate::Dimension(field, raw) => {
                let mut dimensions = self.dimensions;
                dimensions.set(field, raw);
                Self { dimensions, ..self }
            }
            FormUpdate::Margin(margin) => {
                if margin.is_nan() {
                    return self;
                }
                Self {
                    margin: margin.clamp(0.0, MAX_MARGIN),
                    ..self
                }
            }
            FormUpdate::AddMaterial(material) => self.with_material(&material),
            FormUpdate::RemoveMaterial(material) => self.without_material(&material),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DEFAULT_LOCATION;

    #[test]
    fn trade_switch_loads_preset_but_keeps_location() {
        let spec = JobSpecification::default()
            .apply(FormUpdate::Location("Sioux City, IA".to_string()))
            .apply(FormUpdate::AddMaterial("wire mesh".to_string()))
            .apply(FormUpdate::Trade(Trade::Electrical));

        assert_eq!(spec.trade, Trade::Electrical);
        assert_eq!(spec.location, "Sioux City, IA");
        assert_eq!(
            spec.materials(),
            ["electrical wire", "breaker panel", "plywood"]
        );
        assert_eq!(spec.margin, 0.18);
    }

    #[test]
    fn materials_stay_unique_and_non_empty() {
        let spec = JobSpecification::default()
            .apply(FormUpdate::AddMaterial("  rebar ".to_string()))
            .apply(FormUpdate::AddMaterial("   ".to_string()))
            .apply(FormUpdate::AddMaterial("Rebar".to_string()))
            .apply(FormUpdate::AddMaterial("form boards".to_string()));

        assert_eq!(
            spec.materials(),
            ["concrete mix", "rebar", "gravel", "Rebar", "form boards"]
        );
    }

    #[test]
    fn remove_material_is_exact_match() {
        let spec = JobSpecification::default()
            .apply(FormUpdate::RemoveMaterial("Rebar".to_string()))
            .apply(FormUpdate::RemoveMaterial("gravel".to_string()));
        assert_eq!(spec.materials(), ["concrete mix", "rebar"]);
    }

    #[test]
    fn margin_is_clamped_and_nan_ignored() {
        let spec = JobSpecification::default().apply(FormUpdate::Margin(0.9));
        assert_eq!(spec.margin, MAX_MARGIN);

        let spec = spec.apply(FormUpdate::Margin(-0.2));
        assert_eq!(spec.margin, 0.0);

        let spec = spec
            .apply(FormUpdate::Margin(0.22))
            .apply(FormUpdate::Margin(f64::NAN));
        assert_eq!(spec.margin, 0.22);
    }

    #[test]
    fn dimension_text_is_kept_verbatim() {
        let spec = JobSpecification::default()
            .apply(FormUpdate::Dimension(DimensionField::Length, "".to_string()))
            .apply(FormUpdate::Dimension(DimensionField::Depth, "0.".to_string()));

        assert_eq!(spec.dimensions.get(DimensionField::Length), "");
        assert_eq!(spec.dimensions.get(DimensionField::Depth), "0.");
        assert_eq!(spec.dimensions.values().length, 0.0);
        assert_eq!(spec.location, DEFAULT_LOCATION);
    }
}
