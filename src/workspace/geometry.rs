//! Live geometry preview for the job form.

use serde::Serialize;

use crate::domain::{DimensionInput, Dimensions};

pub const CUBIC_FEET_PER_YARD: f64 = 27.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct GeometryPreview {
    pub area: f64,
    pub volume_cu_ft: f64,
    pub volume_cy: f64,
}

/// Area and volume from length, width and depth in feet.
///
/// Non-finite results are reported as zero so the preview always renders.
pub fn preview(length: f64, width: f64, depth: f64) -> GeometryPreview {
    let area = length * width;
    let volume_cu_ft = area * depth;
    let volume_cy = volume_cu_ft / CUBIC_FEET_PER_YARD;

    GeometryPreview {
        area: finite_or_zero(area),
        volume_cu_ft: finite_or_zero(volume_cu_ft),
        volume_cy: finite_or_zero(volume_cy),
    }
}

pub fn preview_dimensions(dimensions: Dimensions) -> GeometryPreview {
    preview(dimensions.length, dimensions.width, dimensions.depth)
}

pub fn preview_input(input: &DimensionInput) -> GeometryPreview {
    preview_dimensions(input.values())
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

impl std::fmt::Display for GeometryPreview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.1} sq ft, {:.1} cu ft, {:.2} cu yd",
            self.area, self.volume_cu_ft, self.volume_cy
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computes_area_and_volumes() {
        let p = preview(20.0, 10.0, 0.5);
        assert_eq!(p.area, 200.0);
        assert_eq!(p.volume_cu_ft, 100.0);
        assert!((p.volume_cy - 100.0 / 27.0).abs() < 1e-12);
    }

    #[test]
    fn zero_dimension_yields_zero_volume() {
        let p = preview(12.0, 0.0, 4.0);
        assert_eq!(p, GeometryPreview::default());
    }

    #[test]
    fn holds_for_a_grid_of_non_negative_inputs() {
        let samples = [0.0, 0.25, 1.0, 3.5, 27.0, 1234.5];
        for &l in &samples {
            for &w in &samples {
                for &d in &samples {
                    let p = preview(l, w, d);
                    assert_eq!(p.area, l * w);
                    assert_eq!(p.volume_cu_ft, l * w * d);
                    assert_eq!(p.volume_cy, l * w * d / 27.0);
                    assert!(p.area.is_finite() && p.volume_cy.is_finite());
                }
            }
        }
    }

    #[test]
    fn non_finite_intermediates_become_zero() {
        let p = preview(f64::MAX, f64::MAX, 2.0);
        assert_eq!(p.area, 0.0);
        assert_eq!(p.volume_cu_ft, 0.0);
        assert_eq!(p.volume_cy, 0.0);

        let p = preview(f64::NAN, 3.0, 1.0);
        assert_eq!(p, GeometryPreview::default());
    }

    #[test]
    fn malformed_text_input_previews_as_zero() {
        let input = DimensionInput {
            length: "".to_string(),
            width: "10".to_string(),
            depth: "0.5".to_string(),
        };
        assert_eq!(preview_input(&input), GeometryPreview::default());
    }

    #[test]
    fn display_rounds_like_the_form() {
        let p = preview(20.0, 10.0, 0.5);
        assert_eq!(p.to_string(), "200.0 sq ft, 100.0 cu ft, 3.70 cu yd");
    }
}
