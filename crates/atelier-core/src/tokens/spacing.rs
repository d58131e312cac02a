use serde::Serialize;

use super::{px_to_rem, trim_number};

pub const DEFAULT_SPACING_UNIT: f64 = 4.0;

/// 4px-grid multipliers, in scale order.
pub const MULTIPLIERS: [f64; 20] = [
    0.0, 0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 10.0, 12.0, 14.0, 16.0, 20.0,
    24.0, 28.0, 32.0,
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpacingStep {
    pub name: String,
    pub multiplier: f64,
    pub px: f64,
    pub rem: String,
}

/// Spacing scale for `base_unit` px. A zero unit yields an all-zero scale.
pub fn generate_spacing_scale(base_unit: f64) -> Vec<SpacingStep> {
    MULTIPLIERS
        .iter()
        .map(|&multiplier| {
            let px = multiplier * base_unit;
            SpacingStep {
                name: trim_number(multiplier),
                multiplier,
                px,
                rem: px_to_rem(px),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn px(steps: &[SpacingStep], name: &str) -> f64 {
        steps.iter().find(|s| s.name == name).unwrap().px
    }

    #[test]
    fn default_grid() {
        let steps = generate_spacing_scale(DEFAULT_SPACING_UNIT);
        assert_eq!(steps.len(), 20);
        assert_eq!(px(&steps, "4"), 16.0);
        assert_eq!(px(&steps, "0"), 0.0);
        assert_eq!(px(&steps, "0.5"), 2.0);
        assert_eq!(px(&steps, "32"), 128.0);
        let four = steps.iter().find(|s| s.name == "4").unwrap();
        assert_eq!(four.rem, "1rem");
    }

    #[test]
    fn names_are_canonical_multipliers() {
        let names: Vec<String> = generate_spacing_scale(8.0)
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(&names[..4], ["0", "0.5", "1", "1.5"]);
        assert_eq!(names.last().map(String::as_str), Some("32"));
    }

    #[test]
    fn zero_unit_is_degenerate_not_an_error() {
        let steps = generate_spacing_scale(0.0);
        assert!(steps.iter().all(|s| s.px == 0.0 && s.rem == "0rem"));
    }
}
