use std::str::FromStr;

use serde::{Serialize, Serializer};

use super::{px_to_rem, round2, TokenError};

/// Named modular-scale ratios.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeRatio {
    MinorSecond,
    MajorSecond,
    MinorThird,
    MajorThird,
    PerfectFourth,
    AugmentedFourth,
    PerfectFifth,
    GoldenRatio,
}

impl TypeRatio {
    pub const ALL: [TypeRatio; 8] = [
        TypeRatio::MinorSecond,
        TypeRatio::MajorSecond,
        TypeRatio::MinorThird,
        TypeRatio::MajorThird,
        TypeRatio::PerfectFourth,
        TypeRatio::AugmentedFourth,
        TypeRatio::PerfectFifth,
        TypeRatio::GoldenRatio,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TypeRatio::MinorSecond => "minor-second",
            TypeRatio::MajorSecond => "major-second",
            TypeRatio::MinorThird => "minor-third",
            TypeRatio::MajorThird => "major-third",
            TypeRatio::PerfectFourth => "perfect-fourth",
            TypeRatio::AugmentedFourth => "augmented-fourth",
            TypeRatio::PerfectFifth => "perfect-fifth",
            TypeRatio::GoldenRatio => "golden-ratio",
        }
    }

    pub fn value(self) -> f64 {
        match self {
            TypeRatio::MinorSecond => 1.067,
            TypeRatio::MajorSecond => 1.125,
            TypeRatio::MinorThird => 1.2,
            TypeRatio::MajorThird => 1.25,
            TypeRatio::PerfectFourth => 1.333,
            TypeRatio::AugmentedFourth => 1.414,
            TypeRatio::PerfectFifth => 1.5,
            TypeRatio::GoldenRatio => 1.618,
        }
    }

    pub fn names() -> String {
        Self::ALL.map(|r| r.name()).join(", ")
    }
}

impl FromStr for TypeRatio {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.name() == s)
            .ok_or_else(|| TokenError::UnknownRatio {
                name: s.to_string(),
                allowed: Self::names(),
            })
    }
}

impl Serialize for TypeRatio {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// (name, exponent, font weight, line height), smallest first.
const STEPS: [(&str, i32, u16, f64); 10] = [
    ("xs", -2, 400, 1.6),
    ("sm", -1, 400, 1.5),
    ("base", 0, 400, 1.5),
    ("lg", 1, 500, 1.4),
    ("xl", 2, 600, 1.35),
    ("2xl", 3, 600, 1.3),
    ("3xl", 4, 700, 1.25),
    ("4xl", 5, 700, 1.2),
    ("5xl", 6, 800, 1.1),
    ("display", 7, 800, 1.05),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeScaleStep {
    pub name: &'static str,
    pub exponent: i32,
    pub px: f64,
    pub rem: String,
    pub font_weight: u16,
    pub line_height: f64,
}

pub(crate) fn type_scale(base_px: f64, ratio: TypeRatio) -> Vec<TypeScaleStep> {
    STEPS
        .iter()
        .map(|&(name, exponent, font_weight, line_height)| {
            let px = round2(base_px * ratio.value().powi(exponent));
            TypeScaleStep {
                name,
                exponent,
                px,
                rem: px_to_rem(px),
                font_weight,
                line_height,
            }
        })
        .collect()
}

/// Every step, `base` included, is rounded to two decimals, so the base
/// step equals `base_px` only when `base_px` has at most two decimals.
pub fn generate_type_scale(base_px: f64, ratio: &str) -> Result<Vec<TypeScaleStep>, TokenError> {
    let ratio: TypeRatio = ratio.parse()?;
    Ok(type_scale(base_px, ratio))
}
