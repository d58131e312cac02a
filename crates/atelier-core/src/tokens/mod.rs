//! Deterministic design token generation: color ramps, type scale, spacing
//! scale and WCAG contrast checks.

pub mod color;
pub mod contrast;
pub mod spacing;
pub mod typography;

use serde::{Deserialize, Serialize};

use crate::knowledge::{TokenTemplate, TOKEN_TEMPLATES};

pub use color::{generate_color_scale, hex_to_hsl, hsl_to_hex, ColorScale, ColorStop, Hsl};
pub use contrast::{evaluate_contrast, relative_luminance, ContrastLevels, ContrastResult, Rgb};
pub use spacing::{generate_spacing_scale, SpacingStep, DEFAULT_SPACING_UNIT};
pub use typography::{generate_type_scale, TypeRatio, TypeScaleStep};

/// Root font size used for every px → rem conversion.
pub const ROOT_FONT_SIZE: f64 = 16.0;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TokenError {
    #[error("unrecognized ratio '{name}' (expected one of: {allowed})")]
    UnknownRatio { name: String, allowed: String },
    #[error("invalid color format '{input}': {reason}")]
    InvalidColor { input: String, reason: String },
}

/// Round to two decimal places.
pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Shortest decimal form: at most three fractional digits, trailing zeros
/// and a dangling point removed ("1.500" → "1.5", "2.000" → "2").
pub fn trim_number(v: f64) -> String {
    let s = format!("{:.3}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" || s.is_empty() {
        "0".to_string()
    } else {
        s.to_string()
    }
}

pub fn px_to_rem(px: f64) -> String {
    format!("{}rem", trim_number(px / ROOT_FONT_SIZE))
}

// --- Token bundle ---

const SEMANTIC_SATURATION: f64 = 70.0;
const NEUTRAL_SATURATION: f64 = 10.0;

const SEMANTIC_HUES: &[(&str, f64)] = &[
    ("success", 142.0),
    ("warning", 38.0),
    ("error", 0.0),
    ("info", 199.0),
];

/// Inputs for a complete token set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
    pub brand_color: String,
    #[serde(default = "default_ratio")]
    pub type_ratio: String,
    #[serde(default = "default_base_font_size")]
    pub base_font_size: f64,
    #[serde(default = "default_spacing_unit")]
    pub spacing_unit: f64,
}

pub fn default_ratio() -> String {
    TypeRatio::MajorThird.name().to_string()
}

pub fn default_base_font_size() -> f64 {
    ROOT_FONT_SIZE
}

pub fn default_spacing_unit() -> f64 {
    DEFAULT_SPACING_UNIT
}

impl TokenRequest {
    pub fn new(brand_color: impl Into<String>) -> Self {
        Self {
            brand_color: brand_color.into(),
            type_ratio: default_ratio(),
            base_font_size: default_base_font_size(),
            spacing_unit: default_spacing_unit(),
        }
    }
}

/// Everything the generator computes for one brand.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignTokens {
    pub brand_color: String,
    pub colors: Vec<ColorScale>,
    pub type_ratio: TypeRatio,
    pub typography: Vec<TypeScaleStep>,
    pub spacing: Vec<SpacingStep>,
    pub templates: &'static [TokenTemplate],
}

pub fn generate_tokens(req: &TokenRequest) -> Result<DesignTokens, TokenError> {
    let brand = hex_to_hsl(&req.brand_color)?;
    let ratio: TypeRatio = req.type_ratio.parse()?;

    let mut colors = vec![
        generate_color_scale("primary", brand.h, brand.s),
        generate_color_scale("neutral", brand.h, NEUTRAL_SATURATION),
    ];
    for (name, hue) in SEMANTIC_HUES {
        colors.push(generate_color_scale(name, *hue, SEMANTIC_SATURATION));
    }

    tracing::debug!(
        brand = %req.brand_color,
        ratio = ratio.name(),
        scales = colors.len(),
        "generated token set"
    );

    Ok(DesignTokens {
        brand_color: req.brand_color.clone(),
        colors,
        type_ratio: ratio,
        typography: typography::type_scale(req.base_font_size, ratio),
        spacing: generate_spacing_scale(req.spacing_unit),
        templates: TOKEN_TEMPLATES,
    })
}

impl DesignTokens {
    pub fn scale(&self, name: &str) -> Option<&ColorScale> {
        self.colors.iter().find(|c| c.name == name)
    }

    fn hex(&self, scale: &str, shade: u16) -> Option<&str> {
        self.scale(scale)?.stop(shade).map(|s| s.hex.as_str())
    }

    /// Contrast of the conventional text/background pairings in this set.
    pub fn contrast_checks(&self) -> Vec<(String, ContrastResult)> {
        let pairs: [(&str, Option<&str>, Option<&str>); 4] = [
            (
                "neutral-900 on neutral-50",
                self.hex("neutral", 900),
                self.hex("neutral", 50),
            ),
            ("primary-600 on white", self.hex("primary", 600), Some("#ffffff")),
            ("white on primary-500", Some("#ffffff"), self.hex("primary", 500)),
            ("neutral-600 on white", self.hex("neutral", 600), Some("#ffffff")),
        ];

        pairs
            .into_iter()
            .filter_map(|(label, fg, bg)| {
                let result = evaluate_contrast(fg?, bg?).ok()?;
                Some((label.to_string(), result))
            })
            .collect()
    }
}
