use serde::Serialize;

use super::TokenError;

pub const AA_NORMAL: f64 = 4.5;
pub const AAA_NORMAL: f64 = 7.0;
pub const AA_LARGE: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Parse `#rrggbb`, `rrggbb` or the `#rgb` shorthand.
    pub fn from_hex(input: &str) -> Result<Self, TokenError> {
        let invalid = |reason: &str| TokenError::InvalidColor {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let digits = input.trim().strip_prefix('#').unwrap_or(input.trim());
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid("contains non-hex characters"));
        }

        let expanded: String = match digits.len() {
            6 => digits.to_string(),
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            n => return Err(invalid(&format!("expected 3 or 6 hex digits, got {n}"))),
        };

        let channel = |i: usize| {
            u8::from_str_radix(&expanded[i..i + 2], 16).map_err(|e| invalid(&e.to_string()))
        };
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

fn linearize(channel: u8) -> f64 {
    let c = channel as f64 / 255.0;
    if c <= 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// WCAG 2.x relative luminance in [0, 1].
pub fn relative_luminance(rgb: Rgb) -> f64 {
    0.2126 * linearize(rgb.r) + 0.7152 * linearize(rgb.g) + 0.0722 * linearize(rgb.b)
}

/// Pass/fail against the WCAG thresholds. Boundaries are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContrastLevels {
    pub aa: bool,
    pub aaa: bool,
    pub aa_large: bool,
}

impl ContrastLevels {
    pub fn from_ratio(ratio: f64) -> Self {
        Self {
            aa: ratio >= AA_NORMAL,
            aaa: ratio >= AAA_NORMAL,
            aa_large: ratio >= AA_LARGE,
        }
    }

    /// Highest level passed, for report tables.
    pub fn grade(&self) -> &'static str {
        if self.aaa {
            "AAA"
        } else if self.aa {
            "AA"
        } else if self.aa_large {
            "AA large"
        } else {
            "fail"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContrastResult {
    pub foreground: String,
    pub background: String,
    pub ratio: f64,
    #[serde(flatten)]
    pub levels: ContrastLevels,
}

pub fn contrast_ratio(a: Rgb, b: Rgb) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };
    (lighter + 0.05) / (darker + 0.05)
}

pub fn evaluate_contrast(foreground: &str, background: &str) -> Result<ContrastResult, TokenError> {
    let fg = Rgb::from_hex(foreground)?;
    let bg = Rgb::from_hex(background)?;
    let ratio = contrast_ratio(fg, bg);

    Ok(ContrastResult {
        foreground: fg.to_hex(),
        background: bg.to_hex(),
        ratio,
        levels: ContrastLevels::from_ratio(ratio),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn black_on_white_is_21() {
        let r = evaluate_contrast("#000000", "#ffffff").unwrap();
        assert!((r.ratio - 21.0).abs() < 0.01);
        assert!(r.levels.aa && r.levels.aaa && r.levels.aa_large);
        assert_eq!(r.levels.grade(), "AAA");
    }

    #[test]
    fn ratio_is_symmetric() {
        let pairs = [("#336699", "#f0f0f0"), ("#ff0000", "#00ff00"), ("#777", "#fff")];
        for (x, y) in pairs {
            let a = evaluate_contrast(x, y).unwrap();
            let b = evaluate_contrast(y, x).unwrap();
            assert_eq!(a.ratio, b.ratio);
            assert_eq!(a.levels, b.levels);
        }
    }

    #[test]
    fn same_color_has_ratio_one() {
        let r = evaluate_contrast("#abcdef", "#ABCDEF").unwrap();
        assert!((r.ratio - 1.0).abs() < 1e-12);
        assert_eq!(r.levels.grade(), "fail");
    }

    #[test]
    fn thresholds_are_inclusive() {
        let at_aa = ContrastLevels::from_ratio(4.5);
        assert!(at_aa.aa && at_aa.aa_large && !at_aa.aaa);

        let at_aaa = ContrastLevels::from_ratio(7.0);
        assert!(at_aaa.aaa);

        let at_large = ContrastLevels::from_ratio(3.0);
        assert!(at_large.aa_large && !at_large.aa);

        let below = ContrastLevels::from_ratio(2.999);
        assert!(!below.aa_large);
    }

    #[test]
    fn shorthand_hex_expands() {
        assert_eq!(Rgb::from_hex("#fa0").unwrap(), Rgb { r: 0xff, g: 0xaa, b: 0x00 });
    }

    #[test]
    fn malformed_hex_is_rejected() {
        for bad in ["", "#", "#12", "#12345", "#1234567", "#gggggg", "red", "#ff00ff00"] {
            let err = evaluate_contrast(bad, "#ffffff").unwrap_err();
            assert!(matches!(err, TokenError::InvalidColor { .. }), "{bad}");
        }
    }

    #[test]
    fn luminance_bounds() {
        assert_eq!(relative_luminance(Rgb { r: 0, g: 0, b: 0 }), 0.0);
        let white = relative_luminance(Rgb { r: 255, g: 255, b: 255 });
        assert!((white - 1.0).abs() < 1e-9);
    }
}
