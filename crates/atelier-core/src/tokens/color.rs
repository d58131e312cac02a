use serde::{Deserialize, Serialize};

use super::contrast::Rgb;
use super::{trim_number, TokenError};

/// Shade → target lightness (percent). Order is the scale order.
pub const SHADE_RAMP: [(u16, f64); 10] = [
    (50, 97.0),
    (100, 93.0),
    (200, 85.0),
    (300, 74.0),
    (400, 62.0),
    (500, 50.0),
    (600, 41.0),
    (700, 33.0),
    (800, 24.0),
    (900, 15.0),
];

/// Stops lighter than this (or darker than `DESATURATE_BELOW`) get
/// `DESATURATE_FACTOR` applied to their saturation.
const DESATURATE_ABOVE: f64 = 90.0;
const DESATURATE_BELOW: f64 = 20.0;
const DESATURATE_FACTOR: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorStop {
    pub shade: u16,
    pub lightness: f64,
    pub saturation: f64,
    pub hex: String,
    pub hsl: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorScale {
    pub name: String,
    pub hue: f64,
    pub saturation: f64,
    stops: Vec<ColorStop>,
}

impl ColorScale {
    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    pub fn stop(&self, shade: u16) -> Option<&ColorStop> {
        self.stops.iter().find(|s| s.shade == shade)
    }
}

/// Convert HSL (degrees, percent, percent) to `#rrggbb`.
pub fn hsl_to_hex(h: f64, s: f64, l: f64) -> String {
    let s = s / 100.0;
    let l = l / 100.0;
    let a = s * l.min(1.0 - l);
    let f = |n: f64| {
        let k = (n + h / 30.0) % 12.0;
        let c = l - a * (k - 3.0).min(9.0 - k).min(1.0).max(-1.0);
        (255.0 * c).round() as u8
    };
    format!("#{:02x}{:02x}{:02x}", f(0.0), f(8.0), f(4.0))
}

/// Inverse of [`hsl_to_hex`], used to seed a scale from a brand color.
pub fn hex_to_hsl(hex: &str) -> Result<Hsl, TokenError> {
    let rgb = Rgb::from_hex(hex)?;
    let r = rgb.r as f64 / 255.0;
    let g = rgb.g as f64 / 255.0;
    let b = rgb.b as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    let d = max - min;

    if d == 0.0 {
        return Ok(Hsl { h: 0.0, s: 0.0, l: l * 100.0 });
    }

    let s = d / (1.0 - (2.0 * l - 1.0).abs());
    let h = if max == r {
        60.0 * (((g - b) / d) % 6.0)
    } else if max == g {
        60.0 * ((b - r) / d + 2.0)
    } else {
        60.0 * ((r - g) / d + 4.0)
    };
    let h = if h < 0.0 { h + 360.0 } else { h };

    Ok(Hsl {
        h: h.round(),
        s: (s * 100.0).round(),
        l: (l * 100.0).round(),
    })
}

fn stop_saturation(saturation: f64, lightness: f64) -> f64 {
    if lightness > DESATURATE_ABOVE || lightness < DESATURATE_BELOW {
        saturation * DESATURATE_FACTOR
    } else {
        saturation
    }
}

pub fn generate_color_scale(name: &str, hue: f64, saturation: f64) -> ColorScale {
    let stops = SHADE_RAMP
        .iter()
        .map(|&(shade, lightness)| {
            let s = stop_saturation(saturation, lightness);
            ColorStop {
                shade,
                lightness,
                saturation: s,
                hex: hsl_to_hex(hue, s, lightness),
                hsl: format!(
                    "hsl({}, {}%, {}%)",
                    trim_number(hue),
                    trim_number(s),
                    trim_number(lightness)
                ),
            }
        })
        .collect();

    ColorScale {
        name: name.to_string(),
        hue,
        saturation,
        stops,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hsl_to_hex_reference_points() {
        assert_eq!(hsl_to_hex(0.0, 0.0, 100.0), "#ffffff");
        assert_eq!(hsl_to_hex(0.0, 0.0, 0.0), "#000000");
        assert_eq!(hsl_to_hex(0.0, 100.0, 50.0), "#ff0000");
        assert_eq!(hsl_to_hex(120.0, 100.0, 50.0), "#00ff00");
        assert_eq!(hsl_to_hex(240.0, 100.0, 50.0), "#0000ff");
        assert_eq!(hsl_to_hex(0.0, 0.0, 50.0), "#808080");
    }

    #[test]
    fn scale_has_fixed_ramp_in_order() {
        for (hue, sat) in [(0.0, 0.0), (217.0, 91.0), (359.0, 100.0), (45.0, 12.5)] {
            let scale = generate_color_scale("brand", hue, sat);
            let shades: Vec<u16> = scale.stops().iter().map(|s| s.shade).collect();
            assert_eq!(shades, [50, 100, 200, 300, 400, 500, 600, 700, 800, 900]);
        }
    }

    #[test]
    fn extremes_are_desaturated() {
        let scale = generate_color_scale("brand", 217.0, 80.0);
        for stop in scale.stops() {
            let expected = if stop.lightness > 90.0 || stop.lightness < 20.0 {
                56.0
            } else {
                80.0
            };
            assert!((stop.saturation - expected).abs() < 1e-9, "shade {}", stop.shade);
            assert_eq!(stop.hex, hsl_to_hex(217.0, expected, stop.lightness));
        }
        assert_eq!(scale.stop(50).unwrap().hex, hsl_to_hex(217.0, 56.0, 97.0));
        assert_eq!(scale.stop(900).unwrap().hex, hsl_to_hex(217.0, 56.0, 15.0));
        assert_eq!(scale.stop(500).unwrap().hex, hsl_to_hex(217.0, 80.0, 50.0));
    }

    #[test]
    fn stop_carries_hsl_string() {
        let scale = generate_color_scale("brand", 200.0, 50.0);
        assert_eq!(scale.stop(500).unwrap().hsl, "hsl(200, 50%, 50%)");
        assert_eq!(scale.stop(50).unwrap().hsl, "hsl(200, 35%, 97%)");
    }

    #[test]
    fn hex_to_hsl_recovers_primaries() {
        let red = hex_to_hsl("#ff0000").unwrap();
        assert_eq!((red.h, red.s, red.l), (0.0, 100.0, 50.0));
        let blue = hex_to_hsl("0000ff").unwrap();
        assert_eq!((blue.h, blue.s, blue.l), (240.0, 100.0, 50.0));
        let gray = hex_to_hsl("#808080").unwrap();
        assert_eq!(gray.s, 0.0);
    }

    #[test]
    fn hex_to_hsl_rejects_garbage() {
        assert!(hex_to_hsl("#12345").is_err());
    }
}
