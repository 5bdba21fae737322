//! Colour parsing and normalisation
//!
//! Every accepted colour form is reduced to an 8-bit sRGB triple and stored as
//! a lowercase `#rrggbb` string. Alpha is accepted on input but not kept.

use crate::lineage::{LineageError, Result};
use palette::Srgb;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Single-letter shorthands
const BASE_COLORS: [(&str, (f64, f64, f64)); 8] = [
    ("b", (0.0, 0.0, 1.0)),
    ("g", (0.0, 0.5, 0.0)),
    ("r", (1.0, 0.0, 0.0)),
    ("c", (0.0, 0.75, 0.75)),
    ("m", (0.75, 0.0, 0.75)),
    ("y", (0.75, 0.75, 0.0)),
    ("k", (0.0, 0.0, 0.0)),
    ("w", (1.0, 1.0, 1.0)),
];

/// Tableau palette, addressable as `tab:<name>` or as the cycle entries `C0`..`C9`
const TABLEAU_COLORS: [(&str, &str); 10] = [
    ("blue", "#1f77b4"),
    ("orange", "#ff7f0e"),
    ("green", "#2ca02c"),
    ("red", "#d62728"),
    ("purple", "#9467bd"),
    ("brown", "#8c564b"),
    ("pink", "#e377c2"),
    ("gray", "#7f7f7f"),
    ("olive", "#bcbd22"),
    ("cyan", "#17becf"),
];

/// A colour as supplied by a caller, before validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorSpec {
    /// Hex string, named colour, grey level ("0.5") or palette reference
    Name(String),
    /// RGB floats in [0, 1]
    Rgb(f64, f64, f64),
    /// RGBA floats in [0, 1]
    Rgba(f64, f64, f64, f64),
}

impl From<&str> for ColorSpec {
    fn from(s: &str) -> Self {
        ColorSpec::Name(s.to_string())
    }
}

impl From<String> for ColorSpec {
    fn from(s: String) -> Self {
        ColorSpec::Name(s)
    }
}

impl From<&String> for ColorSpec {
    fn from(s: &String) -> Self {
        ColorSpec::Name(s.clone())
    }
}

impl From<(f64, f64, f64)> for ColorSpec {
    fn from((r, g, b): (f64, f64, f64)) -> Self {
        ColorSpec::Rgb(r, g, b)
    }
}

impl From<(f64, f64, f64, f64)> for ColorSpec {
    fn from((r, g, b, a): (f64, f64, f64, f64)) -> Self {
        ColorSpec::Rgba(r, g, b, a)
    }
}

impl TryFrom<&Value> for ColorSpec {
    type Error = LineageError;

    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(ColorSpec::Name(s.clone())),
            Value::Array(items) => {
                let channels = items
                    .iter()
                    .map(Value::as_f64)
                    .collect::<Option<Vec<f64>>>()
                    .ok_or_else(|| LineageError::InvalidColor(value.to_string()))?;
                match channels[..] {
                    [r, g, b] => Ok(ColorSpec::Rgb(r, g, b)),
                    [r, g, b, a] => Ok(ColorSpec::Rgba(r, g, b, a)),
                    _ => Err(LineageError::InvalidColor(value.to_string())),
                }
            }
            other => Err(LineageError::InvalidColor(other.to_string())),
        }
    }
}

impl std::fmt::Display for ColorSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColorSpec::Name(s) => write!(f, "{}", s),
            ColorSpec::Rgb(r, g, b) => write!(f, "({}, {}, {})", r, g, b),
            ColorSpec::Rgba(r, g, b, a) => write!(f, "({}, {}, {}, {})", r, g, b, a),
        }
    }
}

impl ColorSpec {
    /// Resolve to an 8-bit sRGB colour
    pub fn to_rgb(&self) -> Result<Srgb<u8>> {
        let invalid = || LineageError::InvalidColor(self.to_string());
        match self {
            ColorSpec::Name(s) => parse_str(s).ok_or_else(invalid),
            ColorSpec::Rgb(r, g, b) => from_unit_floats(&[*r, *g, *b]).ok_or_else(invalid),
            ColorSpec::Rgba(r, g, b, a) => {
                from_unit_floats(&[*r, *g, *b, *a]).ok_or_else(invalid)
            }
        }
    }

    /// Canonical lowercase `#rrggbb` form
    pub fn to_hex(&self) -> Result<String> {
        self.to_rgb().map(|rgb| hex(&rgb))
    }
}

/// Format an sRGB colour as `#rrggbb`
pub fn hex(rgb: &Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb.red, rgb.green, rgb.blue)
}

fn parse_str(raw: &str) -> Option<Srgb<u8>> {
    let s = raw.trim();
    if let Some(digits) = s.strip_prefix('#') {
        return parse_hex_digits(digits);
    }
    let lower = s.to_ascii_lowercase();

    if let Some((_, (r, g, b))) = BASE_COLORS.iter().find(|(k, _)| *k == lower) {
        return from_unit_floats(&[*r, *g, *b]);
    }
    if let Some(name) = lower.strip_prefix("tab:") {
        let name = if name == "grey" { "gray" } else { name };
        return TABLEAU_COLORS
            .iter()
            .find(|(k, _)| *k == name)
            .and_then(|(_, h)| parse_hex_digits(&h[1..]));
    }
    if let Some(n) = lower.strip_prefix('c').and_then(|n| n.parse::<usize>().ok()) {
        let (_, h) = TABLEAU_COLORS[n % TABLEAU_COLORS.len()];
        return parse_hex_digits(&h[1..]);
    }
    // Grey level, e.g. "0.75"
    if let Ok(level) = lower.parse::<f64>() {
        return from_unit_floats(&[level, level, level]);
    }
    palette::named::from_str(&lower)
}

fn parse_hex_digits(digits: &str) -> Option<Srgb<u8>> {
    if !(digits.len() == 6 || digits.len() == 8) || !digits.chars().all(|c| c.is_ascii_hexdigit())
    {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(Srgb::new(channel(0)?, channel(2)?, channel(4)?))
}

fn from_unit_floats(channels: &[f64]) -> Option<Srgb<u8>> {
    if channels.iter().any(|c| !c.is_finite() || *c < 0.0 || *c > 1.0) {
        return None;
    }
    let to_u8 = |c: f64| (c * 255.0).round_ties_even() as u8;
    Some(Srgb::new(to_u8(channels[0]), to_u8(channels[1]), to_u8(channels[2])))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_forms() {
        assert_eq!(ColorSpec::from("#ABABAB").to_hex().unwrap(), "#ababab");
        assert_eq!(ColorSpec::from("#ff00FF").to_hex().unwrap(), "#ff00ff");
        assert_eq!(ColorSpec::from("#ff000080").to_hex().unwrap(), "#ff0000");
        assert!(ColorSpec::from("#fff").to_hex().is_err());
        assert!(ColorSpec::from("#gggggg").to_hex().is_err());
    }

    #[test]
    fn test_tuples() {
        assert_eq!(ColorSpec::from((0.0, 0.0, 0.0)).to_hex().unwrap(), "#000000");
        assert_eq!(ColorSpec::from((0.5, 0.5, 0.5)).to_hex().unwrap(), "#808080");
        assert_eq!(ColorSpec::from((1.0, 1.0, 1.0, 0.2)).to_hex().unwrap(), "#ffffff");
        assert!(ColorSpec::from((1.5, 0.0, 0.0)).to_hex().is_err());
        assert!(ColorSpec::from((f64::NAN, 0.0, 0.0)).to_hex().is_err());
    }

    #[test]
    fn test_named_colors() {
        assert_eq!(ColorSpec::from("red").to_hex().unwrap(), "#ff0000");
        assert_eq!(ColorSpec::from("SteelBlue").to_hex().unwrap(), "#4682b4");
        assert_eq!(ColorSpec::from("k").to_hex().unwrap(), "#000000");
        assert_eq!(ColorSpec::from("g").to_hex().unwrap(), "#008000");
        assert_eq!(ColorSpec::from("tab:orange").to_hex().unwrap(), "#ff7f0e");
        assert_eq!(ColorSpec::from("C1").to_hex().unwrap(), "#ff7f0e");
        assert_eq!(ColorSpec::from("0.5").to_hex().unwrap(), "#808080");
    }

    #[test]
    fn test_invalid_names() {
        for bad in ["foobar", "foo", "", "tab:mauve", "1.5"] {
            let err = ColorSpec::from(bad).to_hex().unwrap_err();
            assert!(matches!(err, LineageError::InvalidColor(_)), "{}", bad);
        }
    }

    #[test]
    fn test_from_json() {
        let spec = ColorSpec::try_from(&serde_json::json!([0.0, 1.0, 0.0])).unwrap();
        assert_eq!(spec.to_hex().unwrap(), "#00ff00");
        assert!(ColorSpec::try_from(&serde_json::json!(42)).is_err());
        assert!(ColorSpec::try_from(&serde_json::json!([0.0, 1.0])).is_err());
    }
}
