//! Default categorical palettes
//!
//! Lineages without explicit colours get a deterministic palette: a fixed
//! 20-colour categorical list for small counts, and evenly spaced hues on the
//! HSLuv wheel (perceptually uniform lightness) beyond that.

use super::parse::hex;
use log::debug;
use palette::{FromColor, Hsluv, Srgb};
use serde::{Deserialize, Serialize};

/// 20-colour categorical palette (dark tones first, then their light variants)
pub const CATEGORICAL_20: [&str; 20] = [
    "#1f77b4", "#ff7f0e", "#279e68", "#d62728", "#aa40fc", "#8c564b", "#e377c2", "#b5bd61",
    "#17becf", "#aec7e8", "#ffbb78", "#98df8a", "#ff9896", "#c5b0d5", "#c49c94", "#f7b6d2",
    "#dbdb8d", "#9edae5", "#ad494a", "#8c6d31",
];

/// Settings for default colour generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    /// Largest count served from the discrete palette (capped at 20)
    pub max_discrete: usize,
    /// HSLuv saturation (0-100) for the continuous palette
    pub saturation: f32,
    /// HSLuv lightness (0-100) for the continuous palette
    pub lightness: f32,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            max_discrete: CATEGORICAL_20.len(),
            saturation: 85.0,
            lightness: 60.0,
        }
    }
}

/// `n` distinct colours as `#rrggbb`, using the default configuration
pub fn categorical_colors(n: usize) -> Vec<String> {
    categorical_colors_with(n, &PaletteConfig::default())
}

/// `n` distinct colours as `#rrggbb`
pub fn categorical_colors_with(n: usize, config: &PaletteConfig) -> Vec<String> {
    let discrete = config.max_discrete.min(CATEGORICAL_20.len());
    if n <= discrete {
        return CATEGORICAL_20[..n].iter().map(|c| c.to_string()).collect();
    }

    debug!("Sampling {} colors from the continuous HSLuv palette", n);
    (0..n)
        .map(|i| {
            let hue = 360.0 * i as f32 / n as f32;
            let hsluv: Hsluv = Hsluv::new(hue, config.saturation, config.lightness);
            let rgb: Srgb<f32> = Srgb::from_color(hsluv);
            hex(&rgb.into_format::<u8>())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_small_palette() {
        assert_eq!(categorical_colors(3), vec!["#1f77b4", "#ff7f0e", "#279e68"]);
        assert!(categorical_colors(0).is_empty());
        assert_eq!(categorical_colors(20).len(), 20);
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(categorical_colors(7), categorical_colors(7));
        assert_eq!(categorical_colors(45), categorical_colors(45));
    }

    #[test]
    fn test_large_palette_is_distinct() {
        let colors = categorical_colors(40);
        assert_eq!(colors.len(), 40);
        let unique: HashSet<_> = colors.iter().collect();
        assert_eq!(unique.len(), 40);
        assert!(colors.iter().all(|c| c.len() == 7 && c.starts_with('#')));
    }

    #[test]
    fn test_config_limits_discrete() {
        let config = PaletteConfig {
            max_discrete: 2,
            ..PaletteConfig::default()
        };
        let colors = categorical_colors_with(3, &config);
        assert_eq!(colors.len(), 3);
        assert_ne!(colors, categorical_colors(3));
    }
}
