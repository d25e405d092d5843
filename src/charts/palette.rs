//! Chart color palette, passed explicitly to the plotter.

use crate::config::{AppConfig, ConfigError, DEFAULT_PALETTE};
use plotters::style::RGBColor;

#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<RGBColor>,
}

impl Default for Palette {
    fn default() -> Self {
        let colors = DEFAULT_PALETTE
            .iter()
            .filter_map(|hex| crate::config::parse_hex_color(hex).ok())
            .map(|(r, g, b)| RGBColor(r, g, b))
            .collect();
        Self { colors }
    }
}

impl Palette {
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let colors = config
            .palette_rgb()?
            .into_iter()
            .map(|(r, g, b)| RGBColor(r, g, b))
            .collect();
        Ok(Self { colors })
    }

    /// Color for series `index`, cycling through the palette.
    pub fn color(&self, index: usize) -> RGBColor {
        self.colors[index % self.colors.len()]
    }

    /// Continuous color map over the palette stops, `t` in [0, 1].
    pub fn gradient(&self, t: f64) -> RGBColor {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        if self.colors.len() == 1 {
            return self.colors[0];
        }
        let span = (self.colors.len() - 1) as f64;
        let pos = t * span;
        let lo = (pos.floor() as usize).min(self.colors.len() - 2);
        let frac = pos - lo as f64;
        let (a, b) = (self.colors[lo], self.colors[lo + 1]);
        let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * frac).round() as u8;
        RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
    }
}

/// Perceived brightness, used to pick annotation text color.
pub fn is_dark(color: RGBColor) -> bool {
    let luma = 0.299 * color.0 as f64 + 0.587 * color.1 as f64 + 0.114 * color.2 as f64;
    luma < 128.0
}
