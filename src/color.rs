use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Dimension;

/// Line colour of the average trace on the radar chart (royal blue).
pub const AVERAGE_COLOR: Color32 = Color32::from_rgb(65, 105, 225);

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.5);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Faint fill for one respondent's radar polygon.
pub fn respondent_fill() -> Color32 {
    Color32::from_rgba_unmultiplied(100, 100, 200, 12)
}

pub fn respondent_stroke() -> Color32 {
    Color32::from_rgba_unmultiplied(100, 100, 200, 50)
}

// ---------------------------------------------------------------------------
// Dimension → Color32
// ---------------------------------------------------------------------------

/// One distinct colour per PERMA+V dimension, used by the distribution plot.
#[derive(Debug, Clone)]
pub struct DimensionColors {
    mapping: BTreeMap<Dimension, Color32>,
    default_color: Color32,
}

impl DimensionColors {
    pub fn new(dims: &[Dimension]) -> Self {
        let mapping = dims
            .iter()
            .copied()
            .zip(generate_palette(dims.len()))
            .collect();
        DimensionColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, dim: Dimension) -> Color32 {
        self.mapping.get(&dim).copied().unwrap_or(self.default_color)
    }
}

impl Default for DimensionColors {
    fn default() -> Self {
        Self::new(&Dimension::ALL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size_and_distinct_colours() {
        assert!(generate_palette(0).is_empty());
        let colors = generate_palette(6);
        assert_eq!(colors.len(), 6);
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn unmapped_dimension_falls_back_to_gray() {
        let colors = DimensionColors::new(&[Dimension::P]);
        assert_ne!(colors.color_for(Dimension::P), Color32::GRAY);
        assert_eq!(colors.color_for(Dimension::V), Color32::GRAY);
    }
}
