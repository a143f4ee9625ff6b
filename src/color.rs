use std::collections::HashMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

use crate::data::aggregate::GroupOrder;

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
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            to_color32(rgb)
        })
        .collect()
}

fn to_color32(rgb: Srgb) -> Color32 {
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8,
    )
}

/// Blue → white → red scale for correlations in `[-1, 1]`.
pub fn diverging(value: f64) -> Color32 {
    let t = value.clamp(-1.0, 1.0) as f32;
    let white = LinSrgb::new(1.0, 1.0, 1.0);
    let end: LinSrgb = if t < 0.0 {
        Srgb::new(0.23, 0.30, 0.75).into_linear()
    } else {
        Srgb::new(0.71, 0.02, 0.15).into_linear()
    };
    let mixed = white.mix(end, t.abs());
    to_color32(Srgb::from_linear(mixed))
}

// ---------------------------------------------------------------------------
// Color mapping: category label → Color32
// ---------------------------------------------------------------------------

/// Maps category labels (tree types, operations) to distinct colours.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    /// Labels in the order they were given.
    labels: Vec<String>,
    mapping: HashMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Colours are assigned in the given order so a label keeps its colour
    /// as long as the label list is unchanged.
    pub fn new(labels: &[String]) -> Self {
        let palette = generate_palette(labels.len());
        let mapping: HashMap<String, Color32> = labels
            .iter()
            .cloned()
            .zip(palette)
            .collect();

        ColorMap {
            labels: labels.to_vec(),
            mapping,
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }

    /// Legend entries (label → colour), in label order or alphabetical.
    pub fn legend_entries(&self, order: GroupOrder) -> Vec<(String, Color32)> {
        let mut entries: Vec<(String, Color32)> = self
            .labels
            .iter()
            .map(|label| (label.clone(), self.color_for(label)))
            .collect();
        order.apply(&mut entries, |(label, _)| label.as_str());
        entries
    }
}
