use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::preset::PRESETS;

// ---------------------------------------------------------------------------
// Strictness colour ramp
// ---------------------------------------------------------------------------

/// `n` colours running from red (strictest) to green (most permissive).
pub fn generate_ramp(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let t = if n == 1 { 1.0 } else { i as f32 / (n - 1) as f32 };
            let hsl = Hsl::new(t * 120.0, 0.6, 0.45);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Accent colour for a preset level; grey for levels outside the catalog.
pub fn color_for_level(level: u8) -> Color32 {
    let ramp = generate_ramp(PRESETS.len());
    PRESETS
        .iter()
        .position(|p| p.level == level)
        .and_then(|i| ramp.get(i).copied())
        .unwrap_or(Color32::GRAY)
}
