use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Brand colours
// ---------------------------------------------------------------------------

pub const BRAND_GREEN: Color32 = Color32::from_rgb(0x93, 0xC8, 0x3D);
pub const BRAND_TEAL: Color32 = Color32::from_rgb(0x00, 0xB3, 0xA7);
pub const BRAND_NAVY: Color32 = Color32::from_rgb(0x19, 0x28, 0x6E);
pub const BRAND_BLUE: Color32 = Color32::from_rgb(0x4B, 0x7B, 0xF5);

pub const BRAND: [Color32; 4] = [BRAND_GREEN, BRAND_TEAL, BRAND_NAVY, BRAND_BLUE];

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

/// One colour per category: the brand colours first, then generated hues.
pub fn category_colors(n: usize) -> Vec<Color32> {
    let mut colors: Vec<Color32> = BRAND.iter().copied().take(n).collect();
    if n > BRAND.len() {
        colors.extend(generate_palette(n - BRAND.len()));
    }
    colors
}
