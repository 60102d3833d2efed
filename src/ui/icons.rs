//! Weather glyphs from the Phosphor icon font.

use super::colors;
use eframe::egui::{self, Color32};
use egui_phosphor::regular as ph;

/// Registers the Phosphor font alongside egui's default fonts.
pub fn install_fonts(ctx: &egui::Context) {
    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
    ctx.set_fonts(fonts);
}

/// Night variants of AEMET sky codes end in "n".
pub fn is_night(code: &str) -> bool {
    code.trim().ends_with('n')
}

/// Glyph for an AEMET sky state code such as "12" or "43n".
pub fn sky_glyph(code: &str) -> &'static str {
    let night = is_night(code);
    let number = code.trim().trim_end_matches('n').parse::<u32>().unwrap_or(0);

    match number {
        11 if night => ph::MOON,
        11 => ph::SUN,
        12 | 13 | 17 if night => ph::CLOUD_MOON,
        12 | 13 | 17 => ph::CLOUD_SUN,
        14..=16 => ph::CLOUD,
        23..=26 | 43..=46 => ph::CLOUD_RAIN,
        33..=36 | 71..=74 => ph::CLOUD_SNOW,
        51..=54 | 61..=64 => ph::CLOUD_LIGHTNING,
        81..=83 => ph::CLOUD_FOG,
        _ => ph::QUESTION,
    }
}

pub fn sky_color(code: &str) -> Color32 {
    if is_night(code) {
        colors::forecast::NIGHT_ICON
    } else {
        colors::forecast::DAY_ICON
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sky_glyphs() {
        assert_eq!(sky_glyph("11"), ph::SUN);
        assert_eq!(sky_glyph("11n"), ph::MOON);
        assert_eq!(sky_glyph("13n"), ph::CLOUD_MOON);
        assert_eq!(sky_glyph("16"), ph::CLOUD);
        assert_eq!(sky_glyph("45"), ph::CLOUD_RAIN);
        assert_eq!(sky_glyph("72n"), ph::CLOUD_SNOW);
        assert_eq!(sky_glyph("62"), ph::CLOUD_LIGHTNING);
        assert_eq!(sky_glyph("81"), ph::CLOUD_FOG);
        assert_eq!(sky_glyph(""), ph::QUESTION);
    }

    #[test]
    fn test_night_color() {
        assert_eq!(sky_color("12n"), colors::forecast::NIGHT_ICON);
        assert_eq!(sky_color("12"), colors::forecast::DAY_ICON);
    }
}
