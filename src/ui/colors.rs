//! Centralized color constants for the UI.
//!
//! This module provides consistent colors across all tabs.

use eframe::egui::Color32;

/// General UI colors for labels and values.
pub mod ui {
    use super::Color32;

    /// Muted gray for captions.
    pub const LABEL: Color32 = Color32::from_rgb(130, 130, 140);
    /// Brighter color for values.
    pub const VALUE: Color32 = Color32::from_rgb(220, 220, 230);
    /// Emphasized color for active states.
    pub const ACTIVE: Color32 = Color32::from_rgb(100, 180, 255);
    /// Dim text color.
    pub const DIM: Color32 = Color32::from_rgb(90, 90, 100);
    /// Source healthy.
    pub const SUCCESS: Color32 = Color32::from_rgb(100, 200, 100);
    /// Source failing.
    pub const ERROR: Color32 = Color32::from_rgb(255, 80, 80);
}

/// Colors for the forecast cards and hour rows.
pub mod forecast {
    use super::Color32;

    pub const MAX_TEMP: Color32 = Color32::from_rgb(255, 140, 90);
    pub const MIN_TEMP: Color32 = Color32::from_rgb(110, 170, 255);
    pub const RAIN: Color32 = Color32::from_rgb(90, 160, 230);
    pub const DAY_ICON: Color32 = Color32::from_rgb(255, 210, 80);
    pub const NIGHT_ICON: Color32 = Color32::from_rgb(180, 190, 230);
    pub const CARD_BACKGROUND: Color32 = Color32::from_rgb(32, 34, 44);
}

/// Colors for the measurement plots.
pub mod plot {
    use super::Color32;

    /// Background color for the plot area.
    pub const BACKGROUND: Color32 = Color32::from_rgb(30, 30, 40);
    /// Border color for the plot area.
    pub const BORDER: Color32 = Color32::from_rgb(60, 60, 80);
    /// Major grid line color.
    pub const GRID_MAJOR: Color32 = Color32::from_rgb(70, 70, 90);
    /// Minor grid line color.
    pub const GRID_MINOR: Color32 = Color32::from_rgb(45, 45, 58);
    /// Tick label text color.
    pub const TICK_LABEL: Color32 = Color32::from_rgb(140, 140, 160);
    /// Outdoor station series.
    pub const OUTDOOR: Color32 = Color32::from_rgb(255, 140, 90);
    /// Indoor sensor series.
    pub const INDOOR: Color32 = Color32::from_rgb(100, 200, 140);
    /// Standard pressure reference line.
    pub const REFERENCE: Color32 = Color32::from_rgb(200, 200, 100);
}
