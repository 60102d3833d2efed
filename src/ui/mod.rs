//! UI modules for the weather hub.
//!
//! The UI is a top bar plus one central panel per tab:
//! - Top bar: tab buttons, per-source status, clock
//! - Forecast: today, next days, hour strip
//! - Radar: regional/national composites and animation
//! - Measurements: current values and history plots

pub mod colors;
mod forecast_tab;
pub mod icons;
mod measurements_tab;
pub mod plot;
mod radar_tab;
mod radar_texture;
mod top_bar;

pub use forecast_tab::render_forecast_tab;
pub use measurements_tab::render_measurements_tab;
pub use radar_tab::render_radar_tab;
pub use radar_texture::RadarTextures;
pub use top_bar::render_top_bar;

use crate::state::{AppState, Tab};
use eframe::egui;

/// Renders the panel for the selected tab.
pub fn render_active_tab(ctx: &egui::Context, state: &mut AppState, textures: &mut RadarTextures) {
    egui::CentralPanel::default().show(ctx, |ui| match state.active_tab {
        Tab::Forecast => render_forecast_tab(ui, state),
        Tab::Radar => render_radar_tab(ui, state, textures),
        Tab::Measurements => render_measurements_tab(ui, state),
    });
}
