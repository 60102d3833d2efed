//! Radar tab: regional and national composites with animation controls.

use super::colors;
use super::radar_texture::RadarTextures;
use crate::state::AppState;
use crate::storage::RadarFrame;
use eframe::egui::{self, RichText};
use egui_phosphor::regular as ph;
use web_time::Instant;

pub fn render_radar_tab(ui: &mut egui::Ui, state: &mut AppState, textures: &mut RadarTextures) {
    let radar = &mut state.radar;
    textures.sync(radar.generation());

    ui.horizontal(|ui| {
        let loaded = radar.is_loaded();
        let (glyph, label) = if radar.is_animating() {
            (ph::STOP, "Actual")
        } else {
            (ph::PLAY, "Animar")
        };
        let button = egui::Button::new(RichText::new(format!("{} {}", glyph, label)).size(18.0))
            .min_size(egui::vec2(140.0, 36.0));
        if ui.add_enabled(loaded, button).clicked() {
            if radar.is_animating() {
                radar.show_current();
            } else {
                radar.start_animation(Instant::now());
            }
        }

        ui.separator();
        ui.label(
            RichText::new(radar.displayed_label())
                .strong()
                .size(20.0)
                .color(colors::ui::VALUE),
        );
        ui.label(
            RichText::new(format!("{} imágenes", radar.regional.len()))
                .size(12.0)
                .color(colors::ui::LABEL),
        );
    });

    let regional = radar.displayed_regional().cloned();
    let national = radar.displayed_national().cloned();

    ui.columns(2, |columns| {
        render_frame(&mut columns[0], textures, regional.as_ref());
        render_frame(&mut columns[1], textures, national.as_ref());
    });
}

fn render_frame(ui: &mut egui::Ui, textures: &mut RadarTextures, frame: Option<&RadarFrame>) {
    let texture = frame.and_then(|f| textures.get(ui.ctx(), &f.path));
    match texture {
        Some(texture) => {
            ui.add(
                egui::Image::new(&texture)
                    .max_size(ui.available_size())
                    .maintain_aspect_ratio(true),
            );
        }
        None => {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("Sin imagen").size(16.0).color(colors::ui::DIM));
            });
        }
    }
}
