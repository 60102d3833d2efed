//! Top bar UI: tabs, source status, and clock.

use super::colors;
use crate::state::{AppState, Tab};
use chrono::Local;
use eframe::egui::{self, RichText};
use web_time::Instant;

pub fn render_top_bar(ctx: &egui::Context, state: &mut AppState) {
    egui::TopBottomPanel::top("top_bar")
        .exact_height(44.0)
        .show(ctx, |ui| {
            ui.horizontal_centered(|ui| {
                // Tabs, sized for fingers
                for &tab in Tab::all() {
                    let selected = state.active_tab == tab;
                    let mut text = RichText::new(tab.label()).size(18.0);
                    if selected {
                        text = text.strong().color(colors::ui::ACTIVE);
                    }
                    let button = egui::Button::new(text)
                        .selected(selected)
                        .min_size(egui::vec2(120.0, 36.0));
                    if ui.add(button).clicked() {
                        state.select_tab(tab, Instant::now(), Local::now().naive_local());
                    }
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        RichText::new(&state.clock)
                            .strong()
                            .size(22.0)
                            .color(colors::ui::VALUE),
                    );

                    ui.separator();

                    // Source status, rightmost first; tapping one polls it now
                    let mut refresh = Vec::new();
                    for status in state.sources.iter().rev() {
                        let color = if status.snapshot.last_error.is_some() {
                            colors::ui::ERROR
                        } else if status.is_healthy() {
                            colors::ui::SUCCESS
                        } else {
                            colors::ui::DIM
                        };
                        let summary = egui::Label::new(
                            RichText::new(status.summary()).size(11.0).color(color),
                        )
                        .sense(egui::Sense::click());
                        if ui.add(summary).on_hover_text(status.detail()).clicked() {
                            refresh.push(status.name);
                        }
                        ui.label(
                            RichText::new(status.name)
                                .size(11.0)
                                .color(colors::ui::LABEL),
                        );
                    }
                    state.refresh_requests.extend(refresh);
                });
            });
        });
}
