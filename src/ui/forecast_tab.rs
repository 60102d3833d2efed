//! Forecast tab: today, the next days, and a scrollable hour strip.

use super::colors;
use super::icons::{sky_color, sky_glyph};
use crate::state::forecast::{DayCard, HourRow, TodayCard};
use crate::state::AppState;
use eframe::egui::{self, RichText};
use egui_phosphor::regular as ph;

pub fn render_forecast_tab(ui: &mut egui::Ui, state: &mut AppState) {
    let forecast = &mut state.forecast;

    ui.horizontal(|ui| {
        render_today(ui, &forecast.today, forecast.location.as_deref());
        for day in &forecast.days {
            render_day(ui, day);
        }
    });

    ui.add_space(6.0);

    let loaded = forecast.is_loaded();
    ui.horizontal(|ui| {
        let arrow = |glyph: &str| {
            egui::Button::new(RichText::new(glyph).size(28.0)).min_size(egui::vec2(40.0, 150.0))
        };

        if ui.add_enabled(loaded, arrow(ph::CARET_LEFT)).clicked() {
            forecast.move_window(-1);
        }

        let rows = forecast.visible_rows();
        let width = (ui.available_width() - 48.0) / rows.len().max(1) as f32;
        for row in rows {
            render_hour(ui, row, width);
        }

        if ui.add_enabled(loaded, arrow(ph::CARET_RIGHT)).clicked() {
            forecast.move_window(1);
        }
    });
}

fn card_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(colors::forecast::CARD_BACKGROUND)
        .corner_radius(6.0)
        .inner_margin(egui::Margin::same(6))
}

fn icon(ui: &mut egui::Ui, code: &str, size: f32) {
    ui.label(
        RichText::new(sky_glyph(code))
            .size(size)
            .color(sky_color(code)),
    );
}

fn min_max(ui: &mut egui::Ui, min: &str, max: &str, size: f32) {
    ui.horizontal(|ui| {
        ui.label(RichText::new(min).size(size).color(colors::forecast::MIN_TEMP));
        ui.label(RichText::new(max).size(size).color(colors::forecast::MAX_TEMP));
    });
}

fn render_today(ui: &mut egui::Ui, today: &TodayCard, location: Option<&str>) {
    card_frame().show(ui, |ui| {
        ui.set_width(250.0);
        ui.vertical(|ui| {
            if let Some(location) = location {
                ui.label(RichText::new(location).size(12.0).color(colors::ui::LABEL));
            }
            ui.label(RichText::new(&today.date).size(15.0).color(colors::ui::VALUE));

            ui.horizontal(|ui| {
                icon(ui, &today.icon, 56.0);
                ui.vertical(|ui| {
                    min_max(ui, &today.min_temp, &today.max_temp, 22.0);
                    ui.label(
                        RichText::new(&today.description)
                            .size(12.0)
                            .color(colors::ui::LABEL),
                    );
                });
            });

            let detail = |ui: &mut egui::Ui, glyph: &str, value: &str| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(glyph).size(14.0).color(colors::ui::LABEL));
                    ui.label(RichText::new(value).size(14.0).color(colors::ui::VALUE));
                });
            };
            detail(
                ui,
                ph::WIND,
                &format!("{} {}", today.wind_arrow, today.wind_speed),
            );
            detail(ui, ph::UMBRELLA, &today.precipitation);
            detail(ui, ph::THERMOMETER, &today.thermal_sensation);
            detail(ui, ph::DROP, &today.humidity);
            detail(ui, ph::SUN, &format!("UV {}", today.uv_max));
        });
    });
}

fn render_day(ui: &mut egui::Ui, day: &DayCard) {
    card_frame().show(ui, |ui| {
        ui.set_width(80.0);
        ui.vertical_centered(|ui| {
            ui.label(RichText::new(&day.weekday).size(14.0).color(colors::ui::VALUE));
            icon(ui, &day.icon, 40.0);
            min_max(ui, &day.min_temp, &day.max_temp, 15.0);
            ui.label(
                RichText::new(format!("{} {}", day.wind_arrow, day.wind_speed))
                    .size(13.0)
                    .color(colors::ui::VALUE),
            );
            ui.label(
                RichText::new(&day.precipitation)
                    .size(13.0)
                    .color(colors::forecast::RAIN),
            );
        });
    });
}

fn render_hour(ui: &mut egui::Ui, row: &HourRow, width: f32) {
    ui.allocate_ui(egui::vec2(width, 150.0), |ui| {
        ui.set_width(width);
        ui.vertical_centered(|ui| {
            ui.label(RichText::new(&row.weekday).size(11.0).color(colors::ui::LABEL));
            ui.label(RichText::new(&row.hour).size(14.0).color(colors::ui::VALUE));
            icon(ui, &row.icon, 26.0);
            ui.label(RichText::new(&row.temperature).size(14.0).color(colors::ui::VALUE));
            ui.label(RichText::new(&row.humidity).size(11.0).color(colors::ui::LABEL));
            ui.label(
                RichText::new(format!("{} {}", row.wind_arrow, row.wind_speed))
                    .size(11.0)
                    .color(colors::ui::VALUE),
            );
            ui.label(
                RichText::new(&row.precipitation)
                    .size(11.0)
                    .color(colors::forecast::RAIN),
            );
        });
    });
}
