//! Measurements tab: outdoor and indoor readings with 24 h extremes and
//! history plots.

use super::colors;
use super::plot::{render_plot, PlotSpec, Series};
use crate::data::measurements::STANDARD_PRESSURE_HPA;
use crate::state::{AppState, StationLabels};
use eframe::egui::{self, RichText};

const TEMPERATURE: PlotSpec = PlotSpec {
    title: "Temperatura (°C)",
    y_major: 1.0,
    y_minor: 0.25,
    x_minor_hours: 6,
    reference: None,
};

const HUMIDITY: PlotSpec = PlotSpec {
    title: "Humedad (%)",
    y_major: 10.0,
    y_minor: 2.5,
    x_minor_hours: 6,
    reference: None,
};

const PRESSURE: PlotSpec = PlotSpec {
    title: "Presión (hPa)",
    y_major: 2.0,
    y_minor: 1.0,
    x_minor_hours: 12,
    reference: Some(STANDARD_PRESSURE_HPA),
};

pub fn render_measurements_tab(ui: &mut egui::Ui, state: &AppState) {
    let m = &state.measurements;

    ui.horizontal(|ui| {
        station(ui, "Exterior", colors::plot::OUTDOOR, &m.outdoor_labels, true);
        ui.separator();
        station(ui, "Interior", colors::plot::INDOOR, &m.indoor_labels, false);
    });

    ui.add_space(4.0);

    let outdoor_temp = m.outdoor.points(|s| Some(s.temperature));
    let indoor_temp = m.indoor.points(|s| Some(s.temperature));
    let outdoor_hum = m.outdoor.points(|s| Some(s.humidity));
    let indoor_hum = m.indoor.points(|s| Some(s.humidity));
    let pressure = m.outdoor.points(|s| s.pressure);

    let width = (ui.available_width() - 2.0 * ui.spacing().item_spacing.x) / 3.0;
    let size = egui::vec2(width, ui.available_height().max(120.0));

    ui.horizontal(|ui| {
        render_plot(
            ui,
            size,
            &TEMPERATURE,
            &[
                Series {
                    points: &outdoor_temp,
                    color: colors::plot::OUTDOOR,
                },
                Series {
                    points: &indoor_temp,
                    color: colors::plot::INDOOR,
                },
            ],
        );
        render_plot(
            ui,
            size,
            &HUMIDITY,
            &[
                Series {
                    points: &outdoor_hum,
                    color: colors::plot::OUTDOOR,
                },
                Series {
                    points: &indoor_hum,
                    color: colors::plot::INDOOR,
                },
            ],
        );
        render_plot(
            ui,
            size,
            &PRESSURE,
            &[Series {
                points: &pressure,
                color: colors::plot::OUTDOOR,
            }],
        );
    });
}

fn station(
    ui: &mut egui::Ui,
    title: &str,
    accent: egui::Color32,
    labels: &StationLabels,
    with_pressure: bool,
) {
    ui.vertical(|ui| {
        ui.label(RichText::new(title).strong().size(15.0).color(accent));
        ui.horizontal(|ui| {
            ui.label(
                RichText::new(&labels.temperature)
                    .size(26.0)
                    .color(colors::ui::VALUE),
            );
            ui.label(
                RichText::new(&labels.humidity)
                    .size(20.0)
                    .color(colors::ui::VALUE),
            );
            if with_pressure {
                ui.label(
                    RichText::new(&labels.pressure)
                        .size(16.0)
                        .color(colors::ui::VALUE),
                );
            }
        });

        egui::Grid::new(title).num_columns(3).show(ui, |ui| {
            let caption = |ui: &mut egui::Ui, text: &str| {
                ui.label(RichText::new(text).size(11.0).color(colors::ui::LABEL));
            };
            let value = |ui: &mut egui::Ui, text: &str| {
                ui.label(RichText::new(text).size(12.0).color(colors::ui::VALUE));
            };

            caption(ui, "24 h");
            caption(ui, "máx.");
            caption(ui, "mín.");
            ui.end_row();

            caption(ui, "Temp.");
            value(ui, &labels.max_temperature);
            value(ui, &labels.min_temperature);
            ui.end_row();

            caption(ui, "Hum.");
            value(ui, &labels.max_humidity);
            value(ui, &labels.min_humidity);
            ui.end_row();
        });
    });
}
