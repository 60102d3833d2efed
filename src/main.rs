#![warn(clippy::all)]

//! Pi Weather Hub
//!
//! A touchscreen weather dashboard: AEMET forecasts and radar, an outdoor
//! station published to a spreadsheet, and a local SHT31 sensor.

mod aemet;
mod config;
mod data;
mod error;
mod sensor;
mod sheets;
mod state;
mod storage;
mod ui;
mod workers;

use aemet::AemetClient;
use chrono::Local;
use config::HubConfig;
use data::measurements::MeasurementSeries;
use eframe::egui;
use error::FetchError;
use sheets::SheetsClient;
use state::{AppState, Tab};
use std::time::Duration;
use storage::{RadarArchive, SensorHistory};
use web_time::Instant;
use workers::{
    ForecastSource, ForecastUpdate, PollChannel, PollResult, RadarSource, RadarUpdate,
    SheetSource, SourceStats,
};

/// Longest time between repaints, so the clock keeps ticking.
const IDLE_REPAINT: Duration = Duration::from_secs(1);

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = HubConfig::load().map_err(|e| {
        log::error!("{}", e);
        eframe::Error::AppCreation(Box::new(e))
    })?;

    let viewport = egui::ViewportBuilder::default()
        .with_title("Pi Weather Hub")
        .with_inner_size([config.display.width, config.display.height])
        .with_fullscreen(config.display.fullscreen);

    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Pi Weather Hub",
        native_options,
        Box::new(|cc| Ok(Box::new(WeatherHubApp::new(cc, config)))),
    )
}

/// Main application state and logic.
struct WeatherHubApp {
    /// Application state shared by all tabs
    state: AppState,

    /// Decoded radar frames, keyed by file
    radar_textures: ui::RadarTextures,

    /// AEMET daily and hourly forecast poller
    forecast: Option<PollChannel<ForecastUpdate>>,

    /// AEMET radar poller
    radar: Option<PollChannel<RadarUpdate>>,

    /// Outdoor station poller (spreadsheet)
    sheet: Option<PollChannel<MeasurementSeries>>,

    /// Indoor SHT31 poller
    sensor: Option<PollChannel<MeasurementSeries>>,
}

impl WeatherHubApp {
    fn new(cc: &eframe::CreationContext<'_>, config: HubConfig) -> Self {
        ui::icons::install_fonts(&cc.egui_ctx);

        let mut state = AppState::new(&config.display);
        let ctx = &cc.egui_ctx;

        // Show whatever history is on disk until the sensor reports.
        match SensorHistory::new(&config.sensor.history_path).load() {
            Ok(series) if !series.is_empty() => state.measurements.set_indoor(series),
            Ok(_) => {}
            Err(e) => log::warn!("Failed to load sensor history: {}", e),
        }

        let forecast = started("forecast", start_forecast(ctx, &config));
        let radar = started("radar", start_radar(ctx, &config));
        let sheet = if config.sheet.enabled {
            started("sheet", start_sheet(ctx, &config))
        } else {
            log::info!("Outdoor station disabled");
            None
        };
        let sensor = if config.sensor.enabled {
            start_sensor(ctx, &config)
        } else {
            log::info!("Indoor sensor disabled");
            None
        };

        Self {
            state,
            radar_textures: ui::RadarTextures::default(),
            forecast,
            radar,
            sheet,
            sensor,
        }
    }

    /// Applies finished polls and refreshes the source status.
    fn drain_channels(&mut self) {
        let now = Local::now().naive_local();
        let state = &mut self.state;

        drain(&self.forecast, state, |state, update| {
            state.forecast.apply(update, now);
        });
        drain(&self.radar, state, |state, update| {
            if update.new_frame {
                log::debug!("New radar frame, {} in archive", update.regional.len());
            }
            state.radar.apply(update);
        });
        drain(&self.sheet, state, |state, series| {
            state.measurements.set_outdoor(series);
        });
        drain(&self.sensor, state, |state, series| {
            state.measurements.set_indoor(series);
        });

        for name in std::mem::take(&mut state.refresh_requests) {
            log::info!("Manual refresh of {}", name);
            refresh(&self.forecast, name);
            refresh(&self.radar, name);
            refresh(&self.sheet, name);
            refresh(&self.sensor, name);
        }
    }
}

fn refresh<T: Send + 'static>(channel: &Option<PollChannel<T>>, name: &str) {
    if let Some(channel) = channel.as_ref().filter(|c| c.name() == name) {
        channel.refresh_now();
    }
}

impl eframe::App for WeatherHubApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_channels();

        self.state.tick_clock(Local::now().naive_local());
        let visible = self.state.active_tab == Tab::Radar;
        let next_frame = self.state.radar.tick(Instant::now(), visible);

        // Render UI panels (order matters for egui layout)
        ui::render_top_bar(ctx, &mut self.state);
        ui::render_active_tab(ctx, &mut self.state, &mut self.radar_textures);

        if self.state.exit_requested {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        let wait = next_frame.map_or(IDLE_REPAINT, |d| d.min(IDLE_REPAINT));
        ctx.request_repaint_after(wait);
    }
}

fn drain<T: Send + 'static>(
    channel: &Option<PollChannel<T>>,
    state: &mut AppState,
    mut apply: impl FnMut(&mut AppState, T),
) {
    let Some(channel) = channel else {
        return;
    };

    while let Some(result) = channel.try_recv() {
        match result {
            PollResult::Updated {
                value,
                fetch_latency_ms,
            } => {
                log::debug!("{} updated in {:.0}ms", channel.name(), fetch_latency_ms);
                apply(state, value);
            }
            PollResult::Error(message) => {
                log::debug!("{} poll failed: {}", channel.name(), message);
            }
        }
    }

    state.update_source(channel.name(), channel.stats().snapshot());
}

fn started<T>(name: &str, result: Result<PollChannel<T>, FetchError>) -> Option<PollChannel<T>> {
    result
        .map_err(|e| log::error!("Failed to start {} poller: {}", name, e))
        .ok()
}

fn start_forecast(
    ctx: &egui::Context,
    config: &HubConfig,
) -> Result<PollChannel<ForecastUpdate>, FetchError> {
    let stats = SourceStats::new();
    let client = AemetClient::new(&config.aemet)?.with_stats(stats.clone());
    let channel = PollChannel::spawn(
        ctx.clone(),
        ForecastSource::new(client),
        config.aemet.forecast_period(),
        stats,
    )?;
    Ok(channel)
}

fn start_radar(
    ctx: &egui::Context,
    config: &HubConfig,
) -> Result<PollChannel<RadarUpdate>, FetchError> {
    let stats = SourceStats::new();
    let client = AemetClient::new(&config.aemet)?.with_stats(stats.clone());
    let max_frames = config.aemet.max_radar_frames;
    let regional = RadarArchive::open(config.storage.regional_radar_dir(), max_frames)?;
    let national = RadarArchive::open(config.storage.national_radar_dir(), max_frames)?;
    log::info!(
        "Radar frames kept in {} and {}",
        regional.dir().display(),
        national.dir().display()
    );
    let channel = PollChannel::spawn(
        ctx.clone(),
        RadarSource::new(client, regional, national),
        config.aemet.radar_period(),
        stats,
    )?;
    Ok(channel)
}

fn start_sheet(
    ctx: &egui::Context,
    config: &HubConfig,
) -> Result<PollChannel<MeasurementSeries>, FetchError> {
    let stats = SourceStats::new();
    let client = SheetsClient::new(&config.sheet)?.with_stats(stats.clone());
    let channel = PollChannel::spawn(
        ctx.clone(),
        SheetSource::new(client),
        config.sheet.period(),
        stats,
    )?;
    Ok(channel)
}

#[cfg(target_os = "linux")]
fn start_sensor(
    ctx: &egui::Context,
    config: &HubConfig,
) -> Option<PollChannel<MeasurementSeries>> {
    started("sensor", spawn_sensor(ctx, config))
}

#[cfg(target_os = "linux")]
fn spawn_sensor(
    ctx: &egui::Context,
    config: &HubConfig,
) -> Result<PollChannel<MeasurementSeries>, FetchError> {
    let sensor = sensor::open_sht31(&config.sensor.i2c_bus, config.sensor.address)?;
    let history = SensorHistory::new(&config.sensor.history_path);
    log::info!("Sensor history at {}", history.path().display());
    let source = workers::SensorSource::new(
        sensor,
        history,
        chrono::Duration::days(config.sensor.retention_days),
    );
    let channel = PollChannel::spawn(ctx.clone(), source, config.sensor.period(), SourceStats::new())?;
    Ok(channel)
}

#[cfg(not(target_os = "linux"))]
fn start_sensor(
    _ctx: &egui::Context,
    config: &HubConfig,
) -> Option<PollChannel<MeasurementSeries>> {
    log::warn!(
        "I2C bus {} is only available on Linux, indoor sensor not started",
        config.sensor.i2c_bus
    );
    None
}

#[cfg(all(test, not(target_os = "linux")))]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_not_started_off_linux() {
        let config = HubConfig::default();
        assert!(start_sensor(&egui::Context::default(), &config).is_none());
    }
}
