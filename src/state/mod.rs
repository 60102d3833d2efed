//! Application state management.
//!
//! State is organized by tab: the forecast model, the radar frames and
//! animation, and the measurement series. The root [`AppState`] adds the
//! pieces shared by all tabs (selected tab, clock, source status).

pub mod forecast;
pub mod labels;
mod measurements;
mod radar;
mod stats;

pub use forecast::ForecastView;
pub use measurements::{MeasurementsState, StationLabels};
pub use radar::RadarViewState;
pub use stats::SourceStatus;

use crate::config::DisplayConfig;
use crate::workers::StatsSnapshot;
use chrono::{NaiveDateTime, Timelike};
use std::time::Duration;
use web_time::Instant;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Forecast,
    Radar,
    Measurements,
}

impl Tab {
    pub fn label(&self) -> &'static str {
        match self {
            Tab::Forecast => "Previsión",
            Tab::Radar => "Radar",
            Tab::Measurements => "Medidas",
        }
    }

    pub fn all() -> &'static [Tab] {
        &[Tab::Forecast, Tab::Radar, Tab::Measurements]
    }
}

/// Taps on the Forecast tab needed to close the app.
pub const EXIT_TAPS: u32 = 5;

/// Longest pause between two taps of the same exit streak.
pub const EXIT_TAP_GAP: Duration = Duration::from_secs(2);

/// Detects the hidden exit gesture: [`EXIT_TAPS`] quick taps in a row.
#[derive(Debug, Default)]
pub struct HiddenExit {
    streak: u32,
    last_tap: Option<Instant>,
}

impl HiddenExit {
    /// Records a tap; returns true when the streak completes.
    pub fn tap(&mut self, now: Instant) -> bool {
        let continues = self
            .last_tap
            .is_some_and(|last| now.saturating_duration_since(last) < EXIT_TAP_GAP);
        self.streak = if continues { self.streak + 1 } else { 1 };
        self.last_tap = Some(now);

        if self.streak >= EXIT_TAPS {
            self.reset();
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.streak = 0;
        self.last_tap = None;
    }
}

/// Root application state containing all sub-states.
pub struct AppState {
    pub active_tab: Tab,

    pub forecast: ForecastView,

    pub radar: RadarViewState,

    pub measurements: MeasurementsState,

    /// Per-source status shown in the top bar, in display order.
    pub sources: Vec<SourceStatus>,

    /// `HH:MM` shown in the top bar.
    pub clock: String,

    /// Set once the hidden exit gesture completes.
    pub exit_requested: bool,

    /// Sources the user asked to poll immediately, drained by the app.
    pub refresh_requests: Vec<&'static str>,

    hidden_exit: HiddenExit,
    last_hour: Option<u32>,
}

impl AppState {
    pub fn new(display: &DisplayConfig) -> Self {
        Self {
            active_tab: Tab::Forecast,
            forecast: ForecastView::new(display.visible_hours),
            radar: RadarViewState::new(display.animation_frame(), display.animation_loops),
            measurements: MeasurementsState::default(),
            sources: Vec::new(),
            clock: "--:--".to_string(),
            exit_requested: false,
            refresh_requests: Vec::new(),
            hidden_exit: HiddenExit::default(),
            last_hour: None,
        }
    }

    /// Handles a tap on a tab button.
    pub fn select_tab(&mut self, tab: Tab, tapped_at: Instant, now: NaiveDateTime) {
        if tab == Tab::Forecast {
            if self.hidden_exit.tap(tapped_at) {
                log::info!("Exit gesture detected, closing");
                self.exit_requested = true;
            }
        } else {
            self.hidden_exit.reset();
        }

        if tab != self.active_tab {
            log::debug!("Switching to {:?} tab", tab);
            if matches!(tab, Tab::Radar | Tab::Measurements) {
                self.forecast.reset_window(now);
            }
            self.active_tab = tab;
        }
    }

    /// Updates the clock text. When the hour changes the cached forecast is
    /// re-applied so the period and hour window follow the time of day.
    pub fn tick_clock(&mut self, now: NaiveDateTime) -> bool {
        self.clock = now.format("%H:%M").to_string();

        let hour = now.hour();
        let changed = self.last_hour.is_some_and(|last| last != hour);
        self.last_hour = Some(hour);

        if changed {
            log::debug!("Hour changed to {:02}, refreshing forecast", hour);
            self.forecast.refresh(now);
        }
        changed
    }

    pub fn update_source(&mut self, name: &'static str, snapshot: StatsSnapshot) {
        match self.sources.iter_mut().find(|s| s.name == name) {
            Some(status) => status.snapshot = snapshot,
            None => self.sources.push(SourceStatus::new(name, snapshot)),
        }
    }
}
