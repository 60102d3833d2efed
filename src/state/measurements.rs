//! Measurements tab state.

use crate::data::measurements::{MeasurementSeries, MeasurementStats};

const MISSING: &str = "--";

/// Preformatted values for one station.
#[derive(Debug, Clone, PartialEq)]
pub struct StationLabels {
    pub temperature: String,
    pub humidity: String,
    pub pressure: String,
    pub max_temperature: String,
    pub min_temperature: String,
    pub max_humidity: String,
    pub min_humidity: String,
}

impl StationLabels {
    fn from_stats(stats: Option<&MeasurementStats>) -> Self {
        let temperature = |v: f64| format!("{:.1} °C", v);
        let humidity = |v: f64| format!("{:.1}%", v);
        let or_missing = |v: Option<String>| v.unwrap_or_else(|| MISSING.to_string());

        Self {
            temperature: or_missing(stats.map(|s| temperature(s.current.temperature))),
            humidity: or_missing(stats.map(|s| humidity(s.current.humidity))),
            pressure: or_missing(
                stats
                    .and_then(|s| s.current.pressure)
                    .map(|p| format!("{:.2} hPa", p)),
            ),
            max_temperature: or_missing(stats.map(|s| temperature(s.max_temperature))),
            min_temperature: or_missing(stats.map(|s| temperature(s.min_temperature))),
            max_humidity: or_missing(stats.map(|s| humidity(s.max_humidity))),
            min_humidity: or_missing(stats.map(|s| humidity(s.min_humidity))),
        }
    }
}

/// Outdoor (spreadsheet) and indoor (sensor) series plus their labels.
pub struct MeasurementsState {
    pub outdoor: MeasurementSeries,
    pub indoor: MeasurementSeries,
    pub outdoor_labels: StationLabels,
    pub indoor_labels: StationLabels,
}

impl Default for MeasurementsState {
    fn default() -> Self {
        Self {
            outdoor: MeasurementSeries::default(),
            indoor: MeasurementSeries::default(),
            outdoor_labels: StationLabels::from_stats(None),
            indoor_labels: StationLabels::from_stats(None),
        }
    }
}

impl MeasurementsState {
    pub fn set_outdoor(&mut self, series: MeasurementSeries) {
        self.outdoor_labels = StationLabels::from_stats(series.stats().as_ref());
        self.outdoor = series;
    }

    pub fn set_indoor(&mut self, series: MeasurementSeries) {
        self.indoor_labels = StationLabels::from_stats(series.stats().as_ref());
        self.indoor = series;
    }
}
