use super::Source;
use crate::data::measurements::{MeasurementSeries, Sample};
use crate::error::FetchError;
use crate::sensor::Hygrometer;
use crate::storage::SensorHistory;
use chrono::{Duration, Local, Timelike};

/// Reads the indoor sensor and keeps its CSV history.
pub struct SensorSource<H> {
    sensor: H,
    history: SensorHistory,
    retention: Duration,
}

impl<H: Hygrometer> SensorSource<H> {
    pub fn new(sensor: H, history: SensorHistory, retention: Duration) -> Self {
        Self {
            sensor,
            history,
            retention,
        }
    }
}

impl<H: Hygrometer> Source for SensorSource<H> {
    type Output = MeasurementSeries;

    fn name(&self) -> &'static str {
        "sensor"
    }

    fn fetch(&mut self) -> Result<MeasurementSeries, FetchError> {
        // Read first so a sensor failure leaves the history untouched.
        let reading = self.sensor.read()?;
        // Whole seconds, as in the rest of the history file.
        let now = Local::now().naive_local();
        let sample = Sample {
            timestamp: now.with_nanosecond(0).unwrap_or(now),
            temperature: round1(reading.temperature),
            humidity: round1(reading.humidity),
            pressure: None,
        };
        self.history.prepend_and_trim(sample, self.retention)
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
