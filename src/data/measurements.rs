//! Measurement samples from the outdoor spreadsheet and the indoor sensor.

use crate::error::FetchError;
use chrono::{Duration, NaiveDateTime};

/// Timestamp format used by the station spreadsheet.
pub const SHEET_TIMESTAMP_FORMAT: &str = "%m/%d/%Y %H:%M:%S";

/// Standard atmosphere, used as the pressure plot reference line.
pub const STANDARD_PRESSURE_HPA: f64 = 1013.25;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub timestamp: NaiveDateTime,
    /// Degrees Celsius.
    pub temperature: f64,
    /// Relative humidity, percent.
    pub humidity: f64,
    /// Hectopascals; only the outdoor station reports pressure.
    pub pressure: Option<f64>,
}

/// Summary values shown next to the plots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementStats {
    pub current: Sample,
    pub max_temperature: f64,
    pub min_temperature: f64,
    pub max_humidity: f64,
    pub min_humidity: f64,
}

/// A run of samples ordered newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementSeries {
    samples: Vec<Sample>,
}

impl MeasurementSeries {
    /// Builds a series from samples already ordered newest first.
    pub fn from_samples(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    /// Parses the four spreadsheet columns: timestamp, temperature,
    /// humidity and pressure in pascals.
    ///
    /// Rows with an unparseable cell are skipped. Columns of unequal length
    /// (the API drops trailing empty cells) are truncated to the shortest.
    /// A range with no usable row is an error, so the last good series
    /// stays on screen.
    pub fn from_sheet_columns(columns: &[Vec<String>]) -> Result<Self, FetchError> {
        let [timestamps, temperatures, humidities, pressures] = columns else {
            return Err(FetchError::payload(format!(
                "expected 4 columns, got {}",
                columns.len()
            )));
        };

        let mut samples = Vec::with_capacity(timestamps.len());
        let mut skipped = 0usize;

        for (((ts, temp), hum), pres) in timestamps
            .iter()
            .zip(temperatures)
            .zip(humidities)
            .zip(pressures)
        {
            match parse_sheet_row(ts, temp, hum, pres) {
                Some(sample) => samples.push(sample),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            log::warn!("Skipped {} malformed spreadsheet row(s)", skipped);
        }
        if samples.is_empty() {
            return Err(FetchError::payload("no parseable rows"));
        }

        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn newest(&self) -> Option<&Sample> {
        self.samples.first()
    }

    /// Samples within `window` of the newest one (strictly newer than
    /// `newest - window`). Assumes newest-first ordering.
    pub fn leading_window(&self, window: Duration) -> &[Sample] {
        let Some(newest) = self.newest() else {
            return &[];
        };
        let cutoff = newest.timestamp - window;
        let count = self
            .samples
            .iter()
            .take_while(|s| s.timestamp > cutoff)
            .count();
        &self.samples[..count]
    }

    /// Current values plus extremes over the last 24 hours.
    pub fn stats(&self) -> Option<MeasurementStats> {
        let current = *self.newest()?;
        let last_day = self.leading_window(Duration::days(1));

        let fold = |pick: fn(&Sample) -> f64| {
            last_day.iter().map(pick).fold(
                (f64::NEG_INFINITY, f64::INFINITY),
                |(max, min), v| (max.max(v), min.min(v)),
            )
        };
        let (max_temperature, min_temperature) = fold(|s| s.temperature);
        let (max_humidity, min_humidity) = fold(|s| s.humidity);

        Some(MeasurementStats {
            current,
            max_temperature,
            min_temperature,
            max_humidity,
            min_humidity,
        })
    }

    /// `(timestamp, value)` pairs for plotting.
    pub fn points(&self, pick: impl Fn(&Sample) -> Option<f64>) -> Vec<(NaiveDateTime, f64)> {
        self.samples
            .iter()
            .filter_map(|s| pick(s).map(|v| (s.timestamp, v)))
            .collect()
    }
}

fn parse_sheet_row(ts: &str, temp: &str, hum: &str, pres: &str) -> Option<Sample> {
    let timestamp = NaiveDateTime::parse_from_str(ts.trim(), SHEET_TIMESTAMP_FORMAT).ok()?;
    let temperature = temp.trim().parse::<f64>().ok()?;
    let humidity = hum.trim().parse::<f64>().ok()?;
    let pressure_pa = pres.trim().parse::<f64>().ok()?;

    Some(Sample {
        timestamp,
        temperature,
        humidity,
        pressure: Some(pressure_pa / 100.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn sample(ts: NaiveDateTime, temperature: f64, humidity: f64) -> Sample {
        Sample {
            timestamp: ts,
            temperature,
            humidity,
            pressure: None,
        }
    }

    fn columns(rows: &[[&str; 4]]) -> Vec<Vec<String>> {
        (0..4)
            .map(|c| rows.iter().map(|r| r[c].to_string()).collect())
            .collect()
    }

    #[test]
    fn test_sheet_columns_convert_pressure_to_hpa() {
        let series = MeasurementSeries::from_sheet_columns(&columns(&[
            ["5/1/2024 12:00:00", "21.5", "55", "101325"],
            ["5/1/2024 11:45:00", "21.0", "56.5", "101300"],
        ]))
        .unwrap();

        assert_eq!(series.len(), 2);
        let newest = series.newest().unwrap();
        assert_eq!(newest.timestamp, at(1, 12, 0));
        assert_eq!(newest.pressure, Some(1013.25));
        assert_eq!(series.samples()[1].humidity, 56.5);
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let series = MeasurementSeries::from_sheet_columns(&columns(&[
            ["5/1/2024 12:00:00", "21.5", "55", "101325"],
            ["not a date", "21.0", "56", "101300"],
            ["5/1/2024 11:30:00", "#N/A", "56", "101300"],
            ["5/1/2024 11:15:00", "20.5", "57", "101280"],
        ]))
        .unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.samples()[1].temperature, 20.5);
    }

    #[test]
    fn test_short_columns_truncate() {
        let mut cols = columns(&[
            ["5/1/2024 12:00:00", "21.5", "55", "101325"],
            ["5/1/2024 11:45:00", "21.0", "56", "101300"],
        ]);
        cols[3].pop();

        let series = MeasurementSeries::from_sheet_columns(&cols).unwrap();
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn test_no_parseable_rows_is_an_error() {
        let result = MeasurementSeries::from_sheet_columns(&columns(&[[
            "#REF!", "#N/A", "55", "101325",
        ]]));
        assert!(matches!(result, Err(FetchError::Payload { .. })));

        let empty = MeasurementSeries::from_sheet_columns(&columns(&[]));
        assert!(matches!(empty, Err(FetchError::Payload { .. })));
    }

    #[test]
    fn test_wrong_column_count() {
        let result = MeasurementSeries::from_sheet_columns(&[vec!["a".to_string()]]);
        assert!(matches!(result, Err(FetchError::Payload { .. })));
    }

    #[test]
    fn test_stats_cover_last_24_hours_only() {
        let series = MeasurementSeries::from_samples(vec![
            sample(at(2, 12, 0), 20.0, 50.0),
            sample(at(2, 6, 0), 14.0, 80.0),
            sample(at(1, 18, 0), 25.0, 40.0),
            // Exactly 24 h before the newest sample: excluded.
            sample(at(1, 12, 0), 30.0, 20.0),
            sample(at(1, 6, 0), 5.0, 95.0),
        ]);

        let stats = series.stats().unwrap();
        assert_eq!(stats.current.temperature, 20.0);
        assert_eq!(stats.max_temperature, 25.0);
        assert_eq!(stats.min_temperature, 14.0);
        assert_eq!(stats.max_humidity, 80.0);
        assert_eq!(stats.min_humidity, 40.0);
    }

    #[test]
    fn test_empty_series_has_no_stats() {
        assert!(MeasurementSeries::default().stats().is_none());
    }

    #[test]
    fn test_points_skip_missing_values() {
        let series = MeasurementSeries::from_samples(vec![
            Sample {
                pressure: Some(1010.0),
                ..sample(at(1, 12, 0), 20.0, 50.0)
            },
            sample(at(1, 11, 0), 19.0, 52.0),
        ]);

        let pressure = series.points(|s| s.pressure);
        assert_eq!(pressure, vec![(at(1, 12, 0), 1010.0)]);
        assert_eq!(series.points(|s| Some(s.humidity)).len(), 2);
    }
}
