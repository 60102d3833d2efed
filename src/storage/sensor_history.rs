//! CSV history of indoor sensor readings.
//!
//! One row per reading, newest first, no header:
//! `2024-05-01T12:00:00,21.5,48.2`.

use crate::data::measurements::{MeasurementSeries, Sample};
use crate::error::FetchError;
use chrono::{Duration, NaiveDateTime};
use std::path::{Path, PathBuf};

type Row = (NaiveDateTime, f64, f64);

pub struct SensorHistory {
    path: PathBuf,
}

impl SensorHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored series. A missing file is an empty history.
    pub fn load(&self) -> Result<MeasurementSeries, FetchError> {
        if !self.path.exists() {
            return Ok(MeasurementSeries::default());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .from_path(&self.path)?;

        let mut samples = Vec::new();
        for record in reader.deserialize::<Row>() {
            match record {
                Ok((timestamp, temperature, humidity)) => samples.push(Sample {
                    timestamp,
                    temperature,
                    humidity,
                    pressure: None,
                }),
                Err(e) => log::warn!("Skipping history row in {}: {}", self.path.display(), e),
            }
        }
        Ok(MeasurementSeries::from_samples(samples))
    }

    /// Writes `series` in full, replacing the file.
    pub fn save(&self, series: &MeasurementSeries) -> Result<(), FetchError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&self.path)?;
        for sample in series.samples() {
            writer.serialize((sample.timestamp, sample.temperature, sample.humidity))?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Adds `sample` as the newest reading, drops readings older than
    /// `retention` relative to it, and rewrites the file.
    pub fn prepend_and_trim(
        &self,
        sample: Sample,
        retention: Duration,
    ) -> Result<MeasurementSeries, FetchError> {
        let existing = self.load()?;
        let mut samples = Vec::with_capacity(existing.len() + 1);
        samples.push(sample);
        samples.extend_from_slice(existing.samples());

        let combined = MeasurementSeries::from_samples(samples);
        let kept = MeasurementSeries::from_samples(combined.leading_window(retention).to_vec());

        self.save(&kept)?;
        Ok(kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn sample(ts: NaiveDateTime, temperature: f64) -> Sample {
        Sample {
            timestamp: ts,
            temperature,
            humidity: 50.0,
            pressure: None,
        }
    }

    #[test]
    fn test_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let history = SensorHistory::new(tmp.path().join("none.csv"));
        assert!(history.load().unwrap().is_empty());
    }

    #[test]
    fn test_reads_existing_rows_with_fractional_seconds() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("local.csv");
        fs::write(
            &path,
            "2024-05-01T12:00:00.123456,21.5,48.2\nbroken,row\n2024-05-01T11:50:00,21.4,48.0\n",
        )
        .unwrap();

        let series = SensorHistory::new(&path).load().unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.newest().unwrap().temperature, 21.5);
        assert_eq!(series.samples()[1].humidity, 48.0);
    }

    #[test]
    fn test_prepend_creates_parent_dirs_and_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("resources").join("local.csv");
        let history = SensorHistory::new(&path);

        let series = history
            .prepend_and_trim(sample(at(1, 12), 21.0), Duration::days(7))
            .unwrap();

        assert_eq!(series.len(), 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), "2024-05-01T12:00:00,21.0,50.0\n");
    }

    #[test]
    fn test_prepend_trims_beyond_retention() {
        let tmp = TempDir::new().unwrap();
        let history = SensorHistory::new(tmp.path().join("local.csv"));
        history
            .save(&MeasurementSeries::from_samples(vec![
                sample(at(8, 6), 20.0),
                sample(at(3, 0), 19.0),
                // Exactly seven days before the new reading.
                sample(at(1, 12), 18.0),
                sample(at(1, 0), 17.0),
            ]))
            .unwrap();

        let series = history
            .prepend_and_trim(sample(at(8, 12), 22.0), Duration::days(7))
            .unwrap();

        let temps: Vec<f64> = series.samples().iter().map(|s| s.temperature).collect();
        assert_eq!(temps, vec![22.0, 20.0, 19.0]);
        assert_eq!(history.load().unwrap(), series);
    }
}
