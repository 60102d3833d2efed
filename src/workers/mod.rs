//! Background polling workers.
//!
//! Each data source runs on its own thread and hands results to the UI
//! through a [`PollChannel`]; egui's `update()` drains them without
//! blocking.

mod forecast;
mod poll_channel;
mod radar;
mod sensor;
mod sheet;
mod stats;

pub use forecast::{ForecastSource, ForecastUpdate};
pub use poll_channel::PollChannel;
pub use radar::{RadarSource, RadarUpdate};
pub use sensor::SensorSource;
pub use sheet::SheetSource;
pub use stats::{SourceStats, StatsSnapshot};

use crate::error::FetchError;

/// A periodically polled data source.
pub trait Source: Send + 'static {
    type Output: Send + 'static;

    /// Short name used for logging and thread names.
    fn name(&self) -> &'static str;

    /// Performs one blocking fetch.
    fn fetch(&mut self) -> Result<Self::Output, FetchError>;
}

/// Result of one poll, as delivered to the UI thread.
#[derive(Debug, Clone, PartialEq)]
pub enum PollResult<T> {
    Updated { value: T, fetch_latency_ms: f64 },
    Error(String),
}
