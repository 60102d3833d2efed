//! On-disk stores.
//!
//! Radar frames are kept as plain GIF files named by their timestamp, and
//! the indoor sensor history is a header-less CSV file. Both live under the
//! configured resources directory so they survive restarts.

mod radar_archive;
mod sensor_history;

pub use radar_archive::{frame_timestamp, RadarArchive, RadarFrame};
pub use sensor_history::SensorHistory;
