//! Measurement data shared by the outdoor station and the indoor sensor.

pub mod measurements;
