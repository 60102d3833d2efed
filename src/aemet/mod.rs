//! AEMET OpenData integration.
//!
//! This module provides:
//! - A blocking client for the forecast and radar endpoints
//! - Serde models for the municipality forecast documents

mod client;
pub mod types;

pub use client::AemetClient;
pub use types::{DailyForecast, HourlyForecast};
