//! Per-source polling statistics shared between a worker and the UI.

use chrono::NaiveDateTime;
use std::sync::{Arc, Mutex, MutexGuard};

/// Point-in-time copy of a source's statistics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsSnapshot {
    /// Polls attempted since startup.
    pub attempts: u32,
    /// Polls that ended in an error.
    pub failures: u32,
    /// Response bytes received since startup.
    pub bytes_received: u64,
    /// Duration of the last successful poll.
    pub last_latency_ms: Option<f64>,
    /// Local time of the last successful poll.
    pub last_success: Option<NaiveDateTime>,
    /// Message of the most recent failure, cleared by the next success.
    pub last_error: Option<String>,
}

/// Cloneable handle to a source's statistics.
///
/// The worker thread and the HTTP clients record into it; the UI reads
/// snapshots once per frame.
#[derive(Debug, Clone, Default)]
pub struct SourceStats {
    inner: Arc<Mutex<StatsSnapshot>>,
}

impl SourceStats {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StatsSnapshot> {
        // A panicking writer cannot leave the counters in an invalid state.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn record_bytes(&self, bytes: usize) {
        self.lock().bytes_received += bytes as u64;
    }

    pub fn record_success(&self, latency_ms: f64, at: NaiveDateTime) {
        let mut stats = self.lock();
        stats.attempts += 1;
        stats.last_latency_ms = Some(latency_ms);
        stats.last_success = Some(at);
        stats.last_error = None;
    }

    pub fn record_failure(&self, message: impl Into<String>) {
        let mut stats = self.lock();
        stats.attempts += 1;
        stats.failures += 1;
        stats.last_error = Some(message.into());
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        self.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_success_clears_last_error() {
        let stats = SourceStats::new();
        stats.record_failure("timeout");
        assert_eq!(stats.snapshot().last_error.as_deref(), Some("timeout"));

        let at = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        stats.record_success(85.0, at);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.attempts, 2);
        assert_eq!(snapshot.failures, 1);
        assert_eq!(snapshot.last_error, None);
        assert_eq!(snapshot.last_success, Some(at));
        assert_eq!(snapshot.last_latency_ms, Some(85.0));
    }

    #[test]
    fn test_clones_share_counters() {
        let stats = SourceStats::new();
        let client_side = stats.clone();
        client_side.record_bytes(1024);
        client_side.record_bytes(512);
        assert_eq!(stats.snapshot().bytes_received, 1536);
    }
}
