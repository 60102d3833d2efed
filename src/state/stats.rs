//! Per-source status for the top bar.

use crate::workers::StatsSnapshot;

/// Health of one data source, refreshed from its [`StatsSnapshot`] each
/// frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceStatus {
    pub name: &'static str,
    pub snapshot: StatsSnapshot,
}

impl SourceStatus {
    pub fn new(name: &'static str, snapshot: StatsSnapshot) -> Self {
        Self { name, snapshot }
    }

    /// True while the most recent poll succeeded.
    pub fn is_healthy(&self) -> bool {
        self.snapshot.last_error.is_none() && self.snapshot.last_success.is_some()
    }

    /// Short text next to the source name: time of the last success, or
    /// "error" when the latest poll failed.
    pub fn summary(&self) -> String {
        if self.snapshot.last_error.is_some() {
            return "error".to_string();
        }
        match self.snapshot.last_success {
            Some(at) => at.format("%H:%M").to_string(),
            None => "--".to_string(),
        }
    }

    /// Hover text with counters and the last error.
    pub fn detail(&self) -> String {
        let s = &self.snapshot;
        let mut parts = vec![
            format!("polls: {}", s.attempts),
            format!("failures: {}", s.failures),
            format!("received: {}", format_bytes(s.bytes_received)),
        ];
        if let Some(latency) = s.last_latency_ms {
            parts.push(format!("fetch: {:.0}ms", latency));
        }

        let mut text = parts.join(" · ");
        if let Some(error) = &s.last_error {
            text.push('\n');
            text.push_str(error);
        }
        text
    }
}

/// Format bytes into a human-readable string.
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(12_582_912), "12.0 MB");
    }

    #[test]
    fn test_summary_and_detail() {
        let mut status = SourceStatus::new("radar", StatsSnapshot::default());
        assert_eq!(status.summary(), "--");
        assert!(!status.is_healthy());

        status.snapshot = StatsSnapshot {
            attempts: 3,
            failures: 1,
            bytes_received: 2048,
            last_latency_ms: Some(142.4),
            last_success: NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(12, 30, 0),
            last_error: None,
        };
        assert!(status.is_healthy());
        assert_eq!(status.summary(), "12:30");
        assert_eq!(
            status.detail(),
            "polls: 3 · failures: 1 · received: 2.0 KB · fetch: 142ms"
        );

        status.snapshot.last_error = Some("timeout".to_string());
        assert_eq!(status.summary(), "error");
        assert!(status.detail().ends_with("\ntimeout"));
    }
}
