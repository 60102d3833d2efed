//! Thread-backed periodic poller.
//!
//! Fetches are blocking but egui's update() must not be. The worker thread
//! sends each result through a channel and requests a repaint; the UI
//! picks results up with [`PollChannel::try_recv`].

use super::{PollResult, Source, SourceStats};
use eframe::egui;
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;
use web_time::Instant;

enum Command {
    Refresh,
    Stop,
}

pub struct PollChannel<T> {
    receiver: Receiver<PollResult<T>>,
    commands: Sender<Command>,
    stats: SourceStats,
    name: &'static str,
}

impl<T: Send + 'static> PollChannel<T> {
    /// Spawns the worker thread. The first fetch happens immediately, then
    /// once per `period` until the channel is dropped.
    pub fn spawn<S>(
        ctx: egui::Context,
        source: S,
        period: Duration,
        stats: SourceStats,
    ) -> std::io::Result<Self>
    where
        S: Source<Output = T>,
    {
        let (sender, receiver) = channel();
        let (commands, command_rx) = channel();
        let name = source.name();
        let worker_stats = stats.clone();

        thread::Builder::new()
            .name(format!("poll-{}", name))
            .spawn(move || run(ctx, source, period, worker_stats, sender, command_rx))?;

        log::info!("Started {} poller (every {:?})", name, period);

        Ok(Self {
            receiver,
            commands,
            stats,
            name,
        })
    }

    /// Non-blocking check for a finished poll.
    pub fn try_recv(&self) -> Option<PollResult<T>> {
        self.receiver.try_recv().ok()
    }

    /// Asks the worker to poll now instead of waiting out its period.
    pub fn refresh_now(&self) {
        if self.commands.send(Command::Refresh).is_err() {
            log::warn!("{} poller is no longer running", self.name);
        }
    }

    pub fn stats(&self) -> &SourceStats {
        &self.stats
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Drop for PollChannel<T> {
    fn drop(&mut self) {
        // The thread may be mid-fetch; it exits at its next wait.
        let _ = self.commands.send(Command::Stop);
    }
}

fn run<S: Source>(
    ctx: egui::Context,
    mut source: S,
    period: Duration,
    stats: SourceStats,
    sender: Sender<PollResult<S::Output>>,
    commands: Receiver<Command>,
) {
    loop {
        let start = Instant::now();
        let result = match source.fetch() {
            Ok(value) => {
                let fetch_latency_ms = start.elapsed().as_secs_f64() * 1000.0;
                stats.record_success(fetch_latency_ms, chrono::Local::now().naive_local());
                log::debug!("{} poll finished in {:.0} ms", source.name(), fetch_latency_ms);
                PollResult::Updated {
                    value,
                    fetch_latency_ms,
                }
            }
            Err(e) => {
                let message = e.to_string();
                log::warn!("{} poll failed: {}", source.name(), message);
                stats.record_failure(message.clone());
                PollResult::Error(message)
            }
        };

        if sender.send(result).is_err() {
            break;
        }
        ctx.request_repaint();

        match commands.recv_timeout(period) {
            Ok(Command::Refresh) | Err(RecvTimeoutError::Timeout) => continue,
            Ok(Command::Stop) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    log::debug!("{} poller stopped", source.name());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    struct Counter {
        calls: u32,
        fail_on: Option<u32>,
    }

    impl Source for Counter {
        type Output = u32;

        fn name(&self) -> &'static str {
            "counter"
        }

        fn fetch(&mut self) -> Result<u32, FetchError> {
            self.calls += 1;
            if self.fail_on == Some(self.calls) {
                return Err(FetchError::payload("boom"));
            }
            Ok(self.calls)
        }
    }

    fn recv(channel: &PollChannel<u32>) -> PollResult<u32> {
        channel
            .receiver
            .recv_timeout(Duration::from_secs(5))
            .expect("worker result")
    }

    #[test]
    fn test_fetches_immediately() {
        let channel = PollChannel::spawn(
            egui::Context::default(),
            Counter {
                calls: 0,
                fail_on: None,
            },
            Duration::from_secs(3600),
            SourceStats::new(),
        )
        .unwrap();

        match recv(&channel) {
            PollResult::Updated { value, .. } => assert_eq!(value, 1),
            PollResult::Error(e) => panic!("unexpected error: {e}"),
        }
        assert_eq!(channel.stats().snapshot().attempts, 1);
    }

    #[test]
    fn test_refresh_now_skips_the_wait() {
        let channel = PollChannel::spawn(
            egui::Context::default(),
            Counter {
                calls: 0,
                fail_on: Some(2),
            },
            Duration::from_secs(3600),
            SourceStats::new(),
        )
        .unwrap();

        assert!(matches!(recv(&channel), PollResult::Updated { value: 1, .. }));
        channel.refresh_now();
        assert_eq!(recv(&channel), PollResult::Error("unexpected payload: boom".into()));
        channel.refresh_now();
        assert!(matches!(recv(&channel), PollResult::Updated { value: 3, .. }));

        let stats = channel.stats().snapshot();
        assert_eq!(stats.attempts, 3);
        assert_eq!(stats.failures, 1);
        assert_eq!(stats.last_error, None);
    }

    #[test]
    fn test_short_period_polls_repeatedly() {
        let channel = PollChannel::spawn(
            egui::Context::default(),
            Counter {
                calls: 0,
                fail_on: None,
            },
            Duration::from_millis(10),
            SourceStats::new(),
        )
        .unwrap();

        for expected in 1..=3 {
            assert!(matches!(recv(&channel), PollResult::Updated { value, .. } if value == expected));
        }
    }

    struct Shared(Arc<AtomicU32>);

    impl Source for Shared {
        type Output = u32;

        fn name(&self) -> &'static str {
            "shared"
        }

        fn fetch(&mut self) -> Result<u32, FetchError> {
            Ok(self.0.fetch_add(1, Ordering::SeqCst) + 1)
        }
    }

    #[test]
    fn test_drop_stops_the_worker() {
        let calls = Arc::new(AtomicU32::new(0));
        let channel = PollChannel::spawn(
            egui::Context::default(),
            Shared(calls.clone()),
            Duration::from_millis(5),
            SourceStats::new(),
        )
        .unwrap();

        assert!(matches!(recv(&channel), PollResult::Updated { .. }));
        drop(channel);

        // A fetch already in flight may still finish.
        std::thread::sleep(Duration::from_millis(100));
        let after_drop = calls.load(Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(100));
        assert_eq!(calls.load(Ordering::SeqCst), after_drop);
    }
}
