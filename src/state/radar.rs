//! Radar tab state: stored frames and the animation cursor.

use crate::storage::RadarFrame;
use crate::workers::RadarUpdate;
use std::time::Duration;
use web_time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RadarMode {
    /// Latest regional/national pair.
    #[default]
    Current,
    /// Stepping through stored frames.
    Animated {
        frame: usize,
        loops_done: u32,
        next_step: Instant,
    },
}

pub struct RadarViewState {
    pub regional: Vec<RadarFrame>,
    pub national: Vec<RadarFrame>,
    pub mode: RadarMode,
    frame_interval: Duration,
    max_loops: u32,
    loaded: bool,
    /// Bumped on every new result so cached textures can be dropped.
    generation: u64,
}

impl RadarViewState {
    pub fn new(frame_interval: Duration, max_loops: u32) -> Self {
        Self {
            regional: Vec::new(),
            national: Vec::new(),
            mode: RadarMode::Current,
            frame_interval,
            max_loops: max_loops.max(1),
            loaded: false,
            generation: 0,
        }
    }

    pub fn apply(&mut self, update: RadarUpdate) {
        self.regional = update.regional;
        self.national = update.national;
        self.loaded = true;
        self.generation += 1;

        if let RadarMode::Animated { frame, .. } = &mut self.mode {
            if *frame >= self.regional.len() {
                *frame = 0;
            }
        }
        if self.regional.is_empty() {
            self.mode = RadarMode::Current;
        }
    }

    /// Controls stay disabled until the first radar result.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.mode, RadarMode::Animated { .. })
    }

    pub fn start_animation(&mut self, now: Instant) {
        if self.regional.is_empty() {
            return;
        }
        self.mode = RadarMode::Animated {
            frame: 0,
            loops_done: 0,
            next_step: now + self.frame_interval,
        };
    }

    pub fn show_current(&mut self) {
        self.mode = RadarMode::Current;
    }

    /// Advances the animation. Returns how long until the next step, or
    /// `None` when nothing is animating. A hidden tab stops the animation.
    pub fn tick(&mut self, now: Instant, visible: bool) -> Option<Duration> {
        let RadarMode::Animated {
            frame,
            loops_done,
            next_step,
        } = &mut self.mode
        else {
            return None;
        };

        if !visible {
            self.mode = RadarMode::Current;
            return None;
        }

        if now >= *next_step {
            *frame += 1;
            if *frame >= self.regional.len() {
                *frame = 0;
                *loops_done += 1;
                if *loops_done >= self.max_loops {
                    log::debug!("Radar animation finished after {} loops", self.max_loops);
                    self.mode = RadarMode::Current;
                    return None;
                }
            }
            // Restart from `now` rather than catching up missed steps.
            *next_step = now + self.frame_interval;
        }

        Some(next_step.saturating_duration_since(now))
    }

    fn displayed_index(&self) -> Option<usize> {
        let last = self.regional.len().checked_sub(1)?;
        Some(match self.mode {
            RadarMode::Current => last,
            RadarMode::Animated { frame, .. } => frame.min(last),
        })
    }

    /// Regional frame on screen.
    pub fn displayed_regional(&self) -> Option<&RadarFrame> {
        self.regional.get(self.displayed_index()?)
    }

    /// National frame paired by index, clamped to the national archive.
    pub fn displayed_national(&self) -> Option<&RadarFrame> {
        let last = self.national.len().checked_sub(1)?;
        let index = self.displayed_index().unwrap_or(last).min(last);
        self.national.get(index)
    }

    /// `HH:MM` of the regional frame on screen.
    pub fn displayed_label(&self) -> &str {
        self.displayed_regional()
            .map(|f| f.label.as_str())
            .unwrap_or("--:--")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn frames(prefix: &str, labels: &[&str]) -> Vec<RadarFrame> {
        labels
            .iter()
            .map(|l| RadarFrame {
                path: PathBuf::from(format!("{}/{}.gif", prefix, l)),
                label: l.to_string(),
            })
            .collect()
    }

    fn loaded(regional: &[&str], national: &[&str]) -> RadarViewState {
        let mut state = RadarViewState::new(Duration::from_millis(500), 2);
        state.apply(RadarUpdate {
            regional: frames("reg", regional),
            national: frames("nat", national),
            new_frame: true,
        });
        state
    }

    #[test]
    fn test_current_shows_latest_pair() {
        let state = loaded(&["12:00", "12:10", "12:20"], &["12:00", "12:10", "12:20"]);
        assert_eq!(state.displayed_label(), "12:20");
        assert_eq!(
            state.displayed_national().unwrap().path,
            PathBuf::from("nat/12:20.gif")
        );
    }

    #[test]
    fn test_not_loaded_before_first_result() {
        let state = RadarViewState::new(Duration::from_millis(500), 5);
        assert!(!state.is_loaded());
        assert_eq!(state.displayed_label(), "--:--");
        assert!(state.displayed_national().is_none());
    }

    #[test]
    fn test_national_index_is_clamped() {
        let mut state = loaded(&["12:00", "12:10", "12:20"], &["12:20"]);
        state.start_animation(Instant::now());
        assert_eq!(state.displayed_label(), "12:00");
        assert_eq!(
            state.displayed_national().unwrap().path,
            PathBuf::from("nat/12:20.gif")
        );
    }

    #[test]
    fn test_animation_steps_and_stops_after_loops() {
        let mut state = loaded(&["12:00", "12:10"], &["12:00", "12:10"]);
        let start = Instant::now();
        let step = Duration::from_millis(500);
        state.start_animation(start);

        // Before the first step nothing moves.
        assert_eq!(state.tick(start, true), Some(step));
        assert_eq!(state.displayed_label(), "12:00");

        let mut now = start + step;
        state.tick(now, true);
        assert_eq!(state.displayed_label(), "12:10");

        now += step;
        state.tick(now, true);
        assert_eq!(state.displayed_label(), "12:00");
        assert!(state.is_animating());

        now += step;
        state.tick(now, true);
        now += step;
        // Second wrap completes the second loop.
        assert_eq!(state.tick(now, true), None);
        assert_eq!(state.mode, RadarMode::Current);
        assert_eq!(state.displayed_label(), "12:10");
    }

    #[test]
    fn test_hidden_tab_stops_animation() {
        let mut state = loaded(&["12:00", "12:10"], &[]);
        let now = Instant::now();
        state.start_animation(now);
        assert_eq!(state.tick(now, false), None);
        assert!(!state.is_animating());
    }

    #[test]
    fn test_new_result_bumps_generation_and_clamps_frame() {
        let mut state = loaded(&["12:00", "12:10", "12:20"], &[]);
        let first = state.generation();
        state.mode = RadarMode::Animated {
            frame: 2,
            loops_done: 0,
            next_step: Instant::now(),
        };

        state.apply(RadarUpdate {
            regional: frames("reg", &["12:10"]),
            national: Vec::new(),
            new_frame: false,
        });
        assert!(state.generation() > first);
        assert_eq!(state.displayed_label(), "12:10");
    }

    #[test]
    fn test_animation_needs_frames() {
        let mut state = RadarViewState::new(Duration::from_millis(500), 5);
        state.start_animation(Instant::now());
        assert!(!state.is_animating());
    }
}
