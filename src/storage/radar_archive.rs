//! Rolling directory of radar GIF frames.

use chrono::{Duration, NaiveDateTime, Timelike};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File stem format of stored frames. Sorts chronologically as text.
pub const FRAME_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H-%M";

const FRAME_EXTENSION: &str = "gif";

/// AEMET publishes composites on 10-minute boundaries with a delay of
/// about 20 minutes; the stamp names the image a fetch at `now` returns.
pub fn frame_timestamp(now: NaiveDateTime) -> String {
    let floored = now
        .with_minute(now.minute() - now.minute() % 10)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now);
    (floored - Duration::minutes(20))
        .format(FRAME_TIMESTAMP_FORMAT)
        .to_string()
}

/// A stored frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadarFrame {
    pub path: PathBuf,
    /// `HH:MM` taken from the file stem.
    pub label: String,
}

impl RadarFrame {
    fn from_path(path: PathBuf) -> Self {
        let label = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|stem| NaiveDateTime::parse_from_str(stem, FRAME_TIMESTAMP_FORMAT).ok())
            .map(|t| t.format("%H:%M").to_string())
            .unwrap_or_default();
        Self { path, label }
    }
}

/// Keeps at most `max_frames` GIFs in one directory, evicting the oldest.
#[derive(Debug, Clone)]
pub struct RadarArchive {
    dir: PathBuf,
    max_frames: usize,
}

impl RadarArchive {
    /// Opens the archive, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>, max_frames: usize) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            max_frames: max_frames.max(1),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Stored frames, oldest first.
    pub fn frames(&self) -> io::Result<Vec<RadarFrame>> {
        Ok(self
            .frame_paths()?
            .into_iter()
            .map(RadarFrame::from_path)
            .collect())
    }

    fn frame_paths(&self) -> io::Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some(FRAME_EXTENSION) {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }

    /// Stores `bytes` as `{stamp}.gif`.
    ///
    /// Returns `false` without writing when `check_duplicate` is set and the
    /// newest stored frame has identical content. An existing frame with the
    /// same stamp is overwritten in place.
    pub fn store(&self, bytes: &[u8], stamp: &str, check_duplicate: bool) -> io::Result<bool> {
        let target = self.dir.join(format!("{}.{}", stamp, FRAME_EXTENSION));
        let mut paths = self.frame_paths()?;

        if let Some(newest) = paths.last() {
            if check_duplicate && fs::read(newest)? == bytes {
                log::debug!("Radar frame {} unchanged, skipping", stamp);
                return Ok(false);
            }

            if !paths.contains(&target) {
                while paths.len() >= self.max_frames {
                    let oldest = paths.remove(0);
                    log::debug!("Evicting radar frame {}", oldest.display());
                    fs::remove_file(&oldest)?;
                }
            }
        }

        fs::write(&target, bytes)?;
        log::info!("Stored radar frame {}", target.display());
        Ok(true)
    }
}
