use super::Source;
use crate::aemet::AemetClient;
use crate::error::FetchError;
use crate::storage::{frame_timestamp, RadarArchive, RadarFrame};
use chrono::Local;

/// Frames on disk after a radar poll.
#[derive(Debug, Clone, PartialEq)]
pub struct RadarUpdate {
    pub regional: Vec<RadarFrame>,
    pub national: Vec<RadarFrame>,
    /// Whether this poll stored a new regional frame.
    pub new_frame: bool,
}

/// Polls the regional and national radar composites into their archives.
pub struct RadarSource {
    client: AemetClient,
    regional: RadarArchive,
    national: RadarArchive,
}

impl RadarSource {
    pub fn new(client: AemetClient, regional: RadarArchive, national: RadarArchive) -> Self {
        Self {
            client,
            regional,
            national,
        }
    }

    fn poll_at(&mut self, stamp: &str) -> Result<RadarUpdate, FetchError> {
        let regional = self.client.regional_radar()?;
        let new_frame = self.regional.store(&regional, stamp, true)?;

        // The national composite is only taken alongside a new regional one
        // so both archives stay index-aligned. Missing it does not hide the
        // regional frame already stored.
        if new_frame {
            if let Err(e) = self.store_national(stamp) {
                log::warn!("National radar for {} not stored: {}", stamp, e);
            }
        }

        Ok(RadarUpdate {
            regional: self.regional.frames()?,
            national: self.national.frames()?,
            new_frame,
        })
    }

    fn store_national(&self, stamp: &str) -> Result<(), FetchError> {
        let national = self.client.national_radar()?;
        self.national.store(&national, stamp, false)?;
        Ok(())
    }
}

impl Source for RadarSource {
    type Output = RadarUpdate;

    fn name(&self) -> &'static str {
        "radar"
    }

    fn fetch(&mut self) -> Result<RadarUpdate, FetchError> {
        let stamp = frame_timestamp(Local::now().naive_local());
        self.poll_at(&stamp)
    }
}
