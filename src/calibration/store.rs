//! Per-channel calibration store
//!
//! Holds the in-memory record, loads and persists it at the channel's slot,
//! and tracks the (advisory) calibration session.

use super::record::{CalibrationRecord, LoadError};
use super::table::ChannelId;
use crate::mapper::Polarity;
use crate::params::storage::RECORD_SIZE;
use crate::storage::{NvStorage, StorageError};

/// Rejected calibration save
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalibrationError {
    /// `min >= max`
    InvalidRange { min: i32, max: i32 },

    /// Record could not be written
    Storage(StorageError),
}

impl From<StorageError> for CalibrationError {
    fn from(e: StorageError) -> Self {
        CalibrationError::Storage(e)
    }
}

/// Observed extremes while the operator moves the control through its travel
///
/// Never persisted and never fed into `save` automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationSession {
    pub active: bool,
    pub observed_min: i32,
    pub observed_max: i32,
}

impl CalibrationSession {
    pub const fn new() -> Self {
        Self {
            active: false,
            observed_min: i32::MAX,
            observed_max: i32::MIN,
        }
    }

    /// Begin (or restart) a session with empty extremes
    pub fn start(&mut self) {
        *self = Self {
            active: true,
            ..Self::new()
        };
    }

    /// Fold one raw sample into the extremes (no-op when inactive)
    pub fn observe(&mut self, raw: i32) {
        if !self.active {
            return;
        }
        self.observed_min = self.observed_min.min(raw);
        self.observed_max = self.observed_max.max(raw);
    }

    /// Extremes seen so far, `None` before the first sample
    pub fn observed_range(&self) -> Option<(i32, i32)> {
        if self.observed_min > self.observed_max {
            None
        } else {
            Some((self.observed_min, self.observed_max))
        }
    }

    pub fn end(&mut self) {
        *self = Self::new();
    }
}

impl Default for CalibrationSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Calibration state of one channel
pub struct CalibrationStore {
    channel: ChannelId,
    polarity: Polarity,
    record: CalibrationRecord,
    session: CalibrationSession,
}

impl CalibrationStore {
    /// Store with an unset record; call [`begin`](Self::begin) before use
    pub const fn new(channel: ChannelId) -> Self {
        Self {
            channel,
            polarity: channel.polarity(),
            record: CalibrationRecord::unset(),
            session: CalibrationSession::new(),
        }
    }

    /// Load the stored record, or install and persist the polarity defaults
    ///
    /// After this call the in-memory record is always valid. `Err` means the
    /// defaults could not be written back; they are still in use.
    pub fn begin<S: NvStorage>(&mut self, storage: &mut S) -> Result<(), StorageError> {
        match self.load(storage) {
            Ok(()) => {
                info!(
                    "[{}] calibration loaded: min={}, max={}, center={}",
                    self.channel.name(),
                    self.record.min,
                    self.record.max,
                    self.record.center
                );
                Ok(())
            }
            Err(e) => {
                warn!(
                    "[{}] no valid calibration ({:?}), using defaults",
                    self.channel.name(),
                    e
                );
                self.reset_to_defaults(storage)
            }
        }
    }

    /// Read and verify the record at this channel's slot
    ///
    /// On any failure the in-memory record is left untouched.
    pub fn load<S: NvStorage>(&mut self, storage: &mut S) -> Result<(), LoadError> {
        let mut bytes = [0u8; RECORD_SIZE];
        storage.read(self.channel.offset(), &mut bytes)?;

        let record = CalibrationRecord::from_bytes(&bytes);
        record.verify()?;

        self.record = record;
        Ok(())
    }

    /// Replace the record with the polarity defaults and persist them
    ///
    /// The in-memory record is replaced even when the write fails.
    pub fn reset_to_defaults<S: NvStorage>(&mut self, storage: &mut S) -> Result<(), StorageError> {
        self.record = self.polarity.default_record();

        if let Err(e) = storage.write(self.channel.offset(), &self.record.to_bytes()) {
            error!(
                "[{}] failed to persist default calibration: {:?}",
                self.channel.name(),
                e
            );
            return Err(e);
        }

        info!(
            "[{}] calibration reset to defaults: min={}, max={}, center={}",
            self.channel.name(),
            self.record.min,
            self.record.max,
            self.record.center
        );
        Ok(())
    }

    /// Start a calibration session (restarts one already running)
    pub fn start_calibration(&mut self) {
        self.session.start();
        info!("[{}] calibration started", self.channel.name());
    }

    /// Feed a raw sample to the running session
    pub fn update_calibration(&mut self, raw: i32) {
        self.session.observe(raw);
    }

    /// Persist a new range and end the session
    ///
    /// Rejected with `InvalidRange` when `min >= max`. On any error nothing is
    /// persisted, the in-memory record is unchanged and the session stays
    /// active so the operator can retry.
    pub fn save<S: NvStorage>(
        &mut self,
        storage: &mut S,
        min: i32,
        max: i32,
        center: i32,
    ) -> Result<(), CalibrationError> {
        if min >= max {
            error!(
                "[{}] invalid calibration rejected: min={} >= max={}",
                self.channel.name(),
                min,
                max
            );
            return Err(CalibrationError::InvalidRange { min, max });
        }

        let record = CalibrationRecord::new(min, max, center);

        if let Err(e) = storage.write(self.channel.offset(), &record.to_bytes()) {
            error!(
                "[{}] failed to persist calibration: {:?}",
                self.channel.name(),
                e
            );
            return Err(e.into());
        }

        self.record = record;
        self.session.end();

        info!(
            "[{}] calibration saved: min={}, max={}, center={}",
            self.channel.name(),
            min,
            max,
            center
        );
        Ok(())
    }

    pub fn is_calibrating(&self) -> bool {
        self.session.active
    }

    pub fn session(&self) -> &CalibrationSession {
        &self.session
    }

    pub fn record(&self) -> &CalibrationRecord {
        &self.record
    }

    pub fn channel(&self) -> ChannelId {
        self.channel
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }
}
