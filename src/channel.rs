//! Channel orchestration
//!
//! Ties a decoder, a calibration store and the mapper together and runs once
//! per control cycle. Everything here executes in the control cycle; only the
//! decoder is touched from interrupt context.

use crate::calibration::{CalibrationError, CalibrationRecord, CalibrationStore, ChannelId};
use crate::decoder::QuadratureDecoder;
use crate::mapper::{map_to_percent, Polarity};
use crate::storage::{NvStorage, StorageError};

/// Channel operating state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelState {
    /// Normal operation
    Idle,
    /// Calibration session running; left only by a successful save
    Calibrating,
}

/// One operator input (throttle, brake or steering)
pub struct Channel<'d> {
    decoder: &'d QuadratureDecoder,
    store: CalibrationStore,
    /// Decoder count treated as raw position 0
    origin: i32,
    /// Raw snapshot taken by the last `update`
    raw: i32,
    /// Percentage derived from `raw`
    value: i32,
}

impl<'d> Channel<'d> {
    /// Create a channel bound to its decoder
    ///
    /// The calibration record stays unset (output 0) until [`begin`](Self::begin).
    pub const fn new(id: ChannelId, decoder: &'d QuadratureDecoder) -> Self {
        Self {
            decoder,
            store: CalibrationStore::new(id),
            origin: 0,
            raw: 0,
            value: 0,
        }
    }

    /// Load calibration (self-healing to defaults)
    pub fn begin<S: NvStorage>(&mut self, storage: &mut S) -> Result<(), StorageError> {
        self.store.begin(storage)
    }

    /// Per-cycle update
    ///
    /// Reads the raw position exactly once and derives everything from that
    /// snapshot.
    pub fn update(&mut self) {
        let raw = self.read_raw();
        self.raw = raw;

        if self.store.is_calibrating() {
            self.store.update_calibration(raw);
        }

        let polarity = self.store.polarity();
        let value = map_to_percent(raw, self.store.record(), polarity);
        self.value = polarity.clamp(value);
    }

    /// Percentage computed by the last `update`
    pub fn get_value(&self) -> i32 {
        self.value
    }

    /// Live raw position relative to the last `reset`
    pub fn get_raw_position(&self) -> i32 {
        self.read_raw()
    }

    /// Raw position used by the last `update`
    pub fn last_raw_position(&self) -> i32 {
        self.raw
    }

    /// Make the current position the new raw zero
    ///
    /// The decoder count itself is never written from here; the origin is
    /// subtracted on every read instead.
    pub fn reset(&mut self) {
        self.origin = self.decoder.position();
        self.raw = 0;
        self.value = 0;
        info!("[{}] raw position reset", self.id().name());
    }

    /// Enter `Calibrating`
    pub fn start_calibration(&mut self) {
        self.store.start_calibration();
    }

    /// Persist a new range and return to `Idle`
    ///
    /// `center` is used by bipolar channels only; when absent the midpoint of
    /// `min` and `max` is taken. Unipolar channels always store center 0.
    pub fn save_calibration<S: NvStorage>(
        &mut self,
        storage: &mut S,
        min: i32,
        max: i32,
        center: Option<i32>,
    ) -> Result<(), CalibrationError> {
        let center = match self.store.polarity() {
            Polarity::Unipolar => 0,
            Polarity::Bipolar => center.unwrap_or_else(|| midpoint(min, max)),
        };
        self.store.save(storage, min, max, center)
    }

    /// Overwrite the calibration with the polarity defaults
    pub fn reset_calibration<S: NvStorage>(&mut self, storage: &mut S) -> Result<(), StorageError> {
        self.store.reset_to_defaults(storage)
    }

    pub fn is_calibrating(&self) -> bool {
        self.store.is_calibrating()
    }

    pub fn state(&self) -> ChannelState {
        if self.store.is_calibrating() {
            ChannelState::Calibrating
        } else {
            ChannelState::Idle
        }
    }

    /// Extremes observed by the running calibration session
    pub fn observed_range(&self) -> Option<(i32, i32)> {
        if self.store.is_calibrating() {
            self.store.session().observed_range()
        } else {
            None
        }
    }

    pub fn calibration(&self) -> &CalibrationRecord {
        self.store.record()
    }

    pub fn id(&self) -> ChannelId {
        self.store.channel()
    }

    pub fn polarity(&self) -> Polarity {
        self.store.polarity()
    }

    #[inline(always)]
    fn read_raw(&self) -> i32 {
        self.decoder.position().wrapping_sub(self.origin)
    }
}

/// Integer midpoint without overflow, rounding toward negative infinity
fn midpoint(a: i32, b: i32) -> i32 {
    ((a as i64 + b as i64).div_euclid(2)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::mock::MemStorage;

    /// Move a decoder by `steps` (positive = increment direction)
    fn turn(decoder: &QuadratureDecoder, steps: i32) {
        let mut level = decoder.last_primary();
        for _ in 0..steps.unsigned_abs() {
            level = !level;
            let secondary = if steps > 0 { !level } else { level };
            decoder.on_primary_edge(level, secondary);
        }
    }

    #[test]
    fn test_value_before_begin_is_zero() {
        let decoder = QuadratureDecoder::new();
        let mut channel = Channel::new(ChannelId::Throttle, &decoder);
        turn(&decoder, 300);
        channel.update();
        assert_eq!(channel.get_value(), 0);
        assert_eq!(channel.get_raw_position(), 300);
    }

    #[test]
    fn test_unipolar_channel_scenario() {
        let mut storage = MemStorage::new();
        let decoder = QuadratureDecoder::new();
        let mut channel = Channel::new(ChannelId::Throttle, &decoder);
        channel.begin(&mut storage).unwrap();
        channel.save_calibration(&mut storage, 0, 600, None).unwrap();

        channel.update();
        assert_eq!(channel.get_value(), 0);

        turn(&decoder, 300);
        channel.update();
        assert_eq!(channel.get_value(), 50);

        turn(&decoder, 300);
        channel.update();
        assert_eq!(channel.get_value(), 100);

        turn(&decoder, 100);
        channel.update();
        assert_eq!(channel.get_raw_position(), 700);
        assert_eq!(channel.get_value(), 100);
    }

    #[test]
    fn test_bipolar_channel_scenario() {
        let mut storage = MemStorage::new();
        let decoder = QuadratureDecoder::new();
        let mut channel = Channel::new(ChannelId::Steering, &decoder);
        channel.begin(&mut storage).unwrap();
        channel.save_calibration(&mut storage, 0, 600, Some(300)).unwrap();

        channel.update();
        assert_eq!(channel.get_value(), -100);

        turn(&decoder, 150);
        channel.update();
        assert_eq!(channel.get_value(), -50);

        turn(&decoder, 150);
        channel.update();
        assert_eq!(channel.get_value(), 0);

        turn(&decoder, 300);
        channel.update();
        assert_eq!(channel.get_value(), 100);
    }

    #[test]
    fn test_calibration_workflow() {
        let mut storage = MemStorage::new();
        let decoder = QuadratureDecoder::new();
        let mut channel = Channel::new(ChannelId::Brake, &decoder);
        channel.begin(&mut storage).unwrap();
        assert_eq!(channel.state(), ChannelState::Idle);
        assert_eq!(channel.observed_range(), None);

        channel.start_calibration();
        assert_eq!(channel.state(), ChannelState::Calibrating);

        // Travel well past the default range in both directions
        turn(&decoder, -120);
        channel.update();
        turn(&decoder, 1020);
        channel.update();
        turn(&decoder, -400);
        channel.update();
        assert_eq!(channel.observed_range(), Some((-120, 900)));

        // Invalid save keeps the channel calibrating
        assert!(channel.save_calibration(&mut storage, 900, -120, None).is_err());
        assert!(channel.is_calibrating());

        channel.save_calibration(&mut storage, -120, 900, None).unwrap();
        assert_eq!(channel.state(), ChannelState::Idle);
        assert_eq!(channel.observed_range(), None);

        // raw = 500 in [-120, 900] -> 620 * 100 / 1020 = 60
        channel.update();
        assert_eq!(channel.get_value(), 60);
    }

    #[test]
    fn test_unipolar_save_drops_center() {
        let mut storage = MemStorage::new();
        let decoder = QuadratureDecoder::new();
        let mut channel = Channel::new(ChannelId::Throttle, &decoder);
        channel.begin(&mut storage).unwrap();
        channel.save_calibration(&mut storage, 10, 20, Some(15)).unwrap();
        assert_eq!(channel.calibration().center, 0);
    }

    #[test]
    fn test_bipolar_save_without_center_uses_midpoint() {
        let mut storage = MemStorage::new();
        let decoder = QuadratureDecoder::new();
        let mut channel = Channel::new(ChannelId::Steering, &decoder);
        channel.begin(&mut storage).unwrap();
        channel.save_calibration(&mut storage, -301, 500, None).unwrap();
        assert_eq!(channel.calibration().center, 99);
    }

    #[test]
    fn test_reset_rezeroes_raw_position() {
        let mut storage = MemStorage::new();
        let decoder = QuadratureDecoder::new();
        let mut channel = Channel::new(ChannelId::Throttle, &decoder);
        channel.begin(&mut storage).unwrap();

        turn(&decoder, 240);
        channel.update();
        assert_eq!(channel.get_value(), 40);

        channel.reset();
        assert_eq!(channel.get_raw_position(), 0);
        assert_eq!(channel.get_value(), 0);
        // Decoder count is untouched
        assert_eq!(decoder.position(), 240);

        turn(&decoder, 60);
        channel.update();
        assert_eq!(channel.last_raw_position(), 60);
        assert_eq!(channel.get_value(), 10);
    }

    #[test]
    fn test_reset_calibration_restores_defaults() {
        let mut storage = MemStorage::new();
        let decoder = QuadratureDecoder::new();
        let mut channel = Channel::new(ChannelId::Steering, &decoder);
        channel.begin(&mut storage).unwrap();
        channel.save_calibration(&mut storage, -50, 50, Some(0)).unwrap();

        channel.reset_calibration(&mut storage).unwrap();
        assert_eq!(*channel.calibration(), Polarity::Bipolar.default_record());

        let mut reloaded = Channel::new(ChannelId::Steering, &decoder);
        reloaded.begin(&mut storage).unwrap();
        assert_eq!(*reloaded.calibration(), Polarity::Bipolar.default_record());
    }

    #[test]
    fn test_calibration_survives_restart() {
        let mut storage = MemStorage::new();
        let decoder = QuadratureDecoder::new();
        {
            let mut channel = Channel::new(ChannelId::Brake, &decoder);
            channel.begin(&mut storage).unwrap();
            channel.save_calibration(&mut storage, 100, 300, None).unwrap();
        }

        let mut channel = Channel::new(ChannelId::Brake, &decoder);
        channel.begin(&mut storage).unwrap();
        let record = channel.calibration();
        assert_eq!((record.min, record.max), (100, 300));
    }

    #[test]
    fn test_midpoint() {
        assert_eq!(midpoint(0, 600), 300);
        assert_eq!(midpoint(-301, 500), 99);
        assert_eq!(midpoint(-3, 0), -2);
        assert_eq!(midpoint(i32::MAX - 1, i32::MAX), i32::MAX - 1);
    }
}
