//! The three operator channels and the storage region they share

use crate::calibration::{CalibrationError, ChannelId};
use crate::channel::Channel;
use crate::command::Command;
use crate::decoder::QuadratureDecoder;
use crate::storage::{NvStorage, StorageError};

/// Snapshot of all channel outputs after one cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlValues {
    /// 0..=100
    pub throttle: i32,
    /// 0..=100
    pub brake: i32,
    /// -100..=100
    pub steering: i32,
    /// Any channel in a calibration session
    pub calibrating: bool,
}

impl ControlValues {
    pub const fn new() -> Self {
        Self {
            throttle: 0,
            brake: 0,
            steering: 0,
            calibrating: false,
        }
    }
}

/// Owner of the calibration region and the three channels
pub struct Controls<'d, S: NvStorage> {
    storage: S,
    channels: [Channel<'d>; 3],
}

impl<'d, S: NvStorage> Controls<'d, S> {
    pub fn new(
        storage: S,
        throttle: &'d QuadratureDecoder,
        brake: &'d QuadratureDecoder,
        steering: &'d QuadratureDecoder,
    ) -> Self {
        Self {
            storage,
            channels: [
                Channel::new(ChannelId::Throttle, throttle),
                Channel::new(ChannelId::Brake, brake),
                Channel::new(ChannelId::Steering, steering),
            ],
        }
    }

    /// Load every channel's calibration
    ///
    /// All channels are initialized even if one fails to persist its defaults;
    /// the first such error is returned.
    pub fn begin(&mut self) -> Result<(), StorageError> {
        let mut result = Ok(());
        for channel in self.channels.iter_mut() {
            if let Err(e) = channel.begin(&mut self.storage) {
                result = result.and(Err(e));
            }
        }
        result
    }

    /// Run one control cycle over all channels, in table order
    pub fn update(&mut self) -> ControlValues {
        for channel in self.channels.iter_mut() {
            channel.update();
        }
        self.values()
    }

    /// Outputs of the last cycle
    pub fn values(&self) -> ControlValues {
        ControlValues {
            throttle: self.channel(ChannelId::Throttle).get_value(),
            brake: self.channel(ChannelId::Brake).get_value(),
            steering: self.channel(ChannelId::Steering).get_value(),
            calibrating: self.channels.iter().any(|c| c.is_calibrating()),
        }
    }

    pub fn channel(&self, id: ChannelId) -> &Channel<'d> {
        &self.channels[id.index()]
    }

    pub fn channel_mut(&mut self, id: ChannelId) -> &mut Channel<'d> {
        &mut self.channels[id.index()]
    }

    pub fn start_calibration(&mut self, id: ChannelId) {
        self.channels[id.index()].start_calibration();
    }

    pub fn save_calibration(
        &mut self,
        id: ChannelId,
        min: i32,
        max: i32,
        center: Option<i32>,
    ) -> Result<(), CalibrationError> {
        self.channels[id.index()].save_calibration(&mut self.storage, min, max, center)
    }

    /// Restore defaults on every channel
    pub fn reset_calibration(&mut self) -> Result<(), StorageError> {
        let mut result = Ok(());
        for channel in self.channels.iter_mut() {
            if let Err(e) = channel.reset_calibration(&mut self.storage) {
                result = result.and(Err(e));
            }
        }
        result
    }

    /// Execute an operator command
    pub fn apply(&mut self, command: Command) -> Result<(), CalibrationError> {
        match command {
            Command::StartCalibration(id) => {
                self.start_calibration(id);
                Ok(())
            }
            Command::SaveCalibration {
                channel,
                min,
                max,
                center,
            } => self.save_calibration(channel, min, max, center),
            Command::ResetCalibration => self.reset_calibration().map_err(CalibrationError::from),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }
}
