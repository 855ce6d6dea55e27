//! Rotary-encoder acquisition for throttle, brake and steering
//!
//! Hardware-independent core: quadrature decoding, persisted per-channel
//! calibration, percentage mapping and the operator command set. The
//! `firmware` package wires this to the MCU.
#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod calibration;
pub mod channel;
pub mod command;
pub mod controls;
pub mod decoder;
pub mod mapper;
pub mod params;
pub mod storage;

pub use calibration::{CalibrationError, CalibrationRecord, ChannelId, LoadError};
pub use channel::{Channel, ChannelState};
pub use command::{parse_command, Command};
pub use controls::{ControlValues, Controls};
pub use decoder::QuadratureDecoder;
pub use mapper::{map_to_percent, Polarity};
pub use storage::{NvStorage, StorageError};
