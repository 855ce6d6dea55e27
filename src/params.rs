//! Encoder, storage and control-cycle parameters

/// Encoder hardware (LPD3806-600BM-G5-24C, AB quadrature, NPN open collector)
pub mod encoder {
    /// Pulses per revolution on the primary phase
    pub const PULSES_PER_REV: i32 = 600;

    /// Upper raw bound used when no calibration has been stored yet
    pub const REFERENCE_MAX: i32 = PULSES_PER_REV;
}

/// Non-volatile calibration region
pub mod storage {
    /// Size of the shared region holding every channel's record [bytes]
    pub const REGION_SIZE: usize = 512;

    /// Encoded size of one calibration record [bytes]
    pub const RECORD_SIZE: usize = 16;

    /// Distance between consecutive channel slots [bytes]
    pub const SLOT_STRIDE: u32 = 32;

    /// Marker written in front of every valid record
    pub const VALIDITY_MARKER: u16 = 0xCAFE;
}

/// Main control cycle
pub mod control {
    /// Period of the channel update cycle [ms]
    pub const CYCLE_PERIOD_MS: u64 = 10;

    /// Interval between calibration progress log lines [ms]
    pub const PROGRESS_LOG_PERIOD_MS: u64 = 1000;

    /// Longest accepted command line, excluding the terminator [bytes]
    pub const MAX_COMMAND_LEN: usize = 64;
}
