// Calibration module
// Persisted per-channel range records, the record table and the calibration session

pub mod record;
pub mod store;
pub mod table;

// Re-export main types for easier access
pub use record::{compute_digest, CalibrationRecord, LoadError};
pub use store::{CalibrationError, CalibrationSession, CalibrationStore};
pub use table::ChannelId;
