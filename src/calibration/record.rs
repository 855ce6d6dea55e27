//! Persisted calibration record
//!
//! Layout (little-endian, 16 bytes, no padding):
//!
//! | offset | field            | type |
//! |--------|------------------|------|
//! | 0      | validity marker  | u16  |
//! | 2      | min              | i32  |
//! | 6      | max              | i32  |
//! | 10     | center           | i32  |
//! | 14     | integrity digest | u16  |

use crate::params::storage::{RECORD_SIZE, VALIDITY_MARKER};
use crate::storage::StorageError;

/// Reasons a stored record is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoadError {
    /// Region could not be read
    Storage(StorageError),

    /// Marker is not [`VALIDITY_MARKER`] (erased or never written)
    InvalidMarker(u16),

    /// Digest does not match the fields
    DigestMismatch { stored: u16, computed: u16 },

    /// Fields verify but describe an empty or inverted range
    InvalidRange { min: i32, max: i32 },
}

impl From<StorageError> for LoadError {
    fn from(e: StorageError) -> Self {
        LoadError::Storage(e)
    }
}

/// Operator-established raw range of one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationRecord {
    /// [`VALIDITY_MARKER`] when the record may be trusted
    pub marker: u16,
    /// Raw position mapped to the low end
    pub min: i32,
    /// Raw position mapped to the high end
    pub max: i32,
    /// Raw position mapped to 0 on bipolar channels (stored but unused on unipolar ones)
    pub center: i32,
    /// XOR-halves digest over marker, min, max, center
    pub digest: u16,
}

impl CalibrationRecord {
    /// Record carrying no calibration (marker cleared)
    ///
    /// The mapper outputs 0 for such a record.
    pub const fn unset() -> Self {
        Self {
            marker: 0,
            min: 0,
            max: 0,
            center: 0,
            digest: 0,
        }
    }

    /// Sealed record: marker set and digest computed
    pub const fn new(min: i32, max: i32, center: i32) -> Self {
        let digest = compute_digest(VALIDITY_MARKER, min, max, center);
        Self {
            marker: VALIDITY_MARKER,
            min,
            max,
            center,
            digest,
        }
    }

    /// Marker check only (what the mapper relies on)
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.marker == VALIDITY_MARKER
    }

    /// Full check applied to anything read back from storage
    ///
    /// Order: marker, digest, then `min < max`.
    pub fn verify(&self) -> Result<(), LoadError> {
        if self.marker != VALIDITY_MARKER {
            return Err(LoadError::InvalidMarker(self.marker));
        }

        let computed = compute_digest(self.marker, self.min, self.max, self.center);
        if computed != self.digest {
            return Err(LoadError::DigestMismatch {
                stored: self.digest,
                computed,
            });
        }

        if self.min >= self.max {
            return Err(LoadError::InvalidRange {
                min: self.min,
                max: self.max,
            });
        }

        Ok(())
    }

    /// Serialize to the persisted layout
    pub fn to_bytes(&self) -> [u8; RECORD_SIZE] {
        let mut bytes = [0u8; RECORD_SIZE];
        bytes[0..2].copy_from_slice(&self.marker.to_le_bytes());
        bytes[2..6].copy_from_slice(&self.min.to_le_bytes());
        bytes[6..10].copy_from_slice(&self.max.to_le_bytes());
        bytes[10..14].copy_from_slice(&self.center.to_le_bytes());
        bytes[14..16].copy_from_slice(&self.digest.to_le_bytes());
        bytes
    }

    /// Deserialize from the persisted layout (no validation)
    pub fn from_bytes(bytes: &[u8; RECORD_SIZE]) -> Self {
        Self {
            marker: u16::from_le_bytes([bytes[0], bytes[1]]),
            min: i32::from_le_bytes([bytes[2], bytes[3], bytes[4], bytes[5]]),
            max: i32::from_le_bytes([bytes[6], bytes[7], bytes[8], bytes[9]]),
            center: i32::from_le_bytes([bytes[10], bytes[11], bytes[12], bytes[13]]),
            digest: u16::from_le_bytes([bytes[14], bytes[15]]),
        }
    }
}

impl Default for CalibrationRecord {
    fn default() -> Self {
        Self::unset()
    }
}

/// XOR of every 16-bit half: marker, then low/high halves of min, max, center
///
/// Detects corruption only; distinct records can share a digest.
pub const fn compute_digest(marker: u16, min: i32, max: i32, center: i32) -> u16 {
    let mut digest = marker;
    digest ^= halves_xor(min);
    digest ^= halves_xor(max);
    digest ^= halves_xor(center);
    digest
}

#[inline(always)]
const fn halves_xor(value: i32) -> u16 {
    let bits = value as u32;
    (bits & 0xFFFF) as u16 ^ (bits >> 16) as u16
}

// Encoded layout must match RECORD_SIZE
const _: () = {
    assert!(2 + 4 + 4 + 4 + 2 == RECORD_SIZE, "record layout does not match RECORD_SIZE");
};
