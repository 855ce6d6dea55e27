//! Non-volatile storage seam
//!
//! The calibration records of all channels live in one byte-addressed region
//! (EEPROM semantics). The firmware backs it with a flash page, tests with RAM.

/// Storage operation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Access beyond the end of the region
    OutOfBounds,

    /// Underlying read failed
    ReadFailed,

    /// Underlying erase failed
    EraseFailed,

    /// Underlying write failed
    WriteFailed,
}

/// Byte-addressed non-volatile region
///
/// `write` must either land the whole slice or fail; callers never observe a
/// partially written record through a successful return.
pub trait NvStorage {
    /// Region size in bytes
    fn capacity(&self) -> usize;

    /// Read `buf.len()` bytes starting at `offset`
    fn read(&mut self, offset: u32, buf: &mut [u8]) -> Result<(), StorageError>;

    /// Write `data` starting at `offset`
    fn write(&mut self, offset: u32, data: &[u8]) -> Result<(), StorageError>;
}

/// Check that `[offset, offset + len)` lies inside a region of `capacity` bytes
pub fn check_bounds(capacity: usize, offset: u32, len: usize) -> Result<(), StorageError> {
    let end = (offset as usize)
        .checked_add(len)
        .ok_or(StorageError::OutOfBounds)?;
    if end > capacity {
        return Err(StorageError::OutOfBounds);
    }
    Ok(())
}
