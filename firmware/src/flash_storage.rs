//! フラッシュメモリベースのキャリブレーション領域
//!
//! STM32G431VBの最終フラッシュページの先頭 `REGION_SIZE` バイトを
//! EEPROMのようなバイト単位の領域として扱う。書き込みは
//! 読み出し → 変更 → ページ消去 → 領域全体の書き戻しで行う。

use cockpit_input::params::storage::REGION_SIZE;
use cockpit_input::storage::{check_bounds, NvStorage, StorageError};
use embassy_stm32::flash::{Blocking, Flash};

use crate::config::flash::{PAGE_SIZE, REGION_OFFSET};

/// 最終ページ上のキャリブレーション領域
pub struct FlashStorage {
    flash: Flash<'static, Blocking>,
}

impl FlashStorage {
    pub fn new(flash: Flash<'static, Blocking>) -> Self {
        Self { flash }
    }

    fn read_image(&mut self, image: &mut [u8; REGION_SIZE]) -> Result<(), StorageError> {
        self.flash
            .blocking_read(REGION_OFFSET, image)
            .map_err(|e| {
                error!("Flash read failed: {:?}", e);
                StorageError::ReadFailed
            })
    }
}

impl NvStorage for FlashStorage {
    fn capacity(&self) -> usize {
        REGION_SIZE
    }

    fn read(&mut self, offset: u32, buf: &mut [u8]) -> Result<(), StorageError> {
        check_bounds(REGION_SIZE, offset, buf.len())?;
        self.flash
            .blocking_read(REGION_OFFSET + offset, buf)
            .map_err(|e| {
                error!("Flash read failed: {:?}", e);
                StorageError::ReadFailed
            })
    }

    fn write(&mut self, offset: u32, data: &[u8]) -> Result<(), StorageError> {
        check_bounds(REGION_SIZE, offset, data.len())?;

        let mut image = [0u8; REGION_SIZE];
        self.read_image(&mut image)?;

        let start = offset as usize;
        let target = &mut image[start..start + data.len()];
        if target == data {
            // 内容が同じなら消去しない
            return Ok(());
        }
        target.copy_from_slice(data);

        debug!("Erasing calibration page at offset 0x{:08X}", REGION_OFFSET);
        self.flash
            .blocking_erase(REGION_OFFSET, REGION_OFFSET + PAGE_SIZE)
            .map_err(|e| {
                error!("Flash erase failed: {:?}", e);
                StorageError::EraseFailed
            })?;

        self.flash
            .blocking_write(REGION_OFFSET, &image)
            .map_err(|e| {
                error!("Flash write failed: {:?}", e);
                StorageError::WriteFailed
            })?;

        debug!("Calibration region written: {} bytes at +{}", data.len(), offset);
        Ok(())
    }
}

// G4のフラッシュ書き込み単位（ダブルワード）に揃っていること
const _: () = assert!(REGION_SIZE % 8 == 0);
