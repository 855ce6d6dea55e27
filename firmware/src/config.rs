//! ボード固有の設定パラメータ
//!
//! 取得・キャリブレーションのパラメータは `cockpit_input::params` を参照。

/// キャリブレーション領域を置くフラッシュ位置
pub mod flash {
    /// STM32G431VBのフラッシュページサイズ（2KB）
    pub const PAGE_SIZE: u32 = 2048;

    /// フラッシュ総容量（128KB）
    pub const FLASH_SIZE: u32 = 128 * 1024;

    /// 最終ページのオフセット（フラッシュ先頭からの相対値、0x0801F800に対応）
    pub const REGION_OFFSET: u32 = FLASH_SIZE - PAGE_SIZE;
}

/// オペレータコンソール（USART2）
pub mod console {
    /// ボーレート
    pub const BAUDRATE: u32 = 115_200;

    /// 制御タスクへのコマンドキュー深さ
    pub const COMMAND_QUEUE_DEPTH: usize = 4;
}

/// ステータスLED
pub mod led {
    /// 通常時の点滅半周期 [ms]
    pub const HEARTBEAT_MS: u64 = 500;

    /// キャリブレーション中の点滅半周期 [ms]
    pub const CALIBRATING_MS: u64 = 100;
}

const _: () = {
    use cockpit_input::params::storage::REGION_SIZE;
    assert!(REGION_SIZE as u32 <= flash::PAGE_SIZE, "calibration region exceeds one flash page");
    assert!(flash::REGION_OFFSET % flash::PAGE_SIZE == 0);
};
