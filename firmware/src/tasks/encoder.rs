//! エンコーダ取得タスク
//!
//! 割り込みエグゼキュータ上で動作し、A相の両エッジごとに
//! デコーダを更新する。ログは出さない。

use cockpit_input::QuadratureDecoder;
use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::Input;

/// 1チャンネル分のA/B相を監視する
///
/// # Arguments
/// * `primary` - A相（EXTI）
/// * `secondary` - B相
/// * `decoder` - このチャンネル専用のデコーダ
#[embassy_executor::task(pool_size = 3)]
pub async fn encoder_task(
    mut primary: ExtiInput<'static>,
    secondary: Input<'static>,
    decoder: &'static QuadratureDecoder,
) {
    decoder.prime(primary.is_high());

    loop {
        primary.wait_for_any_edge().await;
        decoder.on_primary_edge(primary.is_high(), secondary.is_high());
    }
}
