//! LED制御タスク
//!
//! キャリブレーション中は速く、通常時はゆっくり点滅させます。

use embassy_stm32::gpio::Output;
use embassy_time::{Duration, Timer};

use crate::config::led::{CALIBRATING_MS, HEARTBEAT_MS};
use crate::state::CONTROL_VALUES;

#[embassy_executor::task]
pub async fn led_task(mut led: Output<'static>) {
    info!("LED task started");

    loop {
        let calibrating = CONTROL_VALUES.lock().await.calibrating;
        let half_period = if calibrating { CALIBRATING_MS } else { HEARTBEAT_MS };

        led.toggle();
        Timer::after(Duration::from_millis(half_period)).await;
    }
}
