//! 制御周期タスク
//!
//! 一定周期で全チャンネルを更新し、結果を共有状態へ公開する。
//! コマンドの適用（フラッシュへの保存を含む）もこのタスクだけが行う。

use cockpit_input::params::control::{CYCLE_PERIOD_MS, PROGRESS_LOG_PERIOD_MS};
use cockpit_input::{ChannelId, Controls};
use embassy_time::{Duration, Instant, Ticker};

use crate::flash_storage::FlashStorage;
use crate::state::{COMMANDS, CONTROL_VALUES};

#[embassy_executor::task]
pub async fn control_task(mut controls: Controls<'static, FlashStorage>) {
    info!("Control task started: period={}ms", CYCLE_PERIOD_MS);

    let mut ticker = Ticker::every(Duration::from_millis(CYCLE_PERIOD_MS));
    let progress_period = Duration::from_millis(PROGRESS_LOG_PERIOD_MS);
    let mut last_progress = Instant::now();

    loop {
        ticker.next().await;

        // 受信済みコマンドを適用
        while let Ok(command) = COMMANDS.try_receive() {
            info!("Applying command: {:?}", command);
            match controls.apply(command) {
                Ok(()) => info!("Command OK"),
                Err(e) => warn!("Command failed: {:?}", e),
            }
        }

        let values = controls.update();
        *CONTROL_VALUES.lock().await = values;

        // 経過ログ（1秒ごと）
        if last_progress.elapsed() >= progress_period {
            last_progress = Instant::now();

            debug!(
                "throttle={}% brake={}% steering={}%",
                values.throttle, values.brake, values.steering
            );

            if values.calibrating {
                for id in ChannelId::ALL {
                    let channel = controls.channel(id);
                    if let Some((min, max)) = channel.observed_range() {
                        info!(
                            "[{}] calibrating: raw={} observed min={} max={}",
                            id.name(),
                            channel.last_raw_position(),
                            min,
                            max
                        );
                    }
                }
            }
        }
    }
}
