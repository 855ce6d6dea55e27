#![no_std]
#![no_main]

#[macro_use]
mod fmt;

mod config;
mod flash_storage;
mod hardware;
mod state;
mod tasks;

#[cfg(not(feature = "defmt"))]
use panic_halt as _;
#[cfg(feature = "defmt")]
use {defmt_rtt as _, panic_probe as _};

use cockpit_input::Controls;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_stm32::{
    exti::ExtiInput,
    flash::Flash,
    gpio::{Input, Level, Output, Pull, Speed},
    interrupt,
    interrupt::{InterruptExt, Priority},
    usart::{Config as UsartConfig, UartRx},
};
use embassy_time::{Duration, Timer};

use flash_storage::FlashStorage;
use hardware::Irqs;
use state::{BRAKE_DECODER, STEERING_DECODER, THROTTLE_DECODER};
use tasks::{command_task, control_task, encoder_task, led_task};

/// エンコーダ用の高優先度エグゼキュータ（未使用のUART4割り込みで駆動）
static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn UART4() {
    EXECUTOR_HIGH.on_interrupt()
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    // ハードウェア初期化
    let config = hardware::create_clock_config();
    let p = embassy_stm32::init(config);

    info!("Cockpit input • STM32G431VB @ 170MHz");

    // エンコーダ入力（A相 = EXTI、B相 = 通常入力、オープンコレクタのためプルアップ）
    let throttle_a = ExtiInput::new(p.PA0, p.EXTI0, Pull::Up);
    let throttle_b = Input::new(p.PA1, Pull::Up);
    let brake_a = ExtiInput::new(p.PC6, p.EXTI6, Pull::Up);
    let brake_b = Input::new(p.PC7, Pull::Up);
    let steering_a = ExtiInput::new(p.PB10, p.EXTI10, Pull::Up);
    let steering_b = Input::new(p.PB11, Pull::Up);

    // エンコーダタスクは制御周期より高い優先度で動かす
    interrupt::UART4.set_priority(Priority::P6);
    let high_spawner = EXECUTOR_HIGH.start(interrupt::UART4);
    high_spawner
        .spawn(encoder_task(throttle_a, throttle_b, &THROTTLE_DECODER))
        .unwrap();
    high_spawner
        .spawn(encoder_task(brake_a, brake_b, &BRAKE_DECODER))
        .unwrap();
    high_spawner
        .spawn(encoder_task(steering_a, steering_b, &STEERING_DECODER))
        .unwrap();
    info!("Encoder tasks started");

    // キャリブレーションをフラッシュから読み込み（失敗時はデフォルト）
    info!("Loading calibration from flash...");
    let storage = FlashStorage::new(Flash::new_blocking(p.FLASH));
    let mut controls = Controls::new(storage, &THROTTLE_DECODER, &BRAKE_DECODER, &STEERING_DECODER);
    if let Err(e) = controls.begin() {
        error!("Calibration defaults could not be persisted: {:?}", e);
    }
    spawner.spawn(control_task(controls)).unwrap();

    // オペレータコンソール（USART2 RX = PA3）
    let mut console_config = UsartConfig::default();
    console_config.baudrate = config::console::BAUDRATE;
    let console_rx = UartRx::new(p.USART2, Irqs, p.PA3, p.DMA1_CH1, console_config).unwrap();
    spawner.spawn(command_task(console_rx)).unwrap();

    // LED初期化＆タスク起動
    let led = Output::new(p.PC13, Level::High, Speed::Low);
    spawner.spawn(led_task(led)).unwrap();

    loop {
        Timer::after(Duration::from_millis(1000)).await;
    }
}
