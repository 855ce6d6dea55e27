//! オペレータコンソールタスク
//!
//! USART2から1行ずつコマンドを受け取り、解析して制御タスクへ送る。

use cockpit_input::params::control::MAX_COMMAND_LEN;
use cockpit_input::parse_command;
use embassy_stm32::mode::Async;
use embassy_stm32::usart::UartRx;
use heapless::Vec;

use crate::state::COMMANDS;

#[embassy_executor::task]
pub async fn command_task(mut rx: UartRx<'static, Async>) {
    info!("Command task started");

    let mut line: Vec<u8, MAX_COMMAND_LEN> = Vec::new();
    let mut overflow = false;
    let mut byte = [0u8; 1];

    loop {
        if let Err(e) = rx.read(&mut byte).await {
            warn!("Console read error: {:?}", e);
            line.clear();
            overflow = false;
            continue;
        }

        if byte[0] != b'\n' {
            if line.push(byte[0]).is_err() {
                overflow = true;
            }
            continue;
        }

        if overflow {
            warn!("Command line longer than {} bytes dropped", MAX_COMMAND_LEN);
        } else {
            match core::str::from_utf8(&line) {
                Ok(text) if text.trim().is_empty() => {}
                Ok(text) => {
                    if let Some(command) = parse_command(text) {
                        COMMANDS.send(command).await;
                    }
                }
                Err(_) => warn!("Command line is not valid UTF-8"),
            }
        }

        line.clear();
        overflow = false;
    }
}
