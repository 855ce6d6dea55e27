//! グローバル共有状態管理
//!
//! エンコーダのデコーダは割り込みエグゼキュータから、それ以外は
//! スレッドモードのタスクからのみアクセスされる。

use cockpit_input::{Command, ControlValues, QuadratureDecoder};
use embassy_sync::blocking_mutex::raw::ThreadModeRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::mutex::Mutex;

use crate::config::console::COMMAND_QUEUE_DEPTH;

/// スロットルのデコーダ（PA0 / PA1）
pub static THROTTLE_DECODER: QuadratureDecoder = QuadratureDecoder::new();

/// ブレーキのデコーダ（PC6 / PC7）
pub static BRAKE_DECODER: QuadratureDecoder = QuadratureDecoder::new();

/// ステアリングのデコーダ（PB10 / PB11）
pub static STEERING_DECODER: QuadratureDecoder = QuadratureDecoder::new();

/// 最新の制御周期の出力
pub static CONTROL_VALUES: Mutex<ThreadModeRawMutex, ControlValues> =
    Mutex::new(ControlValues::new());

/// コンソールから制御タスクへのコマンド
pub static COMMANDS: Channel<ThreadModeRawMutex, Command, COMMAND_QUEUE_DEPTH> = Channel::new();
