//! タスクモジュール
//!
//! 各タスクの実装を分離して管理します。

pub mod command;
pub mod control;
pub mod encoder;
pub mod led;

// タスク関数を再エクスポート
pub use command::command_task;
pub use control::control_task;
pub use encoder::encoder_task;
pub use led::led_task;
