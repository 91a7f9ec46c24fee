//! Ports - 抽象化レイヤー
//!
//! Hexagonal Architecture の「ポート」を定義します。
//! 外部システム（control plane）、時間、ログ出力をここで抽象化し、
//! ポーリングのロジックを決定的にテストできるようにしています。

pub mod control_plane;
pub mod log_sink;
pub mod sleeper;

// 主要な trait を再エクスポート
pub use self::control_plane::ControlPlane;
pub use self::log_sink::{LogSink, TracingLogSink};
pub use self::sleeper::{Sleeper, TokioSleeper};
