//! App - アプリケーション層
//!
//! ports を組み合わせてポーリングのロジックを実装します。
//!
//! # 主要コンポーネント
//! - **RetryingExecutor**: 1 回のクエリを固定回数までリトライ
//! - **JobStatusQuery**: ジョブの状態を 1 回取得し、進捗ログを出す
//! - **ProgressProjector**: スナップショット → 進捗ログの行
//! - **PollLoop**: 終端状態になるまでポーリング
//! - **PollerBuilder**: 上記のワイヤリング

pub mod builder;
pub mod poll_loop;
pub mod projector;
pub mod retry;
pub mod status_query;

// 主要な型を再エクスポート
pub use self::builder::{BuildError, PollerBuilder};
pub use self::poll_loop::{PollConfig, PollLoop, PollState};
pub use self::projector::ProgressProjector;
pub use self::retry::{RetryPolicy, RetryingExecutor};
pub use self::status_query::JobStatusQuery;
