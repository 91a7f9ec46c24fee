//! Sleeper port - 待機の抽象化
//!
//! ポーリング間隔とリトライ間隔の待機はすべてここを通る。
//!
//! # テスト容易性
//! - trait により待機を差し替え可能
//! - テストでは RecordingSleeper を使用（実際には待たず、待機時間を記録する）

use std::time::Duration;

use async_trait::async_trait;

#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// 本番用: tokio のタイマーで待つ
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
