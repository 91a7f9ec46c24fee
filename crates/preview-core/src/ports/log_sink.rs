//! LogSink port - 進捗ログの出力先
//!
//! ポーリング中に人間向けの行（"Applying metadata: started" など）を
//! 呼び出し側へ流すためのインターフェース。
//!
//! # 実装
//! - TracingLogSink: tracing の info イベントとして出力（本番用）
//! - MemoryLogSink: 行をメモリに溜める（テスト用、impls 配下）

/// LogSink receives one human readable line at a time.
pub trait LogSink: Send + Sync {
    fn line(&self, message: &str);
}

/// Emits progress lines as `tracing` events under `preview::progress`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn line(&self, message: &str) {
        tracing::info!(target: "preview::progress", "{message}");
    }
}
