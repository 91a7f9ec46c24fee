//! PollerBuilder - PollLoop の構築とワイヤリング
//!
//! # Fail-fast 設計
//! - 設定値の矛盾は build() の時点で BuildError として返す
//! - ポーリング開始後に設定ミスで落ちることはない

use std::sync::Arc;
use std::time::Duration;

use crate::app::poll_loop::{PollConfig, PollLoop};
use crate::app::retry::{RetryPolicy, RetryingExecutor};
use crate::app::status_query::JobStatusQuery;
use crate::ports::{ControlPlane, LogSink, Sleeper, TokioSleeper, TracingLogSink};

/// PollerBuilder は PollLoop を構築
///
/// # 使用例
/// ```ignore
/// let poller = PollerBuilder::new(Arc::new(control_plane))
///     .max_attempts(Some(600))
///     .build()?;
/// let outcome = poller.poll_until_terminal(&job_id).await?;
/// ```
///
/// 指定しなかったものはデフォルト（TracingLogSink, TokioSleeper,
/// RetryPolicy::fixed(), PollConfig::default()）になる。
pub struct PollerBuilder {
    control_plane: Arc<dyn ControlPlane>,
    sink: Arc<dyn LogSink>,
    sleeper: Arc<dyn Sleeper>,
    retry: RetryPolicy,
    poll: PollConfig,
}

/// BuildError は PollLoop 構築時のエラー
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("retry limit must allow at least one attempt")]
    ZeroRetryLimit,

    #[error("max_attempts must be at least 1 when set")]
    ZeroMaxAttempts,
}

impl PollerBuilder {
    pub fn new(control_plane: Arc<dyn ControlPlane>) -> Self {
        Self {
            control_plane,
            sink: Arc::new(TracingLogSink),
            sleeper: Arc::new(TokioSleeper),
            retry: RetryPolicy::fixed(),
            poll: PollConfig::default(),
        }
    }

    pub fn log_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll.interval = interval;
        self
    }

    pub fn max_attempts(mut self, max_attempts: Option<u32>) -> Self {
        self.poll.max_attempts = max_attempts;
        self
    }

    pub fn build(self) -> Result<PollLoop, BuildError> {
        if self.retry.limit == 0 {
            return Err(BuildError::ZeroRetryLimit);
        }
        if self.poll.max_attempts == Some(0) {
            return Err(BuildError::ZeroMaxAttempts);
        }

        let executor = RetryingExecutor::new(self.retry, self.sleeper.clone());
        let query = JobStatusQuery::new(self.control_plane, executor, self.sink);
        Ok(PollLoop::new(query, self.sleeper, self.poll))
    }
}
