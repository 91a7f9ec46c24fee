//! PollLoop - ジョブが終端状態になるまでポーリングする
//!
//! # フロー
//! 1. JobStatusQuery::fetch() で status を取得（初回は待たない）
//! 2. success / failed なら終了
//! 3. それ以外なら poll_interval だけ待って 1 に戻る
//!
//! デフォルトでは回数上限もタイムアウトもない。止めたい場合は
//! `PollConfig::max_attempts` を設定するか、呼び出し側で
//! `tokio::time::timeout` で包む。

use std::sync::Arc;
use std::time::Duration;

use crate::app::status_query::JobStatusQuery;
use crate::domain::{JobId, JobOutcome, JobStatus, PollError};
use crate::ports::Sleeper;

/// Poll loop settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Delay before every poll except the first.
    pub interval: Duration,

    /// Optional cap on the number of polls. `None` polls until a terminal status.
    pub max_attempts: Option<u32>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_attempts: None,
        }
    }
}

/// Poller state.
///
/// ```text
/// Polling --success--> Success
///    |  \--failed----> Failed
///    \--other--> Polling
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Polling,
    Success,
    Failed,
}

impl PollState {
    /// Next state after observing `status`.
    pub fn observe(status: &JobStatus) -> Self {
        match status.outcome() {
            Some(JobOutcome::Success) => PollState::Success,
            Some(JobOutcome::Failed) => PollState::Failed,
            None => PollState::Polling,
        }
    }

    pub fn outcome(self) -> Option<JobOutcome> {
        match self {
            PollState::Polling => None,
            PollState::Success => Some(JobOutcome::Success),
            PollState::Failed => Some(JobOutcome::Failed),
        }
    }
}

pub struct PollLoop {
    query: JobStatusQuery,
    sleeper: Arc<dyn Sleeper>,
    config: PollConfig,
}

impl PollLoop {
    pub fn new(query: JobStatusQuery, sleeper: Arc<dyn Sleeper>, config: PollConfig) -> Self {
        Self {
            query,
            sleeper,
            config,
        }
    }

    pub fn config(&self) -> PollConfig {
        self.config
    }

    /// Poll `job_id` until it reports `success` or `failed`.
    ///
    /// # Errors
    ///
    /// - [`PollError::JobNotFound`] when the job record disappears
    /// - [`PollError::ExhaustedRetries`] when a single poll keeps failing
    /// - [`PollError::AttemptsExhausted`] when `max_attempts` is set and reached
    pub async fn poll_until_terminal(&self, job_id: &JobId) -> Result<JobOutcome, PollError> {
        let mut attempt: u32 = 0;
        loop {
            if let Some(max) = self.config.max_attempts {
                if attempt >= max {
                    return Err(PollError::AttemptsExhausted {
                        job_id: job_id.clone(),
                        attempts: attempt,
                    });
                }
            }
            if attempt > 0 {
                self.sleeper.sleep(self.config.interval).await;
            }

            let status = self.query.fetch(job_id).await?;
            let state = PollState::observe(&status);
            tracing::debug!(%job_id, attempt, %status, ?state, "polled job status");

            if let Some(outcome) = state.outcome() {
                return Ok(outcome);
            }
            attempt = next_attempt(attempt);
        }
    }
}

/// ループ自体は無制限なので加算は飽和させる
fn next_attempt(attempt: u32) -> u32 {
    attempt.saturating_add(1)
}
