//! JobStatusQuery - ジョブの状態を 1 回取得する
//!
//! # フロー
//! 1. RetryingExecutor 経由で ControlPlane::job_status() を呼ぶ
//! 2. レコードが無ければ JobNotFound（リトライしない）
//! 3. task があれば ProgressProjector に渡して進捗ログを出す
//! 4. status を返す
//!
//! ここから出ていくエラーは、返す前にメッセージを LogSink に書く。

use std::sync::Arc;

use crate::app::projector::ProgressProjector;
use crate::app::retry::RetryingExecutor;
use crate::domain::{JobId, JobStatus, PollError};
use crate::ports::{ControlPlane, LogSink};

#[derive(Clone)]
pub struct JobStatusQuery {
    control_plane: Arc<dyn ControlPlane>,
    executor: RetryingExecutor,
    projector: ProgressProjector,
    sink: Arc<dyn LogSink>,
}

impl JobStatusQuery {
    pub fn new(
        control_plane: Arc<dyn ControlPlane>,
        executor: RetryingExecutor,
        sink: Arc<dyn LogSink>,
    ) -> Self {
        Self {
            control_plane,
            executor,
            projector: ProgressProjector::new(sink.clone()),
            sink,
        }
    }

    pub async fn fetch(&self, job_id: &JobId) -> Result<JobStatus, PollError> {
        match self.fetch_inner(job_id).await {
            Ok(status) => Ok(status),
            Err(err) => {
                self.sink.line(&err.to_string());
                Err(err)
            }
        }
    }

    async fn fetch_inner(&self, job_id: &JobId) -> Result<JobStatus, PollError> {
        let control_plane = self.control_plane.as_ref();
        let job = self
            .executor
            .execute(move || control_plane.job_status(job_id))
            .await?
            .ok_or_else(|| PollError::JobNotFound(job_id.clone()))?;

        if !job.tasks.is_empty() {
            self.projector.project(&job);
        }
        Ok(job.status)
    }
}
