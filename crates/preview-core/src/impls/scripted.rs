//! Scripted / recording implementations - 開発・テスト用
//!
//! - ScriptedControlPlane: 事前に積んだレスポンスを順番に返す control plane
//! - MemoryLogSink: 出力された行をメモリに溜める
//! - RecordingSleeper: 実際には待たず、要求された待機時間を記録する
//!
//! どれも Mutex で内部状態を持つ。ロック中に await はしない。

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{Job, JobId, Project, ProjectId, QueryError};
use crate::ports::{ControlPlane, LogSink, Sleeper};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

type JobResponse = Result<Option<Job>, QueryError>;

/// ScriptedControlPlane は積まれたレスポンスを job ごとに FIFO で返す
///
/// # 使用例
/// ```ignore
/// let cp = ScriptedControlPlane::new();
/// cp.push_failure(&job_id, QueryError::Transport("reset".into()));
/// cp.push_job(&job_id, Job::new("success"));
/// ```
///
/// スクリプトを使い切った後は、最後に返したレスポンスを繰り返す
/// （長時間 `created` のままのジョブを表現しやすくするため）。
#[derive(Default)]
pub struct ScriptedControlPlane {
    jobs: Mutex<HashMap<JobId, VecDeque<JobResponse>>>,
    last: Mutex<HashMap<JobId, JobResponse>>,
    projects: Mutex<HashMap<ProjectId, Project>>,
    calls: Mutex<HashMap<JobId, usize>>,
}

impl ScriptedControlPlane {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_job(&self, job_id: &JobId, job: Job) {
        self.push(job_id, Ok(Some(job)));
    }

    /// Script a response where the job record is absent.
    pub fn push_missing(&self, job_id: &JobId) {
        self.push(job_id, Ok(None));
    }

    pub fn push_failure(&self, job_id: &JobId, error: QueryError) {
        self.push(job_id, Err(error));
    }

    pub fn insert_project(&self, project: Project) {
        lock(&self.projects).insert(project.id.clone(), project);
    }

    /// Number of `job_status` calls received for `job_id`.
    pub fn calls(&self, job_id: &JobId) -> usize {
        lock(&self.calls).get(job_id).copied().unwrap_or(0)
    }

    fn push(&self, job_id: &JobId, response: JobResponse) {
        lock(&self.jobs)
            .entry(job_id.clone())
            .or_default()
            .push_back(response);
    }
}

#[async_trait]
impl ControlPlane for ScriptedControlPlane {
    async fn job_status(&self, job_id: &JobId) -> Result<Option<Job>, QueryError> {
        *lock(&self.calls).entry(job_id.clone()).or_insert(0) += 1;

        let next = lock(&self.jobs)
            .get_mut(job_id)
            .and_then(VecDeque::pop_front);

        let mut last = lock(&self.last);
        match next {
            Some(response) => {
                last.insert(job_id.clone(), response.clone());
                response
            }
            // 未登録の job は「存在しない」扱い
            None => last.get(job_id).cloned().unwrap_or(Ok(None)),
        }
    }

    async fn project(&self, project_id: &ProjectId) -> Result<Option<Project>, QueryError> {
        Ok(lock(&self.projects).get(project_id).cloned())
    }
}

/// MemoryLogSink は出力された行を順番に保持する
#[derive(Debug, Default)]
pub struct MemoryLogSink {
    lines: Mutex<Vec<String>>,
}

impl MemoryLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        lock(&self.lines).clone()
    }

    pub fn clear(&self) {
        lock(&self.lines).clear();
    }
}

impl LogSink for MemoryLogSink {
    fn line(&self, message: &str) {
        lock(&self.lines).push(message.to_string());
    }
}

/// RecordingSleeper は待機せずに待機時間だけを記録する
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        lock(&self.sleeps).clone()
    }

    pub fn total(&self) -> Duration {
        lock(&self.sleeps).iter().sum()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        lock(&self.sleeps).push(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Tenant;

    #[tokio::test]
    async fn replays_script_then_repeats_last_response() {
        let cp = ScriptedControlPlane::new();
        let id = JobId::new("j1");
        cp.push_failure(&id, QueryError::Transport("reset".to_string()));
        cp.push_job(&id, Job::new("created"));

        assert!(cp.job_status(&id).await.is_err());
        let job = cp.job_status(&id).await.unwrap().unwrap();
        assert_eq!(job.status.as_str(), "created");

        // script exhausted: keeps answering "created"
        let job = cp.job_status(&id).await.unwrap().unwrap();
        assert_eq!(job.status.as_str(), "created");
        assert_eq!(cp.calls(&id), 3);
    }

    #[tokio::test]
    async fn project_lookup_returns_inserted_record() {
        let cp = ScriptedControlPlane::new();
        let project = Project {
            id: ProjectId::new("p1"),
            endpoint: "https://p1.preview.local".to_string(),
            tenant: Some(Tenant {
                id: "t1".to_string(),
            }),
        };
        cp.insert_project(project.clone());

        assert_eq!(cp.project(&ProjectId::new("p1")).await.unwrap(), Some(project));
        assert_eq!(cp.project(&ProjectId::new("p2")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn unknown_job_is_missing() {
        let cp = ScriptedControlPlane::new();
        let id = JobId::new("nope");
        assert_eq!(cp.job_status(&id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn recording_sleeper_does_not_wait() {
        let sleeper = RecordingSleeper::new();
        sleeper.sleep(Duration::from_secs(3600)).await;
        sleeper.sleep(Duration::from_secs(1)).await;
        assert_eq!(sleeper.sleeps().len(), 2);
        assert_eq!(sleeper.total(), Duration::from_secs(3601));
    }
}
