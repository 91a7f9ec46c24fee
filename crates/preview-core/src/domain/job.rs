//! Job snapshot as reported by the control plane.
//!
//! A snapshot is fetched fresh on every poll and is never mutated; the
//! ordering of `tasks` and `events` is decided by the query itself.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ids::{JobId, ProjectId};

/// Remote job status.
///
/// The control plane reports an opaque string. Only `success` and `failed`
/// are terminal; everything else (`created`, `running`, ...) means "keep polling".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    Success,
    Failed,
    Other(String),
}

impl JobStatus {
    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Success => "success",
            JobStatus::Failed => "failed",
            JobStatus::Other(raw) => raw,
        }
    }

    /// Terminal outcome, if this status ends the job.
    pub fn outcome(&self) -> Option<JobOutcome> {
        match self {
            JobStatus::Success => Some(JobOutcome::Success),
            JobStatus::Failed => Some(JobOutcome::Failed),
            JobStatus::Other(_) => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome().is_some()
    }
}

impl From<String> for JobStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "success" => JobStatus::Success,
            "failed" => JobStatus::Failed,
            _ => JobStatus::Other(raw),
        }
    }
}

impl From<&str> for JobStatus {
    fn from(raw: &str) -> Self {
        JobStatus::from(raw.to_string())
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        match status {
            JobStatus::Other(raw) => raw,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal result of polling a job.
///
/// `Failed` is a normal return value: the job ran and reported failure.
/// Whether that aborts the surrounding workflow is the caller's decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobOutcome {
    Success,
    Failed,
}

impl JobOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobOutcome::Success => "success",
            JobOutcome::Failed => "failed",
        }
    }
}

impl fmt::Display for JobOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One status transition recorded for a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub event_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_detail: Option<String>,
}

impl TaskEvent {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            id: None,
            event_type: event_type.into(),
            error: None,
            github_detail: None,
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_github_detail(mut self, detail: impl Into<String>) -> Self {
        self.github_detail = Some(detail.into());
        self
    }
}

/// One named phase of a job (e.g. `apply-metadata`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,

    #[serde(default)]
    pub cloud: Option<String>,

    #[serde(default)]
    pub region: Option<String>,

    /// Newest first; the query delivers at most one entry.
    #[serde(rename = "task_events", default)]
    pub events: Vec<TaskEvent>,
}

impl Task {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            cloud: None,
            region: None,
            events: Vec::new(),
        }
    }

    pub fn with_event(mut self, event: TaskEvent) -> Self {
        self.events.push(event);
        self
    }

    /// The most recent event, if any was recorded.
    pub fn latest_event(&self) -> Option<&TaskEvent> {
        // 降順で最大 1 件に切り詰められて届くので先頭が最新
        self.events.first()
    }
}

/// Job snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<JobId>,

    pub status: JobStatus,

    /// Oldest first.
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Job {
    pub fn new(status: impl Into<JobStatus>) -> Self {
        Self {
            id: None,
            status: status.into(),
            tasks: Vec::new(),
        }
    }

    pub fn with_task(mut self, task: Task) -> Self {
        self.tasks.push(task);
        self
    }

    /// The most recently updated task (last in ascending order).
    pub fn latest_task(&self) -> Option<&Task> {
        self.tasks.last()
    }
}

/// Tenant that owns a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: String,
}

/// Project record backing a preview app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub endpoint: String,

    #[serde(default)]
    pub tenant: Option<Tenant>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::success("success", Some(JobOutcome::Success))]
    #[case::failed("failed", Some(JobOutcome::Failed))]
    #[case::created("created", None)]
    #[case::running("running", None)]
    #[case::case_sensitive("SUCCESS", None)]
    fn only_success_and_failed_are_terminal(
        #[case] raw: &str,
        #[case] expected: Option<JobOutcome>,
    ) {
        let status = JobStatus::from(raw);
        assert_eq!(status.outcome(), expected);
        assert_eq!(status.is_terminal(), expected.is_some());
        assert_eq!(status.as_str(), raw);
    }

    #[test]
    fn decodes_wire_snapshot() {
        let raw = serde_json::json!({
            "id": "job-1",
            "status": "created",
            "tasks": [
                {
                    "id": "t1",
                    "name": "gh-validation",
                    "cloud": "aws",
                    "region": "us-east-2",
                    "task_events": [{ "id": "e1", "event_type": "success", "error": null, "github_detail": null }]
                },
                {
                    "id": "t2",
                    "name": "apply-metadata",
                    "cloud": null,
                    "region": null,
                    "task_events": [{ "id": "e2", "event_type": "created", "error": null, "github_detail": "Applying 12 objects" }]
                }
            ]
        });

        let job: Job = serde_json::from_value(raw).unwrap();
        assert_eq!(job.id, Some(JobId::new("job-1")));
        assert_eq!(job.status, JobStatus::Other("created".to_string()));
        assert_eq!(job.tasks.len(), 2);

        let latest = job.latest_task().unwrap();
        assert_eq!(latest.name, "apply-metadata");
        assert_eq!(latest.cloud, None);

        let event = latest.latest_event().unwrap();
        assert_eq!(event.event_type, "created");
        assert_eq!(event.github_detail.as_deref(), Some("Applying 12 objects"));
    }

    #[test]
    fn status_serializes_back_to_raw_string() {
        let s = serde_json::to_string(&JobStatus::Other("queued".to_string())).unwrap();
        assert_eq!(s, "\"queued\"");
        assert_eq!(serde_json::to_string(&JobStatus::Failed).unwrap(), "\"failed\"");
        assert_eq!(JobOutcome::Success.to_string(), "success");
    }

    #[test]
    fn empty_snapshot_has_no_latest_task() {
        let job = Job::new("created");
        assert!(job.latest_task().is_none());
        assert!(Task::new("t", "apply-metadata").latest_event().is_none());
    }
}
