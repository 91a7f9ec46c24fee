//! ProgressProjector - ジョブのスナップショットを進捗ログに射影する
//!
//! 最新の task と、その最新の event だけを見る。クエリ側で event が
//! 1 件に切り詰められているので、ポーリング間の重複排除はしない。
//! 同じスナップショットからは常に同じ行が出る（再出力しても無害）。

use std::sync::Arc;

use crate::domain::Job;
use crate::domain::labels::{FAILED_EVENT, normalize_event_status, task_label};
use crate::ports::LogSink;

/// Render the progress lines for one snapshot.
///
/// 1. `"<label>: <status>"` (skipped when the task name has no label)
/// 2. the event's deployment detail, if any
/// 3. the event's error, only when the event type is exactly `failed`
pub fn render(job: &Job) -> Vec<String> {
    let Some(task) = job.latest_task() else {
        return Vec::new();
    };
    let Some(event) = task.latest_event() else {
        return Vec::new();
    };

    let mut lines = Vec::with_capacity(3);
    if let Some(label) = task_label(&task.name) {
        lines.push(format!(
            "{label}: {}",
            normalize_event_status(&event.event_type)
        ));
    }

    if let Some(detail) = event.github_detail.as_deref().filter(|d| !d.is_empty()) {
        lines.push(detail.to_string());
    }

    if event.event_type == FAILED_EVENT {
        if let Some(error) = event.error.as_deref().filter(|e| !e.is_empty()) {
            lines.push(error.to_string());
        }
    }

    lines
}

/// Writes [`render`] output to a [`LogSink`].
#[derive(Clone)]
pub struct ProgressProjector {
    sink: Arc<dyn LogSink>,
}

impl ProgressProjector {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }

    pub fn project(&self, job: &Job) {
        for line in render(job) {
            self.sink.line(&line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Task, TaskEvent};
    use crate::impls::MemoryLogSink;

    fn job_with(name: &str, event: TaskEvent) -> Job {
        Job::new("created")
            .with_task(Task::new("t0", "gh-validation").with_event(TaskEvent::new("success")))
            .with_task(Task::new("t1", name).with_event(event))
    }

    #[test]
    fn empty_task_list_renders_nothing() {
        assert!(render(&Job::new("created")).is_empty());
    }

    #[test]
    fn task_without_events_renders_nothing() {
        let job = Job::new("created").with_task(Task::new("t", "apply-metadata"));
        assert!(render(&job).is_empty());
    }

    #[test]
    fn created_is_shown_as_started() {
        let job = job_with("apply-migration", TaskEvent::new("created"));
        assert_eq!(render(&job), vec!["Applying migrations: started"]);
    }

    #[test]
    fn only_the_latest_task_is_rendered() {
        let job = job_with("reload-metadata", TaskEvent::new("success"));
        assert_eq!(render(&job), vec!["Refreshing metadata: success"]);
    }

    #[test]
    fn detail_is_an_extra_line() {
        let event = TaskEvent::new("success").with_github_detail("Applied 3 migrations");
        let job = job_with("apply-migration", event);
        assert_eq!(
            render(&job),
            vec!["Applying migrations: success", "Applied 3 migrations"]
        );
    }

    #[test]
    fn error_is_shown_only_for_failed_events() {
        let failed = TaskEvent::new("failed").with_error("relation X does not exist");
        assert_eq!(
            render(&job_with("apply-migration", failed)),
            vec!["Applying migrations: failed", "relation X does not exist"]
        );

        let not_failed = TaskEvent::new("success").with_error("stale warning");
        assert_eq!(
            render(&job_with("apply-migration", not_failed)),
            vec!["Applying migrations: success"]
        );
    }

    #[test]
    fn unknown_task_skips_the_label_line() {
        let event = TaskEvent::new("failed")
            .with_github_detail("see logs")
            .with_error("boom");
        assert_eq!(render(&job_with("provision-db", event)), vec!["see logs", "boom"]);
    }

    #[test]
    fn projecting_twice_is_idempotent() {
        let sink = Arc::new(MemoryLogSink::new());
        let projector = ProgressProjector::new(sink.clone());
        let job = job_with(
            "check-healthz",
            TaskEvent::new("failed").with_error("healthz returned 500"),
        );

        projector.project(&job);
        let first = sink.lines();
        sink.clear();
        projector.project(&job);

        assert_eq!(first, sink.lines());
        assert_eq!(first, vec!["Checking Project Health: failed", "healthz returned 500"]);
    }
}
