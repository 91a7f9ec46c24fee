//! Labels - 表示用の静的ルックアップテーブル
//!
//! task 名と event status の変換は分岐ではなく定数テーブルで持つ。
//! 行を足すだけで拡張でき、テストもテーブル駆動で書ける。

/// Internal task name -> human readable label.
pub const TASK_LABELS: &[(&str, &str)] = &[
    ("gh-validation", "Fetching Metadata"),
    ("parse-metadata-migration", "Parsing metadata and migrations"),
    ("apply-metadata", "Applying metadata"),
    ("apply-migration", "Applying migrations"),
    ("reload-metadata", "Refreshing metadata"),
    ("check-healthz", "Checking Project Health"),
];

/// Raw event status -> displayed status. Values not listed pass through.
pub const EVENT_STATUS_ALIASES: &[(&str, &str)] = &[("created", "started")];

/// Raw event status that marks a failed task.
pub const FAILED_EVENT: &str = "failed";

/// Display label for a task, `None` for names we do not know.
pub fn task_label(name: &str) -> Option<&'static str> {
    TASK_LABELS
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, label)| *label)
}

pub fn normalize_event_status(raw: &str) -> &str {
    EVENT_STATUS_ALIASES
        .iter()
        .find(|(key, _)| *key == raw)
        .map_or(raw, |(_, alias)| *alias)
}
