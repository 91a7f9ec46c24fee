//! ControlPlane port - preview ジョブを管理するリモート API
//!
//! ジョブの状態はすべて control plane 側が正本（source of truth）です。
//! こちらはスナップショットを読むだけで、キャッシュもしません。
//!
//! # 実装
//! - **GraphQlControlPlane**: 本番用（reqwest）
//! - **ScriptedControlPlane**: 開発・テスト用

use async_trait::async_trait;

use crate::domain::{Job, JobId, Project, ProjectId, QueryError};

/// ControlPlane は 1 回のクエリを発行する
///
/// # 設計原則
/// - 1 メソッド = 1 ラウンドトリップ（リトライは呼び出し側の責務）
/// - レコードが存在しない場合は `Ok(None)`（エラーではない）
/// - `Send + Sync` を要求（Arc で共有するため）
#[async_trait]
pub trait ControlPlane: Send + Sync {
    /// Current status of a job plus its task history.
    ///
    /// Tasks come oldest first; each task carries at most its newest event.
    async fn job_status(&self, job_id: &JobId) -> Result<Option<Job>, QueryError>;

    /// Project record (endpoint, owning tenant).
    async fn project(&self, project_id: &ProjectId) -> Result<Option<Project>, QueryError>;
}
