//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **GraphQlControlPlane**: 本番用の control plane クライアント
//! - **ScriptedControlPlane** / **MemoryLogSink** / **RecordingSleeper**: 開発・テスト用

pub mod graphql;
pub mod scripted;

// 主要な型を再エクスポート
pub use self::graphql::{ClientConfig, GraphQlControlPlane};
pub use self::scripted::{MemoryLogSink, RecordingSleeper, ScriptedControlPlane};
