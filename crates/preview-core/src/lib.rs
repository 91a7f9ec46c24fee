//! preview-core
//!
//! Tracks a remote preview deployment job until it finishes.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, job snapshot, label tables, errors）
//! - **ports**: 抽象化レイヤー（ControlPlane, Sleeper, LogSink）
//! - **app**: アプリケーションロジック（retry, status query, projector, poll loop, builder）
//! - **impls**: 実装（GraphQL クライアント、テスト用の scripted 実装）

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;

pub use app::{PollConfig, PollLoop, PollerBuilder, RetryPolicy};
pub use domain::{JobId, JobOutcome, PollError, QueryError};
