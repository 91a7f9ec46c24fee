//! Errors - エラー型と分類
//!
//! - `QueryError`: 1 回のクエリ呼び出しの失敗（一時的とみなしてリトライ対象）
//! - `PollError`: ポーリング全体を中断する致命的エラー

use thiserror::Error;

use super::ids::JobId;

/// ErrorKind は実行エラーの分類
///
/// - Transient: 一時的なエラー（リトライ済み、呼び出し側で再実行すれば直る可能性あり）
/// - Permanent: 恒久的なエラー（再実行しても無意味）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transient,
    Permanent,
}

/// Failure of one control-plane query. All variants are retried alike.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("control plane returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("{0}")]
    GraphQl(String),

    #[error("could not decode response: {0}")]
    Decode(String),
}

impl QueryError {
    /// GraphQL `errors` 配列をひとつのメッセージにまとめる
    pub fn graphql<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = messages
            .into_iter()
            .map(|m| m.as_ref().to_string())
            .collect::<Vec<_>>()
            .join("; ");
        QueryError::GraphQl(joined)
    }
}

/// Fatal error that aborts polling.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("could not find the GitHub job; the associated deployment was terminated")]
    JobNotFound(JobId),

    /// Display は最後のエラーのメッセージそのまま。
    /// 同じ文が二重に出ないよう `source()` には繋がない。
    #[error("{last_error}")]
    ExhaustedRetries { attempts: u32, last_error: QueryError },

    #[error("job {job_id} did not reach a terminal status after {attempts} polls")]
    AttemptsExhausted { job_id: JobId, attempts: u32 },
}

impl PollError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PollError::ExhaustedRetries { .. } => ErrorKind::Transient,
            // 上限到達は意図的な停止なので再実行しても同じ結果になる
            PollError::JobNotFound(_) | PollError::AttemptsExhausted { .. } => {
                ErrorKind::Permanent
            }
        }
    }

    /// The query error that used up the retry budget.
    pub fn last_query_error(&self) -> Option<&QueryError> {
        match self {
            PollError::ExhaustedRetries { last_error, .. } => Some(last_error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graphql_messages_are_joined() {
        let err = QueryError::graphql(["field not found", "permission denied"]);
        assert_eq!(err.to_string(), "field not found; permission denied");
    }

    #[test]
    fn exhausted_retries_surfaces_last_error_text() {
        let err = PollError::ExhaustedRetries {
            attempts: 5,
            last_error: QueryError::Transport("connection reset".to_string()),
        };
        assert_eq!(err.to_string(), "request failed: connection reset");
        assert_eq!(err.kind(), ErrorKind::Transient);
        assert_eq!(
            err.last_query_error(),
            Some(&QueryError::Transport("connection reset".to_string()))
        );
        // the message must not repeat through the error chain
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn job_not_found_is_permanent() {
        let err = PollError::JobNotFound(JobId::new("j"));
        assert_eq!(err.kind(), ErrorKind::Permanent);
        assert!(err.to_string().contains("deployment was terminated"));
        assert!(err.last_query_error().is_none());
    }

    #[test]
    fn poll_cap_is_permanent() {
        let err = PollError::AttemptsExhausted {
            job_id: JobId::new("j"),
            attempts: 3,
        };
        assert_eq!(err.kind(), ErrorKind::Permanent);
    }
}
