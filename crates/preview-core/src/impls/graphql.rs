//! GraphQL control plane client.
//!
//! Every call is a single `POST` of `{ "query", "variables" }`. Retrying is
//! left to [`crate::app::RetryingExecutor`]; this client performs exactly one
//! round trip per call.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::{Job, JobId, Project, ProjectId, QueryError};
use crate::ports::ControlPlane;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub const JOB_STATUS_QUERY: &str = r"
query getJobStatus($jobId: uuid!) {
  jobs_by_pk(id: $jobId) {
    id
    status
    tasks(order_by: { updated_at: asc }) {
      id
      name
      cloud
      region
      task_events(order_by: { updated_at: desc }, limit: 1) {
        id
        event_type
        error
        github_detail
      }
    }
  }
}
";

pub const PROJECT_QUERY: &str = r"
query getProjectByPk($projectId: uuid!) {
  projects_by_pk(id: $projectId) {
    id
    endpoint
    tenant {
      id
    }
  }
}
";

/// Connection settings for the control plane.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// GraphQL endpoint URL.
    pub endpoint: String,
    /// Personal access token, sent as `Authorization: pat <token>`.
    pub token: Option<String>,
}

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a, V> {
    query: &'a str,
    variables: V,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlErrorItem>,
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorItem {
    message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JobVariables<'a> {
    job_id: &'a JobId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectVariables<'a> {
    project_id: &'a ProjectId,
}

#[derive(Debug, Deserialize)]
struct JobsByPk {
    jobs_by_pk: Option<Job>,
}

#[derive(Debug, Deserialize)]
struct ProjectsByPk {
    projects_by_pk: Option<Project>,
}

/// Decode a GraphQL response body.
///
/// A non-empty `errors` array wins over any partial `data`.
pub(crate) fn decode_response<T: DeserializeOwned>(body: &[u8]) -> Result<T, QueryError> {
    let response: GraphQlResponse<T> =
        serde_json::from_slice(body).map_err(|e| QueryError::Decode(e.to_string()))?;

    if !response.errors.is_empty() {
        return Err(QueryError::graphql(
            response.errors.iter().map(|e| e.message.as_str()),
        ));
    }

    response
        .data
        .ok_or_else(|| QueryError::Decode("response has no data".to_string()))
}

/// reqwest-backed [`ControlPlane`].
pub struct GraphQlControlPlane {
    client: Client,
    config: ClientConfig,
}

impl GraphQlControlPlane {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: ClientConfig) -> Result<Self, QueryError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| QueryError::Transport(e.to_string()))?;

        Ok(Self { client, config })
    }

    async fn query<V, T>(&self, query: &str, variables: V) -> Result<T, QueryError>
    where
        V: Serialize + Send,
        T: DeserializeOwned,
    {
        let mut req = self
            .client
            .post(&self.config.endpoint)
            .json(&GraphQlRequest { query, variables });
        if let Some(token) = &self.config.token {
            req = req.header(reqwest::header::AUTHORIZATION, format!("pat {token}"));
        }

        let response = req
            .send()
            .await
            .map_err(|e| QueryError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| QueryError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(QueryError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        decode_response(&body)
    }
}

#[async_trait]
impl ControlPlane for GraphQlControlPlane {
    async fn job_status(&self, job_id: &JobId) -> Result<Option<Job>, QueryError> {
        let data: JobsByPk = self
            .query(JOB_STATUS_QUERY, JobVariables { job_id })
            .await?;
        Ok(data.jobs_by_pk)
    }

    async fn project(&self, project_id: &ProjectId) -> Result<Option<Project>, QueryError> {
        let data: ProjectsByPk = self
            .query(PROJECT_QUERY, ProjectVariables { project_id })
            .await?;
        Ok(data.projects_by_pk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_carries_query_and_camel_case_variables() {
        let job_id = JobId::new("0b0e-1");
        let body = serde_json::to_value(GraphQlRequest {
            query: JOB_STATUS_QUERY,
            variables: JobVariables { job_id: &job_id },
        })
        .unwrap();

        assert_eq!(body["variables"]["jobId"], "0b0e-1");
        assert!(body["query"].as_str().unwrap().contains("jobs_by_pk"));
        assert!(JOB_STATUS_QUERY.contains("limit: 1"));
    }

    #[test]
    fn decodes_job_snapshot() {
        let body = br#"{"data":{"jobs_by_pk":{"id":"j","status":"success","tasks":[]}}}"#;
        let data: JobsByPk = decode_response(body).unwrap();
        let job = data.jobs_by_pk.unwrap();
        assert!(job.status.is_terminal());
    }

    #[test]
    fn absent_job_decodes_to_none() {
        let body = br#"{"data":{"jobs_by_pk":null}}"#;
        let data: JobsByPk = decode_response(body).unwrap();
        assert!(data.jobs_by_pk.is_none());
    }

    #[test]
    fn graphql_errors_become_query_errors() {
        let body = br#"{"data":null,"errors":[{"message":"invalid uuid"},{"message":"denied"}]}"#;
        let err = decode_response::<JobsByPk>(body).unwrap_err();
        assert_eq!(err, QueryError::GraphQl("invalid uuid; denied".to_string()));
    }

    #[test]
    fn missing_data_and_garbage_are_decode_errors() {
        let err = decode_response::<JobsByPk>(br#"{}"#).unwrap_err();
        assert!(matches!(err, QueryError::Decode(_)));

        let err = decode_response::<JobsByPk>(b"<html>").unwrap_err();
        assert!(matches!(err, QueryError::Decode(_)));
    }

    #[test]
    fn decodes_project_with_tenant() {
        let body = br#"{"data":{"projects_by_pk":{"id":"p","endpoint":"https://p.example.app","tenant":{"id":"t"}}}}"#;
        let data: ProjectsByPk = decode_response(body).unwrap();
        let project = data.projects_by_pk.unwrap();
        assert_eq!(project.endpoint, "https://p.example.app");
        assert_eq!(project.tenant.map(|t| t.id), Some("t".to_string()));
    }
}
