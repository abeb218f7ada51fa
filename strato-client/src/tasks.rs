//! Task API endpoints
//!
//! The [`TaskService`] trait is the seam between the lifecycle agent and the
//! network: the agent is written against the trait so its state machine can
//! be tested with scripted in-memory services, while [`FunctionClient`]
//! provides the real HTTP implementation.

use async_trait::async_trait;
use strato_core::domain::phase::RemoteStatus;
use strato_core::domain::task::Credentials;
use strato_core::dto::task::{TaskDetail, TaskEnvelope, TaskSubmission};
use strato_core::error::{Result, TaskError};

use crate::{FunctionClient, transport_error};

/// Remote operations the lifecycle agent needs.
///
/// Every method is a single network round trip with no internal retries;
/// each is independently retryable by the caller where the error kind
/// allows it.
#[async_trait]
pub trait TaskService: Send + Sync {
    /// Submits a new task and returns the opaque remote handle
    async fn create_task(
        &self,
        submission: &TaskSubmission,
        credentials: &Credentials,
    ) -> Result<String>;

    /// Fetches the current task status.
    ///
    /// Idempotent and safe to call repeatedly; fails with
    /// [`TaskError::NotFound`] when the handle is unknown to the service.
    async fn task_status(&self, task_id: &str, credentials: &Credentials)
    -> Result<StatusReport>;

    /// Asks the provider to stop a still-active task
    async fn cancel_task(&self, task_id: &str, credentials: &Credentials) -> Result<()>;

    /// Deletes the task record.
    ///
    /// An already-deleted task (404) counts as success.
    async fn delete_task(&self, task_id: &str, credentials: &Credentials) -> Result<()>;
}

/// Normalized status response consumed by the lifecycle agent
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    /// Normalized remote status
    pub status: RemoteStatus,
    /// Advisory progress indicator, when the provider reports one
    pub percent_complete: Option<f32>,
    /// Registry location the provider uploaded results to
    pub results_location: Option<String>,
    /// Inline result payload (INLINE result handling only)
    pub inline_payload: Option<serde_json::Value>,
    /// Container exit code, when exposed
    pub exit_code: Option<i32>,
    /// Wall-clock runtime in seconds, when exposed
    pub duration_seconds: Option<u64>,
}

impl From<TaskDetail> for StatusReport {
    fn from(detail: TaskDetail) -> Self {
        Self {
            status: RemoteStatus::parse(&detail.status),
            percent_complete: detail.percent_complete,
            results_location: detail.results_location,
            inline_payload: detail.result,
            exit_code: detail.exit_code,
            duration_seconds: detail.duration_seconds,
        }
    }
}

#[async_trait]
impl TaskService for FunctionClient {
    async fn create_task(
        &self,
        submission: &TaskSubmission,
        credentials: &Credentials,
    ) -> Result<String> {
        let url = format!("{}/tasks", self.base_url());
        let response = self
            .http()
            .post(&url)
            .headers(FunctionClient::auth_headers(credentials)?)
            .json(submission)
            .send()
            .await
            .map_err(transport_error)?;

        let envelope: TaskEnvelope = self.handle_response(response).await?;
        tracing::debug!(task_id = %envelope.task.id, "created remote task");
        Ok(envelope.task.id)
    }

    async fn task_status(
        &self,
        task_id: &str,
        credentials: &Credentials,
    ) -> Result<StatusReport> {
        let url = format!("{}/tasks/{}", self.base_url(), task_id);
        let response = self
            .http()
            .get(&url)
            .headers(FunctionClient::auth_headers(credentials)?)
            .send()
            .await
            .map_err(transport_error)?;

        let envelope: TaskEnvelope = self.handle_response(response).await?;
        Ok(StatusReport::from(envelope.task))
    }

    async fn cancel_task(&self, task_id: &str, credentials: &Credentials) -> Result<()> {
        let url = format!("{}/tasks/{}/cancel", self.base_url(), task_id);
        let response = self
            .http()
            .post(&url)
            .headers(FunctionClient::auth_headers(credentials)?)
            .send()
            .await
            .map_err(transport_error)?;

        self.handle_empty_response(response).await
    }

    async fn delete_task(&self, task_id: &str, credentials: &Credentials) -> Result<()> {
        let url = format!("{}/tasks/{}", self.base_url(), task_id);
        let response = self
            .http()
            .delete(&url)
            .headers(FunctionClient::auth_headers(credentials)?)
            .send()
            .await
            .map_err(transport_error)?;

        match self.handle_empty_response(response).await {
            Ok(()) => Ok(()),
            // already gone counts as deleted
            Err(TaskError::NotFound(_)) => {
                tracing::debug!(task_id, "task already deleted");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
