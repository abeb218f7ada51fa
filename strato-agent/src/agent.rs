//! Lifecycle agent state machine
//!
//! Drives one remote task through `Queued → Running → {Succeeded | Failed |
//! Aborted}`. Polling is pull-based: the orchestrator calls [`LifecycleAgent::get`]
//! on its own cadence and each call performs at most one remote status
//! check. Terminal phases are monotonic — once the caller holds a terminal
//! snapshot, `get` returns it unchanged with zero network traffic.

use strato_client::{StatusReport, TaskService};
use strato_core::domain::phase::{RemoteStatus, TaskPhase};
use strato_core::domain::task::{Credentials, TaskSpec};
use strato_core::error::{Result, TaskError};
use strato_core::submission::build_submission;

use crate::handle::TaskHandle;
use crate::resolver;
use crate::snapshot::TaskSnapshot;

/// Provider console, linked from every live snapshot
pub const CONSOLE_BASE_URL: &str = "https://nvcf.ngc.nvidia.com";

/// Caller-driven lifecycle agent over a [`TaskService`].
///
/// Stateless across calls: every operation is a function of its arguments,
/// so one agent instance can drive any number of concurrent tasks, and a
/// fresh instance resumes any task from a persisted handle.
#[derive(Debug, Clone)]
pub struct LifecycleAgent<S> {
    remote: S,
}

impl<S: TaskService> LifecycleAgent<S> {
    pub fn new(remote: S) -> Self {
        Self { remote }
    }

    /// Validates the spec, submits the task, and returns its handle.
    ///
    /// Spec errors are caught before any network call is made.
    pub async fn create(
        &self,
        spec: &TaskSpec,
        credentials: &Credentials,
    ) -> Result<TaskHandle> {
        let submission = build_submission(spec)?;
        let task_id = self.remote.create_task(&submission, credentials).await?;
        tracing::info!(task_id = %task_id, name = %spec.name, "created remote task");

        Ok(TaskHandle {
            task_id,
            result_strategy: spec.result_strategy,
            results_location: spec.results_location.clone(),
        })
    }

    /// Polls the task once and returns its current snapshot.
    ///
    /// `last` is the snapshot the caller persisted from the previous poll,
    /// if any. When it is already terminal this is a pure cache read — the
    /// remote service is not contacted, so repeated polls after completion
    /// are free of side effects and a deleted task is never re-queried.
    ///
    /// Errors propagate without producing a snapshot; the caller's last
    /// known phase stays whatever it was before the call.
    pub async fn get(
        &self,
        handle: &TaskHandle,
        last: Option<&TaskSnapshot>,
        credentials: &Credentials,
    ) -> Result<TaskSnapshot> {
        if let Some(prev) = last {
            if prev.is_terminal() {
                return Ok(prev.clone());
            }
        }

        let report = match self.remote.task_status(&handle.task_id, credentials).await {
            Ok(report) => report,
            // the handle was valid at creation time, so a vanished task
            // means it was deleted out from under us
            Err(TaskError::NotFound(_)) => {
                tracing::warn!(task_id = %handle.task_id, "task no longer known to the remote service");
                return Ok(TaskSnapshot::aborted(
                    "task no longer known to the remote service",
                ));
            }
            Err(e) => return Err(e),
        };

        self.snapshot_from_report(handle, &report)
    }

    /// Cancels the task and reports it aborted.
    ///
    /// Cancellation wins unconditionally: the returned snapshot is
    /// `Aborted` no matter what the remote calls do, even if a concurrent
    /// poll already observed success. Remote-side failures (including an
    /// already-deleted task) are logged, never raised, so the orchestrator
    /// can always close out its bookkeeping.
    pub async fn delete(
        &self,
        handle: &TaskHandle,
        last: Option<&TaskSnapshot>,
        credentials: &Credentials,
    ) -> Result<TaskSnapshot> {
        let maybe_active = last.map(|s| !s.is_terminal()).unwrap_or(true);

        if maybe_active {
            self.cancel_if_active(handle, credentials).await;
        }

        match self.remote.delete_task(&handle.task_id, credentials).await {
            Ok(()) => tracing::info!(task_id = %handle.task_id, "deleted remote task"),
            Err(e) => {
                tracing::warn!(task_id = %handle.task_id, error = %e, "remote delete failed, continuing")
            }
        }

        Ok(TaskSnapshot::aborted("canceled by caller"))
    }

    /// Best-effort cancel of a still-active task before deletion.
    ///
    /// The provider rejects deleting a running task, so probe the status and
    /// cancel first. Both calls may fail without consequence.
    async fn cancel_if_active(&self, handle: &TaskHandle, credentials: &Credentials) {
        let status = match self.remote.task_status(&handle.task_id, credentials).await {
            Ok(report) => report.status,
            Err(e) => {
                tracing::debug!(task_id = %handle.task_id, error = %e, "status probe before delete failed");
                return;
            }
        };

        if !status.is_active() {
            return;
        }

        match self.remote.cancel_task(&handle.task_id, credentials).await {
            Ok(()) => tracing::info!(task_id = %handle.task_id, "canceled remote task"),
            Err(e) => {
                tracing::warn!(task_id = %handle.task_id, error = %e, "remote cancel failed, continuing")
            }
        }
    }

    /// Folds a status report into an orchestrator snapshot
    fn snapshot_from_report(
        &self,
        handle: &TaskHandle,
        report: &StatusReport,
    ) -> Result<TaskSnapshot> {
        let phase = match report.status.phase() {
            Some(phase) => phase,
            None => {
                let raw = match &report.status {
                    RemoteStatus::Unmapped(raw) => raw.as_str(),
                    _ => "unknown",
                };
                return Err(TaskError::remote(
                    200,
                    format!("remote service reported unmapped status {:?}", raw),
                ));
            }
        };

        let mut snapshot = TaskSnapshot {
            phase,
            result: None,
            message: Some(match report.percent_complete {
                Some(pct) => format!("task status {:?}, {:.0}% complete", report.status, pct),
                None => format!("task status {:?}", report.status),
            }),
            percent_complete: report.percent_complete,
            console_url: Some(format!("{}/tasks/{}", CONSOLE_BASE_URL, handle.task_id)),
        };

        match phase {
            TaskPhase::Succeeded => match resolver::resolve(handle, report) {
                Ok(result) => snapshot.result = Some(result),
                Err(TaskError::ResultUnavailable(msg)) => {
                    snapshot.phase = TaskPhase::Failed;
                    snapshot.message = Some(msg);
                }
                Err(e) => return Err(e),
            },
            TaskPhase::Failed => {
                snapshot.message = Some("task execution failed".to_string());
            }
            _ => {}
        }

        tracing::debug!(
            task_id = %handle.task_id,
            status = ?report.status,
            phase = ?snapshot.phase,
            "polled remote task"
        );

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use strato_core::domain::result::TaskOutput;
    use strato_core::domain::task::{GpuSpecification, ResultStrategy};
    use strato_core::dto::task::TaskSubmission;

    /// In-memory task service with scripted responses and call counters
    #[derive(Default)]
    struct ScriptedService {
        create_response: Mutex<Option<Result<String>>>,
        status_responses: Mutex<VecDeque<Result<StatusReport>>>,
        cancel_response: Mutex<Option<Result<()>>>,
        delete_response: Mutex<Option<Result<()>>>,
        create_calls: AtomicUsize,
        status_calls: AtomicUsize,
        cancel_calls: AtomicUsize,
        delete_calls: AtomicUsize,
    }

    impl ScriptedService {
        fn with_create(self, response: Result<String>) -> Self {
            *self.create_response.lock().unwrap() = Some(response);
            self
        }

        fn with_statuses(self, responses: Vec<Result<StatusReport>>) -> Self {
            *self.status_responses.lock().unwrap() = responses.into();
            self
        }

        fn with_delete(self, response: Result<()>) -> Self {
            *self.delete_response.lock().unwrap() = Some(response);
            self
        }

        fn status_calls(&self) -> usize {
            self.status_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl<'a> TaskService for &'a ScriptedService {
        async fn create_task(
            &self,
            _submission: &TaskSubmission,
            _credentials: &Credentials,
        ) -> Result<String> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            self.create_response
                .lock()
                .unwrap()
                .clone()
                .expect("unscripted create call")
        }

        async fn task_status(
            &self,
            _task_id: &str,
            _credentials: &Credentials,
        ) -> Result<StatusReport> {
            self.status_calls.fetch_add(1, Ordering::SeqCst);
            self.status_responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("unscripted status call")
        }

        async fn cancel_task(&self, _task_id: &str, _credentials: &Credentials) -> Result<()> {
            self.cancel_calls.fetch_add(1, Ordering::SeqCst);
            self.cancel_response
                .lock()
                .unwrap()
                .clone()
                .unwrap_or(Ok(()))
        }

        async fn delete_task(&self, _task_id: &str, _credentials: &Credentials) -> Result<()> {
            self.delete_calls.fetch_add(1, Ordering::SeqCst);
            self.delete_response
                .lock()
                .unwrap()
                .clone()
                .unwrap_or(Ok(()))
        }
    }

    fn credentials() -> Credentials {
        Credentials::new("nvapi-test", "acme-corp")
    }

    fn inline_spec() -> TaskSpec {
        TaskSpec::new(
            "demo",
            "repo/img:tag",
            GpuSpecification::new("L40S", "gl40s_1.br25_2xlarge", "GFN"),
        )
        .with_max_runtime("PT1H")
        .with_inline_results()
    }

    fn upload_handle(task_id: &str) -> TaskHandle {
        TaskHandle {
            task_id: task_id.to_string(),
            result_strategy: ResultStrategy::Upload,
            results_location: Some("org/results".to_string()),
        }
    }

    fn report(status: RemoteStatus) -> StatusReport {
        StatusReport {
            status,
            percent_complete: None,
            results_location: None,
            inline_payload: None,
            exit_code: None,
            duration_seconds: None,
        }
    }

    #[tokio::test]
    async fn test_inline_task_runs_to_success() {
        let mut completed = report(RemoteStatus::Completed);
        completed.inline_payload = Some(serde_json::json!("42"));

        let service = ScriptedService::default()
            .with_create(Ok("job-123".to_string()))
            .with_statuses(vec![
                Ok(report(RemoteStatus::Pending)),
                Ok(report(RemoteStatus::Running)),
                Ok(completed),
            ]);
        let agent = LifecycleAgent::new(&service);

        let handle = agent
            .create(&inline_spec(), &credentials())
            .await
            .expect("create");
        assert_eq!(handle.task_id, "job-123");

        let first = agent.get(&handle, None, &credentials()).await.expect("get");
        assert_eq!(first.phase, TaskPhase::Queued);

        let second = agent
            .get(&handle, Some(&first), &credentials())
            .await
            .expect("get");
        assert_eq!(second.phase, TaskPhase::Running);

        let third = agent
            .get(&handle, Some(&second), &credentials())
            .await
            .expect("get");
        assert_eq!(third.phase, TaskPhase::Succeeded);
        assert_eq!(
            third.result.as_ref().map(|r| &r.output),
            Some(&TaskOutput::Inline(serde_json::json!("42")))
        );
    }

    #[tokio::test]
    async fn test_invalid_spec_makes_no_network_call() {
        let service = ScriptedService::default();
        let agent = LifecycleAgent::new(&service);

        let mut spec = inline_spec();
        spec.container_image = String::new();

        let err = agent.create(&spec, &credentials()).await.unwrap_err();
        assert!(matches!(err, TaskError::InvalidSpec(_)));
        assert_eq!(service.create_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_terminal_snapshot_is_a_pure_cache_read() {
        let service =
            ScriptedService::default().with_statuses(vec![Ok(report(RemoteStatus::Completed))]);
        let agent = LifecycleAgent::new(&service);
        let handle = TaskHandle {
            task_id: "job-123".to_string(),
            result_strategy: ResultStrategy::Inline,
            results_location: None,
        };

        // completion without a payload resolves to a terminal Failed snapshot
        let terminal = agent.get(&handle, None, &credentials()).await.expect("get");
        assert!(terminal.is_terminal());
        assert_eq!(service.status_calls(), 1);

        for _ in 0..3 {
            let again = agent
                .get(&handle, Some(&terminal), &credentials())
                .await
                .expect("get");
            assert_eq!(again, terminal);
        }
        assert_eq!(service.status_calls(), 1);
    }

    #[tokio::test]
    async fn test_upload_completion_without_location_fails_result_unavailable() {
        let service =
            ScriptedService::default().with_statuses(vec![Ok(report(RemoteStatus::Completed))]);
        let agent = LifecycleAgent::new(&service);
        let handle = upload_handle("job-9");

        let snapshot = agent.get(&handle, None, &credentials()).await.expect("get");
        assert_eq!(snapshot.phase, TaskPhase::Failed);
        assert!(
            snapshot
                .message
                .as_deref()
                .unwrap_or("")
                .contains("results location"),
            "message: {:?}",
            snapshot.message
        );
    }

    #[tokio::test]
    async fn test_auth_error_propagates_without_mutating_phase() {
        let service = ScriptedService::default().with_statuses(vec![
            Err(TaskError::Auth("401 unauthorized".to_string())),
            Ok(report(RemoteStatus::Running)),
        ]);
        let agent = LifecycleAgent::new(&service);
        let handle = upload_handle("job-9");
        let last = TaskSnapshot::new(TaskPhase::Running);

        let err = agent
            .get(&handle, Some(&last), &credentials())
            .await
            .unwrap_err();
        assert!(matches!(err, TaskError::Auth(_)));

        // the caller keeps its previous snapshot and the next poll proceeds
        let next = agent
            .get(&handle, Some(&last), &credentials())
            .await
            .expect("get");
        assert_eq!(next.phase, TaskPhase::Running);
    }

    #[tokio::test]
    async fn test_vanished_task_becomes_aborted() {
        let service = ScriptedService::default()
            .with_statuses(vec![Err(TaskError::NotFound("job-9".to_string()))]);
        let agent = LifecycleAgent::new(&service);
        let handle = upload_handle("job-9");

        let snapshot = agent.get(&handle, None, &credentials()).await.expect("get");
        assert_eq!(snapshot.phase, TaskPhase::Aborted);
    }

    #[tokio::test]
    async fn test_unmapped_status_is_a_remote_error() {
        let service = ScriptedService::default()
            .with_statuses(vec![Ok(report(RemoteStatus::Unmapped("PAUSED".to_string())))]);
        let agent = LifecycleAgent::new(&service);
        let handle = upload_handle("job-9");

        let err = agent.get(&handle, None, &credentials()).await.unwrap_err();
        assert!(matches!(err, TaskError::Remote { .. }), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_delete_reports_success_when_task_already_gone() {
        let service = ScriptedService::default()
            .with_statuses(vec![Err(TaskError::NotFound("job-9".to_string()))])
            .with_delete(Err(TaskError::NotFound("job-9".to_string())));
        let agent = LifecycleAgent::new(&service);
        let handle = upload_handle("job-9");

        let snapshot = agent
            .delete(&handle, None, &credentials())
            .await
            .expect("delete");
        assert_eq!(snapshot.phase, TaskPhase::Aborted);
    }

    #[tokio::test]
    async fn test_delete_forces_aborted_even_on_remote_failure() {
        let service = ScriptedService::default()
            .with_statuses(vec![Ok(report(RemoteStatus::Running))])
            .with_delete(Err(TaskError::remote(500, "internal error")));
        let agent = LifecycleAgent::new(&service);
        let handle = upload_handle("job-9");
        let last = TaskSnapshot::new(TaskPhase::Running);

        let snapshot = agent
            .delete(&handle, Some(&last), &credentials())
            .await
            .expect("delete");
        assert_eq!(snapshot.phase, TaskPhase::Aborted);
        assert_eq!(service.cancel_calls.load(Ordering::SeqCst), 1);
        assert_eq!(service.delete_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_delete_wins_over_observed_success() {
        let service = ScriptedService::default();
        let agent = LifecycleAgent::new(&service);
        let handle = upload_handle("job-9");
        let last = TaskSnapshot::new(TaskPhase::Succeeded);

        // terminal last phase: no probe, no cancel, just delete
        let snapshot = agent
            .delete(&handle, Some(&last), &credentials())
            .await
            .expect("delete");
        assert_eq!(snapshot.phase, TaskPhase::Aborted);
        assert_eq!(service.status_calls(), 0);
        assert_eq!(service.cancel_calls.load(Ordering::SeqCst), 0);
        assert_eq!(service.delete_calls.load(Ordering::SeqCst), 1);
    }
}
