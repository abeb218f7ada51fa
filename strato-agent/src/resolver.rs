//! Result resolver
//!
//! Shapes a completed task's output into the orchestrator contract. Runs
//! exactly once, on the poll that first observes completion, and never
//! touches remote state.

use strato_client::StatusReport;
use strato_core::domain::result::{TaskOutput, TaskResult};
use strato_core::domain::task::ResultStrategy;
use strato_core::error::{Result, TaskError};

use crate::handle::TaskHandle;

/// Resolves where the output of a completed task landed.
///
/// - `Inline`: the payload is embedded in the status report; no extra fetch.
/// - `Upload`: the canonical URI is derived deterministically from the
///   configured destination plus the handle. The provider's
///   `resultsLocation` field is required as a completeness gate; a
///   completion report without it is [`TaskError::ResultUnavailable`].
pub fn resolve(handle: &TaskHandle, report: &StatusReport) -> Result<TaskResult> {
    let output = match handle.result_strategy {
        ResultStrategy::Inline => {
            let payload = report.inline_payload.clone().ok_or_else(|| {
                TaskError::ResultUnavailable(format!(
                    "task {} completed without an inline result payload",
                    handle.task_id
                ))
            })?;
            TaskOutput::Inline(payload)
        }
        ResultStrategy::Upload => {
            let destination = handle.results_location.as_deref().ok_or_else(|| {
                TaskError::ResultUnavailable(format!(
                    "task {} handle carries no results destination",
                    handle.task_id
                ))
            })?;

            if report.results_location.is_none() {
                return Err(TaskError::ResultUnavailable(format!(
                    "task {} completed but the status report omits the results location",
                    handle.task_id
                )));
            }

            TaskOutput::Uploaded {
                uri: format!("{}/{}", destination.trim_end_matches('/'), handle.task_id),
            }
        }
    };

    Ok(TaskResult {
        output,
        exit_code: report.exit_code,
        duration_seconds: report.duration_seconds,
    })
}
