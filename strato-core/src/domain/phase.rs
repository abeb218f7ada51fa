//! Remote status vocabulary and the orchestrator phase model
//!
//! The provider reports task state as strings whose vocabulary varies by
//! backend. [`RemoteStatus`] normalizes those strings into a closed enum with
//! an explicit unmapped-value carrier, and [`RemoteStatus::phase`] folds them
//! into the orchestrator-facing [`TaskPhase`] model.

use serde::{Deserialize, Serialize};

/// Task status as reported by the remote service.
///
/// Unknown strings are carried as [`RemoteStatus::Unmapped`] instead of being
/// defaulted to a benign value; the agent turns them into a remote-contract
/// error so provider API drift is loud, not silent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteStatus {
    Queued,
    Pending,
    Launched,
    Running,
    Completed,
    Errored,
    ExceededMaxRuntimeDuration,
    ExceededMaxQueuedDuration,
    Canceled,
    Deleted,
    /// Status string this agent version does not know
    Unmapped(String),
}

impl RemoteStatus {
    /// Normalizes a raw provider status string
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_uppercase().as_str() {
            "QUEUED" => Self::Queued,
            "PENDING" => Self::Pending,
            "LAUNCHED" => Self::Launched,
            "RUNNING" => Self::Running,
            "COMPLETED" => Self::Completed,
            "ERRORED" => Self::Errored,
            "EXCEEDED_MAX_RUNTIME_DURATION" => Self::ExceededMaxRuntimeDuration,
            "EXCEEDED_MAX_QUEUED_DURATION" => Self::ExceededMaxQueuedDuration,
            "CANCELED" => Self::Canceled,
            "DELETED" => Self::Deleted,
            _ => Self::Unmapped(raw.to_string()),
        }
    }

    /// Maps the remote status into the orchestrator phase model.
    ///
    /// Total over every known status; `None` only for [`RemoteStatus::Unmapped`].
    pub fn phase(&self) -> Option<TaskPhase> {
        match self {
            Self::Queued | Self::Pending => Some(TaskPhase::Queued),
            Self::Launched | Self::Running => Some(TaskPhase::Running),
            Self::Completed => Some(TaskPhase::Succeeded),
            Self::Errored
            | Self::ExceededMaxRuntimeDuration
            | Self::ExceededMaxQueuedDuration => Some(TaskPhase::Failed),
            Self::Canceled | Self::Deleted => Some(TaskPhase::Aborted),
            Self::Unmapped(_) => None,
        }
    }

    /// True while the provider can still make progress on the task
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            Self::Queued | Self::Pending | Self::Launched | Self::Running
        )
    }
}

/// Orchestrator-visible lifecycle phase of a task.
///
/// The mapping from [`RemoteStatus`] is one-directional: once a terminal
/// phase is cached by the caller, the agent never moves it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskPhase {
    Queued,
    Running,
    Succeeded,
    Failed,
    Aborted,
}

impl TaskPhase {
    /// True for phases from which no further transition occurs
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Aborted)
    }
}
