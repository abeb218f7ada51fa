//! Task snapshots
//!
//! A [`TaskSnapshot`] is what the orchestrator sees on every poll: the
//! current phase plus whatever the last status check surfaced. Like the
//! handle, it serializes to a string so the orchestrator can persist it and
//! feed it back on the next poll (which is how terminal phases stay
//! monotonic without any agent-side memory).

use serde::{Deserialize, Serialize};
use strato_core::domain::phase::TaskPhase;
use strato_core::domain::result::TaskResult;
use strato_core::error::{Result, TaskError};

/// Orchestrator-visible view of a task at one point in time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskSnapshot {
    pub phase: TaskPhase,
    /// Populated once, on the poll that first observes success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<TaskResult>,
    /// Human-readable status or failure diagnostic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Advisory progress from the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent_complete: Option<f32>,
    /// Provider console link for the task
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub console_url: Option<String>,
}

impl TaskSnapshot {
    /// Snapshot with just a phase
    pub fn new(phase: TaskPhase) -> Self {
        Self {
            phase,
            result: None,
            message: None,
            percent_complete: None,
            console_url: None,
        }
    }

    /// Terminal aborted snapshot with a diagnostic message
    pub fn aborted(message: impl Into<String>) -> Self {
        Self {
            phase: TaskPhase::Aborted,
            result: None,
            message: Some(message.into()),
            percent_complete: None,
            console_url: None,
        }
    }

    /// True once no further phase transition can occur
    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Serializes the snapshot for orchestrator persistence
    pub fn encode(&self) -> String {
        serde_json::to_string(self).expect("TaskSnapshot serializes to JSON")
    }

    /// Rebuilds a snapshot from its persisted string form
    pub fn decode(raw: &str) -> Result<Self> {
        serde_json::from_str(raw)
            .map_err(|e| TaskError::InvalidSpec(format!("malformed task snapshot: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strato_core::domain::result::TaskOutput;

    #[test]
    fn test_snapshot_round_trips_through_string_form() {
        let snapshot = TaskSnapshot {
            phase: TaskPhase::Succeeded,
            result: Some(TaskResult {
                output: TaskOutput::Uploaded {
                    uri: "org/results/job-123".to_string(),
                },
                exit_code: Some(0),
                duration_seconds: None,
            }),
            message: Some("remote status COMPLETED".to_string()),
            percent_complete: Some(100.0),
            console_url: None,
        };

        let decoded = TaskSnapshot::decode(&snapshot.encode()).expect("decodes");
        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn test_terminality_follows_phase() {
        assert!(!TaskSnapshot::new(TaskPhase::Queued).is_terminal());
        assert!(!TaskSnapshot::new(TaskPhase::Running).is_terminal());
        assert!(TaskSnapshot::new(TaskPhase::Failed).is_terminal());
        assert!(TaskSnapshot::aborted("canceled").is_terminal());
    }
}
