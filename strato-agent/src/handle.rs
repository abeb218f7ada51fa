//! Task handles
//!
//! A [`TaskHandle`] is everything the agent needs to resume work on a task:
//! the opaque remote id plus the result routing chosen at submission time.
//! It serializes to a compact JSON string so the orchestrator can persist it
//! across its own restarts and hand it to a fresh agent instance.

use serde::{Deserialize, Serialize};
use strato_core::domain::task::ResultStrategy;
use strato_core::error::{Result, TaskError};

/// Reference to one remote task.
///
/// Never reused across tasks; becomes invalid once the task is deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskHandle {
    /// Opaque identifier assigned by the remote service
    pub task_id: String,
    /// Result handling chosen at submission time
    pub result_strategy: ResultStrategy,
    /// Destination registry path (UPLOAD result handling only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results_location: Option<String>,
}

impl TaskHandle {
    /// Serializes the handle for orchestrator persistence
    pub fn encode(&self) -> String {
        serde_json::to_string(self).expect("TaskHandle serializes to JSON")
    }

    /// Rebuilds a handle from its persisted string form
    pub fn decode(raw: &str) -> Result<Self> {
        serde_json::from_str(raw)
            .map_err(|e| TaskError::InvalidSpec(format!("malformed task handle: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_round_trips_through_string_form() {
        let handle = TaskHandle {
            task_id: "job-123".to_string(),
            result_strategy: ResultStrategy::Upload,
            results_location: Some("org/results".to_string()),
        };

        let encoded = handle.encode();
        let decoded = TaskHandle::decode(&encoded).expect("decodes");
        assert_eq!(decoded, handle);
    }

    #[test]
    fn test_inline_handle_omits_destination() {
        let handle = TaskHandle {
            task_id: "job-9".to_string(),
            result_strategy: ResultStrategy::Inline,
            results_location: None,
        };

        let encoded = handle.encode();
        assert!(!encoded.contains("results_location"));
        assert_eq!(TaskHandle::decode(&encoded).expect("decodes"), handle);
    }

    #[test]
    fn test_garbage_handle_is_rejected() {
        assert!(matches!(
            TaskHandle::decode("not json at all"),
            Err(TaskError::InvalidSpec(_))
        ));
    }
}
