//! Task result domain types

use serde::{Deserialize, Serialize};

/// Output of a successfully completed task.
///
/// Produced exactly once, on the poll that first observes completion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskResult {
    pub output: TaskOutput,
    /// Container exit code, when the provider exposes it
    pub exit_code: Option<i32>,
    /// Wall-clock runtime in seconds, when the provider exposes it
    pub duration_seconds: Option<u64>,
}

/// Where the task output landed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum TaskOutput {
    /// Payload embedded in the status response
    Inline(serde_json::Value),
    /// Payload uploaded by the provider; `uri` is the canonical location
    Uploaded { uri: String },
}
