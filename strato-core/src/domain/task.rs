//! Task specification domain types
//!
//! A [`TaskSpec`] is the immutable input handed to the agent by the
//! orchestrator. It describes one GPU job: which container to run, on what
//! hardware, for how long, and where the results should go.

use serde::{Deserialize, Serialize};

/// Declarative description of one remote GPU task.
///
/// Built once by the caller and never mutated afterwards. Validation happens
/// in [`crate::submission::build_submission`], not here, so a spec can be
/// assembled incrementally with the `with_*` builders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskSpec {
    /// Human-readable task name, shown in the provider console
    pub name: String,
    /// Container image reference (e.g., "nvcr.io/org/image:tag")
    pub container_image: String,
    /// GPU/instance selector
    pub gpu_specification: GpuSpecification,
    /// Container entry arguments, joined into one command string on the wire
    pub container_args: Vec<String>,
    /// Environment variables injected into the container
    pub container_environment: Vec<EnvVar>,
    /// Model references mounted into the task
    pub models: Vec<ModelRef>,
    /// Secrets passed to the task
    pub secrets: Vec<SecretRef>,
    /// Maximum runtime, ISO-8601 duration (e.g., "PT1H")
    pub max_runtime_duration: String,
    /// Maximum time the task may sit queued before the provider fails it
    pub max_queued_duration: String,
    /// Grace period between SIGTERM and SIGKILL on termination
    pub termination_grace_period_duration: String,
    /// How the task output is handed back
    pub result_strategy: ResultStrategy,
    /// Destination registry path for uploaded results.
    /// Required iff `result_strategy` is [`ResultStrategy::Upload`].
    pub results_location: Option<String>,
}

impl TaskSpec {
    /// Creates a spec with provider defaults for queueing and termination
    pub fn new(
        name: impl Into<String>,
        container_image: impl Into<String>,
        gpu_specification: GpuSpecification,
    ) -> Self {
        Self {
            name: name.into(),
            container_image: container_image.into(),
            gpu_specification,
            container_args: Vec::new(),
            container_environment: Vec::new(),
            models: Vec::new(),
            secrets: Vec::new(),
            max_runtime_duration: "PT1H".to_string(),
            max_queued_duration: "PT6H".to_string(),
            termination_grace_period_duration: "PT15M".to_string(),
            result_strategy: ResultStrategy::Upload,
            results_location: None,
        }
    }

    /// Sets the container entry arguments
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.container_args = args;
        self
    }

    /// Adds an environment variable
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.container_environment.push(EnvVar {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    /// Sets the maximum runtime (ISO-8601 duration)
    pub fn with_max_runtime(mut self, duration: impl Into<String>) -> Self {
        self.max_runtime_duration = duration.into();
        self
    }

    /// Switches the spec to inline result handling
    pub fn with_inline_results(mut self) -> Self {
        self.result_strategy = ResultStrategy::Inline;
        self.results_location = None;
        self
    }

    /// Switches the spec to uploaded result handling with a destination
    pub fn with_upload_results(mut self, destination: impl Into<String>) -> Self {
        self.result_strategy = ResultStrategy::Upload;
        self.results_location = Some(destination.into());
        self
    }
}

/// GPU hardware selector for a task
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GpuSpecification {
    /// GPU type (e.g., "L40S", "H100")
    pub gpu: String,
    /// Instance type (e.g., "gl40s_1.br25_2xlarge")
    pub instance_type: String,
    /// Backend/cluster group (e.g., "GFN")
    pub backend: String,
}

impl GpuSpecification {
    pub fn new(
        gpu: impl Into<String>,
        instance_type: impl Into<String>,
        backend: impl Into<String>,
    ) -> Self {
        Self {
            gpu: gpu.into(),
            instance_type: instance_type.into(),
            backend: backend.into(),
        }
    }
}

/// Result-handling policy for a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResultStrategy {
    /// Output is embedded in the status response
    Inline,
    /// Output is uploaded to a registry location by the provider
    Upload,
}

/// One container environment variable
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnvVar {
    pub key: String,
    pub value: String,
}

/// Reference to a model made available to the task
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelRef {
    pub name: String,
    pub version: String,
}

/// Reference to a secret passed to the task
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SecretRef {
    pub name: String,
    pub value: String,
}

/// Credentials for the remote service.
///
/// Passed explicitly through every call rather than captured as ambient
/// state, so one process can poll tasks under different organizations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// API key used for the bearer authorization header
    pub api_key: String,
    /// Organization the tasks are billed and scoped to
    pub org_name: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, org_name: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            org_name: org_name.into(),
        }
    }
}
