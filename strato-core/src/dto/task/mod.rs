//! Task API wire objects

use serde::{Deserialize, Serialize};

use crate::domain::task::{EnvVar, GpuSpecification, TaskSpec};

/// Task creation payload, in the provider's schema.
///
/// Built by [`crate::submission::build_submission`]; field names and shapes
/// are a versioned external contract and must round-trip verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskSubmission {
    pub name: String,
    pub container_image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_args: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_environment: Option<Vec<EnvVarDto>>,
    pub gpu_specification: GpuSpecificationDto,
    /// Model references as "name:version" strings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub models: Option<Vec<String>>,
    /// Secrets as "name:value" strings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secrets: Option<Vec<String>>,
    pub max_runtime_duration: String,
    pub max_queued_duration: String,
    pub termination_grace_period_duration: String,
    pub result_handling_strategy: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results_location: Option<String>,
}

/// GPU selector on the wire
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GpuSpecificationDto {
    pub gpu: String,
    pub instance_type: String,
    pub backend: String,
}

impl From<&GpuSpecification> for GpuSpecificationDto {
    fn from(spec: &GpuSpecification) -> Self {
        Self {
            gpu: spec.gpu.clone(),
            instance_type: spec.instance_type.clone(),
            backend: spec.backend.clone(),
        }
    }
}

/// Environment variable on the wire
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnvVarDto {
    pub key: String,
    pub value: String,
}

impl From<&EnvVar> for EnvVarDto {
    fn from(var: &EnvVar) -> Self {
        Self {
            key: var.key.clone(),
            value: var.value.clone(),
        }
    }
}

/// Envelope the task API wraps single-task responses in
#[derive(Debug, Clone, Deserialize)]
pub struct TaskEnvelope {
    pub task: TaskDetail,
}

/// Task detail as returned by create and status calls.
///
/// Only the fields this agent reads are modeled; everything else the
/// provider sends is ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDetail {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub percent_complete: Option<f32>,
    #[serde(default)]
    pub results_location: Option<String>,
    /// Inline result payload, present on completion in INLINE mode
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub exit_code: Option<i32>,
    #[serde(default)]
    pub duration_seconds: Option<u64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Wire label for a spec's result strategy
pub fn strategy_label(spec: &TaskSpec) -> &'static str {
    match spec.result_strategy {
        crate::domain::task::ResultStrategy::Inline => "INLINE",
        crate::domain::task::ResultStrategy::Upload => "UPLOAD",
    }
}
