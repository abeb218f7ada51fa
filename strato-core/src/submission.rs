//! Request translator
//!
//! Turns a [`TaskSpec`] into the provider's creation payload. Pure and
//! deterministic: no I/O, no clock, no randomness. All caller errors are
//! caught here as [`TaskError::InvalidSpec`] before any network call.

use iso8601_duration::Duration as IsoDuration;

use crate::domain::task::{ResultStrategy, TaskSpec};
use crate::dto::task::{EnvVarDto, GpuSpecificationDto, TaskSubmission, strategy_label};
use crate::error::{Result, TaskError};

/// Builds the remote submission payload from a task specification.
///
/// Validates:
/// - non-empty container image reference
/// - GPU selector carries gpu type, instance type, and backend
/// - all ISO-8601 durations parse to positive values
/// - results destination is present iff the strategy is `Upload`
///
/// Destination reachability is not checked here; the remote service owns
/// that.
pub fn build_submission(spec: &TaskSpec) -> Result<TaskSubmission> {
    if spec.container_image.trim().is_empty() {
        return Err(TaskError::InvalidSpec(
            "container image reference must not be empty".to_string(),
        ));
    }

    let gpu = &spec.gpu_specification;
    if gpu.gpu.trim().is_empty() {
        return Err(TaskError::InvalidSpec(
            "gpu specification is missing the gpu type".to_string(),
        ));
    }
    if gpu.instance_type.trim().is_empty() {
        return Err(TaskError::InvalidSpec(
            "gpu specification is missing the instance type".to_string(),
        ));
    }
    if gpu.backend.trim().is_empty() {
        return Err(TaskError::InvalidSpec(
            "gpu specification is missing the backend".to_string(),
        ));
    }

    validate_duration("maxRuntimeDuration", &spec.max_runtime_duration)?;
    validate_duration("maxQueuedDuration", &spec.max_queued_duration)?;
    validate_duration(
        "terminationGracePeriodDuration",
        &spec.termination_grace_period_duration,
    )?;

    match spec.result_strategy {
        ResultStrategy::Upload => {
            if spec
                .results_location
                .as_deref()
                .map(str::trim)
                .unwrap_or("")
                .is_empty()
            {
                return Err(TaskError::InvalidSpec(
                    "results location is required for UPLOAD result handling".to_string(),
                ));
            }
        }
        ResultStrategy::Inline => {
            if spec.results_location.is_some() {
                return Err(TaskError::InvalidSpec(
                    "results location must be empty for INLINE result handling".to_string(),
                ));
            }
        }
    }

    let container_args = if spec.container_args.is_empty() {
        None
    } else {
        Some(shell_join(&spec.container_args))
    };

    let container_environment = if spec.container_environment.is_empty() {
        None
    } else {
        Some(spec.container_environment.iter().map(EnvVarDto::from).collect())
    };

    let models = if spec.models.is_empty() {
        None
    } else {
        Some(
            spec.models
                .iter()
                .map(|m| format!("{}:{}", m.name, m.version))
                .collect(),
        )
    };

    let secrets = if spec.secrets.is_empty() {
        None
    } else {
        Some(
            spec.secrets
                .iter()
                .map(|s| format!("{}:{}", s.name, s.value))
                .collect(),
        )
    };

    Ok(TaskSubmission {
        name: spec.name.clone(),
        container_image: spec.container_image.clone(),
        container_args,
        container_environment,
        gpu_specification: GpuSpecificationDto::from(gpu),
        models,
        secrets,
        max_runtime_duration: spec.max_runtime_duration.clone(),
        max_queued_duration: spec.max_queued_duration.clone(),
        termination_grace_period_duration: spec.termination_grace_period_duration.clone(),
        result_handling_strategy: strategy_label(spec).to_string(),
        results_location: spec.results_location.clone(),
    })
}

/// Checks that `value` is a positive ISO-8601 duration.
///
/// Calendar components (years, months) are rejected: the provider expects
/// exact durations and "P1M" has no fixed length.
fn validate_duration(field: &str, value: &str) -> Result<()> {
    let parsed = IsoDuration::parse(value).map_err(|_| {
        TaskError::InvalidSpec(format!(
            "{} is not a valid ISO-8601 duration: {:?}",
            field, value
        ))
    })?;

    let std = parsed.to_std().ok_or_else(|| {
        TaskError::InvalidSpec(format!(
            "{} must not use calendar components (years/months): {:?}",
            field, value
        ))
    })?;

    if std.is_zero() {
        return Err(TaskError::InvalidSpec(format!(
            "{} must be a positive duration: {:?}",
            field, value
        )));
    }

    Ok(())
}

/// Joins container arguments into one shell-style command string.
///
/// The task API takes a single command string, not an argv list. Arguments
/// containing whitespace or quote characters are single-quoted.
fn shell_join(args: &[String]) -> String {
    args.iter()
        .map(|arg| shell_quote(arg))
        .collect::<Vec<_>>()
        .join(" ")
}

fn shell_quote(arg: &str) -> String {
    let needs_quoting = arg.is_empty()
        || arg
            .chars()
            .any(|c| c.is_whitespace() || c == '\'' || c == '"' || c == '$' || c == '\\');

    if needs_quoting {
        format!("'{}'", arg.replace('\'', r"'\''"))
    } else {
        arg.to_string()
    }
}
