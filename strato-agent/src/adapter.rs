//! Agent server adapter
//!
//! Thin glue exposing the lifecycle agent over the orchestrator's agent
//! protocol: three calls, all operating on plain strings. The handle and
//! snapshot strings round-trip through the orchestrator's own persistence,
//! so the serving process keeps no per-task memory at all.

use strato_client::TaskService;
use strato_core::domain::task::{Credentials, TaskSpec};
use strato_core::error::Result;

use crate::agent::LifecycleAgent;
use crate::handle::TaskHandle;
use crate::snapshot::TaskSnapshot;

/// String-contract facade over [`LifecycleAgent`]
pub struct AgentAdapter<S> {
    agent: LifecycleAgent<S>,
    credentials: Credentials,
}

impl<S: TaskService> AgentAdapter<S> {
    pub fn new(remote: S, credentials: Credentials) -> Self {
        Self {
            agent: LifecycleAgent::new(remote),
            credentials,
        }
    }

    /// Submits a task and returns the encoded handle for the caller to keep
    pub async fn create(&self, spec: &TaskSpec) -> Result<String> {
        let handle = self.agent.create(spec, &self.credentials).await?;
        Ok(handle.encode())
    }

    /// Polls a task given its encoded handle and the previously returned
    /// snapshot string, if the caller kept one
    pub async fn get(&self, handle: &str, last: Option<&str>) -> Result<String> {
        let handle = TaskHandle::decode(handle)?;
        let last = last.map(TaskSnapshot::decode).transpose()?;

        let snapshot = self
            .agent
            .get(&handle, last.as_ref(), &self.credentials)
            .await?;
        Ok(snapshot.encode())
    }

    /// Cancels a task; always reports the aborted snapshot
    pub async fn delete(&self, handle: &str, last: Option<&str>) -> Result<String> {
        let handle = TaskHandle::decode(handle)?;
        let last = last.map(TaskSnapshot::decode).transpose()?;

        let snapshot = self
            .agent
            .delete(&handle, last.as_ref(), &self.credentials)
            .await?;
        Ok(snapshot.encode())
    }
}
