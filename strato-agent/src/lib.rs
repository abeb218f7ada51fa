//! Strato Lifecycle Agent
//!
//! The caller-driven state machine that turns a declarative [`TaskSpec`]
//! into a remote GPU task and tracks it to a terminal phase.
//!
//! The agent holds no background threads, timers, or cross-call state: every
//! operation is a pure function of its arguments plus at most one remote
//! round trip. The orchestrator persists the [`TaskHandle`] and the last
//! [`TaskSnapshot`] itself, so a fresh agent instance can resume polling any
//! task from a bare handle string.
//!
//! [`TaskSpec`]: strato_core::domain::task::TaskSpec

pub mod adapter;
pub mod agent;
pub mod config;
pub mod handle;
pub mod resolver;
pub mod snapshot;

pub use adapter::AgentAdapter;
pub use agent::LifecycleAgent;
pub use config::AgentConfig;
pub use handle::TaskHandle;
pub use snapshot::TaskSnapshot;
