//! Domain types
//!
//! Core business entities shared by the client, the agent, and the CLI.

pub mod phase;
pub mod result;
pub mod task;
