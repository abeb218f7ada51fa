//! Strato Core
//!
//! Core types and abstractions for the Strato GPU task agent.
//!
//! This crate contains:
//! - Domain types: task specifications, phases, results
//! - DTOs: wire objects for the cloud function task API
//! - Error taxonomy shared by the client and the lifecycle agent
//! - The request translator (`build_submission`)

pub mod domain;
pub mod dto;
pub mod error;
pub mod submission;

pub use error::{Result, TaskError};
pub use submission::build_submission;
