//! Strato HTTP Client
//!
//! A type-safe HTTP client for the cloud function task API.
//!
//! All operations are stateless one-shot calls: the client never retries
//! internally and never caches task state. Retry policy (backoff on
//! transport and quota errors) belongs to the caller.
//!
//! # Example
//!
//! ```no_run
//! use strato_client::{FunctionClient, TaskService};
//! use strato_core::domain::task::{Credentials, GpuSpecification, TaskSpec};
//! use strato_core::build_submission;
//!
//! #[tokio::main]
//! async fn main() -> strato_core::Result<()> {
//!     let client = FunctionClient::new("https://api.nvct.nvidia.com/v1/nvct");
//!     let credentials = Credentials::new("nvapi-...", "my-org");
//!
//!     let spec = TaskSpec::new(
//!         "demo",
//!         "nvcr.io/org/image:tag",
//!         GpuSpecification::new("L40S", "gl40s_1.br25_2xlarge", "GFN"),
//!     )
//!     .with_upload_results("org/results");
//!
//!     let task_id = client
//!         .create_task(&build_submission(&spec)?, &credentials)
//!         .await?;
//!     println!("Created task: {}", task_id);
//!     Ok(())
//! }
//! ```

mod tasks;

pub use tasks::{StatusReport, TaskService};

use reqwest::Client;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use strato_core::domain::task::Credentials;
use strato_core::error::{Result, TaskError};

/// Name of the organization scoping header sent with every request.
/// Lowercase: header names are case-insensitive and `HeaderMap` requires
/// static names in canonical form.
pub const ORG_HEADER: &str = "organization-name";

/// HTTP client for the cloud function task API
///
/// Provides the three remote operations the lifecycle agent needs:
/// - task creation
/// - status retrieval (idempotent, safe to repeat)
/// - cancel/delete (best-effort cleanup)
#[derive(Debug, Clone)]
pub struct FunctionClient {
    /// Base URL of the task API (e.g., "https://api.nvct.nvidia.com/v1/nvct")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl FunctionClient {
    /// Create a new task API client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the task API
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Create a client with a custom HTTP client
    ///
    /// Allows configuring timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the task API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &Client {
        &self.client
    }

    /// Build the auth headers for one request.
    ///
    /// Bearer token from the API key plus the organization scoping header.
    pub(crate) fn auth_headers(credentials: &Credentials) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        let bearer = HeaderValue::from_str(&format!("Bearer {}", credentials.api_key))
            .map_err(|_| TaskError::Auth("API key contains invalid header bytes".to_string()))?;
        headers.insert(AUTHORIZATION, bearer);

        let org = HeaderValue::from_str(&credentials.org_name)
            .map_err(|_| TaskError::Auth("organization name contains invalid header bytes".to_string()))?;
        headers.insert(ORG_HEADER, org);

        Ok(headers)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON.
    ///
    /// Non-2xx statuses map onto the shared error taxonomy. A 2xx body that
    /// fails to parse is a contract violation, reported as a remote error
    /// rather than silently defaulted.
    pub(crate) async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(error_for_status(status.as_u16(), body));
        }

        let status = status.as_u16();
        response
            .json()
            .await
            .map_err(|e| TaskError::remote(status, format!("malformed response body: {}", e)))
    }

    /// Handle an API response that carries no useful body (cancel, delete)
    pub(crate) async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(error_for_status(status.as_u16(), body));
        }

        Ok(())
    }
}

/// Maps an HTTP status code onto the error taxonomy
pub(crate) fn error_for_status(status: u16, body: String) -> TaskError {
    match status {
        401 | 403 => TaskError::Auth(body),
        404 => TaskError::NotFound(body),
        429 => TaskError::Quota(body),
        _ => TaskError::remote(status, body),
    }
}

/// Maps a reqwest failure onto the error taxonomy.
///
/// Anything that happens before a response arrives is a transport failure.
pub(crate) fn transport_error(err: reqwest::Error) -> TaskError {
    TaskError::Transport(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = FunctionClient::new("https://api.example.com/v1/");
        assert_eq!(client.base_url(), "https://api.example.com/v1");
    }

    #[test]
    fn test_client_with_custom_client() {
        let http = Client::new();
        let client = FunctionClient::with_client("https://api.example.com/v1", http);
        assert_eq!(client.base_url(), "https://api.example.com/v1");
    }

    #[test]
    fn test_status_code_error_mapping() {
        assert!(matches!(
            error_for_status(401, String::new()),
            TaskError::Auth(_)
        ));
        assert!(matches!(
            error_for_status(403, String::new()),
            TaskError::Auth(_)
        ));
        assert!(matches!(
            error_for_status(404, String::new()),
            TaskError::NotFound(_)
        ));
        assert!(matches!(
            error_for_status(429, String::new()),
            TaskError::Quota(_)
        ));
        assert!(matches!(
            error_for_status(500, String::new()),
            TaskError::Remote { status: 500, .. }
        ));
        assert!(matches!(
            error_for_status(418, String::new()),
            TaskError::Remote { status: 418, .. }
        ));
    }

    #[test]
    fn test_auth_headers() {
        let credentials = Credentials::new("nvapi-abc123", "acme-corp");
        let headers = FunctionClient::auth_headers(&credentials).expect("valid credentials");

        assert_eq!(
            headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()),
            Some("Bearer nvapi-abc123")
        );
        assert_eq!(
            headers.get(ORG_HEADER).and_then(|v| v.to_str().ok()),
            Some("acme-corp")
        );
    }

    #[test]
    fn test_auth_headers_reject_control_bytes() {
        let credentials = Credentials::new("key\nwith-newline", "acme-corp");
        assert!(matches!(
            FunctionClient::auth_headers(&credentials),
            Err(TaskError::Auth(_))
        ));
    }
}
