//! Configuration module
//!
//! CLI configuration: endpoint and credentials, assembled from flags and
//! environment variables (flags win).

use strato_core::domain::task::Credentials;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Task API base URL
    pub base_url: String,
    /// Credentials for the task service
    pub credentials: Credentials,
}
