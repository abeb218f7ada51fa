//! Agent configuration
//!
//! Credentials and endpoint selection. Environment variables supply
//! defaults; explicit parameters always override them.

use strato_core::domain::task::Credentials;

/// Default task API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.nvct.nvidia.com/v1/nvct";

/// Agent configuration
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Task API base URL
    pub base_url: String,
    /// Credentials passed through every remote call
    pub credentials: Credentials,
}

impl AgentConfig {
    /// Creates a configuration with the default endpoint
    pub fn new(api_key: impl Into<String>, org_name: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials: Credentials::new(api_key, org_name),
        }
    }

    /// Overrides the task API endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - STRATO_API_KEY (required)
    /// - STRATO_ORG (required)
    /// - STRATO_BASE_URL (optional, defaults to the public endpoint)
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = std::env::var("STRATO_API_KEY")
            .map_err(|_| anyhow::anyhow!("STRATO_API_KEY environment variable not set"))?;

        let org_name = std::env::var("STRATO_ORG")
            .map_err(|_| anyhow::anyhow!("STRATO_ORG environment variable not set"))?;

        let base_url =
            std::env::var("STRATO_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let config = Self {
            base_url,
            credentials: Credentials::new(api_key, org_name),
        };
        config.validate()?;

        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.credentials.api_key.is_empty() {
            anyhow::bail!("api_key cannot be empty");
        }

        if self.credentials.org_name.is_empty() {
            anyhow::bail!("org_name cannot be empty");
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            anyhow::bail!("base_url must start with http:// or https://");
        }

        Ok(())
    }
}
