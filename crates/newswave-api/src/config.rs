//! API configuration

use newswave_storage::thirdweb::{DEFAULT_GATEWAY_TEMPLATE, DEFAULT_UPLOAD_URL};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the environment variable holding the provider secret
pub const SECRET_KEY_ENV: &str = "THIRDWEB_SECRET_KEY";

/// How routes are laid out
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentMode {
    /// Fixed routes with a `{cid}` path parameter
    #[default]
    Standalone,
    /// One function per operation; the CID is the trailing path segment
    Serverless,
}

/// API server configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Route layout
    pub mode: DeploymentMode,
    /// thirdweb secret key
    #[serde(skip_serializing, default)]
    pub secret_key: Option<String>,
    /// thirdweb upload endpoint
    pub upload_url: String,
    /// Gateway URL template (`{clientId}`, `{cid}`)
    pub gateway_template: String,
    /// Use in-memory storage (for testing/development)
    pub use_memory_store: bool,
    /// Provider request timeout (seconds)
    pub request_timeout_secs: u64,
    /// Maximum request body size (bytes)
    pub max_body_size: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            mode: DeploymentMode::Standalone,
            secret_key: None,
            upload_url: DEFAULT_UPLOAD_URL.to_string(),
            gateway_template: DEFAULT_GATEWAY_TEMPLATE.to_string(),
            use_memory_store: false,
            request_timeout_secs: 30,
            max_body_size: 1024 * 1024, // 1 MB
        }
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("mode", &self.mode)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .field("upload_url", &self.upload_url)
            .field("gateway_template", &self.gateway_template)
            .field("use_memory_store", &self.use_memory_store)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_body_size", &self.max_body_size)
            .finish()
    }
}

impl ApiConfig {
    /// Get the bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Set the secret key
    pub fn with_secret_key(mut self, secret_key: impl Into<String>) -> Self {
        self.secret_key = Some(secret_key.into());
        self
    }

    /// Whether a non-blank secret key is present
    pub fn has_secret_key(&self) -> bool {
        self.secret_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }

    /// Whether requests may reach the storage backend.
    ///
    /// The memory store needs no credential.
    pub fn is_storage_configured(&self) -> bool {
        self.use_memory_store || self.has_secret_key()
    }
}
