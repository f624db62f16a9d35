//! thirdweb IPFS storage client
//!
//! Uploads go through thirdweb's storage API; reads and gateway URLs use the
//! per-client `ipfscdn.io` gateway derived from the secret key.

use crate::{ContentId, Result, StorageError, StorageGateway};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{multipart, Client, Response, StatusCode};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::fmt;
use std::time::Duration;
use tracing::instrument;

/// Default upload endpoint
pub const DEFAULT_UPLOAD_URL: &str = "https://storage.thirdweb.com/ipfs/upload";

/// Default gateway template; `{clientId}` and `{cid}` are substituted
pub const DEFAULT_GATEWAY_TEMPLATE: &str = "https://{clientId}.ipfscdn.io/ipfs/{cid}";

/// Header carrying the secret key on every provider request
const SECRET_KEY_HEADER: &str = "x-secret-key";

/// Configuration for the thirdweb storage client
#[derive(Clone)]
pub struct ThirdwebConfig {
    /// Secret key; without it every call fails before any I/O
    pub secret_key: Option<String>,
    /// Upload endpoint URL
    pub upload_url: String,
    /// Gateway URL template
    pub gateway_template: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for ThirdwebConfig {
    fn default() -> Self {
        Self {
            secret_key: None,
            upload_url: DEFAULT_UPLOAD_URL.to_string(),
            gateway_template: DEFAULT_GATEWAY_TEMPLATE.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl fmt::Debug for ThirdwebConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThirdwebConfig")
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .field("upload_url", &self.upload_url)
            .field("gateway_template", &self.gateway_template)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ThirdwebConfig {
    /// Create with a secret key and default endpoints
    pub fn with_secret_key(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: Some(secret_key.into()),
            ..Default::default()
        }
    }

    /// Set the upload endpoint
    pub fn with_upload_url(mut self, upload_url: impl Into<String>) -> Self {
        self.upload_url = upload_url.into();
        self
    }

    /// Set the gateway template
    pub fn with_gateway_template(mut self, template: impl Into<String>) -> Self {
        self.gateway_template = template.into();
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Derive the public client id thirdweb associates with a secret key:
/// the first 32 hex characters of its SHA-256 digest.
pub fn client_id_from_secret_key(secret_key: &str) -> String {
    let digest = Sha256::digest(secret_key.as_bytes());
    hex::encode(digest)[..32].to_string()
}

/// Credentials resolved once at construction
#[derive(Clone)]
struct Credentials {
    secret_key: String,
    client_id: String,
}

/// thirdweb storage client
#[derive(Clone)]
pub struct ThirdwebStorage {
    client: Client,
    config: ThirdwebConfig,
    credentials: Option<Credentials>,
}

impl ThirdwebStorage {
    /// Create a new client.
    ///
    /// A missing or blank secret key is accepted here; calls then fail fast
    /// with [`StorageError::MissingSecret`].
    pub fn new(config: ThirdwebConfig) -> Result<Self> {
        if !config.gateway_template.contains("{cid}") {
            return Err(StorageError::Configuration(format!(
                "gateway template must contain {{cid}}: {}",
                config.gateway_template
            )));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StorageError::Configuration(e.to_string()))?;

        let credentials = config
            .secret_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(|key| Credentials {
                secret_key: key.to_string(),
                client_id: client_id_from_secret_key(key),
            });

        if credentials.is_none() {
            tracing::warn!("thirdweb secret key not set; storage calls will fail");
        }

        Ok(Self {
            client,
            config,
            credentials,
        })
    }

    /// Whether a secret key is available
    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    /// Client id derived from the secret key, if configured
    pub fn client_id(&self) -> Option<&str> {
        self.credentials.as_ref().map(|c| c.client_id.as_str())
    }

    fn credentials(&self) -> Result<&Credentials> {
        self.credentials.as_ref().ok_or(StorageError::MissingSecret)
    }

    fn gateway_url(&self, credentials: &Credentials, cid: &ContentId) -> String {
        self.config
            .gateway_template
            .replace("{clientId}", &credentials.client_id)
            .replace("{cid}", cid.as_str())
    }

    /// Turn a non-success response into a `StorageError`
    async fn error_for_status(&self, response: Response, cid: Option<&ContentId>) -> StorageError {
        let status = response.status();
        let subject = cid.map(ContentId::to_string).unwrap_or_default();

        match status {
            StatusCode::NOT_FOUND => StorageError::NotFound(subject),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                StorageError::InvalidCid(subject)
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StorageError::Unauthorized {
                status: status.as_u16(),
            },
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
                StorageError::ProviderTimeout {
                    status: status.as_u16(),
                }
            }
            _ => {
                let body = response.text().await.unwrap_or_default();
                StorageError::Http(format!("provider responded {}: {}", status, body))
            }
        }
    }
}

#[async_trait]
impl StorageGateway for ThirdwebStorage {
    #[instrument(skip(self, data), fields(size = data.len()))]
    async fn upload(&self, data: &[u8]) -> Result<ContentId> {
        let credentials = self.credentials()?;

        let part = multipart::Part::bytes(data.to_vec())
            .file_name("0")
            .mime_str("application/json")
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        let form = multipart::Form::new()
            .part("file", part)
            .text("pinataOptions", r#"{"wrapWithDirectory":false}"#);

        let response = self
            .client
            .post(&self.config.upload_url)
            .header(SECRET_KEY_HEADER, &credentials.secret_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| StorageError::from_reqwest(e, self.config.timeout))?;

        if !response.status().is_success() {
            let err = self.error_for_status(response, None).await;
            tracing::error!(error = %err, "thirdweb upload failed");
            return Err(err);
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| StorageError::UnexpectedResponse(e.to_string()))?;

        tracing::debug!(cid = %body.ipfs_hash, "Uploaded to IPFS");

        ContentId::parse(body.ipfs_hash.clone()).map_err(|_| {
            StorageError::UnexpectedResponse(format!("provider returned hash {}", body.ipfs_hash))
        })
    }

    #[instrument(skip(self), fields(cid = %cid))]
    async fn download(&self, cid: &ContentId) -> Result<Bytes> {
        let credentials = self.credentials()?;
        let url = self.gateway_url(credentials, cid);

        let response = self
            .client
            .get(&url)
            .header(SECRET_KEY_HEADER, &credentials.secret_key)
            .send()
            .await
            .map_err(|e| StorageError::from_reqwest(e, self.config.timeout))?;

        if !response.status().is_success() {
            let err = self.error_for_status(response, Some(cid)).await;
            tracing::error!(error = %err, "IPFS download failed");
            return Err(err);
        }

        response
            .bytes()
            .await
            .map_err(|e| StorageError::from_reqwest(e, self.config.timeout))
    }

    async fn resolve_url(&self, cid: &ContentId) -> Result<String> {
        let credentials = self.credentials()?;
        Ok(self.gateway_url(credentials, cid))
    }
}

/// Response from the upload endpoint
#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    #[serde(rename = "IpfsHash")]
    pub ipfs_hash: String,
}
