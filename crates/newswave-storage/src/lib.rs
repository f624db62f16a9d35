//! # NewsWave Storage
//!
//! IPFS storage layer for the NewsWave backend.
//!
//! This crate provides:
//! - **CID validation**: Shape checks for identifiers received over HTTP
//! - **Storage gateway**: Upload, download and gateway resolution behind one trait
//! - **thirdweb client**: HTTP client for thirdweb's IPFS upload and gateway endpoints
//! - **Memory store**: Content-addressed in-process store for development
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              newswave-api               │
//! ├─────────────────────────────────────────┤
//! │          StorageGateway Trait           │
//! ├────────────────────┬────────────────────┤
//! │  ThirdwebStorage   │   MemoryStorage    │
//! ├────────────────────┴────────────────────┤
//! │      thirdweb IPFS upload + gateway     │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use newswave_storage::{StorageGateway, ThirdwebConfig, ThirdwebStorage};
//!
//! let storage = ThirdwebStorage::new(ThirdwebConfig::with_secret_key(key))?;
//! let cid = storage.upload(br#"{"title":"hello"}"#).await?;
//! let url = storage.resolve_url(&cid).await?;
//! ```

pub mod cid_utils;
pub mod error;
pub mod flexible;
pub mod memory;
pub mod thirdweb;

pub use cid_utils::{create_cid, is_valid_cid, ContentId, EXPECTED_CID_FORMAT};
pub use error::{Result, StorageError};
pub use flexible::FlexibleStorage;
pub use memory::MemoryStorage;
pub use thirdweb::{ThirdwebConfig, ThirdwebStorage};

use async_trait::async_trait;
use bytes::Bytes;

/// Operations the API needs from a storage provider.
///
/// Implementations must be safe to share across concurrent requests and must
/// not cache responses locally.
#[async_trait]
pub trait StorageGateway: Send + Sync {
    /// Store bytes and return the identifier the provider assigned
    async fn upload(&self, data: &[u8]) -> Result<ContentId>;

    /// Retrieve the bytes stored under `cid`
    async fn download(&self, cid: &ContentId) -> Result<Bytes>;

    /// Resolve an HTTP gateway URL for `cid`
    async fn resolve_url(&self, cid: &ContentId) -> Result<String>;

    /// Whether stored content survives a process restart
    fn is_persistent(&self) -> bool {
        true
    }
}
