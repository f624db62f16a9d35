//! In-memory storage for development and tests

use crate::cid_utils::create_cid;
use crate::{ContentId, Result, StorageError, StorageGateway};
use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use std::sync::Arc;

/// Default public gateway used to render URLs for in-memory content
pub const DEFAULT_MEMORY_GATEWAY: &str = "https://ipfs.io";

/// A content-addressed in-memory store
#[derive(Clone)]
pub struct MemoryStorage {
    objects: Arc<DashMap<ContentId, Bytes>>,
    gateway_base: String,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStorage {
    /// Create a new empty memory store
    pub fn new() -> Self {
        Self::with_gateway(DEFAULT_MEMORY_GATEWAY)
    }

    /// Create a store whose gateway URLs point at `gateway_base`
    pub fn with_gateway(gateway_base: impl Into<String>) -> Self {
        Self {
            objects: Arc::new(DashMap::new()),
            gateway_base: gateway_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Get the number of objects stored
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[async_trait]
impl StorageGateway for MemoryStorage {
    async fn upload(&self, data: &[u8]) -> Result<ContentId> {
        let cid = ContentId::from(create_cid(data));
        self.objects
            .entry(cid.clone())
            .or_insert_with(|| Bytes::copy_from_slice(data));
        Ok(cid)
    }

    async fn download(&self, cid: &ContentId) -> Result<Bytes> {
        self.objects
            .get(cid)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StorageError::NotFound(cid.to_string()))
    }

    async fn resolve_url(&self, cid: &ContentId) -> Result<String> {
        Ok(format!("{}/ipfs/{}", self.gateway_base, cid))
    }

    fn is_persistent(&self) -> bool {
        false
    }
}
