//! Backend selection made once at startup

use crate::{ContentId, MemoryStorage, Result, StorageGateway, ThirdwebStorage};
use async_trait::async_trait;
use bytes::Bytes;

/// Either the thirdweb client or the in-memory store
#[derive(Clone)]
pub enum FlexibleStorage {
    /// thirdweb IPFS (persistent)
    Thirdweb(ThirdwebStorage),
    /// In-memory (development only)
    Memory(MemoryStorage),
}

impl FlexibleStorage {
    /// Short name for logs
    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Thirdweb(_) => "thirdweb",
            Self::Memory(_) => "memory",
        }
    }
}

#[async_trait]
impl StorageGateway for FlexibleStorage {
    async fn upload(&self, data: &[u8]) -> Result<ContentId> {
        match self {
            Self::Thirdweb(s) => s.upload(data).await,
            Self::Memory(s) => s.upload(data).await,
        }
    }

    async fn download(&self, cid: &ContentId) -> Result<Bytes> {
        match self {
            Self::Thirdweb(s) => s.download(cid).await,
            Self::Memory(s) => s.download(cid).await,
        }
    }

    async fn resolve_url(&self, cid: &ContentId) -> Result<String> {
        match self {
            Self::Thirdweb(s) => s.resolve_url(cid).await,
            Self::Memory(s) => s.resolve_url(cid).await,
        }
    }

    fn is_persistent(&self) -> bool {
        match self {
            Self::Thirdweb(s) => s.is_persistent(),
            Self::Memory(s) => s.is_persistent(),
        }
    }
}
