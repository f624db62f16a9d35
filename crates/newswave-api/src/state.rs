//! Application state

use crate::config::ApiConfig;
use newswave_storage::{
    FlexibleStorage, MemoryStorage, StorageGateway, ThirdwebConfig, ThirdwebStorage,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Application state shared across handlers
pub struct AppState {
    /// API configuration
    pub config: ApiConfig,
    /// Storage gateway, built once per process
    pub storage: Arc<dyn StorageGateway>,
}

impl AppState {
    /// Create a new application state with the backend the config selects
    pub fn new(config: ApiConfig) -> anyhow::Result<Self> {
        let storage = if config.use_memory_store {
            info!("Using in-memory storage (data will not persist)");
            FlexibleStorage::Memory(MemoryStorage::new())
        } else {
            FlexibleStorage::Thirdweb(Self::create_thirdweb_store(&config)?)
        };

        if storage.is_persistent() {
            info!("✓ Storage backend: {} (persistent)", storage.backend_name());
        } else {
            warn!("⚠ Storage backend: {} (NOT persistent - for development only)", storage.backend_name());
        }

        if !config.is_storage_configured() {
            warn!("THIRDWEB_SECRET_KEY is not set; storage requests will be rejected");
        }

        Ok(Self::with_storage(config, Arc::new(storage)))
    }

    /// Create state around an existing gateway
    pub fn with_storage(config: ApiConfig, storage: Arc<dyn StorageGateway>) -> Self {
        Self { config, storage }
    }

    fn create_thirdweb_store(config: &ApiConfig) -> anyhow::Result<ThirdwebStorage> {
        let mut thirdweb = ThirdwebConfig::default()
            .with_upload_url(&config.upload_url)
            .with_gateway_template(&config.gateway_template)
            .with_timeout(Duration::from_secs(config.request_timeout_secs));
        thirdweb.secret_key = config.secret_key.clone();

        let store = ThirdwebStorage::new(thirdweb)?;
        if let Some(client_id) = store.client_id() {
            info!(client_id = %client_id, "thirdweb storage configured");
        }
        Ok(store)
    }
}
