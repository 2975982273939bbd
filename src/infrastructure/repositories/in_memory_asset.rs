use crate::application::ports::{AssetReader, AssetWriter};
use crate::domain::entities::Asset;
use crate::domain::value_objects::AssetId;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// In-memory asset registry
///
/// Thread-safe storage for listed assets using DashMap.
pub struct InMemoryAssetRepository {
    assets: Arc<DashMap<AssetId, Asset>>,
}

impl InMemoryAssetRepository {
    pub fn new() -> Self {
        Self {
            assets: Arc::new(DashMap::new()),
        }
    }
}

impl Default for InMemoryAssetRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for InMemoryAssetRepository {
    fn clone(&self) -> Self {
        Self {
            assets: Arc::clone(&self.assets),
        }
    }
}

#[async_trait]
impl AssetReader for InMemoryAssetRepository {
    async fn get(&self, id: &AssetId) -> Option<Asset> {
        self.assets.get(id).map(|a| a.value().clone())
    }

    async fn get_all(&self) -> Vec<Asset> {
        self.assets.iter().map(|e| e.value().clone()).collect()
    }
}

#[async_trait]
impl AssetWriter for InMemoryAssetRepository {
    async fn save(&self, asset: Asset) {
        self.assets.insert(asset.id.clone(), asset);
    }
}
