//! Port for the asset registry.

use async_trait::async_trait;

use crate::domain::entities::Asset;
use crate::domain::value_objects::AssetId;

/// Read operations for listed assets
#[async_trait]
pub trait AssetReader: Send + Sync {
    /// Get an asset by id
    async fn get(&self, id: &AssetId) -> Option<Asset>;

    /// All listed assets
    async fn get_all(&self) -> Vec<Asset>;

    async fn exists(&self, id: &AssetId) -> bool {
        self.get(id).await.is_some()
    }
}

/// Write operations for listed assets
#[async_trait]
pub trait AssetWriter: Send + Sync {
    /// Save an asset (insert or replace)
    async fn save(&self, asset: Asset);
}

/// Combined repository trait
#[async_trait]
pub trait AssetRepository: AssetReader + AssetWriter {}

// Blanket implementation
impl<T: AssetReader + AssetWriter> AssetRepository for T {}
