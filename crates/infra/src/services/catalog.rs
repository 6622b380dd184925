use opticpos_inventory::{InventoryFrame, InventoryLens};

use super::error::ServiceError;
use crate::store::CatalogStore;

/// Read access to the frame and lens catalog, for sale pickers.
#[derive(Debug, Clone)]
pub struct CatalogReader<S> {
    store: S,
}

impl<S> CatalogReader<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S> CatalogReader<S>
where
    S: CatalogStore,
{
    /// Frames ordered by name.
    pub async fn list_frames(&self) -> Result<Vec<InventoryFrame>, ServiceError> {
        Ok(self.store.list_frames().await?)
    }

    /// Lenses ordered by product code.
    pub async fn list_lenses(&self) -> Result<Vec<InventoryLens>, ServiceError> {
        Ok(self.store.list_lenses().await?)
    }
}
