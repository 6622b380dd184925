use std::sync::Arc;

use thiserror::Error;

use opticpos_clients::{Client, ClientDetails, ClientId};
use opticpos_inventory::{InventoryFrame, InventoryLens};
use opticpos_sales::{PurchaseRecord, SaleGlasses, SaleMaintenance};

/// Store operation error.
///
/// These are **infrastructure errors** as opposed to domain errors
/// (validation, invariants). Backends must keep the three cases apart so
/// callers can tell a missing row from a rejected write from an outage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The targeted row does not exist.
    #[error("record not found")]
    NotFound,

    /// The store rejected the write (foreign key, unique or check constraint).
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// Anything else: connectivity, pool exhaustion, undecodable rows.
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Client table access.
///
/// Every method is a single statement against the store; dropping the
/// returned future cancels the call the same way the backend does.
#[async_trait::async_trait]
pub trait ClientStore: Send + Sync {
    /// Insert a new client row and return it as stored.
    async fn insert_client(&self, client: &Client) -> Result<Client, StoreError>;

    /// Overwrite the mutable fields of an existing client.
    ///
    /// Returns `StoreError::NotFound` if no row has this id.
    async fn update_client(&self, id: ClientId, details: &ClientDetails) -> Result<(), StoreError>;

    async fn get_client(&self, id: ClientId) -> Result<Option<Client>, StoreError>;

    /// All clients ordered by name, ascending, in the store's collation.
    async fn list_clients(&self) -> Result<Vec<Client>, StoreError>;
}

/// Read-only catalog access.
#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    /// All frames ordered by name.
    async fn list_frames(&self) -> Result<Vec<InventoryFrame>, StoreError>;

    /// All lenses ordered by product code.
    async fn list_lenses(&self) -> Result<Vec<InventoryLens>, StoreError>;
}

/// Append-only sales ledger access.
#[async_trait::async_trait]
pub trait SalesStore: Send + Sync {
    /// Insert a glasses sale.
    ///
    /// References that do not exist at insert time are rejected with
    /// `StoreError::Constraint`.
    async fn insert_glasses_sale(&self, sale: &SaleGlasses) -> Result<SaleGlasses, StoreError>;

    async fn insert_misc_sale(&self, sale: &SaleMaintenance) -> Result<SaleMaintenance, StoreError>;

    /// Miscellaneous sales, most recent sale date first (ties by newest id).
    async fn list_misc_sales(&self) -> Result<Vec<SaleMaintenance>, StoreError>;

    /// Glasses sales of one client left-joined with frame and lens.
    ///
    /// Ordered most recent sale date first, ties by newest sale id. A missing
    /// catalog row yields `None` in the joined column, never an error.
    async fn purchase_history(&self, client_id: ClientId) -> Result<Vec<PurchaseRecord>, StoreError>;
}

#[async_trait::async_trait]
impl<S> ClientStore for Arc<S>
where
    S: ClientStore + ?Sized,
{
    async fn insert_client(&self, client: &Client) -> Result<Client, StoreError> {
        (**self).insert_client(client).await
    }

    async fn update_client(&self, id: ClientId, details: &ClientDetails) -> Result<(), StoreError> {
        (**self).update_client(id, details).await
    }

    async fn get_client(&self, id: ClientId) -> Result<Option<Client>, StoreError> {
        (**self).get_client(id).await
    }

    async fn list_clients(&self) -> Result<Vec<Client>, StoreError> {
        (**self).list_clients().await
    }
}

#[async_trait::async_trait]
impl<S> CatalogStore for Arc<S>
where
    S: CatalogStore + ?Sized,
{
    async fn list_frames(&self) -> Result<Vec<InventoryFrame>, StoreError> {
        (**self).list_frames().await
    }

    async fn list_lenses(&self) -> Result<Vec<InventoryLens>, StoreError> {
        (**self).list_lenses().await
    }
}

#[async_trait::async_trait]
impl<S> SalesStore for Arc<S>
where
    S: SalesStore + ?Sized,
{
    async fn insert_glasses_sale(&self, sale: &SaleGlasses) -> Result<SaleGlasses, StoreError> {
        (**self).insert_glasses_sale(sale).await
    }

    async fn insert_misc_sale(&self, sale: &SaleMaintenance) -> Result<SaleMaintenance, StoreError> {
        (**self).insert_misc_sale(sale).await
    }

    async fn list_misc_sales(&self) -> Result<Vec<SaleMaintenance>, StoreError> {
        (**self).list_misc_sales().await
    }

    async fn purchase_history(&self, client_id: ClientId) -> Result<Vec<PurchaseRecord>, StoreError> {
        (**self).purchase_history(client_id).await
    }
}
