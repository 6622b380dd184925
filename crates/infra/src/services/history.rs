use tracing::debug;

use opticpos_clients::ClientId;
use opticpos_sales::PurchaseHistory;

use super::error::ServiceError;
use crate::store::SalesStore;

/// Builds a client's purchase history from the sales ledger and catalog.
#[derive(Debug, Clone)]
pub struct HistoryAggregator<S> {
    store: S,
}

impl<S> HistoryAggregator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S> HistoryAggregator<S>
where
    S: SalesStore,
{
    /// Glasses sales of `client_id`, most recent sale date first.
    ///
    /// An unknown client or a client without sales yields an empty history.
    /// Frames and lenses that no longer exist show up as `None`.
    pub async fn get_purchase_history(&self, client_id: ClientId) -> Result<PurchaseHistory, ServiceError> {
        let records = self.store.purchase_history(client_id).await?;
        debug!(client_id = %client_id, records = records.len(), "purchase history loaded");
        Ok(PurchaseHistory::new(records))
    }
}
