use chrono::Utc;
use tracing::debug;

use opticpos_sales::{
    GlassesSaleInput, MiscSaleInput, RecordGlassesSale, RecordMiscSale, SaleGlasses, SaleId,
    SaleMaintenance,
};

use super::error::ServiceError;
use crate::store::SalesStore;

/// Records glasses and miscellaneous sales.
///
/// Each sale is a single-row insert; nothing else is mutated, so no
/// transaction spans more than that row.
#[derive(Debug, Clone)]
pub struct SalesLedger<S> {
    store: S,
}

impl<S> SalesLedger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S> SalesLedger<S>
where
    S: SalesStore,
{
    /// Validate and persist an eyewear sale.
    ///
    /// The sale date defaults to today (UTC) when the input leaves it empty.
    pub async fn record_glasses_sale(&self, input: GlassesSaleInput) -> Result<SaleGlasses, ServiceError> {
        let cmd = RecordGlassesSale {
            sale_id: SaleId::generate(),
            input,
            occurred_at: Utc::now(),
        };
        let sale = SaleGlasses::record(&cmd)?;

        let stored = self.store.insert_glasses_sale(&sale).await?;
        debug!(
            sale_id = %stored.id,
            payment_method = %stored.payment_method,
            installment_count = stored.installments.installment_count(),
            "glasses sale recorded"
        );
        Ok(stored)
    }

    /// Validate and persist a maintenance or product sale.
    pub async fn record_misc_sale(&self, input: MiscSaleInput) -> Result<SaleMaintenance, ServiceError> {
        let cmd = RecordMiscSale {
            sale_id: SaleId::generate(),
            input,
            occurred_at: Utc::now(),
        };
        let sale = SaleMaintenance::record(&cmd)?;

        let stored = self.store.insert_misc_sale(&sale).await?;
        debug!(sale_id = %stored.id, kind = %stored.kind(), item = stored.item_detail(), "misc sale recorded");
        Ok(stored)
    }

    /// Miscellaneous sales, most recent first.
    pub async fn list_misc_sales(&self) -> Result<Vec<SaleMaintenance>, ServiceError> {
        Ok(self.store.list_misc_sales().await?)
    }
}
