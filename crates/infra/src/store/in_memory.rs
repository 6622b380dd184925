use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use opticpos_clients::{Client, ClientDetails, ClientId};
use opticpos_inventory::{FrameId, InventoryFrame, InventoryLens, LensId};
use opticpos_sales::{PurchaseRecord, SaleGlasses, SaleId, SaleMaintenance};

use super::r#trait::{CatalogStore, ClientStore, SalesStore, StoreError};

#[derive(Debug, Default)]
struct Tables {
    clients: HashMap<ClientId, Client>,
    frames: HashMap<FrameId, InventoryFrame>,
    lenses: HashMap<LensId, InventoryLens>,
    sales_glasses: HashMap<SaleId, SaleGlasses>,
    sales_maintenance: HashMap<SaleId, SaleMaintenance>,
}

/// In-memory relational store.
///
/// Intended for tests/dev. Mirrors the Postgres schema's behaviour: primary
/// keys are unique, sale references must exist at insert time, and removing a
/// catalog row or client nulls the references pointing at it.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))
    }

    /// Seed a catalog frame (the catalog is maintained outside the core).
    pub fn insert_frame(&self, frame: InventoryFrame) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        if tables.frames.contains_key(&frame.id_typed()) {
            return Err(duplicate("inventory_frames", frame.id_typed()));
        }
        tables.frames.insert(frame.id_typed(), frame);
        Ok(())
    }

    /// Seed a catalog lens.
    pub fn insert_lens(&self, lens: InventoryLens) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        if tables.lenses.contains_key(&lens.id_typed()) {
            return Err(duplicate("inventory_lenses", lens.id_typed()));
        }
        tables.lenses.insert(lens.id_typed(), lens);
        Ok(())
    }

    /// Remove a client; their sales keep existing with the client reference cleared.
    pub fn remove_client(&self, id: ClientId) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        tables.clients.remove(&id).ok_or(StoreError::NotFound)?;
        for sale in tables.sales_glasses.values_mut() {
            if sale.client_id == Some(id) {
                sale.client_id = None;
            }
        }
        Ok(())
    }

    /// Remove a frame; sales keep existing with their frame reference cleared.
    pub fn remove_frame(&self, id: FrameId) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        tables.frames.remove(&id).ok_or(StoreError::NotFound)?;
        for sale in tables.sales_glasses.values_mut() {
            if sale.frame_id == Some(id) {
                sale.frame_id = None;
            }
        }
        Ok(())
    }

    /// Remove a lens; sales keep existing with their lens reference cleared.
    pub fn remove_lens(&self, id: LensId) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        tables.lenses.remove(&id).ok_or(StoreError::NotFound)?;
        for sale in tables.sales_glasses.values_mut() {
            if sale.lens_id == Some(id) {
                sale.lens_id = None;
            }
        }
        Ok(())
    }

    /// Glasses sales currently stored, in no particular order.
    pub fn glasses_sales(&self) -> Result<Vec<SaleGlasses>, StoreError> {
        Ok(self.read()?.sales_glasses.values().cloned().collect())
    }
}

fn duplicate(table: &str, id: impl core::fmt::Display) -> StoreError {
    StoreError::Constraint(format!("duplicate key in {table}: {id}"))
}

fn missing_reference(column: &str, id: impl core::fmt::Display) -> StoreError {
    StoreError::Constraint(format!("foreign key violation on {column}: {id} does not exist"))
}

#[async_trait::async_trait]
impl ClientStore for InMemoryStore {
    async fn insert_client(&self, client: &Client) -> Result<Client, StoreError> {
        let mut tables = self.write()?;
        if tables.clients.contains_key(&client.id_typed()) {
            return Err(duplicate("clients", client.id_typed()));
        }
        tables.clients.insert(client.id_typed(), client.clone());
        Ok(client.clone())
    }

    async fn update_client(&self, id: ClientId, details: &ClientDetails) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        let stored = tables.clients.get_mut(&id).ok_or(StoreError::NotFound)?;
        *stored = stored.with_details(details.clone());
        Ok(())
    }

    async fn get_client(&self, id: ClientId) -> Result<Option<Client>, StoreError> {
        Ok(self.read()?.clients.get(&id).cloned())
    }

    async fn list_clients(&self) -> Result<Vec<Client>, StoreError> {
        let mut clients: Vec<Client> = self.read()?.clients.values().cloned().collect();
        // Byte-wise comparison, like a "C" collation; id keeps equal names stable.
        clients.sort_by(|a, b| {
            a.name()
                .cmp(b.name())
                .then_with(|| a.id_typed().cmp(&b.id_typed()))
        });
        Ok(clients)
    }
}

#[async_trait::async_trait]
impl CatalogStore for InMemoryStore {
    async fn list_frames(&self) -> Result<Vec<InventoryFrame>, StoreError> {
        let mut frames: Vec<InventoryFrame> = self.read()?.frames.values().cloned().collect();
        frames.sort_by(|a, b| a.name().cmp(b.name()).then_with(|| a.id_typed().cmp(&b.id_typed())));
        Ok(frames)
    }

    async fn list_lenses(&self) -> Result<Vec<InventoryLens>, StoreError> {
        let mut lenses: Vec<InventoryLens> = self.read()?.lenses.values().cloned().collect();
        lenses.sort_by(|a, b| {
            a.product_code()
                .cmp(b.product_code())
                .then_with(|| a.id_typed().cmp(&b.id_typed()))
        });
        Ok(lenses)
    }
}

#[async_trait::async_trait]
impl SalesStore for InMemoryStore {
    async fn insert_glasses_sale(&self, sale: &SaleGlasses) -> Result<SaleGlasses, StoreError> {
        let mut tables = self.write()?;

        if tables.sales_glasses.contains_key(&sale.id)
            || tables.sales_maintenance.contains_key(&sale.id)
        {
            return Err(duplicate("sales_glasses", sale.id));
        }
        if let Some(id) = sale.client_id {
            if !tables.clients.contains_key(&id) {
                return Err(missing_reference("client_id", id));
            }
        }
        if let Some(id) = sale.frame_id {
            if !tables.frames.contains_key(&id) {
                return Err(missing_reference("frame_id", id));
            }
        }
        if let Some(id) = sale.lens_id {
            if !tables.lenses.contains_key(&id) {
                return Err(missing_reference("lens_id", id));
            }
        }

        tables.sales_glasses.insert(sale.id, sale.clone());
        Ok(sale.clone())
    }

    async fn insert_misc_sale(&self, sale: &SaleMaintenance) -> Result<SaleMaintenance, StoreError> {
        let mut tables = self.write()?;
        if tables.sales_maintenance.contains_key(&sale.id)
            || tables.sales_glasses.contains_key(&sale.id)
        {
            return Err(duplicate("sales_maintenance", sale.id));
        }
        tables.sales_maintenance.insert(sale.id, sale.clone());
        Ok(sale.clone())
    }

    async fn list_misc_sales(&self) -> Result<Vec<SaleMaintenance>, StoreError> {
        let mut sales: Vec<SaleMaintenance> =
            self.read()?.sales_maintenance.values().cloned().collect();
        sales.sort_by(|a, b| b.sale_date.cmp(&a.sale_date).then_with(|| b.id.cmp(&a.id)));
        Ok(sales)
    }

    async fn purchase_history(&self, client_id: ClientId) -> Result<Vec<PurchaseRecord>, StoreError> {
        let tables = self.read()?;

        let mut records: Vec<PurchaseRecord> = tables
            .sales_glasses
            .values()
            .filter(|sale| sale.client_id == Some(client_id))
            .map(|sale| {
                let frame = sale.frame_id.and_then(|id| tables.frames.get(&id));
                let lens = sale.lens_id.and_then(|id| tables.lenses.get(&id));
                PurchaseRecord::from_sale(sale, frame, lens)
            })
            .collect();

        records.sort_by(PurchaseRecord::newest_first);
        Ok(records)
    }
}
