//! Miscellaneous sales: frame maintenance services and small products.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use opticpos_core::{Amount, DomainError, DomainResult, Entity};

use crate::SaleId;

vocabulary! {
    /// Kind of miscellaneous sale.
    pub enum MiscSaleKind ("sale type") {
        Maintenance => "maintenance",
        Product => "product",
    }
}

vocabulary! {
    /// Maintenance services performed on a customer's frame.
    pub enum MaintenanceItem ("maintenance item") {
        NosePads => "Plaquetas",
        Screw => "Parafuso",
        Spring => "Mola",
        Hinge => "Charneira",
        Solder => "Solda",
    }
}

vocabulary! {
    /// Small products sold over the counter.
    pub enum ProductItem ("product item") {
        Photocopy => "Xerox",
        MagicCloth => "Pano Mágico",
        LensCleaner => "Limpa lentes",
    }
}

impl MiscSaleKind {
    /// Labels accepted as item detail for this kind.
    pub fn item_labels(self) -> Vec<&'static str> {
        match self {
            Self::Maintenance => MaintenanceItem::ALL.iter().map(|i| i.as_str()).collect(),
            Self::Product => ProductItem::ALL.iter().map(|i| i.as_str()).collect(),
        }
    }
}

/// The item sold, tied to its kind so a product can never be filed as maintenance.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "item_detail", rename_all = "lowercase")]
pub enum MiscItem {
    Maintenance(MaintenanceItem),
    Product(ProductItem),
}

impl MiscItem {
    /// Resolve an item label within the vocabulary of `kind`.
    pub fn parse(kind: MiscSaleKind, item_detail: &str) -> DomainResult<Self> {
        match kind {
            MiscSaleKind::Maintenance => MaintenanceItem::parse(item_detail).map(Self::Maintenance),
            MiscSaleKind::Product => ProductItem::parse(item_detail).map(Self::Product),
        }
    }

    pub fn kind(&self) -> MiscSaleKind {
        match self {
            Self::Maintenance(_) => MiscSaleKind::Maintenance,
            Self::Product(_) => MiscSaleKind::Product,
        }
    }

    pub fn item_detail(&self) -> &'static str {
        match self {
            Self::Maintenance(item) => item.as_str(),
            Self::Product(item) => item.as_str(),
        }
    }
}

/// Raw miscellaneous sale fields as collected by a form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiscSaleInput {
    /// `"maintenance"` or `"product"`.
    pub kind: String,
    pub item_detail: String,
    pub sale_date: Option<NaiveDate>,
    pub amount: String,
}

/// Command: RecordMiscSale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMiscSale {
    pub sale_id: SaleId,
    pub input: MiscSaleInput,
    pub occurred_at: DateTime<Utc>,
}

/// A maintenance or product sale in the ledger. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleMaintenance {
    pub id: SaleId,
    #[serde(flatten)]
    pub item: MiscItem,
    pub sale_date: NaiveDate,
    pub amount: Amount,
    pub created_at: DateTime<Utc>,
}

impl SaleMaintenance {
    /// Validate a sale and build the ledger row to persist.
    pub fn record(cmd: &RecordMiscSale) -> DomainResult<Self> {
        let input = &cmd.input;

        if input.kind.trim().is_empty() {
            return Err(DomainError::validation("sale type is required"));
        }
        let kind = MiscSaleKind::parse(&input.kind)?;

        if input.item_detail.trim().is_empty() {
            return Err(DomainError::validation("item detail is required"));
        }
        let item = MiscItem::parse(kind, &input.item_detail)?;

        let amount = Amount::parse(&input.amount)?;

        Ok(Self {
            id: cmd.sale_id,
            item,
            sale_date: input
                .sale_date
                .unwrap_or_else(|| cmd.occurred_at.date_naive()),
            amount,
            created_at: cmd.occurred_at,
        })
    }

    pub fn kind(&self) -> MiscSaleKind {
        self.item.kind()
    }

    pub fn item_detail(&self) -> &'static str {
        self.item.item_detail()
    }
}

impl Entity for SaleMaintenance {
    type Id = SaleId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
