//! Sales ledger domain module.
//!
//! Two kinds of append-only sale records live here: eyewear sales
//! ([`SaleGlasses`]) and miscellaneous maintenance/product sales
//! ([`SaleMaintenance`]), plus the denormalized purchase history row built
//! from them. Pure domain logic only (no IO, no storage).

#[macro_use]
mod vocabulary;

pub mod glasses;
pub mod history;
pub mod maintenance;
pub mod payment;

pub use glasses::{GlassesSaleInput, RecordGlassesSale, SaleGlasses};
pub use history::{PurchaseHistory, PurchaseRecord};
pub use maintenance::{
    MaintenanceItem, MiscItem, MiscSaleInput, MiscSaleKind, ProductItem, RecordMiscSale,
    SaleMaintenance,
};
pub use payment::{InstallmentPlan, PaymentMethod};

opticpos_core::record_id!(
    /// Sale identifier (shared by both ledger tables).
    SaleId,
    "SaleId"
);
