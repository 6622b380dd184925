//! Per-client purchase history view.

use core::cmp::Ordering;
use core::iter::FusedIterator;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use opticpos_core::Amount;
use opticpos_inventory::{InventoryFrame, InventoryLens};

use crate::SaleId;
use crate::glasses::SaleGlasses;
use crate::payment::{InstallmentPlan, PaymentMethod};

/// One glasses sale joined with the catalog names it refers to.
///
/// `frame_name` / `lens_product_code` are `None` when the sale has no
/// reference or the referenced catalog entry no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    pub sale_id: SaleId,
    pub sale_date: NaiveDate,
    pub amount: Amount,
    pub payment_method: PaymentMethod,
    pub installments: InstallmentPlan,
    pub frame_name: Option<String>,
    pub lens_product_code: Option<String>,
}

impl PurchaseRecord {
    /// Left-outer join of one sale with its (possibly missing) frame and lens.
    pub fn from_sale(
        sale: &SaleGlasses,
        frame: Option<&InventoryFrame>,
        lens: Option<&InventoryLens>,
    ) -> Self {
        Self {
            sale_id: sale.id,
            sale_date: sale.sale_date,
            amount: sale.amount,
            payment_method: sale.payment_method,
            installments: sale.installments,
            frame_name: frame.map(|f| f.name().to_string()),
            lens_product_code: lens.map(|l| l.product_code().to_string()),
        }
    }

    /// History order: most recent sale date first, ties by newest sale id.
    pub fn newest_first(a: &Self, b: &Self) -> Ordering {
        b.sale_date
            .cmp(&a.sale_date)
            .then_with(|| b.sale_id.cmp(&a.sale_id))
    }
}

/// A client's purchase history, most recent first.
///
/// Finite and consumed once; ask the aggregator again for a fresh copy.
#[derive(Debug)]
pub struct PurchaseHistory {
    records: std::vec::IntoIter<PurchaseRecord>,
}

impl PurchaseHistory {
    /// Wrap records that are already in history order.
    pub fn new(records: Vec<PurchaseRecord>) -> Self {
        Self {
            records: records.into_iter(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

impl Iterator for PurchaseHistory {
    type Item = PurchaseRecord;

    fn next(&mut self) -> Option<Self::Item> {
        self.records.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.records.size_hint()
    }
}

impl ExactSizeIterator for PurchaseHistory {}

impl FusedIterator for PurchaseHistory {}
