//! Eyewear sales.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use opticpos_clients::ClientId;
use opticpos_core::{Amount, DomainError, DomainResult, Entity};
use opticpos_inventory::{FrameId, LensId};

use crate::SaleId;
use crate::payment::{InstallmentPlan, PaymentMethod};

/// Raw glasses sale fields as collected by a form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlassesSaleInput {
    pub client_id: Option<ClientId>,
    pub frame_id: Option<FrameId>,
    pub lens_id: Option<LensId>,
    /// Calendar date of the sale; the recording date is used when absent.
    pub sale_date: Option<NaiveDate>,
    /// Decimal amount as typed, e.g. `"350.00"`.
    pub amount: String,
    /// Payment method label, e.g. `"Pix"`.
    pub payment_method: String,
    /// `"lump-sum"` (default when absent) or `"installments"`.
    pub installment_type: Option<String>,
    pub installment_count: Option<u32>,
}

/// Command: RecordGlassesSale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordGlassesSale {
    pub sale_id: SaleId,
    pub input: GlassesSaleInput,
    pub occurred_at: DateTime<Utc>,
}

/// An eyewear sale in the ledger. Immutable once recorded.
///
/// The client, frame and lens references are weak: they were valid when the
/// sale was recorded but may since have been removed, in which case they read
/// back as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleGlasses {
    pub id: SaleId,
    pub client_id: Option<ClientId>,
    pub frame_id: Option<FrameId>,
    pub lens_id: Option<LensId>,
    pub sale_date: NaiveDate,
    pub amount: Amount,
    pub payment_method: PaymentMethod,
    pub installments: InstallmentPlan,
    pub created_at: DateTime<Utc>,
}

impl SaleGlasses {
    /// Validate a sale and build the ledger row to persist.
    ///
    /// Client, frame, lens, amount and payment method are all required.
    pub fn record(cmd: &RecordGlassesSale) -> DomainResult<Self> {
        let input = &cmd.input;

        let client_id = input
            .client_id
            .ok_or_else(|| DomainError::validation("client is required"))?;
        let frame_id = input
            .frame_id
            .ok_or_else(|| DomainError::validation("frame is required"))?;
        let lens_id = input
            .lens_id
            .ok_or_else(|| DomainError::validation("lens is required"))?;

        let amount = Amount::parse(&input.amount)?;

        if input.payment_method.trim().is_empty() {
            return Err(DomainError::validation("payment method is required"));
        }
        let payment_method = PaymentMethod::parse(&input.payment_method)?;

        let installments = InstallmentPlan::from_parts(
            input.installment_type.as_deref(),
            input.installment_count,
        )?;

        Ok(Self {
            id: cmd.sale_id,
            client_id: Some(client_id),
            frame_id: Some(frame_id),
            lens_id: Some(lens_id),
            sale_date: input
                .sale_date
                .unwrap_or_else(|| cmd.occurred_at.date_naive()),
            amount,
            payment_method,
            installments,
            created_at: cmd.occurred_at,
        })
    }
}

impl Entity for SaleGlasses {
    type Id = SaleId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
