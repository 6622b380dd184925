use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use opticpos_core::{DomainResult, Entity, text};

opticpos_core::record_id!(
    /// Lens identifier.
    LensId,
    "LensId"
);

/// A lens product offered by the shop, identified for display by its product code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryLens {
    id: LensId,
    product_code: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

impl InventoryLens {
    pub fn new(
        id: LensId,
        product_code: &str,
        description: Option<&str>,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        Ok(Self {
            id,
            product_code: text::required("product code", product_code)?,
            description: text::optional(description),
            created_at,
        })
    }

    pub fn id_typed(&self) -> LensId {
        self.id
    }

    pub fn product_code(&self) -> &str {
        &self.product_code
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Picker label: `"code - description"`, or just the code.
    pub fn display_label(&self) -> String {
        match &self.description {
            Some(description) => format!("{} - {}", self.product_code, description),
            None => self.product_code.clone(),
        }
    }
}

impl Entity for InventoryLens {
    type Id = LensId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
