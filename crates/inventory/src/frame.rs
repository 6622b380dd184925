use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use opticpos_core::{DomainResult, Entity, text};

opticpos_core::record_id!(
    /// Frame identifier.
    FrameId,
    "FrameId"
);

/// A spectacle frame model offered by the shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryFrame {
    id: FrameId,
    name: String,
    code: Option<String>,
    created_at: DateTime<Utc>,
}

impl InventoryFrame {
    /// Build a catalog frame; `name` is required, a blank `code` is dropped.
    pub fn new(
        id: FrameId,
        name: &str,
        code: Option<&str>,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        Ok(Self {
            id,
            name: text::required("frame name", name)?,
            code: text::optional(code),
            created_at,
        })
    }

    pub fn id_typed(&self) -> FrameId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Picker label: `"name (code)"`, or just the name when there is no code.
    pub fn display_label(&self) -> String {
        match &self.code {
            Some(code) => format!("{} ({})", self.name, code),
            None => self.name.clone(),
        }
    }
}

impl Entity for InventoryFrame {
    type Id = FrameId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opticpos_core::DomainError;

    #[test]
    fn new_frame_trims_name_and_code() {
        let frame = InventoryFrame::new(FrameId::generate(), " Aviator ", Some(" RB3025 "), Utc::now())
            .unwrap();
        assert_eq!(frame.name(), "Aviator");
        assert_eq!(frame.code(), Some("RB3025"));
        assert_eq!(frame.display_label(), "Aviator (RB3025)");
    }

    #[test]
    fn frame_without_code_is_labelled_by_name() {
        let frame = InventoryFrame::new(FrameId::generate(), "Wayfarer", Some(""), Utc::now()).unwrap();
        assert_eq!(frame.code(), None);
        assert_eq!(frame.display_label(), "Wayfarer");
    }

    #[test]
    fn frame_requires_name() {
        let err = InventoryFrame::new(FrameId::generate(), "  ", None, Utc::now()).unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            _ => panic!("Expected Validation error for empty frame name"),
        }
    }
}
