use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use opticpos_core::{DomainResult, Entity, text};

opticpos_core::record_id!(
    /// Client identifier.
    ClientId,
    "ClientId"
);

/// Raw client fields as collected by a form.
///
/// Nothing here is trusted: strings may carry surrounding whitespace or be
/// blank. Use [`ClientDetails::from_input`] to validate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInput {
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// Pupillary distance note, e.g. "32mm / 31mm".
    pub pupillary_distance: Option<String>,
    /// Free-text prescription notes.
    pub prescription: Option<String>,
}

impl ClientInput {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Validated, normalized client fields (everything except identity and creation time).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientDetails {
    name: String,
    phone: Option<String>,
    address: Option<String>,
    pupillary_distance: Option<String>,
    prescription: Option<String>,
}

impl ClientDetails {
    /// Trim every field, turn blank optionals into `None` and require a name.
    pub fn from_input(input: &ClientInput) -> DomainResult<Self> {
        Ok(Self {
            name: text::required("name", &input.name)?,
            phone: text::optional(input.phone.as_deref()),
            address: text::optional(input.address.as_deref()),
            pupillary_distance: text::optional(input.pupillary_distance.as_deref()),
            prescription: text::optional(input.prescription.as_deref()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn pupillary_distance(&self) -> Option<&str> {
        self.pupillary_distance.as_deref()
    }

    pub fn prescription(&self) -> Option<&str> {
        self.prescription.as_deref()
    }
}

/// A registered client of the shop.
///
/// `id` and `created_at` never change; the details are overwritten in place
/// by updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    id: ClientId,
    #[serde(flatten)]
    details: ClientDetails,
    created_at: DateTime<Utc>,
}

impl Client {
    /// Rebuild a client from stored parts.
    pub fn from_parts(id: ClientId, details: ClientDetails, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            details,
            created_at,
        }
    }

    /// Validate a registration and build the record to persist.
    pub fn register(cmd: &RegisterClient) -> DomainResult<Self> {
        let details = ClientDetails::from_input(&cmd.input)?;
        Ok(Self::from_parts(cmd.client_id, details, cmd.occurred_at))
    }

    /// Return this client with its details replaced, keeping id and creation time.
    pub fn with_details(&self, details: ClientDetails) -> Self {
        Self {
            details,
            ..self.clone()
        }
    }

    pub fn id_typed(&self) -> ClientId {
        self.id
    }

    pub fn details(&self) -> &ClientDetails {
        &self.details
    }

    pub fn name(&self) -> &str {
        self.details.name()
    }

    pub fn phone(&self) -> Option<&str> {
        self.details.phone()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Entity for Client {
    type Id = ClientId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Command: RegisterClient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterClient {
    pub client_id: ClientId,
    pub input: ClientInput,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateClient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateClient {
    pub client_id: ClientId,
    pub input: ClientInput,
}

impl UpdateClient {
    /// Validate the replacement details; the id is checked by the store.
    pub fn details(&self) -> DomainResult<ClientDetails> {
        ClientDetails::from_input(&self.input)
    }
}
