use chrono::Utc;
use tracing::debug;

use opticpos_clients::{Client, ClientId, ClientInput, RegisterClient, UpdateClient};

use super::error::ServiceError;
use crate::store::ClientStore;

/// Create, update and list client records.
///
/// In-memory filtering of a loaded list is [`opticpos_clients::search_clients`];
/// it needs no store access.
#[derive(Debug, Clone)]
pub struct ClientRegistry<S> {
    store: S,
}

impl<S> ClientRegistry<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S> ClientRegistry<S>
where
    S: ClientStore,
{
    /// Validate and persist a new client with a fresh id and the current time.
    pub async fn register_client(&self, input: ClientInput) -> Result<Client, ServiceError> {
        let cmd = RegisterClient {
            client_id: ClientId::generate(),
            input,
            occurred_at: Utc::now(),
        };
        let client = Client::register(&cmd)?;

        let stored = self.store.insert_client(&client).await?;
        debug!(client_id = %stored.id_typed(), "client registered");
        Ok(stored)
    }

    /// All clients ordered by name.
    pub async fn list_clients(&self) -> Result<Vec<Client>, ServiceError> {
        Ok(self.store.list_clients().await?)
    }

    pub async fn get_client(&self, id: ClientId) -> Result<Client, ServiceError> {
        self.store.get_client(id).await?.ok_or(ServiceError::NotFound)
    }

    /// Overwrite the details of an existing client.
    ///
    /// Fails with `ServiceError::NotFound` when no client has this id; the
    /// id and creation time are never changed.
    pub async fn update_client(&self, id: ClientId, input: ClientInput) -> Result<(), ServiceError> {
        let cmd = UpdateClient {
            client_id: id,
            input,
        };
        let details = cmd.details()?;

        self.store.update_client(cmd.client_id, &details).await?;
        debug!(client_id = %cmd.client_id, "client updated");
        Ok(())
    }
}
