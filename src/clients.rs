// Client repository: registered clients and their shipment ledgers
// Built once at startup and handed to whoever needs client lookup.

use dashmap::{
    mapref::{entry::Entry, one::RefMut},
    DashMap,
};
use serde::Serialize;
use tracing::info;

use crate::{
    cargo::{Cargo, ClientId, SharedCargo},
    error::{DispatchError, Result},
    ledger::ShipmentLedger,
};

#[derive(Debug)]
pub struct Client {
    id: ClientId,
    name: String,
    surname: String,
    ledger: ShipmentLedger,
}

impl Client {
    pub fn new(id: ClientId, name: impl Into<String>, surname: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            surname: surname.into(),
            ledger: ShipmentLedger::new(),
        }
    }

    pub fn id(&self) -> ClientId {
        self.id
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }

    pub fn ledger(&self) -> &ShipmentLedger {
        &self.ledger
    }

    pub fn record(&mut self, cargo: SharedCargo) {
        self.ledger.record(cargo);
    }

    pub fn profile(&self) -> ClientProfile {
        ClientProfile {
            id: self.id,
            name: self.name.clone(),
            surname: self.surname.clone(),
            shipments: self.ledger.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientProfile {
    pub id: ClientId,
    pub name: String,
    pub surname: String,
    pub shipments: usize,
}

#[derive(Debug, Default)]
pub struct ClientRepository {
    clients: DashMap<ClientId, Client>,
}

impl ClientRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &self,
        id: ClientId,
        name: impl Into<String>,
        surname: impl Into<String>,
    ) -> Result<ClientProfile> {
        match self.clients.entry(id) {
            Entry::Occupied(_) => Err(DispatchError::DuplicateClient(id)),
            Entry::Vacant(slot) => {
                let client = slot.insert(Client::new(id, name, surname));
                info!(client = %id, name = %client.full_name(), "client registered");
                Ok(client.profile())
            }
        }
    }

    pub fn login(&self, id: ClientId) -> Result<ClientProfile> {
        self.clients
            .get(&id)
            .map(|c| c.profile())
            .ok_or(DispatchError::ClientNotFound(id))
    }

    pub fn contains(&self, id: ClientId) -> bool {
        self.clients.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    // Holds the client's shard lock until the guard is dropped
    pub(crate) fn client_mut(&self, id: ClientId) -> Result<RefMut<'_, ClientId, Client>> {
        self.clients
            .get_mut(&id)
            .ok_or(DispatchError::ClientNotFound(id))
    }

    pub fn with_ledger<R>(&self, id: ClientId, f: impl FnOnce(&ShipmentLedger) -> R) -> Result<R> {
        self.clients
            .get(&id)
            .map(|c| f(c.ledger()))
            .ok_or(DispatchError::ClientNotFound(id))
    }

    pub fn history(&self, id: ClientId) -> Result<Vec<Cargo>> {
        self.with_ledger(id, ShipmentLedger::all)
    }
}
