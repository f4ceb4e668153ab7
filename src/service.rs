// Cargo Service: ties the depot network, the dispatch queue and the client
// ledgers together behind one write guard

use std::{collections::HashMap, sync::Arc};

use parking_lot::RwLock;
use tracing::{info, warn};

use crate::{
    boundary::CreateCargoRequest,
    cargo::{snapshot, Cargo, CargoId, CityId, ClientId, SharedCargo, Status},
    city_network::{CityNetwork, CitySummary},
    clients::ClientRepository,
    config::{ServiceConfig, DEFAULT_RECENT_LIMIT},
    dispatch_queue::DispatchQueue,
    error::{DispatchError, Result},
    search::{filter_delivered, filter_undelivered, find_by_id, sort_by_id},
};

#[derive(Debug)]
struct Depots {
    network: CityNetwork,
    queue: DispatchQueue,
    // Every cargo ever created, keyed by its (unique) id
    cargo: HashMap<CargoId, SharedCargo>,
}

#[derive(Debug)]
pub struct CargoService {
    depots: RwLock<Depots>,
    clients: Arc<ClientRepository>,
    recent_limit: usize,
}

impl CargoService {
    pub fn new(network: CityNetwork, clients: Arc<ClientRepository>) -> Self {
        Self {
            depots: RwLock::new(Depots {
                network,
                queue: DispatchQueue::new(),
                cargo: HashMap::new(),
            }),
            clients,
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }

    pub fn from_config(config: &ServiceConfig, clients: Arc<ClientRepository>) -> Result<Self> {
        let network = CityNetwork::from_config(&config.network)?;
        Ok(Self {
            recent_limit: config.recent_limit,
            ..Self::new(network, clients)
        })
    }

    pub fn clients(&self) -> &Arc<ClientRepository> {
        &self.clients
    }

    pub fn recent_limit(&self) -> usize {
        self.recent_limit
    }

    /// Records a new cargo in its destination city, the dispatch queue and the
    /// owner's ledger. Either all three take it or, on any error, none do.
    pub fn create_cargo(&self, request: CreateCargoRequest) -> Result<Cargo> {
        let mut depots = self.depots.write();
        let mut client = self.clients.client_mut(request.client)?;

        if !depots.network.contains(request.city) {
            warn!(cargo = %request.id, city = %request.city, "unknown city, cargo rejected");
            return Err(DispatchError::CityNotFound(request.city));
        }
        if depots.cargo.contains_key(&request.id) {
            return Err(DispatchError::DuplicateCargo(request.id));
        }

        let cargo = Cargo::new(
            request.id,
            request.date,
            request.status,
            request.client,
            request.city,
        )
        .into_shared();

        // The city was resolved under this guard, nothing below can fail
        let Depots {
            network,
            queue,
            cargo: index,
        } = &mut *depots;
        network.assign_cargo(request.city, cargo.clone())?;
        let delivery_time = queue.add_cargo(network, cargo.clone())?;
        index.insert(request.id, cargo.clone());
        client.record(cargo.clone());

        info!(
            cargo = %request.id,
            client = %request.client,
            city = %request.city,
            delivery_time,
            "cargo created"
        );

        Ok(snapshot(&cargo))
    }

    /// Takes the cargo with the shortest delivery time off the queue and marks
    /// it delivered. `None` means there is nothing left to dispatch.
    pub fn dispatch_next(&self) -> Option<Cargo> {
        let mut depots = self.depots.write();
        let cargo = depots.queue.process_next()?;

        let mut c = cargo.write();
        c.status = Status::Delivered;
        info!(cargo = %c.id, city = %c.destination, "cargo delivered");

        Some(c.clone())
    }

    pub fn recent_shipments(&self, client: ClientId, n: usize) -> Result<Vec<Cargo>> {
        self.clients.with_ledger(client, |ledger| ledger.recent(n))
    }

    pub fn latest_shipments(&self, client: ClientId) -> Result<Vec<Cargo>> {
        self.recent_shipments(client, self.recent_limit)
    }

    pub fn history(&self, client: ClientId) -> Result<Vec<Cargo>> {
        self.clients.history(client)
    }

    // The ledger is ordered by date, so it is sorted by id before searching
    pub fn search_by_id(&self, client: ClientId, id: CargoId) -> Result<Cargo> {
        let sorted = sort_by_id(self.history(client)?);
        find_by_id(&sorted, id)
            .cloned()
            .ok_or(DispatchError::CargoNotFound(id))
    }

    pub fn delivered_shipments(&self, client: ClientId) -> Result<Vec<Cargo>> {
        Ok(filter_delivered(&self.history(client)?))
    }

    pub fn undelivered_shipments(&self, client: ClientId) -> Result<Vec<Cargo>> {
        Ok(filter_undelivered(&self.history(client)?))
    }

    pub fn cargo(&self, id: CargoId) -> Result<Cargo> {
        self.depots
            .read()
            .cargo
            .get(&id)
            .map(snapshot)
            .ok_or(DispatchError::CargoNotFound(id))
    }

    pub fn city_cargo(&self, city: CityId) -> Result<Vec<Cargo>> {
        self.depots.read().network.cargo_at(city)
    }

    pub fn pending_dispatch(&self) -> Vec<Cargo> {
        self.depots.read().queue.pending()
    }

    pub fn cities(&self) -> Vec<CitySummary> {
        self.depots.read().network.cities_breadth_first()
    }

    pub fn describe_network(&self) -> String {
        self.depots.read().network.describe()
    }
}
