// Core data model: identifiers, shipment status and the cargo record itself

use std::{fmt, sync::Arc};

use chrono::NaiveDate;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CargoId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CityId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClientId(pub u32);

impl fmt::Display for CargoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for CityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Shipment status. `Delivered` is terminal and is only forced by dispatch;
/// any of the three may be chosen when a cargo is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Processing,
    OnDelivery,
    Delivered,
}

impl Status {
    pub fn is_delivered(self) -> bool {
        self == Status::Delivered
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Processing => "PROCESSING",
            Status::OnDelivery => "ON_DELIVERY",
            Status::Delivered => "DELIVERED",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cargo {
    pub id: CargoId,
    pub date: NaiveDate,
    pub status: Status,
    // Days; destination depth + 1, written when the cargo is enqueued
    pub delivery_time: u32,
    pub destination: CityId,
    // Back-reference only, the client repository owns the ledger
    pub client: ClientId,
}

impl Cargo {
    pub fn new(
        id: CargoId,
        date: NaiveDate,
        status: Status,
        client: ClientId,
        destination: CityId,
    ) -> Self {
        Self {
            id,
            date,
            status,
            delivery_time: 0,
            destination,
            client,
        }
    }

    pub fn into_shared(self) -> SharedCargo {
        Arc::new(RwLock::new(self))
    }
}

impl fmt::Display for Cargo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cargo #{} [{}] {} -> city {} ({} day(s), client {})",
            self.id, self.date, self.status, self.destination, self.delivery_time, self.client
        )
    }
}

// One cargo record is referenced by its city, the dispatch queue and the
// owning client's ledger at the same time.
pub type SharedCargo = Arc<RwLock<Cargo>>;

pub fn snapshot(cargo: &SharedCargo) -> Cargo {
    cargo.read().clone()
}
