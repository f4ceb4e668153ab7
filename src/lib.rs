// Main library file for the depot dispatch core

// Data model and errors
pub mod cargo;
pub mod error;

// Structures: depot tree, dispatch queue, per-client ledgers
pub mod city_network;
pub mod clients;
pub mod dispatch_queue;
pub mod ledger;
pub mod search;

// Orchestration and outer surfaces
pub mod boundary;
pub mod config;
pub mod desk;
pub mod service;
pub mod telemetry;

// Re-export key types for convenience
pub use boundary::CreateCargoRequest;
pub use cargo::{Cargo, CargoId, CityId, ClientId, Status};
pub use city_network::{CityNetwork, CitySummary};
pub use clients::{ClientProfile, ClientRepository};
pub use config::ServiceConfig;
pub use desk::{DeskHandle, DispatchDesk, ShipmentDesk};
pub use dispatch_queue::DispatchQueue;
pub use error::DispatchError;
pub use ledger::ShipmentLedger;
pub use service::CargoService;
