// Shipment Ledger: one client's shipment history, kept ascending by creation date

use crate::cargo::{snapshot, Cargo, SharedCargo};

#[derive(Debug, Default)]
pub struct ShipmentLedger {
    entries: Vec<SharedCargo>,
}

impl ShipmentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts after every entry dated on or before the new cargo, so the
    /// history stays sorted oldest first and same-day entries keep the order
    /// they were recorded in.
    pub fn record(&mut self, cargo: SharedCargo) {
        let date = cargo.read().date;
        let at = self.entries.partition_point(|e| e.read().date <= date);
        self.entries.insert(at, cargo);
    }

    /// Up to `n` entries from the newest end, newest first.
    pub fn recent(&self, n: usize) -> Vec<Cargo> {
        self.entries.iter().rev().take(n).map(snapshot).collect()
    }

    pub fn all(&self) -> Vec<Cargo> {
        self.entries.iter().map(snapshot).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
