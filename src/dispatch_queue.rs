// Dispatch Queue: releases cargo in ascending delivery time, first in first out
// among cargo with the same delivery time

use std::collections::{BTreeMap, VecDeque};

use tracing::{debug, info, warn};

use crate::{
    cargo::{snapshot, Cargo, SharedCargo},
    city_network::CityNetwork,
    error::{DispatchError, Result},
};

// Delivery time in days -> cargo waiting with that delivery time, oldest first
pub type DispatchBuckets = BTreeMap<u32, VecDeque<SharedCargo>>;

#[derive(Debug, Default)]
pub struct DispatchQueue {
    buckets: DispatchBuckets,
    len: usize,
}

pub fn delivery_time_for_depth(depth: u32) -> u32 {
    depth + 1
}

impl DispatchQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the delivery time from the destination's depth, writes it onto
    /// the cargo and enqueues it. An unknown destination leaves the queue as is.
    pub fn add_cargo(&mut self, network: &CityNetwork, cargo: SharedCargo) -> Result<u32> {
        let destination = cargo.read().destination;

        let Some(depth) = network.depth_of(destination) else {
            warn!(city = %destination, "city not found, cargo not enqueued");
            return Err(DispatchError::CityNotFound(destination));
        };

        let delivery_time = delivery_time_for_depth(depth);
        let id = {
            let mut c = cargo.write();
            c.delivery_time = delivery_time;
            c.id
        };

        self.buckets.entry(delivery_time).or_default().push_back(cargo);
        self.len += 1;
        info!(cargo = %id, delivery_time, "cargo enqueued");

        Ok(delivery_time)
    }

    pub fn process_next(&mut self) -> Option<SharedCargo> {
        let Some(mut bucket) = self.buckets.first_entry() else {
            debug!("no cargo to dispatch");
            return None;
        };

        let next = bucket.get_mut().pop_front();
        if bucket.get().is_empty() {
            bucket.remove();
        }

        if let Some(cargo) = &next {
            self.len -= 1;
            let c = cargo.read();
            info!(cargo = %c.id, delivery_time = c.delivery_time, "cargo taken for dispatch");
        }

        next
    }

    pub fn peek_delivery_time(&self) -> Option<u32> {
        self.buckets.keys().next().copied()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // Waiting cargo in the order `process_next` would hand it out
    pub fn pending(&self) -> Vec<Cargo> {
        self.buckets.values().flatten().map(snapshot).collect()
    }
}
