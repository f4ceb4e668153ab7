// City Network: the fixed depot hierarchy delivery times are derived from
// Nodes live in an arena owned by the network; parent -> children edges are
// arena indices and a flat id index gives constant time lookups.

use std::{
    collections::{HashMap, VecDeque},
    fmt::Write as _,
};

use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    cargo::{snapshot, Cargo, CityId, SharedCargo},
    config::{DepotConfig, NetworkConfig},
    error::{DispatchError, Result},
};

type NodeIdx = usize;

const ROOT: NodeIdx = 0;

#[derive(Debug)]
pub struct CityNode {
    id: CityId,
    name: String,
    depth: u32,
    children: Vec<NodeIdx>,
    cargo: Vec<SharedCargo>,
}

impl CityNode {
    fn new(id: CityId, name: String, depth: u32) -> Self {
        Self {
            id,
            name,
            depth,
            children: Vec::new(),
            cargo: Vec::new(),
        }
    }

    pub fn id(&self) -> CityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    // Snapshot of the cargo assigned here, in assignment order
    pub fn cargo(&self) -> Vec<Cargo> {
        self.cargo.iter().map(snapshot).collect()
    }

    pub fn cargo_count(&self) -> usize {
        self.cargo.len()
    }
}

/// Row of the breadth-first city listing shown to people picking a destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CitySummary {
    pub id: CityId,
    pub name: String,
    pub depth: u32,
}

#[derive(Debug)]
pub struct CityNetwork {
    nodes: Vec<CityNode>,
    index: HashMap<CityId, NodeIdx>,
}

impl CityNetwork {
    pub fn new(root_id: CityId, root_name: impl Into<String>) -> Self {
        let mut index = HashMap::new();
        index.insert(root_id, ROOT);

        Self {
            nodes: vec![CityNode::new(root_id, root_name.into(), 0)],
            index,
        }
    }

    /// The depot hierarchy the system starts with:
    /// ANKARA(1) -> İSTANBUL(2) -> İZMİR(4) and ANKARA(1) -> BURSA(3) -> ANTALYA(5).
    pub fn bootstrap() -> Self {
        let mut network = Self::new(CityId(1), "ANKARA");
        let istanbul = network.attach(ROOT, CityId(2), "İSTANBUL".to_string());
        let bursa = network.attach(ROOT, CityId(3), "BURSA".to_string());
        network.attach(istanbul, CityId(4), "İZMİR".to_string());
        network.attach(bursa, CityId(5), "ANTALYA".to_string());
        network
    }

    pub fn from_config(config: &NetworkConfig) -> Result<Self> {
        let mut network = Self::new(CityId(config.root.id), config.root.name.clone());
        network.attach_all(CityId(config.root.id), &config.root.children)?;
        Ok(network)
    }

    fn attach_all(&mut self, parent: CityId, depots: &[DepotConfig]) -> Result<()> {
        for depot in depots {
            self.add_child(parent, CityId(depot.id), depot.name.clone())?;
            self.attach_all(CityId(depot.id), &depot.children)?;
        }
        Ok(())
    }

    // Caller guarantees `parent` is a valid index and `id` is not indexed yet
    fn attach(&mut self, parent: NodeIdx, id: CityId, name: String) -> NodeIdx {
        let depth = self.nodes[parent].depth + 1;
        let idx = self.nodes.len();

        self.nodes.push(CityNode::new(id, name, depth));
        self.nodes[parent].children.push(idx);
        self.index.insert(id, idx);

        idx
    }

    /// Adds a new depot under `parent` and returns its depth.
    pub fn add_child(
        &mut self,
        parent: CityId,
        id: CityId,
        name: impl Into<String>,
    ) -> Result<u32> {
        let parent_idx = *self
            .index
            .get(&parent)
            .ok_or(DispatchError::CityNotFound(parent))?;

        if self.index.contains_key(&id) {
            return Err(DispatchError::DuplicateCity(id));
        }

        let idx = self.attach(parent_idx, id, name.into());
        let depth = self.nodes[idx].depth;
        debug!(city = %id, parent = %parent, depth, "depot added");

        Ok(depth)
    }

    pub fn root(&self) -> &CityNode {
        &self.nodes[ROOT]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn find_city_by_id(&self, id: CityId) -> Option<&CityNode> {
        self.index.get(&id).map(|&idx| &self.nodes[idx])
    }

    pub fn contains(&self, id: CityId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn depth_of(&self, id: CityId) -> Option<u32> {
        self.find_city_by_id(id).map(CityNode::depth)
    }

    pub fn children_of(&self, node: &CityNode) -> impl Iterator<Item = &CityNode> + '_ {
        let children = node.children.clone();
        children.into_iter().map(move |idx| &self.nodes[idx])
    }

    /// Appends the cargo to the city's list. Nothing changes if the city is unknown.
    pub fn assign_cargo(&mut self, city: CityId, cargo: SharedCargo) -> Result<()> {
        let Some(&idx) = self.index.get(&city) else {
            warn!(city = %city, "city id not found, cargo not assigned");
            return Err(DispatchError::CityNotFound(city));
        };

        self.nodes[idx].cargo.push(cargo);
        Ok(())
    }

    pub fn cargo_at(&self, city: CityId) -> Result<Vec<Cargo>> {
        self.find_city_by_id(city)
            .map(CityNode::cargo)
            .ok_or(DispatchError::CityNotFound(city))
    }

    // Depth-first, parent before children, children in insertion order
    pub fn preorder(&self) -> Vec<&CityNode> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![ROOT];

        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            out.push(node);
            stack.extend(node.children.iter().rev());
        }

        out
    }

    pub fn cities_breadth_first(&self) -> Vec<CitySummary> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut queue = VecDeque::from([ROOT]);

        while let Some(idx) = queue.pop_front() {
            let node = &self.nodes[idx];
            out.push(CitySummary {
                id: node.id,
                name: node.name.clone(),
                depth: node.depth,
            });
            queue.extend(node.children.iter().copied());
        }

        out
    }

    pub fn edges(&self) -> impl Iterator<Item = (&CityNode, &CityNode)> + '_ {
        self.nodes.iter().flat_map(move |parent| {
            parent
                .children
                .iter()
                .map(move |&child| (parent, &self.nodes[child]))
        })
    }

    /// Text dump of the tree with the cargo assigned to every depot.
    pub fn describe(&self) -> String {
        let mut out = String::new();

        for node in self.preorder() {
            let indent = node.depth as usize * 2;
            let _ = writeln!(out, "{} {} (ID: {})", "-".repeat(indent), node.name, node.id);

            for cargo in &node.cargo {
                let cargo = cargo.read();
                let _ = writeln!(
                    out,
                    "{}* Cargo ID: {}, Status: {}",
                    " ".repeat(indent + 2),
                    cargo.id,
                    cargo.status
                );
            }
        }

        out
    }
}
