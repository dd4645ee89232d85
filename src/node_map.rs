//! `nodeInfoMap` (§5, §6): the harness-owned fleet state. Mutated by the
//! driver only during a `Schedule` call; the fan-out treats it as
//! read-only by discipline via the snapshot it takes before filtering.

use std::collections::HashMap;
use std::sync::Arc;

use crate::models::Node;

#[derive(Default)]
pub struct NodeInfoMap {
    nodes: HashMap<String, Node>,
}

impl NodeInfoMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: Node) {
        self.nodes.insert(node.name.clone(), node);
    }

    pub fn remove(&mut self, name: &str) -> Option<Node> {
        self.nodes.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.nodes.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.nodes.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.values_mut()
    }

    /// An owned, read-only clone of every node, for the parallel fan-out
    /// (§3 ownership, §4.8).
    pub fn snapshot(&self) -> Arc<[Node]> {
        Arc::from(self.nodes.values().cloned().collect::<Vec<_>>())
    }
}

/// `NodeLister` (§6): `List() -> []Node`. Ordering is stable within a tick
/// but otherwise unspecified.
pub trait NodeLister: Send + Sync {
    fn list(&self) -> Vec<String>;
}

impl NodeLister for NodeInfoMap {
    fn list(&self) -> Vec<String> {
        self.nodes.keys().cloned().collect()
    }
}

/// A `NodeLister` over a fixed, pre-captured name list. `nodeInfoMap` can't
/// usefully implement `NodeLister` at the same time it's borrowed mutably
/// by `Driver::schedule`, so a harness takes a name snapshot with this
/// (typically right before calling `schedule`) instead of aliasing the map
/// itself.
pub struct StaticNodeList(pub Vec<String>);

impl NodeLister for StaticNodeList {
    fn list(&self) -> Vec<String> {
        self.0.clone()
    }
}
