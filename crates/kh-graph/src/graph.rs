//! Core graph data structures.

use std::collections::HashMap;

use kh_core::{EdgeId, NodeId, Real};

/// An electrical bus: one distinct connection point in the network.
///
/// Nodes carry no electrical data, just an ID and the host's name for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
}

/// A grid-carrying element (a line) between two buses.
///
/// `from` and `to` fix the edge's reference direction: a positive flow
/// runs from `from` to `to`.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: EdgeId,
    pub name: String,
    pub from: NodeId,
    pub to: NodeId,
    pub length_km: Real,
    pub reactance_per_km: Real,
    pub enforce_kvl: bool,
}

impl Edge {
    /// Series reactance of the whole line.
    pub fn reactance(&self) -> Real {
        self.length_km * self.reactance_per_km
    }

    /// Given one endpoint, return the other one.
    ///
    /// Returns `None` if `node` is not an endpoint of this edge.
    pub fn far_end(&self, node: NodeId) -> Option<NodeId> {
        if node == self.from {
            Some(self.to)
        } else if node == self.to {
            Some(self.from)
        } else {
            None
        }
    }
}

/// The graph: a validated, immutable collection of nodes and edges.
///
/// Nodes and edges are stored in vectors indexed by their IDs, in the order
/// the host supplied them.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub(crate) nodes: Vec<Node>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) node_by_name: HashMap<String, NodeId>,
    pub(crate) edge_by_name: HashMap<String, EdgeId>,
}

impl Graph {
    /// Return all nodes.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Return all accepted edges, KVL-enforced or not.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Get a node by ID (returns None if ID out of bounds).
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.slot())
    }

    /// Get an edge by ID (returns None if ID out of bounds).
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.slot())
    }

    /// Look up a node by the host's name for it.
    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.node_by_name.get(name).copied()
    }

    /// Look up an edge by the host's identifier for it.
    pub fn edge_id(&self, name: &str) -> Option<EdgeId> {
        self.edge_by_name.get(name).copied()
    }

    /// Edges that take part in cycle detection, in input order.
    pub fn kvl_edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter().filter(|e| e.enforce_kvl)
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
