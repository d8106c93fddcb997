//! Graph builder: turns the host's edge feed into a validated graph.

use std::collections::{HashMap, HashSet};

use kh_core::{EdgeId, KhError, NodeId, Real};
use tracing::{debug, info, warn};

use crate::diagnostics::{Diagnostic, GraphSummary};
use crate::error::GraphResult;
use crate::graph::{Edge, Graph, Node};
use crate::validate;

/// One grid element as supplied by the host.
///
/// `inputs` and `outputs` are the buses the element's incoming and outgoing
/// links attach to. A well-formed element has exactly one of each; anything
/// else is reported as a [`Diagnostic`] and the element is skipped.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeSpec {
    pub id: String,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub length_km: Real,
    pub reactance_per_km: Real,
    pub enforce_kvl: bool,
}

impl EdgeSpec {
    /// A line with a single from-bus and a single to-bus.
    pub fn line(
        id: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        length_km: Real,
        reactance_per_km: Real,
        enforce_kvl: bool,
    ) -> Self {
        Self {
            id: id.into(),
            inputs: vec![from.into()],
            outputs: vec![to.into()],
            length_km,
            reactance_per_km,
            enforce_kvl,
        }
    }
}

/// Result of a successful build: the graph plus everything worth telling the user.
#[derive(Debug, Clone)]
pub struct BuiltGraph {
    pub graph: Graph,
    pub diagnostics: Vec<Diagnostic>,
    pub summary: GraphSummary,
}

/// Builder for constructing a graph incrementally.
///
/// Feed descriptors with `add_edge`, then call `build()` to validate and
/// freeze the result. Buses are created the first time an accepted edge
/// references them.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    node_by_name: HashMap<String, NodeId>,
    edge_by_name: HashMap<String, EdgeId>,
    seen_edge_ids: HashSet<String>,
    diagnostics: Vec<Diagnostic>,
}

impl GraphBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from a complete edge list.
    ///
    /// Every descriptor's input contract is checked before any edge is added,
    /// so a single bad length rejects the whole list.
    pub fn from_specs(specs: &[EdgeSpec]) -> GraphResult<BuiltGraph> {
        for spec in specs {
            validate::check_contract(spec)?;
        }
        let mut builder = Self::new();
        for spec in specs {
            builder.add_edge(spec)?;
        }
        builder.build()
    }

    /// Add one descriptor.
    ///
    /// Returns the new edge's ID, or `None` if the descriptor was malformed
    /// and recorded as a diagnostic instead. Contract violations are errors.
    pub fn add_edge(&mut self, spec: &EdgeSpec) -> GraphResult<Option<EdgeId>> {
        validate::check_contract(spec)?;

        if !self.seen_edge_ids.insert(spec.id.clone()) {
            self.reject(Diagnostic::DuplicateEdgeId {
                edge: spec.id.clone(),
            });
            return Ok(None);
        }

        let (from_name, to_name) = match validate::resolve_endpoints(spec) {
            Ok(ends) => ends,
            Err(diagnostic) => {
                self.reject(diagnostic);
                return Ok(None);
            }
        };

        let from = self.intern_node(from_name)?;
        let to = self.intern_node(to_name)?;
        let id = EdgeId::from_usize(self.edges.len()).ok_or(KhError::IndexOob {
            what: "edge id",
            index: self.edges.len(),
            len: u32::MAX as usize,
        })?;

        debug!(edge = %spec.id, from = from_name, to = to_name, kvl = spec.enforce_kvl, "accepted edge");
        self.edges.push(Edge {
            id,
            name: spec.id.clone(),
            from,
            to,
            length_km: spec.length_km,
            reactance_per_km: spec.reactance_per_km,
            enforce_kvl: spec.enforce_kvl,
        });
        self.edge_by_name.insert(spec.id.clone(), id);
        Ok(Some(id))
    }

    /// Validate and freeze the graph.
    pub fn build(self) -> GraphResult<BuiltGraph> {
        validate::validate_structure(&self.nodes, &self.edges)?;

        let summary =
            GraphSummary::from_lengths(self.nodes.len(), self.edges.iter().map(|e| e.length_km));
        info!(%summary, rejected = self.diagnostics.len(), "built grid graph");

        Ok(BuiltGraph {
            graph: Graph {
                nodes: self.nodes,
                edges: self.edges,
                node_by_name: self.node_by_name,
                edge_by_name: self.edge_by_name,
            },
            diagnostics: self.diagnostics,
            summary,
        })
    }

    fn intern_node(&mut self, name: &str) -> GraphResult<NodeId> {
        if let Some(&id) = self.node_by_name.get(name) {
            return Ok(id);
        }
        let id = NodeId::from_usize(self.nodes.len()).ok_or(KhError::IndexOob {
            what: "node id",
            index: self.nodes.len(),
            len: u32::MAX as usize,
        })?;
        self.nodes.push(Node {
            id,
            name: name.to_owned(),
        });
        self.node_by_name.insert(name.to_owned(), id);
        Ok(id)
    }

    fn reject(&mut self, diagnostic: Diagnostic) {
        warn!(edge = diagnostic.edge(), "{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }
}
