//! Spanning forest over the KVL-enforced edges.
//!
//! A single pass in input order splits the enforced edges into tree edges
//! and cycle-closing edges. Only tree edges go into the incidence index, so
//! path search can never shortcut through another closing edge.

use kh_core::{EdgeId, NodeId};
use tracing::debug;

use crate::graph::Graph;

/// Tree/closing partition of the KVL-enforced edges plus tree-only incidence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpanningForest {
    tree_edges: Vec<EdgeId>,
    closing_edges: Vec<EdgeId>,

    /// Offsets for node->edge incidence: node i's tree edges are in
    /// incidence_edges[incidence_offsets[i]..incidence_offsets[i+1]].
    incidence_offsets: Vec<usize>,

    /// Flat list of tree edge IDs, grouped by node, input order within a node.
    incidence_edges: Vec<EdgeId>,

    tree_count: usize,
}

impl SpanningForest {
    /// Classify every KVL-enforced edge of `graph`.
    ///
    /// An edge is closing when both endpoints were already reached by the
    /// same tree. An edge whose endpoints were reached by two different trees
    /// joins them and is a tree edge.
    pub fn build(graph: &Graph) -> Self {
        let node_count = graph.nodes().len();
        let mut trees = TreeMembership::new(node_count);
        let mut tree_edges = Vec::new();
        let mut closing_edges = Vec::new();

        for edge in graph.kvl_edges() {
            let (u, v) = (edge.from.slot(), edge.to.slot());
            if trees.is_visited(u) && trees.is_visited(v) && trees.same_tree(u, v) {
                closing_edges.push(edge.id);
            } else {
                trees.join(u, v);
                tree_edges.push(edge.id);
            }
        }

        let (incidence_offsets, incidence_edges) = build_incidence(graph, &tree_edges);
        let tree_count = trees.tree_count();

        debug!(
            tree = tree_edges.len(),
            closing = closing_edges.len(),
            trees = tree_count,
            "classified KVL edges"
        );

        Self {
            tree_edges,
            closing_edges,
            incidence_offsets,
            incidence_edges,
            tree_count,
        }
    }

    /// Tree edges in input order.
    pub fn tree_edges(&self) -> &[EdgeId] {
        &self.tree_edges
    }

    /// Cycle-closing edges in input order.
    pub fn closing_edges(&self) -> &[EdgeId] {
        &self.closing_edges
    }

    /// Tree edges incident to a node (empty for unknown or non-KVL nodes).
    pub fn incidence(&self, node: NodeId) -> &[EdgeId] {
        let idx = node.slot();
        if idx + 1 >= self.incidence_offsets.len() {
            return &[];
        }
        &self.incidence_edges[self.incidence_offsets[idx]..self.incidence_offsets[idx + 1]]
    }

    /// Number of connected components touched by KVL-enforced edges.
    pub fn tree_count(&self) -> usize {
        self.tree_count
    }

    pub fn is_tree_edge(&self, edge: EdgeId) -> bool {
        self.tree_edges.binary_search(&edge).is_ok()
    }

    pub fn is_closing_edge(&self, edge: EdgeId) -> bool {
        self.closing_edges.binary_search(&edge).is_ok()
    }
}

/// Compact adjacency lists restricted to `tree_edges`.
fn build_incidence(graph: &Graph, tree_edges: &[EdgeId]) -> (Vec<usize>, Vec<EdgeId>) {
    let node_count = graph.nodes().len();
    let mut counts = vec![0usize; node_count];
    let ends: Vec<(EdgeId, usize, usize)> = tree_edges
        .iter()
        .filter_map(|&id| graph.edge(id))
        .map(|e| (e.id, e.from.slot(), e.to.slot()))
        .collect();
    for &(_, u, v) in &ends {
        counts[u] += 1;
        counts[v] += 1;
    }

    let mut offsets = Vec::with_capacity(node_count + 1);
    offsets.push(0);
    for count in &counts {
        let last = offsets[offsets.len() - 1];
        offsets.push(last + count);
    }

    let mut cursor = offsets[..node_count].to_vec();
    let mut flat = vec![EdgeId::from_index(0); ends.len() * 2];
    for &(id, u, v) in &ends {
        for n in [u, v] {
            flat[cursor[n]] = id;
            cursor[n] += 1;
        }
    }

    (offsets, flat)
}

/// Which tree each visited node belongs to (union-find with path halving).
struct TreeMembership {
    parent: Vec<usize>,
    visited: Vec<bool>,
}

impl TreeMembership {
    fn new(node_count: usize) -> Self {
        Self {
            parent: (0..node_count).collect(),
            visited: vec![false; node_count],
        }
    }

    fn is_visited(&self, node: usize) -> bool {
        self.visited[node]
    }

    fn root(&mut self, mut node: usize) -> usize {
        while self.parent[node] != node {
            self.parent[node] = self.parent[self.parent[node]];
            node = self.parent[node];
        }
        node
    }

    fn same_tree(&mut self, a: usize, b: usize) -> bool {
        self.root(a) == self.root(b)
    }

    fn join(&mut self, a: usize, b: usize) {
        self.visited[a] = true;
        self.visited[b] = true;
        let (ra, rb) = (self.root(a), self.root(b));
        if ra != rb {
            self.parent[rb] = ra;
        }
    }

    fn tree_count(&mut self) -> usize {
        (0..self.parent.len())
            .filter(|&n| self.visited[n] && self.root(n) == n)
            .count()
    }
}
