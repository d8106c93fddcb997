//! Path search inside the spanning forest.

use kh_core::{EdgeId, NodeId};
use tracing::trace;

use crate::error::{GraphError, GraphResult};
use crate::forest::SpanningForest;
use crate::graph::Graph;

/// How an edge was crossed relative to its reference direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// From the edge's `from` node to its `to` node.
    Forward,
    /// From the edge's `to` node to its `from` node.
    Backward,
}

impl Direction {
    pub fn reversed(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

/// One edge of a tree path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathStep {
    pub edge: EdgeId,
    pub direction: Direction,
}

/// Largest number of search steps a valid forest can need.
///
/// Every step either advances past one incidence entry (two per tree edge)
/// or backs out of one node.
pub fn default_step_limit(graph: &Graph, forest: &SpanningForest) -> usize {
    2 * forest.tree_edges().len() + graph.nodes().len() + 1
}

/// Find the unique tree path from `from` to `to`.
///
/// Depth-first search with an explicit stack over the tree-only incidence,
/// never reusing an edge already on the current path. Returns `Ok(None)` if
/// the nodes are not connected by the forest and an error if the search runs
/// past `step_limit` or meets an inconsistent incidence entry.
pub fn find_tree_path(
    graph: &Graph,
    forest: &SpanningForest,
    from: NodeId,
    to: NodeId,
    step_limit: usize,
) -> GraphResult<Option<Vec<PathStep>>> {
    if from == to {
        return Ok(Some(Vec::new()));
    }

    struct Frame {
        node: NodeId,
        cursor: usize,
    }

    let mut frames = vec![Frame {
        node: from,
        cursor: 0,
    }];
    let mut path: Vec<PathStep> = Vec::new();
    let mut steps = 0usize;

    while let Some(frame) = frames.last_mut() {
        steps += 1;
        if steps > step_limit {
            return Err(GraphError::SearchLimitExceeded {
                from,
                to,
                limit: step_limit,
            });
        }

        let node = frame.node;
        let Some(&edge_id) = forest.incidence(node).get(frame.cursor) else {
            frames.pop();
            path.pop();
            continue;
        };
        frame.cursor += 1;

        if path.iter().any(|step| step.edge == edge_id) {
            continue;
        }

        let edge = graph
            .edge(edge_id)
            .ok_or(GraphError::UnknownEdge { edge: edge_id })?;
        let far = edge.far_end(node).ok_or(GraphError::CorruptIncidence {
            node,
            edge: edge_id,
        })?;
        let direction = if far == edge.to {
            Direction::Forward
        } else {
            Direction::Backward
        };

        path.push(PathStep {
            edge: edge_id,
            direction,
        });
        if far == to {
            trace!(%from, %to, len = path.len(), steps, "tree path found");
            return Ok(Some(path));
        }
        frames.push(Frame {
            node: far,
            cursor: 0,
        });
    }

    trace!(%from, %to, steps, "no tree path");
    Ok(None)
}
