//! Graph-specific error types.
//!
//! These are the fatal outcomes of a build. Malformed edges that can simply
//! be skipped are reported as [`Diagnostic`](crate::Diagnostic)s instead.

use kh_core::{EdgeId, KhError, NodeId, Real};
use thiserror::Error;

pub type GraphResult<T> = Result<T, GraphError>;

/// Graph construction, cycle basis and query errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    /// An edge was supplied with a negative length.
    #[error("Edge {edge} has negative length {length_km} km")]
    NegativeLength { edge: String, length_km: Real },

    /// An edge was supplied with a NaN or infinite attribute.
    #[error("Edge {edge} has non-finite {what}: {value}")]
    NonFinite {
        edge: String,
        what: &'static str,
        value: Real,
    },

    /// The spanning forest has no path between the endpoints of a closing edge.
    #[error("No spanning tree path from node {from} to node {to} for closing edge {closing_edge}")]
    NoTreePath {
        closing_edge: EdgeId,
        from: NodeId,
        to: NodeId,
    },

    /// Path search gave up after visiting more incidence entries than any tree allows.
    #[error("Path search from node {from} to node {to} exceeded {limit} steps")]
    SearchLimitExceeded {
        from: NodeId,
        to: NodeId,
        limit: usize,
    },

    /// An incidence entry names an edge that does not touch the node it is listed under.
    #[error("Edge {edge} listed as incident to node {node} but does not touch it")]
    CorruptIncidence { node: NodeId, edge: EdgeId },

    /// Edge ID not present in the graph.
    #[error("Edge {edge} not found in graph")]
    UnknownEdge { edge: EdgeId },

    /// Cycle index past the end of the basis.
    #[error("Cycle index {index} out of range (basis has {len} cycles)")]
    UnknownCycle { index: usize, len: usize },

    /// `verify` was not given a value it needs.
    #[error("No {what} supplied for edge {edge}")]
    MissingValue { edge: EdgeId, what: &'static str },

    #[error(transparent)]
    Core(#[from] KhError),
}

impl From<GraphError> for KhError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::Core(inner) => inner,
            other => KhError::Invariant {
                what: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_edge() {
        let err = GraphError::NegativeLength {
            edge: "L7".into(),
            length_km: -2.5,
        };
        assert_eq!(err.to_string(), "Edge L7 has negative length -2.5 km");
    }

    #[test]
    fn converts_into_core_error() {
        let err = GraphError::UnknownCycle { index: 3, len: 1 };
        let core: KhError = err.into();
        assert!(matches!(core, KhError::Invariant { .. }));

        let passthrough = GraphError::Core(KhError::InvalidArg { what: "x".into() });
        assert_eq!(
            KhError::from(passthrough),
            KhError::InvalidArg { what: "x".into() }
        );
    }
}
