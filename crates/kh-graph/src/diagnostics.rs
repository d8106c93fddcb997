//! Recoverable build findings and the build summary line.

use std::fmt;

use kh_core::Real;

/// A malformed edge that was left out of the graph.
///
/// Diagnostics never abort a build; every other edge is still processed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Diagnostic {
    /// The element has no incoming link.
    NoInputs { edge: String },

    /// The element has more than one incoming link.
    MultipleInputs { edge: String, count: usize },

    /// The element has no outgoing link.
    NoOutputs { edge: String },

    /// The element has more than one outgoing link.
    MultipleOutputs { edge: String, count: usize },

    /// An earlier edge already uses this identifier.
    DuplicateEdgeId { edge: String },

    /// Both ends resolve to the same bus.
    SelfLoop { edge: String, node: String },
}

impl Diagnostic {
    /// Host identifier of the rejected edge.
    pub fn edge(&self) -> &str {
        match self {
            Diagnostic::NoInputs { edge }
            | Diagnostic::MultipleInputs { edge, .. }
            | Diagnostic::NoOutputs { edge }
            | Diagnostic::MultipleOutputs { edge, .. }
            | Diagnostic::DuplicateEdgeId { edge }
            | Diagnostic::SelfLoop { edge, .. } => edge,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::NoInputs { edge } => write!(f, "process {} has no inputs", edge),
            Diagnostic::MultipleInputs { edge, count } => {
                write!(f, "process {} has more than one input ({})", edge, count)
            }
            Diagnostic::NoOutputs { edge } => write!(f, "process {} has no outputs", edge),
            Diagnostic::MultipleOutputs { edge, count } => {
                write!(f, "process {} has more than one output ({})", edge, count)
            }
            Diagnostic::DuplicateEdgeId { edge } => {
                write!(f, "edge id {} is used more than once; later uses ignored", edge)
            }
            Diagnostic::SelfLoop { edge, node } => {
                write!(f, "process {} connects node {} to itself", edge, node)
            }
        }
    }
}

/// Size and length statistics over the accepted edges.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GraphSummary {
    pub node_count: usize,
    pub edge_count: usize,
    pub total_length_km: Real,
    /// Shortest strictly positive length, or 0 when there is none.
    pub min_length_km: Real,
    pub max_length_km: Real,
}

impl GraphSummary {
    pub(crate) fn from_lengths(node_count: usize, lengths: impl IntoIterator<Item = Real>) -> Self {
        let mut edge_count = 0;
        let mut total = 0.0;
        let mut min: Option<Real> = None;
        let mut max = 0.0;
        for len in lengths {
            edge_count += 1;
            total += len;
            if len > 0.0 {
                min = Some(min.map_or(len, |m: Real| m.min(len)));
                max = Real::max(max, len);
            }
        }
        Self {
            node_count,
            edge_count,
            total_length_km: total,
            min_length_km: min.unwrap_or(0.0),
            max_length_km: max,
        }
    }
}

impl fmt::Display for GraphSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} nodes, {} edges, total length {:.1} km (range {:.1} to {:.1} km)",
            self.node_count,
            self.edge_count,
            self.total_length_km,
            self.min_length_km,
            self.max_length_km
        )
    }
}
