//! KVL constraint rows for the solver.

use std::collections::HashMap;

use kh_core::{EdgeId, Real};

use crate::cycles::CycleBasis;
use crate::error::{GraphError, GraphResult};
use crate::graph::Graph;

/// One linear equality `sum(coefficient * flow) = 0`.
///
/// Coefficients are `sign * reactance`, with the reactance taken from the
/// edge's length and its grid's reactance per km.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct KvlConstraint {
    pub cycle: usize,
    pub terms: Vec<(EdgeId, Real)>,
}

impl KvlConstraint {
    /// Left-hand side for the given flows. Edges without a flow count as zero.
    pub fn evaluate(&self, flows: &HashMap<EdgeId, Real>) -> Real {
        self.terms
            .iter()
            .map(|(edge, coefficient)| coefficient * flows.get(edge).copied().unwrap_or(0.0))
            .sum()
    }
}

impl CycleBasis {
    /// One constraint row per basis cycle, in cycle order.
    pub fn kvl_constraints(&self, graph: &Graph) -> GraphResult<Vec<KvlConstraint>> {
        self.cycles()
            .iter()
            .enumerate()
            .map(|(cycle, c)| -> GraphResult<KvlConstraint> {
                let terms = c
                    .terms()
                    .iter()
                    .map(|t| -> GraphResult<(EdgeId, Real)> {
                        let edge = graph
                            .edge(t.edge)
                            .ok_or(GraphError::UnknownEdge { edge: t.edge })?;
                        Ok((t.edge, t.sign.as_f64() * edge.reactance()))
                    })
                    .collect::<GraphResult<Vec<_>>>()?;
                Ok(KvlConstraint { cycle, terms })
            })
            .collect()
    }
}
