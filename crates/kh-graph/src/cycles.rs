//! Fundamental cycle basis and the queries the solver runs against it.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use kh_core::{EdgeId, Real};
use rayon::prelude::*;
use tracing::debug;

use crate::config::CycleBasisConfig;
use crate::error::{GraphError, GraphResult};
use crate::forest::SpanningForest;
use crate::graph::Graph;
use crate::path::{Direction, PathStep, default_step_limit, find_tree_path};

/// Orientation of an edge within a cycle: `+1` or `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    pub fn as_f64(self) -> Real {
        match self {
            Sign::Plus => 1.0,
            Sign::Minus => -1.0,
        }
    }
}

impl From<Direction> for Sign {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Forward => Sign::Plus,
            Direction::Backward => Sign::Minus,
        }
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Sign::Plus => "+1",
            Sign::Minus => "-1",
        })
    }
}

/// One edge of a cycle with its orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CycleTerm {
    pub edge: EdgeId,
    pub sign: Sign,
}

/// An oriented fundamental cycle.
///
/// The first term is the closing edge with sign `+1`; it fixes the cycle's
/// reference direction. The remaining terms are tree edges.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Cycle {
    terms: Vec<CycleTerm>,
}

impl Cycle {
    /// Closing edge `e = (u, v)` followed by the tree path `u -> v` walked
    /// backwards from `v` to `u`.
    fn close(closing_edge: EdgeId, path: &[PathStep]) -> Self {
        let mut terms = Vec::with_capacity(path.len() + 1);
        terms.push(CycleTerm {
            edge: closing_edge,
            sign: Sign::Plus,
        });
        terms.extend(path.iter().rev().map(|step| CycleTerm {
            edge: step.edge,
            sign: Sign::from(step.direction.reversed()),
        }));
        Self { terms }
    }

    pub fn terms(&self) -> &[CycleTerm] {
        &self.terms
    }

    pub fn closing_edge(&self) -> EdgeId {
        self.terms[0].edge
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn orientation_of(&self, edge: EdgeId) -> Option<Sign> {
        self.terms.iter().find(|t| t.edge == edge).map(|t| t.sign)
    }

    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.terms.iter().map(|t| t.edge)
    }
}

/// One cycle per closing edge, in closing-edge input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleBasis {
    cycles: Vec<Cycle>,
    by_edge: BTreeMap<EdgeId, Vec<usize>>,
}

impl CycleBasis {
    /// Build the fundamental cycle for every closing edge of `forest`.
    ///
    /// A closing edge whose endpoints have no tree path between them means
    /// the forest is inconsistent; that is reported as
    /// [`GraphError::NoTreePath`] rather than skipped.
    pub fn compute(
        graph: &Graph,
        forest: &SpanningForest,
        config: &CycleBasisConfig,
    ) -> GraphResult<Self> {
        let limit = config
            .max_path_steps
            .unwrap_or_else(|| default_step_limit(graph, forest));
        let closing = forest.closing_edges();

        let one = |&edge_id: &EdgeId| -> GraphResult<Cycle> {
            let edge = graph
                .edge(edge_id)
                .ok_or(GraphError::UnknownEdge { edge: edge_id })?;
            let path = find_tree_path(graph, forest, edge.from, edge.to, limit)?.ok_or(
                GraphError::NoTreePath {
                    closing_edge: edge_id,
                    from: edge.from,
                    to: edge.to,
                },
            )?;
            Ok(Cycle::close(edge_id, &path))
        };

        let cycles: Vec<Cycle> = if config.parallel {
            closing.par_iter().map(one).collect::<GraphResult<_>>()?
        } else {
            closing.iter().map(one).collect::<GraphResult<_>>()?
        };

        let mut by_edge: BTreeMap<EdgeId, Vec<usize>> = BTreeMap::new();
        for (i, cycle) in cycles.iter().enumerate() {
            for edge in cycle.edges() {
                by_edge.entry(edge).or_default().push(i);
            }
        }

        debug!(
            cycles = cycles.len(),
            longest = cycles.iter().map(Cycle::len).max().unwrap_or(0),
            "computed cycle basis"
        );
        Ok(Self { cycles, by_edge })
    }

    pub fn cycles(&self) -> &[Cycle] {
        &self.cycles
    }

    pub fn len(&self) -> usize {
        self.cycles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }

    pub fn cycle(&self, index: usize) -> GraphResult<&Cycle> {
        self.cycles.get(index).ok_or(GraphError::UnknownCycle {
            index,
            len: self.cycles.len(),
        })
    }

    /// Sign of `edge` within cycle `index`, or `None` if the cycle does not
    /// use the edge (or there is no such cycle).
    pub fn orientation_of(&self, index: usize, edge: EdgeId) -> Option<Sign> {
        self.cycles.get(index)?.orientation_of(edge)
    }

    /// Indices of all cycles that use `edge`, ascending.
    pub fn cycles_containing(&self, edge: EdgeId) -> &[usize] {
        self.by_edge.get(&edge).map(Vec::as_slice).unwrap_or(&[])
    }

    /// KVL residual of cycle `index`: `sum(sign * reactance * flow)`.
    ///
    /// Zero (within tolerance) when the flows satisfy the voltage law around
    /// the cycle. Every edge of the cycle needs a flow and a reactance.
    pub fn verify(
        &self,
        index: usize,
        flows: &HashMap<EdgeId, Real>,
        reactances: &HashMap<EdgeId, Real>,
    ) -> GraphResult<Real> {
        self.cycle(index)?.terms().iter().try_fold(0.0, |acc, term| {
            let flow = flows.get(&term.edge).ok_or(GraphError::MissingValue {
                edge: term.edge,
                what: "flow",
            })?;
            let x = reactances.get(&term.edge).ok_or(GraphError::MissingValue {
                edge: term.edge,
                what: "reactance",
            })?;
            Ok(acc + term.sign.as_f64() * x * flow)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{EdgeSpec, GraphBuilder};
    use kh_core::{Tolerances, nearly_zero_sum};

    fn basis(lines: &[(&str, &str, &str)]) -> (Graph, CycleBasis) {
        let specs: Vec<EdgeSpec> = lines
            .iter()
            .map(|&(id, a, b)| EdgeSpec::line(id, a, b, 1.0, 0.1, true))
            .collect();
        let graph = GraphBuilder::from_specs(&specs).unwrap().graph;
        let forest = SpanningForest::build(&graph);
        let basis = CycleBasis::compute(&graph, &forest, &CycleBasisConfig::default()).unwrap();
        (graph, basis)
    }

    fn signed(g: &Graph, c: &Cycle) -> Vec<(String, Sign)> {
        c.terms()
            .iter()
            .map(|t| (g.edge(t.edge).unwrap().name.clone(), t.sign))
            .collect()
    }

    fn id(g: &Graph, name: &str) -> EdgeId {
        g.edge_id(name).unwrap()
    }

    #[test]
    fn triangle_cycle_is_orientation_consistent() {
        let (g, b) = basis(&[("A", "n1", "n2"), ("B", "n2", "n3"), ("C", "n3", "n1")]);
        assert_eq!(b.len(), 1);
        assert_eq!(
            signed(&g, &b.cycles()[0]),
            vec![
                ("C".to_string(), Sign::Plus),
                ("A".to_string(), Sign::Plus),
                ("B".to_string(), Sign::Plus),
            ]
        );
    }

    #[test]
    fn reversed_tree_edge_gets_minus() {
        // B points n3 -> n2, against the loop direction n3 -> n1 -> n2 -> n3.
        let (g, b) = basis(&[("A", "n1", "n2"), ("B", "n3", "n2"), ("C", "n3", "n1")]);
        assert_eq!(
            signed(&g, &b.cycles()[0]),
            vec![
                ("C".to_string(), Sign::Plus),
                ("A".to_string(), Sign::Plus),
                ("B".to_string(), Sign::Minus),
            ]
        );
        assert_eq!(b.orientation_of(0, id(&g, "B")), Some(Sign::Minus));
        assert_eq!(b.orientation_of(1, id(&g, "B")), None);
    }

    #[test]
    fn shared_tree_edge_is_in_several_cycles() {
        // Two squares sharing edge S.
        let (g, b) = basis(&[
            ("S", "m1", "m2"),
            ("L1", "m2", "l1"),
            ("L2", "l1", "l2"),
            ("R1", "m2", "r1"),
            ("R2", "r1", "r2"),
            ("LC", "l2", "m1"),
            ("RC", "r2", "m1"),
        ]);
        assert_eq!(b.len(), 2);
        assert_eq!(b.cycles_containing(id(&g, "S")), &[0, 1]);
        assert_eq!(b.cycles_containing(id(&g, "LC")), &[0]);
        assert_eq!(b.cycles_containing(id(&g, "RC")), &[1]);
        assert_eq!(b.cycles_containing(id(&g, "R1")), &[1]);
        assert!(b.cycles_containing(EdgeId::from_index(99)).is_empty());
        assert_ne!(b.cycles()[0], b.cycles()[1]);
    }

    #[test]
    fn verify_ring_with_potential_flows() {
        let (g, b) = basis(&[("A", "n1", "n2"), ("B", "n2", "n3"), ("C", "n3", "n1")]);
        let theta: HashMap<&str, Real> = [("n1", 0.0), ("n2", -0.3), ("n3", -0.45)].into();
        let reactances: HashMap<EdgeId, Real> = g.edges().iter().map(|e| (e.id, e.reactance())).collect();
        let flows: HashMap<EdgeId, Real> = g
            .edges()
            .iter()
            .map(|e| {
                let drop = theta[g.node(e.from).unwrap().name.as_str()]
                    - theta[g.node(e.to).unwrap().name.as_str()];
                (e.id, drop / e.reactance())
            })
            .collect();
        let residual = b.verify(0, &flows, &reactances).unwrap();
        assert!(nearly_zero_sum(residual, 0.45, Tolerances::default()));

        let mut bad = flows.clone();
        bad.insert(id(&g, "A"), 10.0);
        assert!(b.verify(0, &bad, &reactances).unwrap().abs() > 0.1);
    }

    #[test]
    fn verify_reports_missing_values_and_bad_index() {
        let (g, b) = basis(&[("A", "n1", "n2"), ("B", "n2", "n3"), ("C", "n3", "n1")]);
        let flows = HashMap::new();
        let reactances: HashMap<EdgeId, Real> = g.edges().iter().map(|e| (e.id, e.reactance())).collect();
        assert!(matches!(
            b.verify(0, &flows, &reactances),
            Err(GraphError::MissingValue { what: "flow", .. })
        ));

        let flows: HashMap<EdgeId, Real> = g.edges().iter().map(|e| (e.id, 1.0)).collect();
        let mut partial = reactances.clone();
        partial.remove(&id(&g, "B"));
        match b.verify(0, &flows, &partial) {
            Err(GraphError::MissingValue { edge, what }) => {
                assert_eq!(edge, id(&g, "B"));
                assert_eq!(what, "reactance");
            }
            other => panic!("expected missing reactance, got {other:?}"),
        }
        assert!(matches!(
            b.verify(3, &flows, &reactances),
            Err(GraphError::UnknownCycle { index: 3, len: 1 })
        ));
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let lines = [
            ("A", "a", "b"),
            ("B", "b", "c"),
            ("C", "c", "d"),
            ("D", "d", "a"),
            ("E", "a", "c"),
            ("F", "b", "d"),
        ];
        let specs: Vec<EdgeSpec> = lines
            .iter()
            .map(|&(id, a, b)| EdgeSpec::line(id, a, b, 2.0, 0.4, true))
            .collect();
        let graph = GraphBuilder::from_specs(&specs).unwrap().graph;
        let forest = SpanningForest::build(&graph);
        let par = CycleBasis::compute(&graph, &forest, &CycleBasisConfig::default()).unwrap();
        let seq = CycleBasis::compute(&graph, &forest, &CycleBasisConfig::sequential()).unwrap();
        assert_eq!(par, seq);
        assert_eq!(par.len(), 3);
    }

    #[test]
    fn sign_helpers() {
        assert_eq!(Sign::Plus.as_f64(), 1.0);
        assert_eq!(Sign::Minus.as_f64(), -1.0);
        assert_eq!(Sign::from(Direction::Backward), Sign::Minus);
        assert_eq!(Sign::Minus.to_string(), "-1");
    }
}
