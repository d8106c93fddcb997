//! Full edge-list-to-cycle-basis run.

use tracing::debug_span;

use crate::builder::{EdgeSpec, GraphBuilder};
use crate::config::CycleBasisConfig;
use crate::cycles::CycleBasis;
use crate::diagnostics::{Diagnostic, GraphSummary};
use crate::error::GraphResult;
use crate::forest::SpanningForest;
use crate::graph::Graph;

/// Everything derived from one edge list.
///
/// Recompute whenever the host topology changes; nothing here is updated in
/// place.
#[derive(Debug, Clone)]
pub struct NetworkAnalysis {
    pub graph: Graph,
    pub diagnostics: Vec<Diagnostic>,
    pub summary: GraphSummary,
    pub forest: SpanningForest,
    pub basis: CycleBasis,
}

/// Build the graph, spanning forest and cycle basis for `specs`.
pub fn analyze_network(
    specs: &[EdgeSpec],
    config: &CycleBasisConfig,
) -> GraphResult<NetworkAnalysis> {
    let built = {
        let _span = debug_span!("build_graph", edges = specs.len()).entered();
        GraphBuilder::from_specs(specs)?
    };
    let forest = {
        let _span = debug_span!("spanning_forest").entered();
        SpanningForest::build(&built.graph)
    };
    let basis = {
        let _span = debug_span!("cycle_basis", closing = forest.closing_edges().len()).entered();
        CycleBasis::compute(&built.graph, &forest, config)?
    };

    Ok(NetworkAnalysis {
        graph: built.graph,
        diagnostics: built.diagnostics,
        summary: built.summary,
        forest,
        basis,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_gives_empty_everything() {
        let a = analyze_network(&[], &CycleBasisConfig::default()).unwrap();
        assert!(a.graph.is_empty());
        assert!(a.graph.nodes().is_empty());
        assert!(a.diagnostics.is_empty());
        assert!(a.forest.tree_edges().is_empty());
        assert!(a.basis.is_empty());
        assert_eq!(a.summary, GraphSummary::default());
    }
}
