//! Edge descriptor checks and graph consistency validation.

use kh_core::{KhError, Real, ensure_finite};

use crate::builder::EdgeSpec;
use crate::diagnostics::Diagnostic;
use crate::error::{GraphError, GraphResult};
use crate::graph::{Edge, Node};

/// Check the physical input contract of a descriptor.
///
/// Lengths feed reactance calculations downstream, so a negative or
/// non-finite value is fatal for the whole build.
pub(crate) fn check_contract(spec: &EdgeSpec) -> GraphResult<()> {
    finite(spec, "length_km", spec.length_km)?;
    finite(spec, "reactance_per_km", spec.reactance_per_km)?;
    if spec.length_km < 0.0 {
        return Err(GraphError::NegativeLength {
            edge: spec.id.clone(),
            length_km: spec.length_km,
        });
    }
    Ok(())
}

fn finite(spec: &EdgeSpec, what: &'static str, value: Real) -> GraphResult<Real> {
    ensure_finite(value, what).map_err(|err| match err {
        KhError::NonFinite { what, value } => GraphError::NonFinite {
            edge: spec.id.clone(),
            what,
            value,
        },
        other => GraphError::Core(other),
    })
}

/// Resolve the single from-bus and single to-bus of a descriptor.
pub(crate) fn resolve_endpoints(spec: &EdgeSpec) -> Result<(&str, &str), Diagnostic> {
    let edge = || spec.id.clone();
    let from = match spec.inputs.as_slice() {
        [] => return Err(Diagnostic::NoInputs { edge: edge() }),
        [single] => single,
        many => {
            return Err(Diagnostic::MultipleInputs {
                edge: edge(),
                count: many.len(),
            });
        }
    };
    let to = match spec.outputs.as_slice() {
        [] => return Err(Diagnostic::NoOutputs { edge: edge() }),
        [single] => single,
        many => {
            return Err(Diagnostic::MultipleOutputs {
                edge: edge(),
                count: many.len(),
            });
        }
    };
    if from == to {
        return Err(Diagnostic::SelfLoop {
            edge: edge(),
            node: from.clone(),
        });
    }
    Ok((from.as_str(), to.as_str()))
}

/// Validate the graph structure: IDs match positions and all references exist.
pub(crate) fn validate_structure(nodes: &[Node], edges: &[Edge]) -> GraphResult<()> {
    for (i, node) in nodes.iter().enumerate() {
        if node.id.slot() != i {
            return Err(invariant(format!("node {} stored at position {}", node.id, i)));
        }
    }

    for (i, edge) in edges.iter().enumerate() {
        if edge.id.slot() != i {
            return Err(invariant(format!("edge {} stored at position {}", edge.id, i)));
        }
        for end in [edge.from, edge.to] {
            if end.slot() >= nodes.len() {
                return Err(KhError::IndexOob {
                    what: "edge endpoint",
                    index: end.slot(),
                    len: nodes.len(),
                }
                .into());
            }
        }
        if edge.from == edge.to {
            return Err(invariant(format!("edge {} is a self-loop", edge.name)));
        }
    }

    Ok(())
}

fn invariant(what: String) -> GraphError {
    KhError::Invariant { what }.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kh_core::Id;

    fn spec(inputs: &[&str], outputs: &[&str]) -> EdgeSpec {
        EdgeSpec {
            id: "P".into(),
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            outputs: outputs.iter().map(|s| s.to_string()).collect(),
            length_km: 1.0,
            reactance_per_km: 0.1,
            enforce_kvl: true,
        }
    }

    #[test]
    fn resolves_single_links() {
        let s = spec(&["a"], &["b"]);
        assert_eq!(resolve_endpoints(&s), Ok(("a", "b")));
    }

    #[test]
    fn missing_and_multiple_links() {
        assert!(matches!(
            resolve_endpoints(&spec(&[], &["b"])),
            Err(Diagnostic::NoInputs { .. })
        ));
        assert!(matches!(
            resolve_endpoints(&spec(&["a"], &[])),
            Err(Diagnostic::NoOutputs { .. })
        ));
        assert!(matches!(
            resolve_endpoints(&spec(&["a", "c"], &["b"])),
            Err(Diagnostic::MultipleInputs { count: 2, .. })
        ));
        assert!(matches!(
            resolve_endpoints(&spec(&["a"], &["b", "c", "d"])),
            Err(Diagnostic::MultipleOutputs { count: 3, .. })
        ));
    }

    #[test]
    fn self_loop_is_a_diagnostic() {
        assert!(matches!(
            resolve_endpoints(&spec(&["a"], &["a"])),
            Err(Diagnostic::SelfLoop { .. })
        ));
    }

    #[test]
    fn contract_rejects_negative_and_nan() {
        let mut s = spec(&["a"], &["b"]);
        assert!(check_contract(&s).is_ok());

        s.length_km = 0.0;
        assert!(check_contract(&s).is_ok());

        s.length_km = -0.5;
        assert!(matches!(
            check_contract(&s),
            Err(GraphError::NegativeLength { .. })
        ));

        s.length_km = Real::INFINITY;
        match check_contract(&s) {
            Err(GraphError::NonFinite { edge, what, value }) => {
                assert_eq!(edge, "P");
                assert_eq!(what, "length_km");
                assert_eq!(value, Real::INFINITY);
            }
            other => panic!("expected NonFinite length, got {other:?}"),
        }

        s.length_km = 1.0;
        s.reactance_per_km = Real::NAN;
        assert!(matches!(
            check_contract(&s),
            Err(GraphError::NonFinite {
                what: "reactance_per_km",
                ..
            })
        ));
    }

    #[test]
    fn validate_empty_graph() {
        assert!(validate_structure(&[], &[]).is_ok());
    }

    #[test]
    fn validate_dangling_endpoint() {
        let nodes = vec![Node {
            id: Id::from_index(0),
            name: "a".into(),
        }];
        let edges = vec![Edge {
            id: Id::from_index(0),
            name: "E".into(),
            from: Id::from_index(0),
            to: Id::from_index(5),
            length_km: 1.0,
            reactance_per_km: 0.1,
            enforce_kvl: true,
        }];
        assert!(matches!(
            validate_structure(&nodes, &edges),
            Err(GraphError::Core(KhError::IndexOob { index: 5, .. }))
        ));
    }
}
