//! kh-graph: fundamental cycle basis for KVL-enforced grid networks.
//!
//! Provides:
//! - Graph construction from the host's edge feed, with diagnostics
//! - Spanning forest over the KVL-enforced edges
//! - Tree path search
//! - Oriented cycle basis and the queries a solver needs for KVL rows
//!
//! # Example
//!
//! ```
//! use kh_graph::{CycleBasisConfig, EdgeSpec, Sign, analyze_network};
//!
//! let specs = vec![
//!     EdgeSpec::line("A", "n1", "n2", 10.0, 0.3, true),
//!     EdgeSpec::line("B", "n2", "n3", 5.0, 0.3, true),
//!     EdgeSpec::line("C", "n3", "n1", 8.0, 0.3, true),
//! ];
//! let analysis = analyze_network(&specs, &CycleBasisConfig::default()).unwrap();
//!
//! assert_eq!(analysis.basis.len(), 1);
//! let c = analysis.graph.edge_id("C").unwrap();
//! assert_eq!(analysis.basis.orientation_of(0, c), Some(Sign::Plus));
//! ```

pub mod builder;
pub mod config;
pub mod constraints;
pub mod cycles;
pub mod diagnostics;
pub mod error;
pub mod forest;
pub mod graph;
pub mod path;
pub mod pipeline;
pub(crate) mod validate;

// Re-exports for ergonomics
pub use builder::{BuiltGraph, EdgeSpec, GraphBuilder};
pub use config::CycleBasisConfig;
pub use constraints::KvlConstraint;
pub use cycles::{Cycle, CycleBasis, CycleTerm, Sign};
pub use diagnostics::{Diagnostic, GraphSummary};
pub use error::{GraphError, GraphResult};
pub use forest::SpanningForest;
pub use graph::{Edge, Graph, Node};
pub use path::{Direction, PathStep, find_tree_path};
pub use pipeline::{NetworkAnalysis, analyze_network};
