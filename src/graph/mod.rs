//! The directed-graph analysis engine.
//!
//! This module contains everything that operates on the bare graph structure,
//! independent of what the vertices represent: arena storage, the depth-first
//! traversal framework, strong component extraction with condensation and
//! geometry, longest-walk layering, the lazy analysis facade and the two-set
//! path search.
//!
//! # Key Components
//!
//! - [`Digraph`] / [`VertexId`] - Arena-based directed graph without multi-arcs
//! - [`DepthFirstVisitor`] / [`depth_first_search`] - Traversal framework all
//!   analysis passes are built on
//! - [`StrongComponentProcessor`] / [`Condensation`] - Tarjan strong component
//!   extraction and the acyclic component graph
//! - [`ComponentGeometry`] - Girth, eccentricities, radius/diameter, fragmenters
//! - [`LongestWalkProcessor`] - Layer indices over the condensation
//! - [`StrongComponentAnalyzer`] - Lazily computed, cached condensation + layers
//! - [`PathsFinder`] / [`VertexCondition`] - Boundary-aware path search
//!
//! # Examples
//!
//! ```rust
//! use depscope::graph::{Digraph, StrongComponentAnalyzer};
//!
//! let mut graph = Digraph::new();
//! let a = graph.add_vertex(());
//! let b = graph.add_vertex(());
//! graph.add_arc(a, b);
//! graph.add_arc(b, a);
//!
//! let analyzer = StrongComponentAnalyzer::new(graph);
//! let condensation = analyzer.condensation()?;
//! assert_eq!(condensation.component_count(), 1);
//!
//! let component = &condensation.components()[condensation.owner_of(a).unwrap()];
//! assert_eq!(component.geometry().unwrap().girth(), Some(2));
//! # Ok::<(), depscope::Error>(())
//! ```

/// Lazy analysis facade bundling condensation and layer map
pub mod analyzer;
/// Strong component extraction and graph condensation
pub mod components;
/// Geometric measures of a strong component
pub mod geometry;
/// Longest-walk layering of the condensed graph
pub mod layers;
/// Path search between two vertex sets
pub mod paths;
/// Generic depth-first traversal framework
pub mod traversal;
/// Arena-based directed graph storage
pub mod vertex;

pub use analyzer::{LayerMap, StrongComponentAnalyzer};
pub use components::{Condensation, StrongComponent, StrongComponentProcessor};
pub use geometry::ComponentGeometry;
pub use layers::{LongestWalkProcessor, LongestWalks};
pub use paths::{PathsFinder, VertexCondition};
pub use traversal::{depth_first_search, ArcKind, DepthFirstVisitor};
pub use vertex::{Digraph, Membership, VertexId};
