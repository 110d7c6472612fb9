//! # depscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and
//! traits of the library. Import it to get quick access to the essentials of
//! dependency-structure analysis.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all depscope operations
pub use crate::Error;

/// The result type used throughout depscope
pub use crate::Result;

// ================================================================================================
// Graph Engine
// ================================================================================================

/// Arena-based directed graph and its vertex handle
pub use crate::graph::{Digraph, VertexId};

/// Membership capability of vertex payloads
pub use crate::graph::Membership;

/// Strong component extraction and the condensed graph
pub use crate::graph::{Condensation, StrongComponent, StrongComponentProcessor};

/// Geometry of a strong component
pub use crate::graph::ComponentGeometry;

/// Longest-walk layering
pub use crate::graph::{LongestWalkProcessor, LongestWalks};

/// Lazy analysis facade and the layer map
pub use crate::graph::{LayerMap, StrongComponentAnalyzer};

/// Path search between two vertex sets
pub use crate::graph::{PathsFinder, VertexCondition};

// ================================================================================================
// Compiled Units
// ================================================================================================

/// Unit attribute payloads and declarations
pub use crate::units::{UnitAttributes, UnitDeclaration, UnitKind, UnitVertex};

/// Concurrent ingestion and graph building
pub use crate::units::{DependencyRegistry, GraphBuilder, UnitGraph};

/// Package projection and the top-level analyzer
pub use crate::units::{DependencyAnalyzer, PackageProcessor};
