//! Top-level analysis facade over a built unit graph.
//!
//! [`DependencyAnalyzer`] is what a build-time gate talks to: it owns the unit
//! graph, lazily derives the package graph from it, and exposes both levels'
//! condensations, layer maps and cycle listings through cached accessors. All
//! heavy lifting is delegated to the engine in [`crate::graph`]; this type only
//! wires the unit and package levels together and keeps name-based lookup
//! working across them.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::{
    graph::{Condensation, Digraph, LayerMap, StrongComponentAnalyzer, VertexId},
    units::{builder::UnitGraph, packages::PackageProcessor, types::UnitVertex},
    Result,
};

struct PackageAnalysis {
    analyzer: StrongComponentAnalyzer<UnitVertex>,
    index: HashMap<String, VertexId>,
}

/// Analyzer of a unit dependency graph and its derived package graph.
///
/// # Examples
///
/// ```rust
/// use depscope::units::{DependencyAnalyzer, GraphBuilder, UnitAttributes, UnitDeclaration};
///
/// let units = GraphBuilder::new(false).build(&[
///     UnitDeclaration::with_references(
///         UnitAttributes::class("app.Main", None, 100),
///         vec!["core.Engine".to_string()],
///     ),
///     UnitDeclaration::new(UnitAttributes::class("core.Engine", None, 300)),
/// ]);
///
/// let analyzer = DependencyAnalyzer::new(units);
/// assert!(analyzer.unit_cycles()?.is_empty());
/// assert_eq!(analyzer.layer_of_unit("app.Main")?, Some(1));
/// assert_eq!(analyzer.layer_of_unit("core.Engine")?, Some(0));
/// # Ok::<(), depscope::Error>(())
/// ```
pub struct DependencyAnalyzer {
    units: StrongComponentAnalyzer<UnitVertex>,
    index: HashMap<String, VertexId>,
    packages: OnceLock<PackageAnalysis>,
}

impl DependencyAnalyzer {
    /// Creates an analyzer owning the specified unit graph.
    #[must_use]
    pub fn new(units: UnitGraph) -> Self {
        let (graph, index) = units.into_parts();
        DependencyAnalyzer {
            units: StrongComponentAnalyzer::new(graph),
            index,
            packages: OnceLock::new(),
        }
    }

    /// Returns the unit dependency graph.
    #[must_use]
    pub fn unit_graph(&self) -> &Digraph<UnitVertex> {
        self.units.graph()
    }

    /// Returns the vertex of the unit with the specified name.
    #[must_use]
    pub fn unit_vertex(&self, name: &str) -> Option<VertexId> {
        self.index.get(name).copied()
    }

    /// Returns the condensed unit graph, computing it on first access.
    ///
    /// # Errors
    ///
    /// Propagates engine errors; see [`StrongComponentAnalyzer::condensation`].
    pub fn unit_condensation(&self) -> Result<&Condensation> {
        self.units.condensation()
    }

    /// Returns the unit layer map, computing it on first access.
    ///
    /// # Errors
    ///
    /// Propagates engine errors; see [`StrongComponentAnalyzer::layer_map`].
    pub fn unit_layers(&self) -> Result<&LayerMap> {
        self.units.layer_map()
    }

    /// Returns the layer index of the named unit, or `None` for unknown or
    /// external units.
    ///
    /// # Errors
    ///
    /// Propagates engine errors of the layer computation.
    pub fn layer_of_unit(&self, name: &str) -> Result<Option<usize>> {
        let Some(vertex) = self.unit_vertex(name) else {
            return Ok(None);
        };
        Ok(self.unit_layers()?.layer_of(vertex))
    }

    /// Returns the component ids of all unit-level cycles: strong components
    /// with more than one member, or with a self-referencing single member.
    ///
    /// # Errors
    ///
    /// Propagates engine errors of the condensation.
    pub fn unit_cycles(&self) -> Result<Vec<VertexId>> {
        Ok(cycle_components(
            self.units.graph(),
            self.unit_condensation()?,
        ))
    }

    /// Returns the derived package graph, computing it on first access.
    #[must_use]
    pub fn package_graph(&self) -> &Digraph<UnitVertex> {
        self.packages().analyzer.graph()
    }

    /// Returns the vertex of the package with the specified name.
    #[must_use]
    pub fn package_vertex(&self, name: &str) -> Option<VertexId> {
        self.packages().index.get(name).copied()
    }

    /// Returns the condensed package graph.
    ///
    /// # Errors
    ///
    /// Propagates engine errors; see [`StrongComponentAnalyzer::condensation`].
    pub fn package_condensation(&self) -> Result<&Condensation> {
        self.packages().analyzer.condensation()
    }

    /// Returns the package layer map.
    ///
    /// # Errors
    ///
    /// Propagates engine errors; see [`StrongComponentAnalyzer::layer_map`].
    pub fn package_layers(&self) -> Result<&LayerMap> {
        self.packages().analyzer.layer_map()
    }

    /// Returns the component ids of all package-level cycles.
    ///
    /// Intra-package unit references surface here as girth-1 self-references;
    /// a package depending on itself through its own units counts as a cycle
    /// of size one.
    ///
    /// # Errors
    ///
    /// Propagates engine errors of the condensation.
    pub fn package_cycles(&self) -> Result<Vec<VertexId>> {
        let packages = self.packages();
        Ok(cycle_components(
            packages.analyzer.graph(),
            packages.analyzer.condensation()?,
        ))
    }

    fn packages(&self) -> &PackageAnalysis {
        self.packages.get_or_init(|| {
            let projected = PackageProcessor::new().execute(self.units.graph());
            let (graph, index) = projected.into_parts();
            PackageAnalysis {
                analyzer: StrongComponentAnalyzer::new(graph),
                index,
            }
        })
    }
}

/// Components that constitute cycles: more than one member, or one member
/// referencing itself.
fn cycle_components(graph: &Digraph<UnitVertex>, condensation: &Condensation) -> Vec<VertexId> {
    condensation
        .components()
        .iter()
        .filter(|(_, component)| {
            component.len() > 1
                || component
                    .members()
                    .iter()
                    .any(|&member| graph.outgoing(member).contains(&member))
        })
        .map(|(id, _)| id)
        .collect()
}
