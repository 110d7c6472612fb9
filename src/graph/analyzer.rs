//! Lazy analysis facade over one input graph.
//!
//! [`StrongComponentAnalyzer`] bundles the two expensive derived structures of a
//! dependency graph - the condensation and the layer map - behind lazily computed,
//! cached accessors. The analyzer takes ownership of the graph and assumes it is
//! immutable from then on; there is no cache invalidation. Repeated accessor calls
//! return the identical cached structures, never a recomputation.

use std::sync::OnceLock;

use crate::{
    graph::{
        components::{Condensation, StrongComponentProcessor},
        layers::LongestWalkProcessor,
        Digraph, Membership, VertexId,
    },
    Result,
};

/// Layer index of every member vertex of the analyzed graph.
///
/// A vertex's layer is the longest-walk value of its owning strong component in
/// the condensed graph: vertices that depend on nothing sit at layer 0, and the
/// layer strictly decreases along every condensed arc. Vertices outside the
/// analyzed set carry no layer.
#[derive(Debug, Clone)]
pub struct LayerMap {
    layers: Vec<Option<usize>>,
}

impl LayerMap {
    /// Returns the layer index of `vertex`, or `None` for non-member vertices.
    #[must_use]
    pub fn layer_of(&self, vertex: VertexId) -> Option<usize> {
        self.layers.get(vertex.index()).copied().flatten()
    }

    /// Iterates over all member vertices with their layer index, in arena order.
    pub fn iter(&self) -> impl Iterator<Item = (VertexId, usize)> + '_ {
        self.layers
            .iter()
            .enumerate()
            .filter_map(|(index, layer)| layer.map(|layer| (VertexId::new(index), layer)))
    }
}

/// Analyzer of a directed graph for finding its strong components and layers.
///
/// # Examples
///
/// ```rust
/// use depscope::graph::{Digraph, StrongComponentAnalyzer};
///
/// let mut graph = Digraph::new();
/// let a = graph.add_vertex(());
/// let b = graph.add_vertex(());
/// graph.add_arc(a, b);
///
/// let analyzer = StrongComponentAnalyzer::new(graph);
/// assert_eq!(analyzer.condensation()?.component_count(), 2);
/// assert_eq!(analyzer.layer_map()?.layer_of(a), Some(1));
/// assert_eq!(analyzer.layer_map()?.layer_of(b), Some(0));
/// # Ok::<(), depscope::Error>(())
/// ```
#[derive(Debug)]
pub struct StrongComponentAnalyzer<N> {
    graph: Digraph<N>,
    condensation: OnceLock<Condensation>,
    layers: OnceLock<LayerMap>,
}

impl<N> StrongComponentAnalyzer<N>
where
    N: Membership + Sync,
{
    /// Creates an analyzer owning the specified graph.
    #[must_use]
    pub fn new(graph: Digraph<N>) -> Self {
        StrongComponentAnalyzer {
            graph,
            condensation: OnceLock::new(),
            layers: OnceLock::new(),
        }
    }

    /// Returns the analyzed graph. That is, the argument of the constructor.
    #[must_use]
    pub fn graph(&self) -> &Digraph<N> {
        &self.graph
    }

    /// Returns the condensed graph of strong components, with geometry.
    ///
    /// Computed on first access and cached; later calls return the identical
    /// structure.
    ///
    /// # Errors
    ///
    /// Propagates traversal errors; condensation itself cannot fail on a valid
    /// arena graph.
    pub fn condensation(&self) -> Result<&Condensation> {
        if let Some(condensation) = self.condensation.get() {
            return Ok(condensation);
        }
        let computed = StrongComponentProcessor::new(true).execute(&self.graph)?;
        Ok(self.condensation.get_or_init(|| computed))
    }

    /// Returns the mapping of member vertices onto their layer index.
    ///
    /// Computed on first access (condensing first if necessary) and cached.
    ///
    /// # Errors
    ///
    /// [`Error::CyclicCondensation`](crate::Error::CyclicCondensation) if the
    /// condensed graph violates its acyclicity invariant.
    pub fn layer_map(&self) -> Result<&LayerMap> {
        if let Some(layers) = self.layers.get() {
            return Ok(layers);
        }

        let condensation = self.condensation()?;
        let walks = LongestWalkProcessor::new().execute(condensation)?;

        let mut layers = vec![None; self.graph.vertex_count()];
        for (component, payload) in condensation.components().iter() {
            let walk = walks.walk_of(component);
            for &member in payload.members() {
                layers[member.index()] = Some(walk);
            }
        }

        Ok(self.layers.get_or_init(|| LayerMap { layers }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Flagged(bool);

    impl Membership for Flagged {
        fn is_member(&self) -> bool {
            self.0
        }
    }

    #[test]
    fn test_condensation_is_cached_not_recomputed() {
        let mut graph = Digraph::new();
        let a = graph.add_vertex(Flagged(true));
        let b = graph.add_vertex(Flagged(true));
        graph.add_arc(a, b);

        let analyzer = StrongComponentAnalyzer::new(graph);
        let first = analyzer.condensation().unwrap();
        let second = analyzer.condensation().unwrap();
        assert!(std::ptr::eq(first, second));

        let first_layers = analyzer.layer_map().unwrap();
        let second_layers = analyzer.layer_map().unwrap();
        assert!(std::ptr::eq(first_layers, second_layers));
    }

    #[test]
    fn test_cycle_members_share_their_component_layer() {
        let mut graph = Digraph::new();
        let a = graph.add_vertex(Flagged(true));
        let b = graph.add_vertex(Flagged(true));
        let c = graph.add_vertex(Flagged(true));
        let sink = graph.add_vertex(Flagged(true));
        graph.add_arc(a, b);
        graph.add_arc(b, c);
        graph.add_arc(c, a);
        graph.add_arc(c, sink);

        let analyzer = StrongComponentAnalyzer::new(graph);
        let layers = analyzer.layer_map().unwrap();

        assert_eq!(layers.layer_of(a), Some(1));
        assert_eq!(layers.layer_of(b), Some(1));
        assert_eq!(layers.layer_of(c), Some(1));
        assert_eq!(layers.layer_of(sink), Some(0));
    }

    #[test]
    fn test_external_vertices_have_no_layer() {
        let mut graph = Digraph::new();
        let a = graph.add_vertex(Flagged(true));
        let external = graph.add_vertex(Flagged(false));
        graph.add_arc(a, external);

        let analyzer = StrongComponentAnalyzer::new(graph);
        let layers = analyzer.layer_map().unwrap();

        assert_eq!(layers.layer_of(a), Some(0));
        assert_eq!(layers.layer_of(external), None);
        assert_eq!(layers.iter().count(), 1);
    }

    #[test]
    fn test_empty_graph_yields_empty_results() {
        let analyzer: StrongComponentAnalyzer<Flagged> =
            StrongComponentAnalyzer::new(Digraph::new());
        assert_eq!(analyzer.condensation().unwrap().component_count(), 0);
        assert_eq!(analyzer.layer_map().unwrap().iter().count(), 0);
    }
}
