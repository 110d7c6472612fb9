//! Longest-walk layering of the condensed graph.
//!
//! Once a graph has been condensed into its acyclic component graph, every
//! component can be assigned the length of the longest directed walk starting at
//! it. That number is the component's layer index: components that depend on
//! nothing sit at layer 0, and along every condensed arc the layer strictly
//! decreases towards the leaves. Architecture gates compare these indices against
//! declared layering rules.
//!
//! The pass assumes its input is acyclic. An arc into a component that is visited
//! and still active would mean the condensation produced a cyclic "acyclic" graph;
//! that is a broken structural invariant and aborts the pass with
//! [`Error::CyclicCondensation`](crate::Error::CyclicCondensation) rather than
//! being silently recovered.

use crate::{
    graph::{
        components::Condensation,
        traversal::{depth_first_search, ArcKind, DepthFirstVisitor},
        Digraph, VertexId,
    },
    Error, Result,
};

/// Longest-walk values of every component of a condensation.
#[derive(Debug, Clone)]
pub struct LongestWalks {
    walks: Vec<usize>,
    ascending: Vec<VertexId>,
}

impl LongestWalks {
    /// Returns the longest-walk value of the specified component.
    #[must_use]
    pub fn walk_of(&self, component: VertexId) -> usize {
        self.walks[component.index()]
    }

    /// Returns all component ids ordered by ascending walk length.
    ///
    /// The order is stable: components with equal walk length keep their arena
    /// order. It exists for presentation only - the layer values themselves do
    /// not depend on it.
    #[must_use]
    pub fn ascending(&self) -> &[VertexId] {
        &self.ascending
    }
}

/// Calculates for each component of a condensation the longest outgoing walk.
///
/// # Examples
///
/// ```rust
/// use depscope::graph::{Digraph, LongestWalkProcessor, StrongComponentProcessor};
///
/// let mut graph = Digraph::new();
/// let a = graph.add_vertex(());
/// let b = graph.add_vertex(());
/// graph.add_arc(a, b);
///
/// let condensation = StrongComponentProcessor::new(false).execute(&graph)?;
/// let walks = LongestWalkProcessor::new().execute(&condensation)?;
///
/// let a_component = condensation.owner_of(a).unwrap();
/// let b_component = condensation.owner_of(b).unwrap();
/// assert_eq!(walks.walk_of(a_component), 1);
/// assert_eq!(walks.walk_of(b_component), 0);
/// # Ok::<(), depscope::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct LongestWalkProcessor;

impl LongestWalkProcessor {
    /// Creates a processor.
    #[must_use]
    pub fn new() -> Self {
        LongestWalkProcessor
    }

    /// Computes the longest walk of every component.
    ///
    /// # Errors
    ///
    /// [`Error::CyclicCondensation`] if the component graph turns out not to be
    /// acyclic, which indicates a bug in component construction.
    pub fn execute(&self, condensation: &Condensation) -> Result<LongestWalks> {
        self.execute_graph(condensation.components())
    }

    /// Shape-only entry point: the walk lengths depend only on the arcs.
    pub(crate) fn execute_graph<N>(&self, graph: &Digraph<N>) -> Result<LongestWalks> {
        let mut pass = WalkPass {
            active: vec![false; graph.vertex_count()],
            walks: vec![0; graph.vertex_count()],
            ascending: Vec::new(),
        };
        depth_first_search(graph, &mut pass)?;

        Ok(LongestWalks {
            walks: pass.walks,
            ascending: pass.ascending,
        })
    }
}

struct WalkPass {
    active: Vec<bool>,
    walks: Vec<usize>,
    ascending: Vec<VertexId>,
}

impl<N> DepthFirstVisitor<N> for WalkPass {
    fn open(&mut self, _graph: &Digraph<N>, vertex: VertexId) {
        self.active[vertex.index()] = true;
        self.walks[vertex.index()] = 0;
    }

    fn arc(
        &mut self,
        _graph: &Digraph<N>,
        tail: VertexId,
        head: VertexId,
        _kind: ArcKind,
    ) -> Result<()> {
        if self.active[head.index()] {
            // An active head lies on the current walk: the supposedly acyclic
            // input contains a directed cycle.
            return Err(Error::CyclicCondensation {
                component: head.index(),
            });
        }
        self.walks[tail.index()] = self.walks[tail.index()].max(1 + self.walks[head.index()]);
        Ok(())
    }

    fn close(&mut self, _graph: &Digraph<N>, vertex: VertexId) {
        self.active[vertex.index()] = false;
    }

    fn finish(&mut self, graph: &Digraph<N>) {
        let mut ascending: Vec<VertexId> = graph.ids().collect();
        ascending.sort_by_key(|id| self.walks[id.index()]);
        self.ascending = ascending;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walks_of(arcs: &[(usize, usize)], count: usize) -> Result<(LongestWalks, Vec<VertexId>)> {
        let mut graph: Digraph<()> = Digraph::new();
        let ids: Vec<VertexId> = (0..count).map(|_| graph.add_vertex(())).collect();
        for &(tail, head) in arcs {
            graph.add_arc(ids[tail], ids[head]);
        }
        LongestWalkProcessor::new()
            .execute_graph(&graph)
            .map(|walks| (walks, ids))
    }

    #[test]
    fn test_chain_counts_down_to_zero() {
        let (walks, ids) = walks_of(&[(0, 1), (1, 2)], 3).unwrap();
        assert_eq!(walks.walk_of(ids[0]), 2);
        assert_eq!(walks.walk_of(ids[1]), 1);
        assert_eq!(walks.walk_of(ids[2]), 0);
    }

    #[test]
    fn test_sinks_sit_at_layer_zero() {
        let (walks, ids) = walks_of(&[(0, 2), (1, 2)], 4).unwrap();
        assert_eq!(walks.walk_of(ids[2]), 0);
        assert_eq!(walks.walk_of(ids[3]), 0);
    }

    #[test]
    fn test_longest_path_wins_over_shorter_ones() {
        // 0 -> 3 directly and 0 -> 1 -> 2 -> 3: the long way dominates.
        let (walks, ids) = walks_of(&[(0, 3), (0, 1), (1, 2), (2, 3)], 4).unwrap();
        assert_eq!(walks.walk_of(ids[0]), 3);
        assert_eq!(walks.walk_of(ids[1]), 2);
        assert_eq!(walks.walk_of(ids[2]), 1);
        assert_eq!(walks.walk_of(ids[3]), 0);
    }

    #[test]
    fn test_walk_decreases_strictly_along_every_arc() {
        let arcs = [(0, 1), (0, 2), (1, 3), (2, 3), (2, 4), (4, 3)];
        let (walks, ids) = walks_of(&arcs, 5).unwrap();
        for &(tail, head) in &arcs {
            assert!(walks.walk_of(ids[tail]) > walks.walk_of(ids[head]));
        }
    }

    #[test]
    fn test_ascending_order_is_stable() {
        let (walks, ids) = walks_of(&[(0, 1), (2, 3)], 4).unwrap();
        // Walks: 1, 0, 1, 0 - ties keep arena order.
        assert_eq!(walks.ascending(), &[ids[1], ids[3], ids[0], ids[2]]);
    }

    #[test]
    fn test_cycle_is_a_structural_violation() {
        let result = walks_of(&[(0, 1), (1, 0)], 2);
        assert!(matches!(
            result,
            Err(Error::CyclicCondensation { component: 0 })
        ));
    }

    #[test]
    fn test_self_loop_is_a_structural_violation() {
        let result = walks_of(&[(0, 0)], 1);
        assert!(matches!(result, Err(Error::CyclicCondensation { .. })));
    }
}
