//! Strong component extraction and graph condensation.
//!
//! This module implements Tarjan's algorithm as a [`DepthFirstVisitor`] pass and
//! builds the condensed graph: one vertex per strongly connected component, with
//! an arc between two components whenever any member of the first references any
//! member of the second. The condensation of a directed graph is acyclic by
//! construction, which is what makes the layering pass possible.
//!
//! All Tarjan bookkeeping (visitation order, low links, the component stack) lives
//! in arrays owned by the pass and indexed by [`VertexId`]; nothing is written to
//! the input graph, so condensing the same graph twice - or condensing fragment
//! copies while computing geometry - can never interfere.

use rayon::prelude::*;

use crate::{
    graph::{
        geometry::{self, ComponentGeometry},
        traversal::{depth_first_search, ArcKind, DepthFirstVisitor},
        Digraph, Membership, VertexId,
    },
    Result,
};

/// A maximal set of mutually reachable vertices of the analyzed graph.
///
/// Members are ordered the way Tarjan's stack released them, reversed: index 0 is
/// the last-popped vertex, i.e. the component root at which the pop was triggered.
/// Downstream renderers rely on that ordering being deterministic for a given
/// input graph.
///
/// When the component was produced with geometry enabled it additionally carries
/// its [`ComponentGeometry`]: pairwise distance derived measures and the best
/// fragmenter analysis.
#[derive(Debug, Clone)]
pub struct StrongComponent {
    members: Vec<VertexId>,
    geometry: Option<ComponentGeometry>,
}

impl StrongComponent {
    /// Returns the member vertices of this component, root first.
    #[must_use]
    pub fn members(&self) -> &[VertexId] {
        &self.members
    }

    /// Returns the number of member vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if the component has no members. Never the case for
    /// components produced by [`StrongComponentProcessor`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns the geometry of this component, if it was calculated.
    #[must_use]
    pub fn geometry(&self) -> Option<&ComponentGeometry> {
        self.geometry.as_ref()
    }
}

impl Membership for StrongComponent {
    fn is_member(&self) -> bool {
        true
    }
}

/// The condensed form of an analyzed graph.
///
/// Owns the acyclic component graph plus the lookup table from every member
/// vertex of the original graph to its owning component. Non-member vertices
/// (external references) own no component.
#[derive(Debug, Clone)]
pub struct Condensation {
    components: Digraph<StrongComponent>,
    owners: Vec<Option<VertexId>>,
}

impl Condensation {
    /// Returns the acyclic graph of strong components.
    #[must_use]
    pub fn components(&self) -> &Digraph<StrongComponent> {
        &self.components
    }

    /// Returns the number of strong components.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.vertex_count()
    }

    /// Returns the component owning `vertex` in the original graph, or `None`
    /// for vertices outside the analyzed set.
    #[must_use]
    pub fn owner_of(&self, vertex: VertexId) -> Option<VertexId> {
        self.owners.get(vertex.index()).copied().flatten()
    }
}

/// Extracts the strong components of a directed graph and condenses it.
///
/// The implementation is based on Tarjan's algorithm, driven through the
/// [`depth_first_search`] framework:
///
/// - entering a vertex assigns its visitation order and initial low link and
///   pushes it onto the component stack;
/// - an expanded arc folds the head's low link into the tail's;
/// - a revisited arc folds the head's *order* into the tail's low link, but only
///   when the head was visited earlier and still sits on the component stack;
/// - closing a vertex whose low link equals its own order pops the stack down to
///   and including that vertex, forming one component.
///
/// # Geometry
///
/// When constructed with `calculate_geometry`, every component's
/// [`ComponentGeometry`] is computed during condensation. Components are disjoint
/// and geometry only reads the input graph, so the computation fans out across
/// components with rayon. The fragment-size part of geometry re-runs this
/// processor (geometry off) on private subgraph copies; the flag is what keeps
/// that recursion bounded.
///
/// # Examples
///
/// ```rust
/// use depscope::graph::{Digraph, StrongComponentProcessor};
///
/// let mut graph = Digraph::new();
/// let a = graph.add_vertex(());
/// let b = graph.add_vertex(());
/// let c = graph.add_vertex(());
/// graph.add_arc(a, b);
/// graph.add_arc(b, a);
/// graph.add_arc(b, c);
///
/// let condensation = StrongComponentProcessor::new(false).execute(&graph)?;
/// assert_eq!(condensation.component_count(), 2); // {a, b} and {c}
/// # Ok::<(), depscope::Error>(())
/// ```
pub struct StrongComponentProcessor {
    calculate_geometry: bool,
}

impl StrongComponentProcessor {
    /// Creates a processor.
    ///
    /// # Arguments
    ///
    /// * `calculate_geometry` - If `true` the geometry of every strong component
    ///   will be calculated. Otherwise not.
    #[must_use]
    pub fn new(calculate_geometry: bool) -> Self {
        StrongComponentProcessor { calculate_geometry }
    }

    /// Condenses `graph`, analyzing exactly the vertices whose payloads report
    /// themselves as members.
    ///
    /// # Errors
    ///
    /// Currently infallible in practice; the `Result` carries errors of the
    /// shared traversal contract.
    pub fn execute<N>(&self, graph: &Digraph<N>) -> Result<Condensation>
    where
        N: Membership + Sync,
    {
        self.execute_where(graph, |graph, vertex| graph[vertex].is_member())
    }

    /// Condenses `graph` with an explicit membership predicate.
    ///
    /// Used by the fragment-size trials, which analyze a component copy with one
    /// member excluded per trial instead of mutating any membership flag.
    pub(crate) fn execute_where<N, F>(&self, graph: &Digraph<N>, member: F) -> Result<Condensation>
    where
        N: Sync,
        F: Fn(&Digraph<N>, VertexId) -> bool,
    {
        let mut pass = TarjanPass {
            member,
            counter: 0,
            order: vec![usize::MAX; graph.vertex_count()],
            low: vec![usize::MAX; graph.vertex_count()],
            stack: Vec::new(),
            on_stack: vec![false; graph.vertex_count()],
            member_lists: Vec::new(),
            owners: vec![None; graph.vertex_count()],
        };
        depth_first_search(graph, &mut pass)?;

        let TarjanPass {
            member_lists,
            owners,
            ..
        } = pass;

        let geometries: Vec<Option<ComponentGeometry>> = if self.calculate_geometry {
            member_lists
                .par_iter()
                .map(|members| geometry::compute(graph, members).map(Some))
                .collect::<Result<Vec<_>>>()?
        } else {
            member_lists.iter().map(|_| None).collect()
        };

        let mut components = Digraph::with_capacity(member_lists.len());
        for (members, geometry) in member_lists.into_iter().zip(geometries) {
            components.add_vertex(StrongComponent { members, geometry });
        }

        let owners: Vec<Option<VertexId>> = owners
            .into_iter()
            .map(|owner| owner.map(VertexId::new))
            .collect();

        // Arc X->Y iff some member of X references some member of Y, X != Y.
        // The arena's one-arc-per-pair invariant absorbs duplicates.
        for vertex in graph.ids() {
            if let Some(tail) = owners[vertex.index()] {
                for &head_vertex in graph.outgoing(vertex) {
                    if let Some(head) = owners[head_vertex.index()] {
                        if head != tail {
                            components.add_arc(tail, head);
                        }
                    }
                }
            }
        }

        Ok(Condensation { components, owners })
    }
}

struct TarjanPass<F> {
    member: F,
    counter: usize,
    order: Vec<usize>,
    low: Vec<usize>,
    stack: Vec<VertexId>,
    on_stack: Vec<bool>,
    member_lists: Vec<Vec<VertexId>>,
    owners: Vec<Option<usize>>,
}

impl<N, F> DepthFirstVisitor<N> for TarjanPass<F>
where
    F: Fn(&Digraph<N>, VertexId) -> bool,
{
    fn follows(&self, graph: &Digraph<N>, vertex: VertexId) -> bool {
        (self.member)(graph, vertex)
    }

    fn open(&mut self, _graph: &Digraph<N>, vertex: VertexId) {
        self.order[vertex.index()] = self.counter;
        self.low[vertex.index()] = self.counter;
        self.counter += 1;
        self.stack.push(vertex);
        self.on_stack[vertex.index()] = true;
    }

    fn arc(
        &mut self,
        _graph: &Digraph<N>,
        tail: VertexId,
        head: VertexId,
        kind: ArcKind,
    ) -> Result<()> {
        match kind {
            ArcKind::Expanded => {
                self.low[tail.index()] = self.low[tail.index()].min(self.low[head.index()]);
            }
            ArcKind::Revisited => {
                if self.order[head.index()] < self.order[tail.index()]
                    && self.on_stack[head.index()]
                {
                    self.low[tail.index()] = self.low[tail.index()].min(self.order[head.index()]);
                }
            }
        }
        Ok(())
    }

    fn close(&mut self, _graph: &Digraph<N>, vertex: VertexId) {
        if self.low[vertex.index()] != self.order[vertex.index()] {
            return;
        }
        // This vertex is a component root: pop the stack down to and including it.
        // The pops arrive youngest first; reversing puts the root at index 0.
        let mut members = Vec::new();
        while let Some(&top) = self.stack.last() {
            if self.order[top.index()] < self.order[vertex.index()] {
                break;
            }
            self.stack.pop();
            self.on_stack[top.index()] = false;
            members.push(top);
        }
        members.reverse();

        let component = self.member_lists.len();
        for member in &members {
            self.owners[member.index()] = Some(component);
        }
        self.member_lists.push(members);
    }
}
