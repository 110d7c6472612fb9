//! Path search between two vertex sets.
//!
//! An architecture gate asks questions of the form "which classes of set A reach
//! classes of set B, and through what". [`PathsFinder`] answers them: given a
//! start-set condition and a final-set condition, it returns the induced subgraph
//! of all vertices lying on at least one qualifying path from the start set to
//! the final set - optionally restricted to the shortest paths, or to direct
//! (length 1) paths.
//!
//! The search runs in two phases. The first phase computes, for every reachable
//! vertex, the shortest distance to *any* final-set vertex: a memoized post-order
//! walk that treats vertices on the current walk as distance-unknown (cycle guard)
//! and never routes through start-set vertices - a path that re-enters start
//! territory is not a path between the two sets. The second phase walks forward
//! from each start vertex collecting every vertex with a finite distance; with
//! `shortest_paths_only` it collects only arcs along which the distance decreases
//! by exactly one.
//!
//! Disjoint start and final sets are a valid query with an empty answer, never an
//! error. All scratch state lives in arrays local to one `find_paths` call, so a
//! finder can be reused and shared freely.

use crate::graph::{Digraph, VertexId};

/// Distance value for "no connection to the final set".
const UNREACHED: usize = usize::MAX;

/// Membership test for a set of vertices.
///
/// The engine never interprets name patterns itself; callers bring whatever
/// matching logic defines their sets. Closures over the vertex payload implement
/// the trait directly:
///
/// ```rust
/// use depscope::graph::VertexCondition;
///
/// let condition = |name: &&str| name.starts_with("core.");
/// assert!(condition.is_fulfilled(&"core.graph"));
/// ```
pub trait VertexCondition<N> {
    /// Returns `true` if the vertex with the specified payload belongs to the set.
    fn is_fulfilled(&self, payload: &N) -> bool;
}

impl<N, F> VertexCondition<N> for F
where
    F: Fn(&N) -> bool,
{
    fn is_fulfilled(&self, payload: &N) -> bool {
        self(payload)
    }
}

/// Searches for all (or only the shortest, or only direct) paths between the
/// vertices of a start set and the vertices of a final set.
///
/// # Examples
///
/// ```rust
/// use depscope::graph::{Digraph, PathsFinder};
///
/// let mut graph = Digraph::new();
/// let a = graph.add_vertex("a");
/// let b = graph.add_vertex("b");
/// let c = graph.add_vertex("c");
/// graph.add_arc(a, b);
/// graph.add_arc(b, c);
///
/// let finder = PathsFinder::new(|n: &&str| *n == "a", |n: &&str| *n == "c", true);
/// assert_eq!(finder.find_paths(&graph), vec![a, b, c]);
/// ```
pub struct PathsFinder<S, F> {
    start_set: S,
    final_set: F,
    shortest_paths_only: bool,
    direct_paths_only: bool,
}

impl<S, F> PathsFinder<S, F> {
    /// Creates a finder for the specified vertex conditions.
    ///
    /// # Arguments
    ///
    /// * `start_set` - Condition defining the start set
    /// * `final_set` - Condition defining the final set
    /// * `shortest_paths_only` - If `true` only the shortest paths are returned
    #[must_use]
    pub fn new(start_set: S, final_set: F, shortest_paths_only: bool) -> Self {
        Self::with_direct_paths(start_set, final_set, shortest_paths_only, false)
    }

    /// Creates a finder that additionally can be restricted to direct paths.
    ///
    /// # Arguments
    ///
    /// * `start_set` - Condition defining the start set
    /// * `final_set` - Condition defining the final set
    /// * `shortest_paths_only` - If `true` only the shortest paths are returned
    /// * `direct_paths_only` - If `true` only paths of length 1 are returned
    #[must_use]
    pub fn with_direct_paths(
        start_set: S,
        final_set: F,
        shortest_paths_only: bool,
        direct_paths_only: bool,
    ) -> Self {
        PathsFinder {
            start_set,
            final_set,
            shortest_paths_only,
            direct_paths_only,
        }
    }

    /// Returns the condition defining the start set.
    #[must_use]
    pub fn start_set(&self) -> &S {
        &self.start_set
    }

    /// Returns the condition defining the final set.
    #[must_use]
    pub fn final_set(&self) -> &F {
        &self.final_set
    }

    /// Returns `true` if only the shortest paths are searched.
    #[must_use]
    pub fn is_shortest_paths_only(&self) -> bool {
        self.shortest_paths_only
    }

    /// Returns `true` if only direct paths are searched.
    #[must_use]
    pub fn is_direct_paths_only(&self) -> bool {
        self.direct_paths_only
    }
}

struct Scratch {
    /// Shortest distance to any final-set vertex; [`UNREACHED`] until known.
    distance: Vec<usize>,
    /// Distance is final (memoized), or the vertex is barred from re-entry
    /// (start-set vertices, final-set vertices).
    settled: Vec<bool>,
    /// Vertices on the current distance walk; guards against cycles.
    on_path: Vec<bool>,
}

struct Frame {
    vertex: VertexId,
    arc: usize,
    best: usize,
}

impl<S, F> PathsFinder<S, F> {
    /// Finds all vertices lying on a qualifying path from the start set to the
    /// final set, including the start and final vertices themselves.
    ///
    /// # Arguments
    ///
    /// * `graph` - Complete graph, external references included
    ///
    /// # Returns
    ///
    /// The de-duplicated path vertex set in ascending id order. Empty when the
    /// two sets are not connected - that is a valid outcome, not an error.
    #[must_use]
    pub fn find_paths<N>(&self, graph: &Digraph<N>) -> Vec<VertexId>
    where
        S: VertexCondition<N>,
        F: VertexCondition<N>,
    {
        let mut scratch = Scratch {
            distance: vec![UNREACHED; graph.vertex_count()],
            settled: vec![false; graph.vertex_count()],
            on_path: vec![false; graph.vertex_count()],
        };
        let mut collected = vec![false; graph.vertex_count()];

        // Start vertices are barred from re-entry up front: a path between the
        // two sets never passes through start territory.
        for vertex in graph.ids() {
            if self.start_set.is_fulfilled(&graph[vertex]) {
                scratch.settled[vertex.index()] = true;
            }
        }

        for vertex in graph.ids() {
            if !self.start_set.is_fulfilled(&graph[vertex]) {
                continue;
            }
            if self.direct_paths_only {
                self.find_direct_paths(graph, vertex, &mut collected);
            } else {
                self.prepare_if_final(graph, vertex, &mut scratch);
                let length = self.shortest_distance(graph, vertex, &mut scratch);
                if length != UNREACHED {
                    scratch.distance[vertex.index()] = length;
                    self.follow_paths(graph, vertex, &scratch, &mut collected);
                }
            }
        }

        graph
            .ids()
            .filter(|vertex| collected[vertex.index()])
            .collect()
    }

    fn prepare_if_final<N>(&self, graph: &Digraph<N>, vertex: VertexId, scratch: &mut Scratch)
    where
        F: VertexCondition<N>,
    {
        if self.final_set.is_fulfilled(&graph[vertex]) {
            scratch.settled[vertex.index()] = true;
            scratch.distance[vertex.index()] = 0;
        }
    }

    /// Computes the shortest distance from `root` to any final-set vertex.
    ///
    /// Post-order walk on an explicit frame stack. A head that is settled (or on
    /// the current walk) contributes its memoized distance - or no distance at
    /// all when it belongs to the start set; an unsettled head is expanded first
    /// and contributes its freshly memoized distance on the way back up.
    fn shortest_distance<N>(
        &self,
        graph: &Digraph<N>,
        root: VertexId,
        scratch: &mut Scratch,
    ) -> usize
    where
        S: VertexCondition<N>,
        F: VertexCondition<N>,
    {
        let mut frames = vec![Frame {
            vertex: root,
            arc: 0,
            best: UNREACHED,
        }];
        scratch.on_path[root.index()] = true;

        loop {
            let top = frames.len() - 1;
            let tail = frames[top].vertex;
            let arc_index = frames[top].arc;

            if arc_index < graph.outgoing(tail).len() {
                frames[top].arc += 1;
                let head = graph.outgoing(tail)[arc_index];
                self.prepare_if_final(graph, head, scratch);
                if !scratch.on_path[head.index()] && !scratch.settled[head.index()] {
                    scratch.on_path[head.index()] = true;
                    frames.push(Frame {
                        vertex: head,
                        arc: 0,
                        best: UNREACHED,
                    });
                } else {
                    let length = if self.start_set.is_fulfilled(&graph[head]) {
                        UNREACHED
                    } else {
                        scratch.distance[head.index()]
                    };
                    frames[top].best = frames[top].best.min(length);
                }
            } else {
                let frame = match frames.pop() {
                    Some(frame) => frame,
                    None => return UNREACHED,
                };
                scratch.on_path[frame.vertex.index()] = false;
                let distance = if frame.best == UNREACHED {
                    UNREACHED
                } else {
                    frame.best + 1
                };
                if let Some(parent) = frames.last_mut() {
                    scratch.distance[frame.vertex.index()] = distance;
                    scratch.settled[frame.vertex.index()] = true;
                    parent.best = parent.best.min(distance);
                } else {
                    return distance;
                }
            }
        }
    }

    /// Collects every vertex on a qualifying forward path from `start`.
    fn follow_paths<N>(
        &self,
        graph: &Digraph<N>,
        start: VertexId,
        scratch: &Scratch,
        collected: &mut [bool],
    ) {
        collected[start.index()] = true;
        let mut worklist = vec![start];

        while let Some(vertex) = worklist.pop() {
            // Every vertex on the worklist has a finite positive distance.
            let next_distance = scratch.distance[vertex.index()] - 1;
            for &head in graph.outgoing(vertex) {
                let length = scratch.distance[head.index()];
                if length == UNREACHED || collected[head.index()] {
                    continue;
                }
                if !self.shortest_paths_only || length == next_distance {
                    collected[head.index()] = true;
                    if length > 0 {
                        worklist.push(head);
                    }
                }
            }
        }
    }

    /// Direct mode: a start vertex that is itself final stands alone, otherwise
    /// only immediate arcs into the final set count.
    fn find_direct_paths<N>(&self, graph: &Digraph<N>, vertex: VertexId, collected: &mut [bool])
    where
        F: VertexCondition<N>,
    {
        if self.final_set.is_fulfilled(&graph[vertex]) {
            collected[vertex.index()] = true;
            return;
        }
        for &head in graph.outgoing(vertex) {
            if self.final_set.is_fulfilled(&graph[head]) {
                collected[vertex.index()] = true;
                collected[head.index()] = true;
            }
        }
    }
}
