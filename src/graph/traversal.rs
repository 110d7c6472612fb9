//! Generic depth-first traversal framework.
//!
//! Every analysis pass in the engine is a depth-first walk over a [`Digraph`] that
//! accumulates its own result state. This module factors the walk itself out once:
//! visitation order, cycle-safe visited tracking and the membership gate live in
//! [`depth_first_search`], while passes implement the [`DepthFirstVisitor`] lifecycle
//! hooks.
//!
//! # Ordering Contract
//!
//! The driver reproduces the ordering of a recursive depth-first search exactly,
//! but runs on an explicit frame stack so that deep dependency chains cannot
//! exhaust the call stack:
//!
//! 1. `initialize` once, before any vertex is entered.
//! 2. Roots are taken in arena order; a root is entered only if it is unvisited
//!    and accepted by `follows`.
//! 3. `open(v)` when `v` is entered; its arcs are then examined in list order.
//! 4. An arc whose head is rejected by `follows` is skipped without any callback.
//! 5. An arc to an unvisited head expands the head first; the arc is reported as
//!    [`ArcKind::Expanded`] to the tail only after the head's entire subtree has
//!    closed - exactly where a recursive implementation would resume.
//! 6. An arc to an already-visited head is reported immediately as
//!    [`ArcKind::Revisited`].
//! 7. `close(v)` when all arcs of `v` have been examined.
//! 8. `finish` once, after the last root.
//!
//! Visited tracking is owned by the driver and fresh on every call, so a pass can
//! never observe stale flags from an earlier pass over the same graph.

use crate::{
    graph::{Digraph, VertexId},
    Result,
};

/// How an arc was encountered during the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcKind {
    /// The head was unvisited; its subtree has been fully expanded and closed
    /// before this arc was reported.
    Expanded,

    /// The head had already been visited when the arc was examined. The head may
    /// still be open (an ancestor on the current walk) or long closed - visitors
    /// that care about the difference track it themselves.
    Revisited,
}

/// Lifecycle hooks of a depth-first analysis pass.
///
/// Implementations accumulate results in their own state, indexed by [`VertexId`];
/// the driver never stores anything on the graph. Only the arc hook is fallible:
/// it is the one place where a pass can detect a structural-invariant violation
/// (see the layering pass), and an error aborts the walk immediately.
pub trait DepthFirstVisitor<N> {
    /// Called once before any vertex is entered.
    fn initialize(&mut self, graph: &Digraph<N>) {
        let _ = graph;
    }

    /// Membership gate for roots and arc heads.
    ///
    /// Returning `false` keeps the walk from entering `vertex` and suppresses all
    /// arc callbacks towards it. The default accepts every vertex.
    fn follows(&self, graph: &Digraph<N>, vertex: VertexId) -> bool {
        let _ = (graph, vertex);
        true
    }

    /// Called when `vertex` is entered, before any of its arcs are examined.
    fn open(&mut self, graph: &Digraph<N>, vertex: VertexId);

    /// Called for every followed arc, per the ordering contract above.
    ///
    /// # Errors
    ///
    /// An error aborts the traversal and is propagated to the caller of
    /// [`depth_first_search`].
    fn arc(&mut self, graph: &Digraph<N>, tail: VertexId, head: VertexId, kind: ArcKind)
        -> Result<()>;

    /// Called when all arcs of `vertex` have been examined.
    fn close(&mut self, graph: &Digraph<N>, vertex: VertexId);

    /// Called once after the last root has been processed.
    fn finish(&mut self, graph: &Digraph<N>) {
        let _ = graph;
    }
}

struct Frame {
    vertex: VertexId,
    arc: usize,
}

/// Runs `visitor` over every accepted, unvisited root of `graph` in arena order.
///
/// # Arguments
///
/// * `graph` - The graph to traverse
/// * `visitor` - The pass accumulating results
///
/// # Errors
///
/// Propagates the first error returned by the visitor's arc hook.
pub fn depth_first_search<N, V>(graph: &Digraph<N>, visitor: &mut V) -> Result<()>
where
    V: DepthFirstVisitor<N>,
{
    let mut visited = vec![false; graph.vertex_count()];
    visitor.initialize(graph);
    for root in graph.ids() {
        if !visited[root.index()] && visitor.follows(graph, root) {
            expand(graph, visitor, root, &mut visited)?;
        }
    }
    visitor.finish(graph);
    Ok(())
}

fn expand<N, V>(
    graph: &Digraph<N>,
    visitor: &mut V,
    root: VertexId,
    visited: &mut [bool],
) -> Result<()>
where
    V: DepthFirstVisitor<N>,
{
    let mut frames = vec![Frame { vertex: root, arc: 0 }];
    visited[root.index()] = true;
    visitor.open(graph, root);

    while !frames.is_empty() {
        let top = frames.len() - 1;
        let tail = frames[top].vertex;
        let arc_index = frames[top].arc;

        if arc_index < graph.outgoing(tail).len() {
            frames[top].arc += 1;
            let head = graph.outgoing(tail)[arc_index];
            if !visitor.follows(graph, head) {
                continue;
            }
            if visited[head.index()] {
                visitor.arc(graph, tail, head, ArcKind::Revisited)?;
            } else {
                visited[head.index()] = true;
                frames.push(Frame { vertex: head, arc: 0 });
                visitor.open(graph, head);
            }
        } else {
            visitor.close(graph, tail);
            frames.pop();
            if let Some(parent) = frames.last() {
                visitor.arc(graph, parent.vertex, tail, ArcKind::Expanded)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records the hook sequence as compact strings for order assertions.
    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
        skip: Vec<VertexId>,
    }

    impl DepthFirstVisitor<&'static str> for Recorder {
        fn initialize(&mut self, _graph: &Digraph<&'static str>) {
            self.events.push("init".into());
        }

        fn follows(&self, _graph: &Digraph<&'static str>, vertex: VertexId) -> bool {
            !self.skip.contains(&vertex)
        }

        fn open(&mut self, graph: &Digraph<&'static str>, vertex: VertexId) {
            self.events.push(format!("open {}", graph[vertex]));
        }

        fn arc(
            &mut self,
            graph: &Digraph<&'static str>,
            tail: VertexId,
            head: VertexId,
            kind: ArcKind,
        ) -> Result<()> {
            let tag = match kind {
                ArcKind::Expanded => "expand",
                ArcKind::Revisited => "revisit",
            };
            self.events
                .push(format!("{} {}->{}", tag, graph[tail], graph[head]));
            Ok(())
        }

        fn close(&mut self, graph: &Digraph<&'static str>, vertex: VertexId) {
            self.events.push(format!("close {}", graph[vertex]));
        }

        fn finish(&mut self, _graph: &Digraph<&'static str>) {
            self.events.push("finish".into());
        }
    }

    fn diamond() -> (Digraph<&'static str>, [VertexId; 4]) {
        let mut graph = Digraph::new();
        let a = graph.add_vertex("a");
        let b = graph.add_vertex("b");
        let c = graph.add_vertex("c");
        let d = graph.add_vertex("d");
        graph.add_arc(a, b);
        graph.add_arc(a, c);
        graph.add_arc(b, d);
        graph.add_arc(c, d);
        (graph, [a, b, c, d])
    }

    #[test]
    fn test_recursive_ordering_is_preserved() {
        let (graph, _) = diamond();
        let mut recorder = Recorder::default();
        depth_first_search(&graph, &mut recorder).unwrap();

        assert_eq!(
            recorder.events,
            vec![
                "init",
                "open a",
                "open b",
                "open d",
                "close d",
                "expand b->d",
                "close b",
                "expand a->b",
                "open c",
                "revisit c->d",
                "close c",
                "expand a->c",
                "close a",
                "finish",
            ]
        );
    }

    #[test]
    fn test_rejected_heads_produce_no_callbacks() {
        let (graph, [_, b, _, d]) = diamond();
        let mut recorder = Recorder {
            skip: vec![d],
            ..Recorder::default()
        };
        depth_first_search(&graph, &mut recorder).unwrap();

        assert!(recorder.events.iter().all(|event| !event.contains('d')));
        assert!(recorder.events.contains(&format!("open {}", graph[b])));
    }

    #[test]
    fn test_every_root_is_taken_in_arena_order() {
        let mut graph = Digraph::new();
        let a = graph.add_vertex("a");
        let b = graph.add_vertex("b");
        graph.add_arc(b, a); // b comes second but still becomes a root

        let mut recorder = Recorder::default();
        depth_first_search(&graph, &mut recorder).unwrap();

        assert_eq!(
            recorder.events,
            vec![
                "init",
                "open a",
                "close a",
                "open b",
                "revisit b->a",
                "close b",
                "finish",
            ]
        );
    }

    #[test]
    fn test_cycle_is_reported_as_revisit_not_reentered() {
        let mut graph = Digraph::new();
        let a = graph.add_vertex("a");
        let b = graph.add_vertex("b");
        graph.add_arc(a, b);
        graph.add_arc(b, a);

        let mut recorder = Recorder::default();
        depth_first_search(&graph, &mut recorder).unwrap();

        assert_eq!(
            recorder.events,
            vec![
                "init",
                "open a",
                "open b",
                "revisit b->a",
                "close b",
                "expand a->b",
                "close a",
                "finish",
            ]
        );
    }

    #[test]
    fn test_deep_chain_does_not_overflow_the_stack() {
        let mut graph = Digraph::new();
        let mut previous = graph.add_vertex(());
        for _ in 0..200_000 {
            let next = graph.add_vertex(());
            graph.add_arc(previous, next);
            previous = next;
        }

        struct Counter(usize);
        impl DepthFirstVisitor<()> for Counter {
            fn open(&mut self, _graph: &Digraph<()>, _vertex: VertexId) {
                self.0 += 1;
            }
            fn arc(
                &mut self,
                _graph: &Digraph<()>,
                _tail: VertexId,
                _head: VertexId,
                _kind: ArcKind,
            ) -> Result<()> {
                Ok(())
            }
            fn close(&mut self, _graph: &Digraph<()>, _vertex: VertexId) {}
        }

        let mut counter = Counter(0);
        depth_first_search(&graph, &mut counter).unwrap();
        assert_eq!(counter.0, graph.vertex_count());
    }
}
