//! Geometric measures of a strong component.
//!
//! Given the member set of one strong component, this module derives the measures
//! an architecture gate reports about a cycle: the girth (shortest internal cycle),
//! per-member eccentricities with radius, diameter and center, and the fragmenter
//! analysis (which member's removal breaks the cycle up the most).
//!
//! Distances come from a Floyd-Warshall relaxation over the component's induced
//! subgraph. The diagonal is deliberately NOT seeded with zero: after relaxation,
//! `dist[i][i]` is the length of the shortest cycle through member `i`, or stays at
//! the sentinel when `i` lies on no cycle - which is why the girth is surfaced as
//! an `Option` instead of a sentinel value.
//!
//! Fragment sizes re-run the strong component extraction once per member on a
//! private copy of the induced subgraph with that member excluded, making the
//! whole computation O(n * Tarjan) + O(n^3). Components are expected to stay small
//! relative to the whole graph, so this cost is bounded by the largest cycle, not
//! by the code base.

use std::collections::HashMap;

use crate::{
    graph::{components::StrongComponentProcessor, Digraph, VertexId},
    Result,
};

/// Distance sentinel for "no connection yet"; half the integer range so one
/// relaxation step can never overflow.
const UNCONNECTED: usize = usize::MAX / 2;

/// Distance-derived measures of one strong component.
///
/// All per-member slices are parallel to the component's member list.
#[derive(Debug, Clone)]
pub struct ComponentGeometry {
    girth: Option<usize>,
    eccentricities: Vec<usize>,
    radius: usize,
    diameter: usize,
    center: Vec<VertexId>,
    maximum_fragment_sizes: Vec<usize>,
    best_fragment_size: usize,
    best_fragmenters: Vec<VertexId>,
}

impl ComponentGeometry {
    /// Returns the length of the shortest cycle inside the component, or `None`
    /// when no member lies on an internal cycle (always the case for a
    /// single-member component without a self-reference).
    #[must_use]
    pub fn girth(&self) -> Option<usize> {
        self.girth
    }

    /// Returns the eccentricity of every member: its greatest shortest-path
    /// distance to any other member.
    #[must_use]
    pub fn eccentricities(&self) -> &[usize] {
        &self.eccentricities
    }

    /// Returns the smallest eccentricity.
    #[must_use]
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Returns the largest eccentricity.
    #[must_use]
    pub fn diameter(&self) -> usize {
        self.diameter
    }

    /// Returns the members whose eccentricity equals the radius.
    #[must_use]
    pub fn center_vertices(&self) -> &[VertexId] {
        &self.center
    }

    /// Returns, for every member, the size of the largest strong component that
    /// remains after removing that member from the component.
    #[must_use]
    pub fn maximum_fragment_sizes(&self) -> &[usize] {
        &self.maximum_fragment_sizes
    }

    /// Returns the smallest maximum fragment size.
    #[must_use]
    pub fn best_fragment_size(&self) -> usize {
        self.best_fragment_size
    }

    /// Returns the members whose maximum fragment size equals the best fragment
    /// size - the vertices whose removal fragments the cycle the most.
    #[must_use]
    pub fn best_fragmenters(&self) -> &[VertexId] {
        &self.best_fragmenters
    }
}

/// Computes the geometry of the component formed by `members` of `graph`.
///
/// `members` must be the member list of one strong component; arcs leaving the
/// member set are ignored.
pub(crate) fn compute<N>(graph: &Digraph<N>, members: &[VertexId]) -> Result<ComponentGeometry>
where
    N: Sync,
{
    let index_of: HashMap<VertexId, usize> = members
        .iter()
        .enumerate()
        .map(|(index, &member)| (member, index))
        .collect();

    let distances = calculate_distances(graph, members, &index_of);
    let n = members.len();

    let mut girth = UNCONNECTED;
    let mut eccentricities = vec![0usize; n];
    for i in 0..n {
        girth = girth.min(distances[i][i]);
        for j in 0..n {
            if i != j {
                eccentricities[i] = eccentricities[i].max(distances[i][j]);
            }
        }
    }
    let girth = if girth >= UNCONNECTED { None } else { Some(girth) };

    let radius = eccentricities.iter().copied().min().unwrap_or(0);
    let diameter = eccentricities.iter().copied().max().unwrap_or(0);

    let maximum_fragment_sizes = calculate_maximum_fragment_sizes(graph, members, &index_of)?;
    let best_fragment_size = maximum_fragment_sizes.iter().copied().min().unwrap_or(0);

    let mut center = Vec::new();
    let mut best_fragmenters = Vec::new();
    for i in 0..n {
        if eccentricities[i] == radius {
            center.push(members[i]);
        }
        if maximum_fragment_sizes[i] == best_fragment_size {
            best_fragmenters.push(members[i]);
        }
    }

    Ok(ComponentGeometry {
        girth,
        eccentricities,
        radius,
        diameter,
        center,
        maximum_fragment_sizes,
        best_fragment_size,
        best_fragmenters,
    })
}

/// All-pairs shortest paths over the induced subgraph, one arc = distance 1.
fn calculate_distances<N>(
    graph: &Digraph<N>,
    members: &[VertexId],
    index_of: &HashMap<VertexId, usize>,
) -> Vec<Vec<usize>> {
    let n = members.len();
    let mut distances = vec![vec![UNCONNECTED; n]; n];
    for (i, &member) in members.iter().enumerate() {
        for head in graph.outgoing(member) {
            if let Some(&j) = index_of.get(head) {
                distances[i][j] = 1;
            }
        }
    }

    for k in 0..n {
        for i in 0..n {
            for j in 0..n {
                let through = distances[i][k] + distances[k][j];
                if through < distances[i][j] {
                    distances[i][j] = through;
                }
            }
        }
    }

    distances
}

/// For every member, the size of the largest strong component surviving its removal.
///
/// Works on a private copy of the induced subgraph; each trial excludes one
/// vertex through the membership predicate, so nothing has to be mutated and
/// restored between trials.
fn calculate_maximum_fragment_sizes<N>(
    graph: &Digraph<N>,
    members: &[VertexId],
    index_of: &HashMap<VertexId, usize>,
) -> Result<Vec<usize>> {
    let mut fragment_graph: Digraph<()> = Digraph::with_capacity(members.len());
    let ids: Vec<VertexId> = members.iter().map(|_| fragment_graph.add_vertex(())).collect();
    for (i, &member) in members.iter().enumerate() {
        for head in graph.outgoing(member) {
            if let Some(&j) = index_of.get(head) {
                fragment_graph.add_arc(ids[i], ids[j]);
            }
        }
    }

    let processor = StrongComponentProcessor::new(false);
    let mut maximum_fragment_sizes = Vec::with_capacity(members.len());
    for &excluded in &ids {
        let fragments = processor.execute_where(&fragment_graph, |_, vertex| vertex != excluded)?;
        let largest = fragments
            .components()
            .iter()
            .map(|(_, component)| component.len())
            .max()
            .unwrap_or(0);
        maximum_fragment_sizes.push(largest);
    }

    Ok(maximum_fragment_sizes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member_graph(arcs: &[(usize, usize)], count: usize) -> (Digraph<()>, Vec<VertexId>) {
        let mut graph = Digraph::new();
        let ids: Vec<VertexId> = (0..count).map(|_| graph.add_vertex(())).collect();
        for &(tail, head) in arcs {
            graph.add_arc(ids[tail], ids[head]);
        }
        (graph, ids)
    }

    #[test]
    fn test_single_member_has_trivial_geometry() {
        let (graph, ids) = member_graph(&[], 1);
        let geometry = compute(&graph, &ids).unwrap();

        assert_eq!(geometry.girth(), None);
        assert_eq!(geometry.eccentricities(), &[0]);
        assert_eq!(geometry.radius(), 0);
        assert_eq!(geometry.diameter(), 0);
        assert_eq!(geometry.center_vertices(), &ids[..]);
        assert_eq!(geometry.maximum_fragment_sizes(), &[0]);
        assert_eq!(geometry.best_fragment_size(), 0);
        assert_eq!(geometry.best_fragmenters(), &ids[..]);
    }

    #[test]
    fn test_self_reference_yields_girth_one() {
        let (graph, ids) = member_graph(&[(0, 0)], 1);
        let geometry = compute(&graph, &ids).unwrap();

        assert_eq!(geometry.girth(), Some(1));
        assert_eq!(geometry.eccentricities(), &[0]);
    }

    #[test]
    fn test_three_cycle_geometry() {
        let (graph, ids) = member_graph(&[(0, 1), (1, 2), (2, 0)], 3);
        let geometry = compute(&graph, &ids).unwrap();

        assert_eq!(geometry.girth(), Some(3));
        assert_eq!(geometry.eccentricities(), &[2, 2, 2]);
        assert_eq!(geometry.radius(), 2);
        assert_eq!(geometry.diameter(), 2);
        assert_eq!(geometry.center_vertices(), &ids[..]);
        // Removing any vertex of a plain 3-cycle leaves only singletons.
        assert_eq!(geometry.maximum_fragment_sizes(), &[1, 1, 1]);
        assert_eq!(geometry.best_fragment_size(), 1);
        assert_eq!(geometry.best_fragmenters(), &ids[..]);
    }

    #[test]
    fn test_two_cycle_with_chord() {
        // 0 <-> 1 plus 1 -> 2 -> 0: girth is the 2-cycle, the 3-cycle only
        // shows up in eccentricities.
        let (graph, ids) = member_graph(&[(0, 1), (1, 0), (1, 2), (2, 0)], 3);
        let geometry = compute(&graph, &ids).unwrap();

        assert_eq!(geometry.girth(), Some(2));
        assert_eq!(geometry.eccentricities(), &[2, 1, 2]);
        assert_eq!(geometry.radius(), 1);
        assert_eq!(geometry.diameter(), 2);
        assert_eq!(geometry.center_vertices(), &[ids[1]]);
    }

    #[test]
    fn test_figure_eight_fragmenter() {
        // Two triangles sharing vertex 0. Removing 0 shatters everything;
        // removing any other vertex leaves the opposite triangle intact.
        let (graph, ids) = member_graph(
            &[(0, 1), (1, 2), (2, 0), (0, 3), (3, 4), (4, 0)],
            5,
        );
        let geometry = compute(&graph, &ids).unwrap();

        assert_eq!(geometry.girth(), Some(3));
        assert_eq!(geometry.maximum_fragment_sizes(), &[1, 3, 3, 3, 3]);
        assert_eq!(geometry.best_fragment_size(), 1);
        assert_eq!(geometry.best_fragmenters(), &[ids[0]]);
        assert_eq!(geometry.radius(), 2);
        assert_eq!(geometry.center_vertices(), &[ids[0]]);
        assert_eq!(geometry.diameter(), 4);
    }

    #[test]
    fn test_removing_best_fragmenter_matches_reported_size() {
        let (graph, ids) = member_graph(
            &[(0, 1), (1, 2), (2, 0), (0, 3), (3, 4), (4, 0)],
            5,
        );
        let geometry = compute(&graph, &ids).unwrap();

        let fragmenter = geometry.best_fragmenters()[0];
        let index = ids.iter().position(|&id| id == fragmenter).unwrap();
        assert_eq!(
            geometry.maximum_fragment_sizes()[index],
            geometry.best_fragment_size()
        );
    }

    #[test]
    fn test_arcs_leaving_the_member_set_are_ignored() {
        let mut graph = Digraph::new();
        let a = graph.add_vertex(());
        let b = graph.add_vertex(());
        let outsider = graph.add_vertex(());
        graph.add_arc(a, b);
        graph.add_arc(b, a);
        graph.add_arc(a, outsider);
        graph.add_arc(outsider, b);

        let geometry = compute(&graph, &[a, b]).unwrap();
        assert_eq!(geometry.girth(), Some(2));
        assert_eq!(geometry.eccentricities(), &[1, 1]);
    }
}
