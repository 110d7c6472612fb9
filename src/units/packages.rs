//! Package graph derivation.
//!
//! Collapses a unit graph into its package graph: every unit maps to the package
//! named by everything before the last `.` of its name (units without a dot land
//! in the default package), package attributes accumulate the sizes and sources
//! of their units, and a package is a member exactly when at least one of its
//! units is.
//!
//! Arcs are derived in two phases because a package's externality is only known
//! once all units have been seen: every unit arc records a candidate, and a
//! candidate becomes a package arc iff the referenced unit is a member or the
//! referenced package is entirely external. An arc to an external unit whose
//! package also contains members is dropped - it would fake a dependency on the
//! member part of that package. Arcs inside one package are kept as
//! self-references; the package analysis reports them as girth-1 cycles.

use std::collections::HashMap;

use crate::{
    graph::{Digraph, Membership, VertexId},
    units::{
        builder::UnitGraph,
        types::{UnitAttributes, UnitVertex},
    },
};

/// Name of the package of units without a package prefix.
pub const DEFAULT_PACKAGE: &str = "(default package)";

/// Processor which extracts the package dependency graph from the unit
/// dependency graph.
///
/// # Examples
///
/// ```rust
/// use depscope::units::{GraphBuilder, PackageProcessor, UnitAttributes, UnitDeclaration};
///
/// let units = GraphBuilder::new(false).build(&[
///     UnitDeclaration::with_references(
///         UnitAttributes::class("app.Main", None, 100),
///         vec!["core.Engine".to_string()],
///     ),
///     UnitDeclaration::new(UnitAttributes::class("core.Engine", None, 300)),
/// ]);
///
/// let packages = PackageProcessor::new().execute(units.digraph());
/// let app = packages.vertex_of("app").unwrap();
/// let core = packages.vertex_of("core").unwrap();
/// assert_eq!(packages.digraph().outgoing(app), &[core]);
/// ```
#[derive(Debug, Default)]
pub struct PackageProcessor;

impl PackageProcessor {
    /// Creates a processor.
    #[must_use]
    pub fn new() -> Self {
        PackageProcessor
    }

    /// Derives the package graph of the specified unit graph.
    #[must_use]
    pub fn execute(&self, units: &Digraph<UnitVertex>) -> UnitGraph {
        let mut graph: Digraph<UnitVertex> = Digraph::new();
        let mut index: HashMap<String, VertexId> = HashMap::new();
        let mut candidates: Vec<(VertexId, VertexId, bool)> = Vec::new();

        for (unit, payload) in units.iter() {
            let tail = ensure_package(&mut graph, &mut index, package_name(payload.attributes().name()));
            {
                let package = graph.node_mut(tail);
                if payload.is_member() {
                    package.mark_member();
                }
                let attributes = package.attributes_mut();
                attributes.grow(payload.attributes().size());
                attributes.add_sources_of(payload.attributes());
            }

            for &head_unit in units.outgoing(unit) {
                let head_payload = &units[head_unit];
                let head = ensure_package(
                    &mut graph,
                    &mut index,
                    package_name(head_payload.attributes().name()),
                );
                candidates.push((tail, head, head_payload.is_member()));
            }
        }

        for (tail, head, member_head_unit) in candidates {
            if member_head_unit || !graph[head].is_member() {
                graph.add_arc(tail, head);
            }
        }

        UnitGraph::from_parts(graph, index)
    }
}

fn package_name(unit_name: &str) -> &str {
    match unit_name.rfind('.') {
        Some(position) => &unit_name[..position],
        None => DEFAULT_PACKAGE,
    }
}

fn ensure_package(
    graph: &mut Digraph<UnitVertex>,
    index: &mut HashMap<String, VertexId>,
    name: &str,
) -> VertexId {
    if let Some(&id) = index.get(name) {
        return id;
    }
    let id = graph.add_vertex(UnitVertex::new(UnitAttributes::package(name), false));
    index.insert(name.to_string(), id);
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::builder::GraphBuilder;
    use crate::units::types::{UnitDeclaration, UnitKind};

    fn declare(name: &str, size: u64, references: &[&str]) -> UnitDeclaration {
        UnitDeclaration::with_references(
            UnitAttributes::class(name, Some("test.jar"), size),
            references.iter().map(|r| (*r).to_string()).collect(),
        )
    }

    fn project(declarations: &[UnitDeclaration]) -> UnitGraph {
        let units = GraphBuilder::new(false).build(declarations);
        PackageProcessor::new().execute(units.digraph())
    }

    #[test]
    fn test_units_collapse_into_their_packages() {
        let packages = project(&[
            declare("a.One", 100, &["a.Two", "b.Real"]),
            declare("a.Two", 50, &[]),
            declare("b.Real", 70, &["a.One"]),
        ]);

        assert_eq!(packages.digraph().vertex_count(), 2);
        let a = packages.vertex_of("a").unwrap();
        let b = packages.vertex_of("b").unwrap();

        let a_attributes = packages.digraph()[a].attributes();
        assert_eq!(a_attributes.kind(), UnitKind::Package);
        assert_eq!(a_attributes.size(), 150);
        assert_eq!(a_attributes.sources_list(), "test.jar");

        assert!(packages.digraph()[a].is_member());
        assert!(packages.digraph()[b].is_member());
    }

    #[test]
    fn test_intra_package_references_become_self_arcs() {
        let packages = project(&[declare("a.One", 1, &["a.Two"]), declare("a.Two", 1, &[])]);
        let a = packages.vertex_of("a").unwrap();
        assert_eq!(packages.digraph().outgoing(a), &[a]);
    }

    #[test]
    fn test_cross_package_cycle_survives_projection() {
        let packages = project(&[
            declare("a.One", 1, &["b.Real"]),
            declare("b.Real", 1, &["a.One"]),
        ]);
        let a = packages.vertex_of("a").unwrap();
        let b = packages.vertex_of("b").unwrap();
        assert_eq!(packages.digraph().outgoing(a), &[b]);
        assert_eq!(packages.digraph().outgoing(b), &[a]);
    }

    #[test]
    fn test_arc_to_external_unit_in_a_member_package_is_dropped() {
        // b.Ext is never declared, but package b has a declared member. The
        // reference a.One -> b.Ext must not fabricate a dependency of a on b.
        let packages = project(&[
            declare("a.One", 1, &["b.Ext"]),
            declare("b.Real", 1, &[]),
        ]);
        let a = packages.vertex_of("a").unwrap();
        assert_eq!(packages.digraph().outgoing(a), &[]);
    }

    #[test]
    fn test_arc_to_an_entirely_external_package_is_kept() {
        let packages = project(&[declare("a.One", 1, &["ext.X", "ext.Y"])]);
        let a = packages.vertex_of("a").unwrap();
        let ext = packages.vertex_of("ext").unwrap();

        assert!(!packages.digraph()[ext].is_member());
        assert_eq!(packages.digraph().outgoing(a), &[ext]);
        // Two unit references into the same package collapse into one arc.
        assert_eq!(packages.digraph().arc_count(), 1);
    }

    #[test]
    fn test_units_without_a_dot_land_in_the_default_package() {
        let packages = project(&[declare("TopLevel", 1, &[])]);
        assert!(packages.vertex_of(DEFAULT_PACKAGE).is_some());
    }

    #[test]
    fn test_isolated_units_still_materialize_their_package() {
        let packages = project(&[declare("lonely.Unit", 1, &[])]);
        let lonely = packages.vertex_of("lonely").unwrap();
        assert!(packages.digraph()[lonely].is_member());
        assert_eq!(packages.digraph().outgoing(lonely), &[]);
    }
}
