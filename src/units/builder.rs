//! Unit graph construction from declarations.
//!
//! Producers hand over [`UnitDeclaration`]s - one per compiled unit, with the
//! names it references still unresolved. The builder resolves them into an arena
//! graph: declared units become member vertices, names nobody declared become
//! non-member vertices of kind "unknown external class" (linked, but skipped by
//! the analysis passes).
//!
//! Nested units can optionally be merged into their outer unit: names are cut at
//! the first `$`, merged declarations accumulate their byte sizes and source
//! sets, and the outer declaration's kind wins over the kinds of its nested
//! units. Duplicate declarations of the same name (the same class in two
//! archives) merge the same way.

use std::collections::HashMap;

use crate::{
    graph::{Digraph, Membership, VertexId},
    units::types::{UnitAttributes, UnitDeclaration, UnitVertex},
};

/// A built unit graph: the arena plus the name index into it.
#[derive(Debug, Clone)]
pub struct UnitGraph {
    graph: Digraph<UnitVertex>,
    index: HashMap<String, VertexId>,
}

impl UnitGraph {
    /// Returns the underlying directed graph.
    #[must_use]
    pub fn digraph(&self) -> &Digraph<UnitVertex> {
        &self.graph
    }

    /// Returns the vertex carrying the unit with the specified (normalized)
    /// name, declared or external.
    #[must_use]
    pub fn vertex_of(&self, name: &str) -> Option<VertexId> {
        self.index.get(name).copied()
    }

    /// Returns the number of member vertices, i.e. declared units.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.graph
            .iter()
            .filter(|(_, vertex)| vertex.is_member())
            .count()
    }

    pub(crate) fn from_parts(graph: Digraph<UnitVertex>, index: HashMap<String, VertexId>) -> Self {
        UnitGraph { graph, index }
    }

    pub(crate) fn into_parts(self) -> (Digraph<UnitVertex>, HashMap<String, VertexId>) {
        (self.graph, self.index)
    }
}

/// Builds a [`UnitGraph`] from a bunch of unit declarations.
///
/// # Examples
///
/// ```rust
/// use depscope::units::{GraphBuilder, UnitAttributes, UnitDeclaration};
///
/// let declarations = vec![
///     UnitDeclaration::with_references(
///         UnitAttributes::class("app.Main", Some("app.jar"), 512),
///         vec!["core.Engine".to_string()],
///     ),
/// ];
///
/// let units = GraphBuilder::new(false).build(&declarations);
/// assert_eq!(units.digraph().vertex_count(), 2); // app.Main + external core.Engine
/// assert_eq!(units.member_count(), 1);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct GraphBuilder {
    merge_inner_units: bool,
}

impl GraphBuilder {
    /// Creates a builder.
    ///
    /// # Arguments
    ///
    /// * `merge_inner_units` - Merge nested unit declarations with their outer
    ///   unit if `true`.
    #[must_use]
    pub fn new(merge_inner_units: bool) -> Self {
        GraphBuilder { merge_inner_units }
    }

    /// Creates a graph from the bunch of declarations.
    ///
    /// Declarations are processed in attribute order (primarily by name), which
    /// both makes the arena layout deterministic and guarantees that an outer
    /// unit is seen before its nested units when merging. Referenced names
    /// without a declaration are created as external vertices; they are linked
    /// but not members. Self-references are dropped.
    #[must_use]
    pub fn build(&self, declarations: &[UnitDeclaration]) -> UnitGraph {
        let mut sorted: Vec<&UnitDeclaration> = declarations.iter().collect();
        sorted.sort_by(|a, b| a.attributes().cmp(b.attributes()));

        let mut graph: Digraph<UnitVertex> = Digraph::with_capacity(sorted.len());
        let mut index: HashMap<String, VertexId> = HashMap::with_capacity(sorted.len());

        for declaration in &sorted {
            let original = declaration.attributes();
            let name = self.normalize(original.name());
            if let Some(&existing) = index.get(&name) {
                let attributes = graph.node_mut(existing).attributes_mut();
                attributes.grow(original.size());
                if name == original.name() {
                    // A duplicate of the unit itself: the later declaration
                    // knows its kind. A nested unit keeps the outer kind.
                    attributes.set_kind(original.kind());
                }
                attributes.add_sources_of(original);
            } else {
                let mut attributes =
                    UnitAttributes::new(&name, original.kind(), None, original.size());
                attributes.add_sources_of(original);
                let id = graph.add_vertex(UnitVertex::new(attributes, true));
                index.insert(name, id);
            }
        }

        for declaration in &sorted {
            let tail_name = self.normalize(declaration.attributes().name());
            let Some(&tail) = index.get(&tail_name) else {
                continue;
            };
            for reference in declaration.references() {
                let head_name = self.normalize(reference);
                let head = match index.get(&head_name) {
                    Some(&head) => head,
                    None => {
                        let head = graph.add_vertex(UnitVertex::new(
                            UnitAttributes::unknown(&head_name, 0),
                            false,
                        ));
                        index.insert(head_name, head);
                        head
                    }
                };
                if tail != head {
                    graph.add_arc(tail, head);
                }
            }
        }

        UnitGraph { graph, index }
    }

    fn normalize(&self, name: &str) -> String {
        if self.merge_inner_units {
            if let Some(position) = name.find('$') {
                return name[..position].to_string();
            }
        }
        name.to_string()
    }
}
