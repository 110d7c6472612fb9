//! Unit attribute payloads and declarations.
//!
//! The engine treats vertex payloads as opaque; this module supplies the payloads
//! used for compiled program units: the unit kind, the immutable attribute record
//! (name, kind, byte size, sources) carried by every vertex, the vertex payload
//! itself, and the declaration form in which producers hand units to the graph
//! builder.

use std::collections::BTreeSet;
use std::fmt;

use strum::{Display, EnumIter};

use crate::graph::Membership;

/// Kind of a compiled program unit.
///
/// The first four kinds mirror what a class-file producer can tell about a unit;
/// `Package` marks vertices of the derived package graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter)]
pub enum UnitKind {
    /// A concrete class
    #[strum(serialize = "class")]
    Class,

    /// An abstract class
    #[strum(serialize = "abstract class")]
    AbstractClass,

    /// An interface
    #[strum(serialize = "interface")]
    Interface,

    /// A unit that is only referenced, never declared - nothing is known about it
    #[strum(serialize = "unknown external class")]
    Unknown,

    /// A package of the derived package graph
    #[strum(serialize = "package")]
    Package,
}

/// Immutable attributes of a program unit vertex.
///
/// Holds the fully-qualified name, the [`UnitKind`], the size of the compiled
/// unit in bytes and the set of sources (archives, directories) the unit was
/// found in. The inner-unit flag is derived from the name: a `$` past the first
/// character marks a nested unit.
///
/// Attributes order totally, primarily by name - the ordering downstream
/// renderers use for deterministic output. The analysis algorithms themselves
/// never look at it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnitAttributes {
    name: String,
    kind: UnitKind,
    size: u64,
    inner: bool,
    sources: BTreeSet<String>,
}

impl UnitAttributes {
    /// Creates attributes for the specified name, kind, optional source and size.
    #[must_use]
    pub fn new(name: &str, kind: UnitKind, source: Option<&str>, size: u64) -> Self {
        let inner = name.find('$').is_some_and(|index| index > 0);
        let mut sources = BTreeSet::new();
        if let Some(source) = source {
            sources.insert(source.to_string());
        }
        UnitAttributes {
            name: name.to_string(),
            kind,
            size,
            inner,
            sources,
        }
    }

    /// Creates attributes of kind [`UnitKind::Class`].
    #[must_use]
    pub fn class(name: &str, source: Option<&str>, size: u64) -> Self {
        Self::new(name, UnitKind::Class, source, size)
    }

    /// Creates attributes of kind [`UnitKind::AbstractClass`].
    #[must_use]
    pub fn abstract_class(name: &str, source: Option<&str>, size: u64) -> Self {
        Self::new(name, UnitKind::AbstractClass, source, size)
    }

    /// Creates attributes of kind [`UnitKind::Interface`].
    #[must_use]
    pub fn interface(name: &str, source: Option<&str>, size: u64) -> Self {
        Self::new(name, UnitKind::Interface, source, size)
    }

    /// Creates attributes of kind [`UnitKind::Unknown`], the form every merely
    /// referenced unit takes.
    #[must_use]
    pub fn unknown(name: &str, size: u64) -> Self {
        Self::new(name, UnitKind::Unknown, None, size)
    }

    /// Creates attributes of kind [`UnitKind::Package`].
    #[must_use]
    pub fn package(name: &str) -> Self {
        Self::new(name, UnitKind::Package, None, 0)
    }

    /// Returns the fully-qualified unit name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the unit kind.
    #[must_use]
    pub fn kind(&self) -> UnitKind {
        self.kind
    }

    /// Returns the size of the compiled unit in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Returns `true` in the case of a nested unit.
    #[must_use]
    pub fn is_inner(&self) -> bool {
        self.inner
    }

    /// Returns the sources this unit was found in, ordered.
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(String::as_str)
    }

    /// Returns a comma separated list of sources.
    #[must_use]
    pub fn sources_list(&self) -> String {
        let mut result = String::new();
        for source in &self.sources {
            if source.is_empty() {
                continue;
            }
            if !result.is_empty() {
                result.push_str(", ");
            }
            result.push_str(source);
        }
        result
    }

    /// Adds `amount` bytes to the size. Used when merging duplicate or nested
    /// declarations into one vertex.
    pub(crate) fn grow(&mut self, amount: u64) {
        self.size += amount;
    }

    /// Adds the specified source.
    pub(crate) fn add_source(&mut self, source: &str) {
        self.sources.insert(source.to_string());
    }

    /// Adds the sources of the specified attributes.
    pub(crate) fn add_sources_of(&mut self, attributes: &UnitAttributes) {
        for source in &attributes.sources {
            self.sources.insert(source.clone());
        }
    }

    /// Replaces the kind. Used when a merged outer declaration knows better.
    pub(crate) fn set_kind(&mut self, kind: UnitKind) {
        self.kind = kind;
    }
}

impl fmt::Display for UnitAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inner {
            write!(f, "inner ")?;
        }
        write!(f, "{} {}", self.kind, self.name)?;
        if self.size > 0 {
            write!(f, " ({} bytes)", self.size)?;
        }
        let sources = self.sources_list();
        if !sources.is_empty() {
            write!(f, " sources: {sources}")?;
        }
        Ok(())
    }
}

/// Vertex payload of unit and package graphs: attributes plus the flag telling
/// analyzed units apart from external references.
#[derive(Debug, Clone)]
pub struct UnitVertex {
    attributes: UnitAttributes,
    member: bool,
}

impl UnitVertex {
    /// Creates a payload.
    #[must_use]
    pub fn new(attributes: UnitAttributes, member: bool) -> Self {
        UnitVertex { attributes, member }
    }

    /// Returns the attributes of this unit.
    #[must_use]
    pub fn attributes(&self) -> &UnitAttributes {
        &self.attributes
    }

    pub(crate) fn attributes_mut(&mut self) -> &mut UnitAttributes {
        &mut self.attributes
    }

    pub(crate) fn mark_member(&mut self) {
        self.member = true;
    }
}

impl Membership for UnitVertex {
    fn is_member(&self) -> bool {
        self.member
    }
}

/// A declared unit with its not yet resolved references, as handed over by a
/// producer (a class-file reader, a test fixture).
#[derive(Debug, Clone)]
pub struct UnitDeclaration {
    attributes: UnitAttributes,
    references: Vec<String>,
}

impl UnitDeclaration {
    /// Creates a declaration without references.
    #[must_use]
    pub fn new(attributes: UnitAttributes) -> Self {
        UnitDeclaration {
            attributes,
            references: Vec::new(),
        }
    }

    /// Creates a declaration with the specified referenced names.
    #[must_use]
    pub fn with_references(attributes: UnitAttributes, references: Vec<String>) -> Self {
        UnitDeclaration {
            attributes,
            references,
        }
    }

    /// Adds a referenced unit name.
    pub fn add_reference(&mut self, name: &str) {
        self.references.push(name.to_string());
    }

    /// Returns the attributes of the declared unit.
    #[must_use]
    pub fn attributes(&self) -> &UnitAttributes {
        &self.attributes
    }

    /// Returns the referenced unit names in declaration order.
    #[must_use]
    pub fn references(&self) -> &[String] {
        &self.references
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_display_spellings() {
        assert_eq!(UnitKind::Class.to_string(), "class");
        assert_eq!(UnitKind::AbstractClass.to_string(), "abstract class");
        assert_eq!(UnitKind::Interface.to_string(), "interface");
        assert_eq!(UnitKind::Unknown.to_string(), "unknown external class");
        assert_eq!(UnitKind::Package.to_string(), "package");
    }

    #[test]
    fn test_kind_roster_is_complete() {
        use strum::IntoEnumIterator;
        assert_eq!(UnitKind::iter().count(), 5);
    }

    #[test]
    fn test_inner_flag_is_derived_from_the_name() {
        assert!(UnitAttributes::class("com.example.Outer$Inner", None, 0).is_inner());
        assert!(!UnitAttributes::class("com.example.Outer", None, 0).is_inner());
        // A leading '$' does not make a unit nested.
        assert!(!UnitAttributes::class("$Synthetic", None, 0).is_inner());
    }

    #[test]
    fn test_sources_are_ordered_and_deduplicated() {
        let mut attributes = UnitAttributes::class("a.B", Some("lib.jar"), 10);
        attributes.add_source("app.jar");
        attributes.add_source("lib.jar");
        assert_eq!(attributes.sources_list(), "app.jar, lib.jar");
    }

    #[test]
    fn test_display_rendering() {
        let mut attributes = UnitAttributes::interface("a.b.Gate", Some("core.jar"), 420);
        attributes.add_source("");
        assert_eq!(
            attributes.to_string(),
            "interface a.b.Gate (420 bytes) sources: core.jar"
        );

        let inner = UnitAttributes::class("a.Outer$1", None, 0);
        assert_eq!(inner.to_string(), "inner class a.Outer$1");
    }

    #[test]
    fn test_attributes_order_primarily_by_name() {
        let a = UnitAttributes::class("a.A", None, 999);
        let b = UnitAttributes::unknown("a.B", 0);
        let c = UnitAttributes::interface("c.C", None, 1);
        let mut sorted = vec![&c, &b, &a];
        sorted.sort();
        assert_eq!(
            sorted.iter().map(|attr| attr.name()).collect::<Vec<_>>(),
            vec!["a.A", "a.B", "c.C"]
        );
    }

    #[test]
    fn test_declaration_collects_references() {
        let mut declaration = UnitDeclaration::new(UnitAttributes::class("a.A", None, 1));
        declaration.add_reference("a.B");
        declaration.add_reference("a.C");
        assert_eq!(declaration.references(), &["a.B", "a.C"]);
    }
}
