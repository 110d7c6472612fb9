//! Thread-safe dependency ingestion front end.
//!
//! Producers (class-file readers, build-tool plugins) discover units and their
//! references concurrently; the analysis engine wants one immutable graph. The
//! registry sits between the two: declarations stream in through lock-free maps,
//! queries about raw dependencies are answered directly, and [`build`](DependencyRegistry::build)
//! freezes everything into a shared [`UnitGraph`]. The built graph is cached and
//! the cache is invalidated whenever new declarations arrive.
//!
//! # Thread Safety
//!
//! All methods take `&self` and are safe to call concurrently:
//! - `DashMap` provides lock-free concurrent map operations for ingestion
//! - `RwLock` protects the built-graph cache with reader-writer semantics
//! - The built graph itself is handed out as an `Arc` snapshot; later mutations
//!   of the registry never touch graphs already handed out

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use dashmap::DashMap;

use crate::{
    units::{
        builder::{GraphBuilder, UnitGraph},
        types::{UnitAttributes, UnitDeclaration},
    },
    Error, Result,
};

/// Thread-safe registry of unit declarations and their references.
///
/// # Examples
///
/// ```rust
/// use depscope::units::{DependencyRegistry, UnitAttributes, UnitDeclaration};
///
/// let registry = DependencyRegistry::new();
/// registry.add_unit(UnitDeclaration::with_references(
///     UnitAttributes::class("app.Main", None, 512),
///     vec!["core.Engine".to_string()],
/// ))?;
///
/// assert_eq!(registry.unit_count(), 2); // app.Main and the referenced core.Engine
/// let graph = registry.build()?;
/// assert_eq!(graph.member_count(), 1);
/// # Ok::<(), depscope::Error>(())
/// ```
pub struct DependencyRegistry {
    /// Declarations keyed by unit name; duplicates accumulate and are merged
    /// by the graph builder.
    units: DashMap<String, Vec<UnitDeclaration>>,

    /// Reverse index: unit name -> names of units referencing it.
    dependents: DashMap<String, Vec<String>>,

    /// Cached result of [`build`](Self::build), invalidated on mutation.
    cached_graph: RwLock<Option<Arc<UnitGraph>>>,

    merge_inner_units: bool,
}

impl DependencyRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        DependencyRegistry {
            units: DashMap::new(),
            dependents: DashMap::new(),
            cached_graph: RwLock::new(None),
            merge_inner_units: false,
        }
    }

    /// Creates a registry whose built graphs merge nested units into their
    /// outer unit.
    #[must_use]
    pub fn with_inner_unit_merging() -> Self {
        DependencyRegistry {
            merge_inner_units: true,
            ..Self::new()
        }
    }

    /// Adds a complete unit declaration.
    ///
    /// Declaring the same name again is allowed (the same class can appear in
    /// two archives); the graph builder merges duplicates.
    ///
    /// # Errors
    ///
    /// Currently infallible; the `Result` keeps the ingestion API uniform.
    pub fn add_unit(&self, declaration: UnitDeclaration) -> Result<()> {
        let source = declaration.attributes().name().to_string();
        for target in declaration.references() {
            self.dependents
                .entry(target.clone())
                .or_default()
                .push(source.clone());
        }
        self.units.entry(source).or_default().push(declaration);
        self.invalidate_cache();
        Ok(())
    }

    /// Records a single dependency with an explicit source unit.
    ///
    /// The reference is attached to the declaration with exactly these source
    /// attributes, creating it if necessary - so a producer can stream
    /// references one at a time without assembling declarations itself.
    ///
    /// # Errors
    ///
    /// Currently infallible; the `Result` keeps the ingestion API uniform.
    pub fn add_dependency(&self, source: UnitAttributes, target: &str) -> Result<()> {
        self.dependents
            .entry(target.to_string())
            .or_default()
            .push(source.name().to_string());

        let mut declarations = self.units.entry(source.name().to_string()).or_default();
        if let Some(declaration) = declarations
            .iter_mut()
            .find(|declaration| declaration.attributes() == &source)
        {
            declaration.add_reference(target);
        } else {
            declarations.push(UnitDeclaration::with_references(
                source,
                vec![target.to_string()],
            ));
        }
        drop(declarations);

        self.invalidate_cache();
        Ok(())
    }

    /// Returns all names referenced by the specified unit (empty if none).
    #[must_use]
    pub fn dependencies_of(&self, name: &str) -> Vec<String> {
        self.units
            .get(name)
            .map(|declarations| {
                declarations
                    .iter()
                    .flat_map(|declaration| declaration.references().iter().cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns the names of all units referencing the specified unit.
    #[must_use]
    pub fn dependents_of(&self, name: &str) -> Vec<String> {
        self.dependents
            .get(name)
            .map(|dependents| dependents.clone())
            .unwrap_or_default()
    }

    /// Returns the total number of unique unit names tracked, declared or
    /// merely referenced.
    #[must_use]
    pub fn unit_count(&self) -> usize {
        let mut names = HashSet::new();
        for entry in self.units.iter() {
            names.insert(entry.key().clone());
        }
        for entry in self.dependents.iter() {
            names.insert(entry.key().clone());
        }
        names.len()
    }

    /// Returns the total number of recorded references.
    #[must_use]
    pub fn dependency_count(&self) -> usize {
        self.units
            .iter()
            .map(|entry| {
                entry
                    .value()
                    .iter()
                    .map(|declaration| declaration.references().len())
                    .sum::<usize>()
            })
            .sum()
    }

    /// Returns `true` if the specified unit has been declared.
    #[must_use]
    pub fn contains_unit(&self, name: &str) -> bool {
        self.units.contains_key(name)
    }

    /// Returns all declared unit names.
    #[must_use]
    pub fn declared_units(&self) -> Vec<String> {
        self.units.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Returns `true` if the specified unit references at least one other unit.
    #[must_use]
    pub fn has_dependencies(&self, name: &str) -> bool {
        self.units.get(name).is_some_and(|declarations| {
            declarations
                .iter()
                .any(|declaration| !declaration.references().is_empty())
        })
    }

    /// Returns `true` if at least one unit references the specified unit.
    #[must_use]
    pub fn has_dependents(&self, name: &str) -> bool {
        self.dependents
            .get(name)
            .is_some_and(|dependents| !dependents.is_empty())
    }

    /// Returns `true` if nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty() && self.dependents.is_empty()
    }

    /// Removes all recorded declarations and invalidates the cache.
    pub fn clear(&self) {
        self.units.clear();
        self.dependents.clear();
        self.invalidate_cache();
    }

    /// Builds the unit graph from everything recorded so far.
    ///
    /// The result is cached; repeated calls without intervening mutation return
    /// the same `Arc` snapshot.
    ///
    /// # Errors
    ///
    /// [`Error::LockError`] if the cache lock is poisoned.
    pub fn build(&self) -> Result<Arc<UnitGraph>> {
        {
            let cached = self.cached_graph.read().map_err(|_| Error::LockError)?;
            if let Some(graph) = cached.as_ref() {
                return Ok(graph.clone());
            }
        }

        let declarations: Vec<UnitDeclaration> = self
            .units
            .iter()
            .flat_map(|entry| entry.value().clone())
            .collect();
        let graph = Arc::new(GraphBuilder::new(self.merge_inner_units).build(&declarations));

        {
            let mut cache = self.cached_graph.write().map_err(|_| Error::LockError)?;
            *cache = Some(graph.clone());
        }

        Ok(graph)
    }

    /// Best-effort cache invalidation; a poisoned lock just leaves the cache
    /// to be rebuilt by the next successful `build`.
    fn invalidate_cache(&self) {
        if let Ok(mut cache) = self.cached_graph.write() {
            *cache = None;
        }
    }
}

impl Default for DependencyRegistry {
    fn default() -> Self {
        Self::new()
    }
}
