//! Compiled program units on top of the graph engine.
//!
//! The engine in [`crate::graph`] is payload-agnostic; this module supplies the
//! payloads and plumbing for the concrete domain: compiled program units (classes)
//! and their derived packages. It covers the whole path from concurrent ingestion
//! of raw declarations to the analysis facade a build gate queries:
//!
//! # Key Components
//!
//! - [`UnitAttributes`] / [`UnitKind`] - The attribute payload every vertex carries
//! - [`UnitDeclaration`] - A declared unit with its unresolved references
//! - [`DependencyRegistry`] - Thread-safe ingestion front end with cached builds
//! - [`GraphBuilder`] / [`UnitGraph`] - Name resolution into the arena graph
//! - [`PackageProcessor`] - Projection of the unit graph onto packages
//! - [`DependencyAnalyzer`] - Cycles, layers and lookups on both levels
//!
//! # Examples
//!
//! ```rust
//! use depscope::units::{DependencyAnalyzer, DependencyRegistry, UnitAttributes,
//!     UnitDeclaration};
//!
//! let registry = DependencyRegistry::new();
//! registry.add_unit(UnitDeclaration::with_references(
//!     UnitAttributes::class("app.Main", Some("app.jar"), 512),
//!     vec!["core.Engine".to_string()],
//! ))?;
//! registry.add_unit(UnitDeclaration::with_references(
//!     UnitAttributes::class("core.Engine", Some("core.jar"), 2048),
//!     vec!["app.Main".to_string()],
//! ))?;
//!
//! let analyzer = DependencyAnalyzer::new((*registry.build()?).clone());
//! assert_eq!(analyzer.unit_cycles()?.len(), 1);
//! # Ok::<(), depscope::Error>(())
//! ```

/// Top-level analysis facade over a built unit graph
pub mod analyzer;
/// Unit graph construction from declarations
pub mod builder;
/// Package graph derivation
pub mod packages;
/// Thread-safe dependency ingestion front end
pub mod registry;
/// Unit attribute payloads and declarations
pub mod types;

pub use analyzer::DependencyAnalyzer;
pub use builder::{GraphBuilder, UnitGraph};
pub use packages::{PackageProcessor, DEFAULT_PACKAGE};
pub use registry::DependencyRegistry;
pub use types::{UnitAttributes, UnitDeclaration, UnitKind, UnitVertex};
