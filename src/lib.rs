// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]

//! # depscope
//!
//! [![Crates.io](https://img.shields.io/crates/v/depscope.svg)](https://crates.io/crates/depscope)
//! [![Documentation](https://docs.rs/depscope/badge.svg)](https://docs.rs/depscope)
//! [![License](https://img.shields.io/badge/license-Apache--2.0-blue.svg)](https://github.com/BinFlip/depscope/blob/main/LICENSE-APACHE)
//!
//! A directed-graph analysis engine for dependency structure among compiled program
//! units. `depscope` detects dependency cycles, measures how entangled they are,
//! computes topological layer depth and answers reachability questions - the
//! machinery a build-time quality gate needs to fail a build when forbidden
//! dependencies or unexpectedly large cycles appear.
//!
//! ## Features
//!
//! - **🔄 Cycle detection** - Tarjan strong components with an acyclic condensation graph
//! - **📐 Cycle geometry** - Girth, eccentricities, radius/diameter and the best
//!   "fragmenter" vertex of every cycle
//! - **📚 Layering** - Longest-walk layer indices that strictly decrease along every
//!   dependency
//! - **🔎 Path search** - All, shortest-only or direct-only paths between two vertex sets
//! - **📦 Two levels** - Class-level analysis plus the derived package-level graph
//! - **🧵 Concurrent ingestion** - Lock-free declaration intake, immutable analysis snapshots
//! - **🛡️ Stack safe** - All traversals run on explicit work stacks, deep graphs included
//!
//! ## Quick Start
//!
//! Add `depscope` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! depscope = "0.2"
//! ```
//!
//! ### Using the Prelude
//!
//! ```rust
//! use depscope::prelude::*;
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
//! let cycles = analyzer.unit_cycles()?;
//! println!("Found {} dependency cycle(s)", cycles.len());
//! # Ok::<(), depscope::Error>(())
//! ```
//!
//! ### Working on the Bare Engine
//!
//! The engine does not care what vertices represent; any payload works:
//!
//! ```rust
//! use depscope::graph::{Digraph, PathsFinder, StrongComponentAnalyzer};
//!
//! let mut graph = Digraph::new();
//! let a = graph.add_vertex("a");
//! let b = graph.add_vertex("b");
//! let c = graph.add_vertex("c");
//! graph.add_arc(a, b);
//! graph.add_arc(b, c);
//! graph.add_arc(c, a);
//!
//! let finder = PathsFinder::new(|n: &&str| *n == "a", |n: &&str| *n == "c", true);
//! assert_eq!(finder.find_paths(&graph), vec![a, b, c]);
//!
//! let analyzer = StrongComponentAnalyzer::new(graph);
//! assert_eq!(analyzer.condensation()?.component_count(), 1);
//! # Ok::<(), depscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! `depscope` is organized into two layers:
//!
//! - [`graph`] - The payload-agnostic engine: arena storage, the depth-first
//!   traversal framework, strong components with geometry, layering, the lazy
//!   analysis facade and the two-set path search
//! - [`units`] - The compiled-unit domain: attribute payloads, the concurrent
//!   dependency registry, graph building from declarations, package projection
//!   and the top-level [`units::DependencyAnalyzer`]
//!
//! Parsing of compiled artifacts, rule languages and report rendering are out of
//! scope: producers hand declarations in, and the analysis results go back out
//! as plain data.
//!
//! ## Concurrency Model
//!
//! Ingestion through [`units::DependencyRegistry`] is thread-safe and lock-free
//! on the hot path. Analysis itself is synchronous and CPU-bound over immutable
//! snapshots; per-pass scratch state lives in arrays private to each pass, so
//! analyses never alias each other's bookkeeping. The per-component geometry
//! computation fans out across components with rayon.

/// The crate error type.
pub(crate) mod error;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use depscope::prelude::*;
///
/// let registry = DependencyRegistry::new();
/// assert!(registry.is_empty());
/// ```
pub mod prelude;

/// The payload-agnostic directed-graph analysis engine.
pub mod graph;

/// Compiled program units and packages on top of the engine.
pub mod units;

pub use error::{Error, Result};
