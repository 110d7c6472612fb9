use thiserror::Error;

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// The engine distinguishes exactly two failure situations: structural-invariant violations
/// (a broken precondition supplied by the caller, or a bug in graph construction) and
/// synchronization failures in the concurrent ingestion front end. "No result" situations
/// (an empty graph, disjoint path sets, a graph without cycles) are never errors - they are
/// represented as empty collections.
///
/// # Error Categories
///
/// ## Structural Invariant Violations
/// - [`Error::CyclicCondensation`] - The layering pass re-entered an active component,
///   which means the condensed graph is not acyclic
///
/// ## Synchronization Errors
/// - [`Error::LockError`] - A cache lock in the dependency registry was poisoned
///
/// # Examples
///
/// ```rust
/// use depscope::{Error, units::DependencyRegistry};
///
/// let registry = DependencyRegistry::new();
/// match registry.build() {
///     Ok(graph) => println!("Built graph with {} vertices", graph.digraph().vertex_count()),
///     Err(Error::LockError) => eprintln!("Registry cache lock was poisoned"),
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The condensed component graph contains a directed cycle.
    ///
    /// This error is raised by the layering pass when it encounters an arc into a
    /// component that is visited and still active, i.e. a component lying on its own
    /// walk. Since the condensation of any directed graph is acyclic by construction,
    /// this always indicates a bug in component construction and never a recoverable
    /// runtime condition.
    ///
    /// # Fields
    ///
    /// * `component` - Arena index of the re-entered component
    #[error("Condensed graph is not acyclic - component {component} was re-entered while still active")]
    CyclicCondensation {
        /// Arena index of the component that was re-entered while active
        component: usize,
    },

    /// A cache lock could not be acquired.
    ///
    /// The dependency registry protects its built-graph cache with a reader-writer
    /// lock; this error surfaces a poisoned lock (a panic in another thread while
    /// the lock was held).
    #[error("Failed to lock target")]
    LockError,
}

/// Standard `Result` type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
