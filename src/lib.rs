//! Approximate closed tours over sparse 2-D point graphs.
//!
//! The core pipeline builds a minimum spanning tree over the input graph
//! (Prim's algorithm), derives a tour by a depth-first walk of that tree, and
//! replaces every back-step segment — the retracing a tree walk produces when
//! it returns from a finished subtree — with a cost-bounded detour whenever
//! the branch-and-bound search finds one cheaper than the literal retrace.
//!
//! Tours are heuristic approximations, not optimal solutions.

pub mod ants;
pub mod error;
pub mod graph;
pub mod mst;
pub mod observe;
pub mod search;
pub mod tour;

pub use ants::AntColonyStrategy;
pub use error::{Error, Result};
pub use graph::{Graph, Point, PointId};
pub use mst::{span_tree, SpanTree};
pub use observe::{Quiet, Trace, TourObserver};

/// A tour strategy produces a full ordered cycle over all vertices, starting
/// and ending at a given vertex.
pub trait TourStrategy {
    fn plan(&self, graph: &Graph, start: PointId) -> Result<Vec<PointId>>;
}

/// The spanning-tree-derived strategy with back-edge shortcutting.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpanTreeStrategy;

impl TourStrategy for SpanTreeStrategy {
    fn plan(&self, graph: &Graph, start: PointId) -> Result<Vec<PointId>> {
        compute_tour(graph, start)
    }
}

/// Compute an approximate closed tour of `graph` starting and ending at
/// `start`.
pub fn compute_tour(graph: &Graph, start: PointId) -> Result<Vec<PointId>> {
    compute_tour_observed(graph, start, &mut Quiet)
}

/// [`compute_tour`] with an injected observer receiving tree-attachment,
/// walk, and detour events.
pub fn compute_tour_observed(
    graph: &Graph,
    start: PointId,
    observer: &mut dyn TourObserver,
) -> Result<Vec<PointId>> {
    let root = graph
        .index_of(start)
        .ok_or(Error::UnknownVertexReference(start))?;
    let tree = mst::span_tree(graph, root, observer)?;
    tour::derive_cycle(graph, &tree, observer)
}
