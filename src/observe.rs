use crate::graph::PointId;

/// Diagnostic hook decoupling the tour pipeline from any logging mechanism.
///
/// Implementations receive events at spanning-tree attachment, walk
/// enter/exit, and every resolved back-step segment. All methods default to
/// no-ops so observers implement only what they care about.
pub trait TourObserver {
    /// A vertex was attached to the spanning tree.
    fn tree_edge(&mut self, from: PointId, to: PointId, dist: f64) {
        let _ = (from, to, dist);
    }

    /// The depth-first walk descended into a vertex.
    fn walk_enter(&mut self, vertex: PointId) {
        let _ = vertex;
    }

    /// The depth-first walk finished a vertex's subtree.
    fn walk_exit(&mut self, vertex: PointId) {
        let _ = vertex;
    }

    /// A back-step segment was resolved: either a direct edge (`hops == 1`)
    /// or a detour path found below `ceiling`.
    fn detour(&mut self, origin: PointId, target: PointId, ceiling: f64, cost: f64, hops: usize) {
        let _ = (origin, target, ceiling, cost, hops);
    }
}

/// Observer that discards every event.
pub struct Quiet;

impl TourObserver for Quiet {}

/// Observer that forwards events to [`tracing`] at debug/trace level.
pub struct Trace;

impl TourObserver for Trace {
    fn tree_edge(&mut self, from: PointId, to: PointId, dist: f64) {
        tracing::debug!(%from, %to, dist, "spanning tree attachment");
    }

    fn walk_enter(&mut self, vertex: PointId) {
        tracing::trace!(%vertex, "walk enter");
    }

    fn walk_exit(&mut self, vertex: PointId) {
        tracing::trace!(%vertex, "walk exit");
    }

    fn detour(&mut self, origin: PointId, target: PointId, ceiling: f64, cost: f64, hops: usize) {
        tracing::debug!(%origin, %target, ceiling, cost, hops, "back-step resolved");
    }
}
