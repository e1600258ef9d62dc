use thiserror::Error as ThisError;

use crate::graph::PointId;

#[derive(Debug, ThisError, PartialEq)]
pub enum Error {
    /// An edge (or the requested start) names a point id that was never ingested.
    #[error("edge references unknown point id {0}")]
    UnknownVertexReference(PointId),
    /// The spanning tree could not reach every vertex from the start point.
    #[error("graph is disconnected: {unreached} vertices unreachable from {start}")]
    DisconnectedGraph { start: PointId, unreached: usize },
    /// The bounded detour search found nothing within its ceiling. The literal
    /// back-step path always qualifies, so this indicates a logic defect.
    #[error("detour search from {origin} to {target} exhausted below ceiling {ceiling}")]
    DetourSearchExhausted {
        origin: PointId,
        target: PointId,
        ceiling: f64,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
