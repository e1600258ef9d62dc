use std::fmt;

use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Stable external identity of a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointId(pub u64);

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pt_{}", self.0)
    }
}

/// A planar point. Immutable once ingested.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub id: PointId,
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(id: u64, x: f64, y: f64) -> Self {
        Self {
            id: PointId(id),
            x,
            y,
        }
    }

    pub fn dist(&self, other: &Self) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// One directed half of an undirected edge, as seen from its owning vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Arena index of the far endpoint.
    pub to: usize,
    pub dist: f64,
}

/// Adjacency view of the input point graph.
///
/// Points live in an arena indexed by insertion order; all internal edges and
/// tree structures refer to arena indices, with [`PointId`] only at the API
/// boundary. Invariant: every per-vertex neighbor list is sorted ascending by
/// distance. The bounded detour search's pruning relies on this.
#[derive(Debug, Clone)]
pub struct Graph {
    points: Vec<Point>,
    index: HashMap<PointId, usize>,
    adjacency: Vec<Vec<Neighbor>>,
}

impl Graph {
    /// Normalize raw points and undirected id-pair edges into sorted
    /// adjacency lists. Duplicate edges collapse (addition is idempotent)
    /// and self-loops are dropped; an edge naming an id absent from the
    /// point set fails with [`Error::UnknownVertexReference`].
    pub fn build(points: Vec<Point>, edges: &[(PointId, PointId)]) -> Result<Self> {
        let mut index = HashMap::default();
        index.reserve(points.len());
        for (ix, point) in points.iter().enumerate() {
            index.insert(point.id, ix);
        }

        let mut adjacency: Vec<Vec<Neighbor>> = vec![Vec::new(); points.len()];
        let mut seen: HashSet<(usize, usize)> = HashSet::default();
        for (a, b) in edges {
            let ia = *index.get(a).ok_or(Error::UnknownVertexReference(*a))?;
            let ib = *index.get(b).ok_or(Error::UnknownVertexReference(*b))?;
            if ia == ib || !seen.insert((ia.min(ib), ia.max(ib))) {
                continue;
            }
            let dist = points[ia].dist(&points[ib]);
            adjacency[ia].push(Neighbor { to: ib, dist });
            adjacency[ib].push(Neighbor { to: ia, dist });
        }

        for neighbors in &mut adjacency {
            neighbors.sort_by(|p, q| p.dist.total_cmp(&q.dist).then(p.to.cmp(&q.to)));
        }

        Ok(Self {
            points,
            index,
            adjacency,
        })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn point(&self, ix: usize) -> &Point {
        &self.points[ix]
    }

    pub fn id_of(&self, ix: usize) -> PointId {
        self.points[ix].id
    }

    pub fn index_of(&self, id: PointId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Neighbor edges of a vertex, ascending by distance.
    pub fn neighbors(&self, ix: usize) -> &[Neighbor] {
        &self.adjacency[ix]
    }

    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        self.adjacency[a].iter().any(|n| n.to == b)
    }

    /// Euclidean distance between two points of the arena.
    pub fn dist(&self, a: usize, b: usize) -> f64 {
        self.points[a].dist(&self.points[b])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn square() -> Vec<Point> {
        vec![
            Point::new(0, 0.0, 0.0),
            Point::new(1, 1.0, 0.0),
            Point::new(2, 1.0, 1.0),
            Point::new(3, 0.0, 1.0),
        ]
    }

    #[test]
    fn neighbors_are_sorted_ascending_by_distance() {
        let graph = Graph::build(
            square(),
            &[
                (PointId(0), PointId(2)),
                (PointId(0), PointId(1)),
                (PointId(0), PointId(3)),
            ],
        )
        .unwrap();

        let dists: Vec<f64> = graph.neighbors(0).iter().map(|n| n.dist).collect();
        assert_eq!(dists, vec![1.0, 1.0, 2f64.sqrt()]);
        assert!(graph.neighbors(0).windows(2).all(|w| w[0].dist <= w[1].dist));
    }

    #[test]
    fn undirected_edges_are_visible_from_both_endpoints() {
        let graph = Graph::build(square(), &[(PointId(1), PointId(3))]).unwrap();
        assert!(graph.has_edge(1, 3));
        assert!(graph.has_edge(3, 1));
        assert_eq!(graph.neighbors(1)[0].dist, graph.neighbors(3)[0].dist);
    }

    #[test]
    fn duplicate_edges_collapse() {
        let graph = Graph::build(
            square(),
            &[
                (PointId(0), PointId(1)),
                (PointId(1), PointId(0)),
                (PointId(0), PointId(1)),
            ],
        )
        .unwrap();
        assert_eq!(graph.neighbors(0).len(), 1);
        assert_eq!(graph.neighbors(1).len(), 1);
    }

    #[test]
    fn self_loops_are_dropped() {
        let graph = Graph::build(square(), &[(PointId(2), PointId(2))]).unwrap();
        assert!(graph.neighbors(2).is_empty());
    }

    #[test]
    fn unknown_edge_endpoint_is_an_error() {
        let err = Graph::build(square(), &[(PointId(0), PointId(9))]).unwrap_err();
        assert_eq!(err, Error::UnknownVertexReference(PointId(9)));
    }
}
