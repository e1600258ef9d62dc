use std::collections::VecDeque;

use rand::{thread_rng, Rng};
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::graph::{Graph, PointId};
use crate::TourStrategy;

/// Probabilistic tour strategy: a colony of independent ants.
///
/// Each ant walks the graph from the start vertex. At every step it ranks
/// the unvisited vertices by a depth-limited breadth-first lookahead path and
/// picks one with probability inversely proportional to the path distance.
/// When nothing is reachable within the lookahead, the ant falls back to an
/// unbounded breadth-first path (which may retrace vertices it has already
/// visited). The cheapest of the colony's complete cycles wins.
///
/// Guarantees coverage (every vertex at least once) rather than the strict
/// once-per-vertex tour the spanning-tree strategy produces for dense graphs.
#[derive(Debug, Clone, Copy)]
pub struct AntColonyStrategy {
    /// Number of independent ants. Ants run in parallel.
    pub ants: usize,
    /// Hop limit for the per-step breadth-first lookahead.
    pub lookahead: usize,
}

impl Default for AntColonyStrategy {
    fn default() -> Self {
        Self {
            ants: 20,
            lookahead: 4,
        }
    }
}

impl TourStrategy for AntColonyStrategy {
    fn plan(&self, graph: &Graph, start: PointId) -> Result<Vec<PointId>> {
        let root = graph
            .index_of(start)
            .ok_or(Error::UnknownVertexReference(start))?;

        let walks: Result<Vec<AntWalk>> = (0..self.ants.max(1))
            .into_par_iter()
            .map(|_| run_ant(graph, root, self.lookahead))
            .collect();
        let best = walks?
            .into_iter()
            .min_by(|a, b| a.total.total_cmp(&b.total))
            .expect("at least one ant walks");

        Ok(best.path.iter().map(|&ix| graph.id_of(ix)).collect())
    }
}

struct AntWalk {
    path: Vec<usize>,
    total: f64,
}

struct Lookahead {
    /// Exclusive of the origin, inclusive of the destination.
    path: Vec<usize>,
    dist: f64,
}

fn run_ant(graph: &Graph, start: usize, lookahead: usize) -> Result<AntWalk> {
    let n = graph.len();
    let mut rng = thread_rng();
    let mut visited = vec![false; n];
    visited[start] = true;
    let mut path = vec![start];
    let mut total = 0.0;
    let mut current = start;

    loop {
        let mut candidates: Vec<(usize, Lookahead)> = Vec::new();
        let mut weight_sum = 0.0;
        for vertex in 0..n {
            if visited[vertex] || vertex == current {
                continue;
            }
            if let Some(found) = lookahead_path(graph, current, vertex, lookahead, Some(&visited)) {
                weight_sum += 1.0 / found.dist;
                candidates.push((vertex, found));
            }
        }

        let (next, hop) = if candidates.is_empty() {
            // Nothing within the lookahead: force a path to the first
            // unvisited vertex, or home once everything is covered.
            let next = (0..n).find(|v| !visited[*v]).unwrap_or(start);
            let unreached = visited.iter().filter(|v| !**v).count();
            let hop = lookahead_path(graph, current, next, usize::MAX, None).ok_or(
                Error::DisconnectedGraph {
                    start: graph.id_of(start),
                    unreached,
                },
            )?;
            (next, hop)
        } else {
            // Roulette draw, probability inversely proportional to distance.
            let mut draw = rng.gen::<f64>() * weight_sum;
            let mut pick = candidates.len() - 1;
            for (i, (_, hop)) in candidates.iter().enumerate() {
                draw -= 1.0 / hop.dist;
                if draw <= 0.0 {
                    pick = i;
                    break;
                }
            }
            candidates.swap_remove(pick)
        };

        total += hop.dist;
        for &step in &hop.path {
            visited[step] = true;
            path.push(step);
        }
        current = next;
        if next == start {
            break;
        }
    }

    // A single-vertex graph never leaves home; still close the cycle.
    if path.last() != Some(&start) || path.len() == 1 {
        path.push(start);
    }

    Ok(AntWalk { path, total })
}

/// Breadth-first path from `from` to `to`, bounded to `max_hops` edges,
/// optionally skipping vertices the ant has already visited. A direct edge
/// short-circuits the scan.
fn lookahead_path(
    graph: &Graph,
    from: usize,
    to: usize,
    max_hops: usize,
    skip: Option<&[bool]>,
) -> Option<Lookahead> {
    if let Some(direct) = graph.neighbors(from).iter().find(|n| n.to == to) {
        return Some(Lookahead {
            path: vec![to],
            dist: direct.dist,
        });
    }

    let mut seen = vec![false; graph.len()];
    seen[from] = true;
    let mut queue: VecDeque<(usize, Vec<usize>, f64)> = VecDeque::new();
    queue.push_back((from, Vec::new(), 0.0));

    while let Some((at, path, dist)) = queue.pop_front() {
        if at == to {
            return Some(Lookahead { path, dist });
        }
        if path.len() >= max_hops {
            continue;
        }
        for neighbor in graph.neighbors(at) {
            if seen[neighbor.to] || skip.is_some_and(|s| s[neighbor.to]) {
                continue;
            }
            seen[neighbor.to] = true;
            let mut next_path = path.clone();
            next_path.push(neighbor.to);
            queue.push_back((neighbor.to, next_path, dist + neighbor.dist));
        }
    }
    None
}
