use rustc_hash::FxHashMap as HashMap;

use crate::error::{Error, Result};
use crate::graph::Graph;

/// Per-vertex record of the best way the search has reached it so far.
#[derive(Debug)]
struct VertexState {
    best_dist: f64,
    /// Vertex the best-known path arrived from; `None` only for the origin.
    reached_from: Option<usize>,
    /// On the current recursion stack. Stepping onto such a vertex would
    /// close a cycle, so the candidate edge is skipped rather than rejected:
    /// the same vertex may be reachable cycle-free via a later branch.
    in_progress: bool,
}

/// Search state scoped to one `shortest_detour` call. A vertex absent from
/// `vertices` is unvisited. `ceiling` only ever tightens.
#[derive(Debug)]
struct SearchState {
    ceiling: f64,
    vertices: HashMap<usize, VertexState>,
}

/// Minimum-cost path from `origin` to `target` over the full graph, among
/// paths whose cost stayed within the ceiling at the time they were found.
///
/// Branch-and-bound depth-first search exploiting the ascending neighbor
/// order: once a neighbor's cumulative distance exceeds the ceiling, every
/// remaining neighbor of that vertex is at least as far and is skipped
/// wholesale. Each arrival at `target` tightens the ceiling, cutting off
/// more of the remaining space.
///
/// Returns the path exclusive of `origin`, inclusive of `target`. Callers
/// always pass a ceiling admitting at least one known path (the literal
/// back-step retrace), so exhaustion signals a logic defect upstream and
/// surfaces as [`Error::DetourSearchExhausted`].
pub fn shortest_detour(
    graph: &Graph,
    origin: usize,
    target: usize,
    ceiling: f64,
) -> Result<Vec<usize>> {
    // A direct edge between two points in the plane beats any multi-hop
    // path between them, so it short-circuits the whole search.
    if graph.has_edge(origin, target) {
        return Ok(vec![target]);
    }

    let mut state = SearchState {
        ceiling,
        vertices: HashMap::default(),
    };
    state.vertices.insert(
        origin,
        VertexState {
            best_dist: 0.0,
            reached_from: None,
            in_progress: true,
        },
    );
    explore(graph, origin, 0.0, target, &mut state);

    reconstruct(&state, origin, target).ok_or_else(|| Error::DetourSearchExhausted {
        origin: graph.id_of(origin),
        target: graph.id_of(target),
        ceiling,
    })
}

fn explore(graph: &Graph, at: usize, dist_here: f64, target: usize, state: &mut SearchState) {
    for neighbor in graph.neighbors(at) {
        let reached = dist_here + neighbor.dist;
        if reached > state.ceiling {
            // Neighbors ascend by distance: everything after is farther.
            break;
        }
        if neighbor.to == target {
            let improved = state
                .vertices
                .get(&target)
                .map_or(true, |v| reached < v.best_dist);
            if improved {
                state.vertices.insert(
                    target,
                    VertexState {
                        best_dist: reached,
                        reached_from: Some(at),
                        in_progress: false,
                    },
                );
                state.ceiling = reached;
            }
            continue;
        }
        match state.vertices.get(&neighbor.to) {
            Some(v) if v.in_progress => continue,
            // Not strictly shorter than the finalized best: nothing new
            // would come of continuing down this branch.
            Some(v) if reached >= v.best_dist => continue,
            _ => {}
        }
        state.vertices.insert(
            neighbor.to,
            VertexState {
                best_dist: reached,
                reached_from: Some(at),
                in_progress: true,
            },
        );
        explore(graph, neighbor.to, reached, target, state);
        if let Some(v) = state.vertices.get_mut(&neighbor.to) {
            v.in_progress = false;
        }
    }
}

/// Walk the recorded best-incoming edges backward from `target`, then flip.
/// Recorded distances strictly decrease along the chain, so it terminates at
/// the origin.
fn reconstruct(state: &SearchState, origin: usize, target: usize) -> Option<Vec<usize>> {
    let mut path = Vec::new();
    let mut cursor = target;
    while cursor != origin {
        path.push(cursor);
        cursor = state.vertices.get(&cursor)?.reached_from?;
    }
    path.reverse();
    Some(path)
}
