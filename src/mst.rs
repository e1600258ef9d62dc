use std::{cmp::Reverse, collections::BinaryHeap};

use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::observe::TourObserver;

/// An edge pointing outward from the partially built tree.
#[derive(Debug, PartialEq)]
struct CandidateEdge {
    dist: f64,
    from: usize,
    to: usize,
}

impl Eq for CandidateEdge {}

impl PartialOrd for CandidateEdge {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CandidateEdge {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Tie-break equal lengths by index so equal-length edges pop in a
        // fixed order and the whole pipeline stays deterministic.
        self.dist
            .total_cmp(&other.dist)
            .then(self.from.cmp(&other.from))
            .then(self.to.cmp(&other.to))
    }
}

/// Rooted spanning tree overlaid on the graph arena.
///
/// `children` lists own the tree edges in attachment order. `parent` is a
/// plain index back-reference (`Some(root)` for the root itself), doubling as
/// the linked-state marker while the tree is under construction.
#[derive(Debug)]
pub struct SpanTree {
    pub root: usize,
    parent: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
}

impl SpanTree {
    pub fn children(&self, ix: usize) -> &[usize] {
        &self.children[ix]
    }

    pub fn parent(&self, ix: usize) -> Option<usize> {
        self.parent[ix]
    }

    pub fn is_root(&self, ix: usize) -> bool {
        self.parent[ix] == Some(ix)
    }
}

/// Prim's minimum spanning tree over the graph, rooted at `root`.
///
/// Seeds a min-heap with the root's neighbor edges, then repeatedly attaches
/// the cheapest edge reaching an unlinked vertex and pushes that vertex's
/// outward edges. Terminates after `|V| - 1` attachments; anything less means
/// the graph is disconnected relative to the root, which is a hard error
/// rather than a partial tree.
pub fn span_tree(graph: &Graph, root: usize, observer: &mut dyn TourObserver) -> Result<SpanTree> {
    let n = graph.len();
    let mut parent: Vec<Option<usize>> = vec![None; n];
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
    parent[root] = Some(root);

    let mut candidates = BinaryHeap::new();
    for neighbor in graph.neighbors(root) {
        candidates.push(Reverse(CandidateEdge {
            dist: neighbor.dist,
            from: root,
            to: neighbor.to,
        }));
    }

    let mut linked = 1;
    while let Some(Reverse(edge)) = candidates.pop() {
        // Every queued edge points outward from the tree built so far, so
        // `from` is always linked; only `to` needs checking.
        match parent[edge.to].is_some() {
            // Edge would not attach a new vertex
            true => continue,
            false => {
                parent[edge.to] = Some(edge.from);
                children[edge.from].push(edge.to);
                linked += 1;
                observer.tree_edge(graph.id_of(edge.from), graph.id_of(edge.to), edge.dist);

                for neighbor in graph.neighbors(edge.to) {
                    if parent[neighbor.to].is_none() {
                        candidates.push(Reverse(CandidateEdge {
                            dist: neighbor.dist,
                            from: edge.to,
                            to: neighbor.to,
                        }));
                    }
                }
                if linked == n {
                    // All vertices attached, remaining candidates are moot
                    break;
                }
            }
        }
    }

    if linked != n {
        return Err(Error::DisconnectedGraph {
            start: graph.id_of(root),
            unreached: n - linked,
        });
    }

    Ok(SpanTree {
        root,
        parent,
        children,
    })
}
