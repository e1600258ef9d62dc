use crate::error::Result;
use crate::graph::{Graph, PointId};
use crate::mst::SpanTree;
use crate::observe::TourObserver;
use crate::search::shortest_detour;

/// Derive a closed tour from a rooted spanning tree.
///
/// A depth-first pre-order walk of the tree visits every vertex; the tour
/// would retrace tree edges whenever the walk returns from a finished subtree
/// to descend into the next sibling. Instead of emitting that retrace
/// literally, each back-step segment is replaced by the cheapest path the
/// bounded search finds within the retrace cost, or by a single direct edge
/// when the graph has one.
///
/// The result starts and ends with the root id. Every vertex is visited on
/// its forward tree edge exactly once; detour substitutions may additionally
/// pass through vertices already visited.
pub fn derive_cycle(
    graph: &Graph,
    tree: &SpanTree,
    observer: &mut dyn TourObserver,
) -> Result<Vec<PointId>> {
    let mut walker = Walker {
        graph,
        observer,
        cycle: vec![tree.root],
        pending: Vec::new(),
    };
    walker.walk(tree, tree.root)?;
    walker.close(tree)?;

    Ok(walker.cycle.iter().map(|&ix| graph.id_of(ix)).collect())
}

/// Walk state: the cycle built so far and the stack of vertices the walk has
/// stepped forward past without yet accounting for the step back.
struct Walker<'g, 'o> {
    graph: &'g Graph,
    observer: &'o mut dyn TourObserver,
    cycle: Vec<usize>,
    pending: Vec<usize>,
}

impl Walker<'_, '_> {
    fn walk(&mut self, tree: &SpanTree, from: usize) -> Result<()> {
        self.observer.walk_enter(self.graph.id_of(from));
        if let Some((&first, rest)) = tree.children(from).split_first() {
            // The first child follows a forward tree edge with no preceding
            // back-step, so it needs no search.
            self.cycle.push(first);
            self.pending.push(from);
            self.walk(tree, first)?;

            for &child in rest {
                self.shortcut_back_segment(from, child)?;
                self.pending.push(from);
                self.walk(tree, child)?;
            }
        } else {
            self.pending.push(from);
        }
        self.observer.walk_exit(self.graph.id_of(from));
        Ok(())
    }

    /// The walk just returned from a finished subtree: the deepest vertex it
    /// unwound from sits on top of `pending`, with the retraced tree path
    /// back up to `unwind_to` below it. Sum that retrace (plus the forward
    /// edge to `next`) as the worst case, then emit something no worse.
    fn shortcut_back_segment(&mut self, unwind_to: usize, next: usize) -> Result<()> {
        let origin = self
            .pending
            .pop()
            .expect("walk leaves its deepest vertex pending");
        debug_assert_ne!(origin, unwind_to);

        let mut ceiling = 0.0;
        let mut current = origin;
        while current != unwind_to {
            let step_up = self
                .pending
                .pop()
                .expect("back-step chain reaches the unwind vertex");
            ceiling += self.graph.dist(current, step_up);
            current = step_up;
        }
        ceiling += self.graph.dist(unwind_to, next);

        self.emit_segment(origin, next, ceiling)
    }

    /// Append the best path from `origin` to `target` bounded by `ceiling`:
    /// a direct graph edge if one exists, otherwise the search result.
    fn emit_segment(&mut self, origin: usize, target: usize, ceiling: f64) -> Result<()> {
        if self.graph.has_edge(origin, target) {
            let cost = self.graph.dist(origin, target);
            self.observer.detour(
                self.graph.id_of(origin),
                self.graph.id_of(target),
                ceiling,
                cost,
                1,
            );
            self.cycle.push(target);
            return Ok(());
        }

        let path = shortest_detour(self.graph, origin, target, ceiling)?;
        let mut cost = 0.0;
        let mut at = origin;
        for &step in &path {
            cost += self.graph.dist(at, step);
            at = step;
        }
        self.observer.detour(
            self.graph.id_of(origin),
            self.graph.id_of(target),
            ceiling,
            cost,
            path.len(),
        );
        self.cycle.extend(path);
        Ok(())
    }

    /// Close the loop once the walk has fully unwound. If the walk ended at
    /// the root there is nothing left to account for; otherwise the pending
    /// back-step from the deepest vertex is resolved toward the root.
    fn close(&mut self, tree: &SpanTree) -> Result<()> {
        let origin = self
            .pending
            .pop()
            .expect("the walk pushes the root before returning");
        if origin == tree.root {
            self.cycle.push(tree.root);
            return Ok(());
        }

        let mut ceiling = 0.0;
        let mut current = origin;
        while current != tree.root {
            let step_up = self
                .pending
                .pop()
                .expect("back-step chain reaches the root");
            ceiling += self.graph.dist(current, step_up);
            current = step_up;
        }

        self.emit_segment(origin, tree.root, ceiling)
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::{Graph, Point, PointId};
    use crate::mst::span_tree;
    use crate::observe::Quiet;
    use crate::tour::derive_cycle;
    use pretty_assertions::assert_eq;

    fn build(points: Vec<Point>, edges: &[(u64, u64)]) -> Graph {
        let edges: Vec<_> = edges
            .iter()
            .map(|(a, b)| (PointId(*a), PointId(*b)))
            .collect();
        Graph::build(points, &edges).unwrap()
    }

    fn tour(graph: &Graph, start: usize) -> Vec<PointId> {
        let tree = span_tree(graph, start, &mut Quiet).unwrap();
        derive_cycle(graph, &tree, &mut Quiet).unwrap()
    }

    fn tour_length(graph: &Graph, ids: &[PointId]) -> f64 {
        ids.windows(2)
            .map(|w| {
                let a = graph.index_of(w[0]).unwrap();
                let b = graph.index_of(w[1]).unwrap();
                graph.dist(a, b)
            })
            .sum()
    }

    #[test]
    fn single_vertex_tour_is_the_start_twice() {
        let graph = build(vec![Point::new(7, 1.0, 2.0)], &[]);
        assert_eq!(tour(&graph, 0), vec![PointId(7), PointId(7)]);
    }

    #[test]
    fn two_vertices_bounce_once() {
        let graph = build(
            vec![Point::new(0, 0.0, 0.0), Point::new(1, 1.0, 0.0)],
            &[(0, 1)],
        );
        assert_eq!(tour(&graph, 0), vec![PointId(0), PointId(1), PointId(0)]);
    }

    #[test]
    fn unit_square_tour_beats_or_matches_the_perimeter() {
        let graph = build(
            vec![
                Point::new(0, 0.0, 0.0),
                Point::new(1, 1.0, 0.0),
                Point::new(2, 1.0, 1.0),
                Point::new(3, 0.0, 1.0),
            ],
            &[(0, 1), (1, 2), (2, 3), (3, 0), (0, 2), (1, 3)],
        );
        let cycle = tour(&graph, 0);

        // Fully connected square: every sibling transition collapses to a
        // direct edge, so the strict permutation holds.
        assert_eq!(cycle.first(), Some(&PointId(0)));
        assert_eq!(cycle.last(), Some(&PointId(0)));
        assert_eq!(cycle.len(), 5);
        let mut interior: Vec<_> = cycle[1..cycle.len() - 1].to_vec();
        interior.sort();
        assert_eq!(interior, vec![PointId(1), PointId(2), PointId(3)]);

        assert!(tour_length(&graph, &cycle) <= 4.0 + 1e-9);
    }

    #[test]
    fn star_tour_threads_every_transition_through_the_center() {
        // Center id 0; outer ids 1..=5 on the unit circle, adjacent only to
        // the center. Start at the outer vertex 1.
        let mut points = vec![Point::new(0, 0.0, 0.0)];
        let mut edges = Vec::new();
        for i in 1..=5u64 {
            let angle = i as f64;
            points.push(Point::new(i, angle.cos(), angle.sin()));
            edges.push((0, i));
        }
        let graph = build(points, &edges);
        let cycle = tour(&graph, 1);

        assert_eq!(cycle.first(), Some(&PointId(1)));
        assert_eq!(cycle.last(), Some(&PointId(1)));
        // Five outer visits, the start twice, and the center between every
        // consecutive pair of outer vertices: 11 stops in all.
        assert_eq!(cycle.len(), 11);
        let center_visits = cycle.iter().filter(|id| **id == PointId(0)).count();
        assert_eq!(center_visits, 5);
        // The center alternates with outer vertices throughout.
        for pair in cycle.windows(2) {
            assert!((pair[0] == PointId(0)) != (pair[1] == PointId(0)));
        }
        // Each outer vertex appears exactly once.
        for i in 2..=5u64 {
            assert_eq!(cycle.iter().filter(|id| **id == PointId(i)).count(), 1);
        }
    }

    #[test]
    fn detour_substitution_never_exceeds_the_retrace_cost() {
        use crate::observe::TourObserver;

        struct CeilingCheck;
        impl TourObserver for CeilingCheck {
            fn detour(
                &mut self,
                _origin: PointId,
                _target: PointId,
                ceiling: f64,
                cost: f64,
                _hops: usize,
            ) {
                assert!(cost <= ceiling + 1e-9, "cost {cost} above ceiling {ceiling}");
            }
        }

        // A comb: spine 0-1-2-3 with a tooth hanging off each spine vertex.
        let graph = build(
            vec![
                Point::new(0, 0.0, 0.0),
                Point::new(1, 1.0, 0.0),
                Point::new(2, 2.0, 0.0),
                Point::new(3, 3.0, 0.0),
                Point::new(4, 0.0, 1.0),
                Point::new(5, 1.0, 1.0),
                Point::new(6, 2.0, 1.0),
                Point::new(7, 3.0, 1.0),
            ],
            &[
                (0, 1),
                (1, 2),
                (2, 3),
                (0, 4),
                (1, 5),
                (2, 6),
                (3, 7),
                (4, 5),
                (5, 6),
                (6, 7),
            ],
        );
        let tree = span_tree(&graph, 0, &mut Quiet).unwrap();
        let cycle = derive_cycle(&graph, &tree, &mut CeilingCheck).unwrap();

        assert_eq!(cycle.first(), Some(&PointId(0)));
        assert_eq!(cycle.last(), Some(&PointId(0)));
        for id in 0..8u64 {
            assert!(cycle.contains(&PointId(id)), "vertex {id} missing");
        }
    }

    #[test]
    fn tours_are_deterministic() {
        let points: Vec<Point> = (0..12u64)
            .map(|i| {
                let a = i as f64 * 0.7;
                Point::new(i, a.cos() * (1.0 + 0.1 * i as f64), a.sin() * 2.0)
            })
            .collect();
        let mut edges = Vec::new();
        for i in 0..12u64 {
            for j in (i + 1)..12u64 {
                if (i + j) % 3 != 0 || j == i + 1 {
                    edges.push((i, j));
                }
            }
        }
        let graph = build(points, &edges);
        assert_eq!(tour(&graph, 0), tour(&graph, 0));
    }
}
