/// Chains loose edges into as few strokes as a greedy walk can manage
use std::collections::BTreeMap;

use crate::geometry::Edge;

/// A run of vertex indices to stroke; closed runs join their last vertex back to the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polyline {
    pub vertices: Vec<usize>,
    pub closed: bool,
}

impl Polyline {
    /// Number of edges the stroke covers.
    pub fn edge_count(&self) -> usize {
        if self.closed {
            self.vertices.len()
        } else {
            self.vertices.len().saturating_sub(1)
        }
    }
}

/// Vertex -> edges not yet walked. Exhausted vertices are dropped from the map.
struct Incidence {
    edges_at: BTreeMap<usize, Vec<usize>>,
}

impl Incidence {
    fn new(edges: &[Edge]) -> Self {
        let mut edges_at: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (i, edge) in edges.iter().enumerate() {
            edges_at.entry(edge.a).or_default().push(i);
            edges_at.entry(edge.b).or_default().push(i);
        }
        Self { edges_at }
    }

    fn any_vertex(&self) -> Option<usize> {
        self.edges_at.keys().next().copied()
    }

    fn next_edge(&self, vertex: usize) -> Option<usize> {
        self.edges_at.get(&vertex).and_then(|list| list.last().copied())
    }

    fn detach(&mut self, vertex: usize, edge: usize) {
        let Some(list) = self.edges_at.get_mut(&vertex) else {
            return;
        };
        if let Some(pos) = list.iter().position(|&e| e == edge) {
            list.swap_remove(pos);
        }
        if list.is_empty() {
            self.edges_at.remove(&vertex);
        }
    }

    /// Follow unused edges from `start` until reaching a vertex with none left.
    fn walk(&mut self, edges: &[Edge], start: usize) -> Vec<usize> {
        let mut path = vec![start];
        let mut at = start;
        while let Some(e) = self.next_edge(at) {
            let Some(far) = edges[e].other(at) else {
                break;
            };
            self.detach(at, e);
            self.detach(far, e);
            path.push(far);
            at = far;
        }
        path
    }
}

/// Cover every edge exactly once with closed loops and maximal open chains.
///
/// Walks begin at the lowest-numbered vertex that still has edges, so the
/// output is deterministic for a given edge list. Edge records are never
/// reoriented; traversal direction lives only in the output order.
pub fn assemble_loops(edges: &[Edge]) -> Vec<Polyline> {
    let mut incidence = Incidence::new(edges);
    let mut lines = Vec::new();

    while let Some(start) = incidence.any_vertex() {
        let mut forward = incidence.walk(edges, start);
        if forward.len() > 1 && forward.last() == Some(&start) {
            forward.pop();
            lines.push(Polyline {
                vertices: forward,
                closed: true,
            });
            continue;
        }

        // Dead end: whatever is left at the start extends the chain backwards.
        let mut chain = incidence.walk(edges, start);
        chain.reverse();
        chain.extend_from_slice(&forward[1..]);
        lines.push(Polyline {
            vertices: chain,
            closed: false,
        });
    }

    lines
}
