//! Cell graph of the guided sampler: one vertex per abstraction cell and
//! lazily created directed edges with forward and reverse adjacency.

use std::collections::HashMap;

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::sampling::beast::effort::{EdgeStatus, PropagationStats};

/// Search node of an abstraction cell
#[derive(Debug, Clone)]
pub struct Vertex<S> {
    pub id: usize,
    /// Best known effort to the goal
    pub g: f64,
    /// One-step lookahead of `g`
    pub rhs: f64,
    states: Vec<S>,
}

impl<S> Vertex<S> {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            g: f64::INFINITY,
            rhs: f64::INFINITY,
            states: Vec::new(),
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.g == self.rhs
    }

    pub fn add_state(&mut self, state: S) {
        self.states.push(state);
    }

    /// Concrete states that landed in this cell
    pub fn states(&self) -> &[S] {
        &self.states
    }

    /// Pick a registered state with probability inversely proportional to
    /// its distance to `target`
    pub fn sample_state_by_distance<R, D>(&self, target: &S, distance: D, rng: &mut R) -> Option<&S>
    where
        R: Rng + ?Sized,
        D: Fn(&S, &S) -> f64,
    {
        match self.states.len() {
            0 => None,
            1 => self.states.first(),
            n => {
                let weights = self
                    .states
                    .iter()
                    .map(|s| 1.0 / (distance(s, target) + 1e-9));
                let index = match WeightedIndex::new(weights) {
                    Ok(dist) => dist.sample(rng),
                    Err(_) => rng.gen_range(0..n),
                };
                self.states.get(index)
            }
        }
    }
}

/// Directed transition between two cells
#[derive(Debug, Clone)]
pub struct Edge {
    pub start: usize,
    pub end: usize,
    /// Current priority in the open list
    pub effort: f64,
    /// Effort after the first shortest path computation
    pub initial_effort: f64,
    pub status: EdgeStatus,
    /// The destination has been entered through this edge
    pub interior: bool,
    pub stats: PropagationStats,
    pub successes: u32,
    pub failures: u32,
}

impl Edge {
    pub fn new(start: usize, end: usize, stats: PropagationStats) -> Self {
        Self {
            start,
            end,
            effort: f64::INFINITY,
            initial_effort: f64::INFINITY,
            status: EdgeStatus::Unknown,
            interior: false,
            stats,
            successes: 0,
            failures: 0,
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone)]
pub struct CellGraph<S> {
    vertices: Vec<Vertex<S>>,
    edges: Vec<Edge>,
    lookup: HashMap<(usize, usize), usize>,
    outgoing: Vec<Vec<usize>>,
    incoming: Vec<Vec<usize>>,
}

impl<S> CellGraph<S> {
    pub fn new(size: usize) -> Self {
        Self {
            vertices: (0..size).map(Vertex::new).collect(),
            edges: Vec::new(),
            lookup: HashMap::new(),
            outgoing: vec![Vec::new(); size],
            incoming: vec![Vec::new(); size],
        }
    }

    pub fn size(&self) -> usize {
        self.vertices.len()
    }

    pub fn vertices(&self) -> &[Vertex<S>] {
        &self.vertices
    }

    pub fn vertex(&self, id: usize) -> &Vertex<S> {
        &self.vertices[id]
    }

    pub fn vertex_mut(&mut self, id: usize) -> &mut Vertex<S> {
        &mut self.vertices[id]
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge(&self, id: usize) -> &Edge {
        &self.edges[id]
    }

    pub fn edge_mut(&mut self, id: usize) -> &mut Edge {
        &mut self.edges[id]
    }

    pub fn find_edge(&self, start: usize, end: usize) -> Option<usize> {
        self.lookup.get(&(start, end)).copied()
    }

    /// Edge `start -> end`, created with `stats` on first use
    pub fn get_or_insert_edge(&mut self, start: usize, end: usize, stats: PropagationStats) -> usize {
        if let Some(id) = self.find_edge(start, end) {
            return id;
        }
        let id = self.edges.len();
        self.edges.push(Edge::new(start, end, stats));
        self.lookup.insert((start, end), id);
        self.outgoing[start].push(id);
        self.incoming[end].push(id);
        id
    }

    /// Store an edge that takes no part in the adjacency (goal self-edge)
    pub fn insert_detached(&mut self, edge: Edge) -> usize {
        self.edges.push(edge);
        self.edges.len() - 1
    }

    pub fn outgoing(&self, cell: usize) -> &[usize] {
        &self.outgoing[cell]
    }

    pub fn incoming(&self, cell: usize) -> &[usize] {
        &self.incoming[cell]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn stats() -> PropagationStats {
        PropagationStats { alpha: 1.0, beta: 1.0 }
    }

    #[test]
    fn test_edges_are_created_once() {
        let mut graph: CellGraph<f64> = CellGraph::new(3);
        let a = graph.get_or_insert_edge(0, 1, stats());
        let b = graph.get_or_insert_edge(1, 0, stats());
        assert_eq!(graph.get_or_insert_edge(0, 1, stats()), a);
        assert_ne!(a, b);
        assert_eq!(graph.outgoing(0), &[a]);
        assert_eq!(graph.incoming(0), &[b]);

        let detached = graph.insert_detached(Edge::new(2, 2, stats()));
        assert!(graph.edge(detached).is_self_loop());
        assert!(graph.outgoing(2).is_empty());
        assert!(graph.find_edge(2, 2).is_none());
    }

    #[test]
    fn test_state_selection_prefers_close_states() {
        let mut vertex = Vertex::new(0);
        let mut rng = StdRng::seed_from_u64(11);
        assert!(vertex.sample_state_by_distance(&0.0, |a: &f64, b: &f64| (a - b).abs(), &mut rng).is_none());

        vertex.add_state(0.0);
        vertex.add_state(100.0);
        let near = (0..200)
            .filter_map(|_| vertex.sample_state_by_distance(&1.0, |a: &f64, b: &f64| (a - b).abs(), &mut rng))
            .filter(|&&s| s == 0.0)
            .count();
        assert!(near > 180);
    }
}
