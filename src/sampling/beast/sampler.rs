//! Abstraction-guided directed state sampler
//!
//! Runs an incremental D* Lite search over the cells of an abstraction,
//! measuring distance in expected sampling effort rather than geometry.
//! The cheapest edge on the open list becomes the target: the host
//! propagates from a state registered in the edge's source cell toward a
//! state drawn in its destination cell and reports where it landed.
//! Outcomes feed back into edge efforts and the search is repaired
//! incrementally.

use std::time::Instant;

use log::{debug, error, info, trace, warn};
use ordered_float::OrderedFloat;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::common::{
    Abstraction, DirectedStateSampler, GoalRegion, PlanningError, PlanningResult, StatePair,
    StateSpace,
};
use crate::sampling::beast::effort::{EdgeStatus, EffortModel};
use crate::sampling::beast::frontier::{IndexedPriorityQueue, Key};
use crate::sampling::beast::graph::{CellGraph, Edge, Vertex};

fn default_state_radius() -> f64 {
    0.1
}

/// Configuration for the guided sampler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuidedSamplerConfig {
    /// Perturbation radius around a cell's representative state when the
    /// abstraction cannot sample cells directly
    #[serde(default = "default_state_radius")]
    pub state_radius: f64,

    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default)]
    pub effort: EffortModel,
}

impl Default for GuidedSamplerConfig {
    fn default() -> Self {
        Self {
            state_radius: default_state_radius(),
            seed: None,
            effort: EffortModel::default(),
        }
    }
}

impl GuidedSamplerConfig {
    pub fn validate(&self) -> PlanningResult<()> {
        if !(self.state_radius > 0.0) {
            return Err(PlanningError::InvalidParameter(format!(
                "state_radius must be positive, got {}",
                self.state_radius
            )));
        }
        self.effort.validate()
    }
}

pub struct GuidedSampler<SP: StateSpace, A, G> {
    space: SP,
    abstraction: A,
    goal: G,
    config: GuidedSamplerConfig,
    graph: CellGraph<SP::State>,
    /// Locally inconsistent vertices
    pending: IndexedPriorityQueue<usize, Key>,
    /// Candidate target edges by effort; entries are never dropped
    open: IndexedPriorityQueue<usize, OrderedFloat<f64>>,
    start_cell: usize,
    goal_cell: usize,
    target: Option<usize>,
    target_success: bool,
    goal_edge: Option<usize>,
    oracle_calls: usize,
    rng: StdRng,
}

impl<SP, A, G> GuidedSampler<SP, A, G>
where
    SP: StateSpace,
    A: Abstraction<SP::State>,
    G: GoalRegion<SP::State>,
{
    /// Build the cell graph, run the initial search from the goal cell and
    /// seed the open list with the edges leaving the start cell
    pub fn new(
        space: SP,
        abstraction: A,
        goal: G,
        start: SP::State,
        config: GuidedSamplerConfig,
    ) -> PlanningResult<Self> {
        config.validate()?;
        let timer = Instant::now();

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let size = abstraction.size();
        if !space.is_valid(&start) {
            return Err(PlanningError::InvalidStart);
        }
        let start_cell = abstraction.cell_of(&start);
        if start_cell >= size {
            return Err(PlanningError::InvalidStart);
        }
        let goal_state = goal.sample_goal(&mut rng).ok_or(PlanningError::InvalidGoal)?;
        let goal_cell = abstraction.cell_of(&goal_state);
        if goal_cell >= size {
            return Err(PlanningError::InvalidGoal);
        }

        let mut graph = CellGraph::new(size);
        let prior = config.effort.prior();
        for cell in 0..size {
            for neighbor in abstraction.neighbors(cell) {
                graph.get_or_insert_edge(cell, neighbor, prior);
                graph.get_or_insert_edge(neighbor, cell, prior);
            }
        }

        let mut sampler = Self {
            space,
            abstraction,
            goal,
            config,
            graph,
            pending: IndexedPriorityQueue::new(),
            open: IndexedPriorityQueue::new(),
            start_cell,
            goal_cell,
            target: None,
            target_success: false,
            goal_edge: None,
            oracle_calls: 0,
            rng,
        };

        sampler.graph.vertex_mut(goal_cell).rhs = 0.0;
        let key = sampler.calculate_key(goal_cell);
        sampler.pending.push(goal_cell, key);
        sampler.compute_shortest_path();

        for id in 0..sampler.graph.edges().len() {
            let edge = sampler.graph.edge_mut(id);
            edge.initial_effort = edge.effort;
        }

        sampler.graph.vertex_mut(start_cell).add_state(start);
        sampler.add_outgoing_edges_to_open(start_cell);

        info!(
            "Guided sampler: {} cells, {} edges, start cell {}, goal cell {} (g = {:.2}) initialized in {:?}",
            size,
            sampler.graph.edges().len(),
            start_cell,
            goal_cell,
            sampler.graph.vertex(start_cell).g,
            timer.elapsed()
        );
        Ok(sampler)
    }

    pub fn config(&self) -> &GuidedSamplerConfig {
        &self.config
    }

    pub fn graph(&self) -> &CellGraph<SP::State> {
        &self.graph
    }

    pub fn vertices(&self) -> &[Vertex<SP::State>] {
        self.graph.vertices()
    }

    pub fn edges(&self) -> &[Edge] {
        self.graph.edges()
    }

    pub fn edge_between(&self, start: usize, end: usize) -> Option<&Edge> {
        self.graph.find_edge(start, end).map(|id| self.graph.edge(id))
    }

    /// Edge the last produced state pair was aimed at
    pub fn target_edge(&self) -> Option<&Edge> {
        self.target.map(|id| self.graph.edge(id))
    }

    pub fn goal_edge(&self) -> Option<&Edge> {
        self.goal_edge.map(|id| self.graph.edge(id))
    }

    pub fn start_cell(&self) -> usize {
        self.start_cell
    }

    pub fn goal_cell(&self) -> usize {
        self.goal_cell
    }

    pub fn open_len(&self) -> usize {
        self.open.len()
    }

    /// Vertices still waiting for the search to make them consistent
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Number of validity oracle invocations so far
    pub fn oracle_calls(&self) -> usize {
        self.oracle_calls
    }

    fn calculate_key(&self, cell: usize) -> Key {
        let vertex = self.graph.vertex(cell);
        let m = vertex.g.min(vertex.rhs);
        Key::new(m, m)
    }

    fn edge_effort(&self, id: usize) -> f64 {
        let edge = self.graph.edge(id);
        let g_end = self.graph.vertex(edge.end).g;
        if edge.interior {
            self.config.effort.interior_effort(&edge.stats, g_end)
        } else {
            self.config.effort.standard_effort(&edge.stats, g_end)
        }
    }

    fn set_edge_effort(&mut self, id: usize, effort: f64) {
        self.graph.edge_mut(id).effort = effort;
        if self.open.contains(id) {
            self.open.push(id, OrderedFloat(effort));
        }
    }

    fn add_outgoing_edges_to_open(&mut self, cell: usize) {
        for &id in self.graph.outgoing(cell) {
            self.open.push(id, OrderedFloat(self.graph.edge(id).effort));
        }
    }

    fn update_vertex(&mut self, cell: usize) {
        if cell != self.goal_cell {
            let rhs = self
                .graph
                .outgoing(cell)
                .iter()
                .map(|&id| {
                    let edge = self.graph.edge(id);
                    self.graph.vertex(edge.end).g + edge.stats.required_samples()
                })
                .fold(f64::INFINITY, f64::min);
            self.graph.vertex_mut(cell).rhs = rhs;
        }

        self.pending.remove(cell);
        if !self.graph.vertex(cell).is_consistent() {
            let key = self.calculate_key(cell);
            self.pending.push(cell, key);
        }
    }

    fn compute_shortest_path(&mut self) {
        while let Some((cell, k_old)) = self.pending.pop() {
            let k_new = self.calculate_key(cell);
            let vertex = self.graph.vertex(cell);

            if k_old < k_new {
                self.pending.push(cell, k_new);
                continue;
            }

            let over_consistent = vertex.g > vertex.rhs;
            let vertex = self.graph.vertex_mut(cell);
            vertex.g = if over_consistent {
                vertex.rhs
            } else {
                f64::INFINITY
            };

            let incoming = self.graph.incoming(cell).to_vec();
            for &id in &incoming {
                let effort = self.edge_effort(id);
                self.set_edge_effort(id, effort);
            }
            if !over_consistent {
                self.update_vertex(cell);
            }
            for &id in &incoming {
                let predecessor = self.graph.edge(id).start;
                self.update_vertex(predecessor);
            }
        }
    }

    /// Fold the outcome of the previous target into the search
    fn apply_feedback(&mut self, target: usize) {
        let (start, end) = {
            let edge = self.graph.edge(target);
            (edge.start, edge.end)
        };

        if self.target_success {
            if self.goal_edge.is_none() && end == self.goal_cell {
                self.add_goal_edge();
            }
            let model = &self.config.effort;
            let edge = self.graph.edge_mut(target);
            edge.successes += 1;
            model.record_success(&mut edge.stats);
            if !edge.interior {
                edge.interior = true;
                debug!("Guided sampler: edge {} -> {} became interior", start, end);
            }
            let effort = self.edge_effort(target);
            self.set_edge_effort(target, effort);
        } else {
            let model = &self.config.effort;
            let g_end = self.graph.vertex(end).g;
            let edge = self.graph.edge_mut(target);
            edge.failures += 1;
            model.record_failure(&mut edge.stats);
            // the goal edge starts from a configured effort, not its counts
            let effort = model.standard_effort(&edge.stats, g_end).max(edge.effort);
            self.set_edge_effort(target, effort);
        }

        self.update_vertex(start);
        self.compute_shortest_path();

        if self.target_success {
            self.add_outgoing_edges_to_open(end);
        }
    }

    fn add_goal_edge(&mut self) {
        let model = &self.config.effort;
        let mut edge = Edge::new(self.goal_cell, self.goal_cell, model.prior());
        edge.status = EdgeStatus::Valid;
        model.resolve(&mut edge.stats, EdgeStatus::Valid);
        edge.effort = model.goal_edge_effort;
        edge.initial_effort = model.goal_edge_effort;
        let effort = edge.effort;

        let id = self.graph.insert_detached(edge);
        self.open.push(id, OrderedFloat(effort));
        self.goal_edge = Some(id);
        debug!("Guided sampler: goal cell {} reached, goal edge added", self.goal_cell);
    }

    /// Peek the open list, resolving unknown edges until the cheapest
    /// edge has a known status
    fn select_target(&mut self) -> PlanningResult<usize> {
        loop {
            debug_assert!(!self.open.is_empty(), "open list exhausted");
            let (id, _) = self.open.peek().ok_or_else(|| {
                error!("Guided sampler: open list is empty");
                PlanningError::EmptyFrontier
            })?;

            let edge = self.graph.edge(id);
            if edge.status != EdgeStatus::Unknown {
                return Ok(id);
            }

            let (start, end) = (edge.start, edge.end);
            let status = if self.abstraction.is_valid_edge(start, end) {
                EdgeStatus::Valid
            } else {
                EdgeStatus::Invalid
            };
            self.oracle_calls += 1;

            let model = &self.config.effort;
            let edge = self.graph.edge_mut(id);
            edge.status = status;
            model.resolve(&mut edge.stats, status);
            let effort = self.edge_effort(id);
            self.set_edge_effort(id, effort);
            debug!(
                "Guided sampler: edge {} -> {} resolved {:?}, effort {:.2}",
                start, end, status, effort
            );

            self.update_vertex(start);
            self.compute_shortest_path();
        }
    }

    fn sample_in_cell(&mut self, cell: usize) -> SP::State {
        if self.abstraction.supports_sampling() {
            if let Some(state) = self.abstraction.sample_cell_state(cell, &mut self.rng) {
                return state;
            }
        }
        let representative = self.abstraction.representative_state(cell);
        self.space
            .sample_uniform_near(&representative, self.config.state_radius, &mut self.rng)
    }

    fn sample_pair(&mut self, target: usize) -> PlanningResult<StatePair<SP::State>> {
        let (start, end) = {
            let edge = self.graph.edge(target);
            (edge.start, edge.end)
        };

        let to = if self.goal_edge == Some(target) {
            self.goal
                .sample_goal(&mut self.rng)
                .ok_or(PlanningError::InvalidGoal)?
        } else {
            self.sample_in_cell(end)
        };

        let space = &self.space;
        let from = self
            .graph
            .vertex(start)
            .sample_state_by_distance(&to, |a: &SP::State, b: &SP::State| space.distance(a, b), &mut self.rng)
            .cloned()
            .ok_or(PlanningError::EmptyCell(start))?;

        trace!("Guided sampler: target edge {} -> {}", start, end);
        Ok(StatePair { from, to })
    }
}

impl<SP, A, G> DirectedStateSampler<SP::State> for GuidedSampler<SP, A, G>
where
    SP: StateSpace,
    A: Abstraction<SP::State>,
    G: GoalRegion<SP::State>,
{
    fn sample(&mut self) -> PlanningResult<StatePair<SP::State>> {
        if let Some(target) = self.target {
            self.apply_feedback(target);
        }

        let target = self.select_target()?;
        if self.target != Some(target) {
            let edge = self.graph.edge(target);
            debug!(
                "Guided sampler: new target {} -> {} with effort {:.2}",
                edge.start, edge.end, edge.effort
            );
        }
        self.target = Some(target);
        self.target_success = false;

        self.sample_pair(target)
    }

    fn reached(&mut self, state: &SP::State) {
        let cell = self.abstraction.cell_of(state);
        if cell >= self.graph.size() {
            warn!("Guided sampler: reached state maps outside the abstraction");
            return;
        }
        self.graph.vertex_mut(cell).add_state(state.clone());

        match self.target {
            Some(target) if self.graph.edge(target).end == cell => self.target_success = true,
            _ => self.add_outgoing_edges_to_open(cell),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{BallGoal, GridAbstraction, RealVectorSpace};
    use nalgebra::DVector;

    struct UnsampleableGoal;

    impl GoalRegion<DVector<f64>> for UnsampleableGoal {
        fn distance_to_goal(&self, state: &DVector<f64>) -> f64 {
            (state[0] - 3.5).abs()
        }

        fn threshold(&self) -> f64 {
            0.2
        }
    }

    fn corridor() -> (RealVectorSpace, GridAbstraction) {
        let space = RealVectorSpace::new(vec![(0.0, 4.0), (0.0, 1.0)]);
        let abstraction = GridAbstraction::new(space.clone(), vec![4, 1], 0.05).unwrap();
        (space, abstraction)
    }

    fn sampler() -> GuidedSampler<RealVectorSpace, GridAbstraction, BallGoal> {
        let (space, abstraction) = corridor();
        let config = GuidedSamplerConfig {
            seed: Some(5),
            ..GuidedSamplerConfig::default()
        };
        GuidedSampler::new(
            space,
            abstraction,
            BallGoal::new(DVector::from_row_slice(&[3.5, 0.5]), 0.2),
            DVector::from_row_slice(&[0.5, 0.5]),
            config,
        )
        .unwrap()
    }

    #[test]
    fn test_initial_search_is_consistent() {
        let sampler = sampler();
        assert_eq!(sampler.start_cell(), 0);
        assert_eq!(sampler.goal_cell(), 3);
        assert_eq!(sampler.pending_len(), 0);
        assert!(sampler.vertices().iter().all(|v| v.is_consistent()));

        let g: Vec<f64> = sampler.vertices().iter().map(|v| v.g).collect();
        assert_eq!(g, vec![6.0, 4.0, 2.0, 0.0]);
        let edge = sampler.edge_between(0, 1).unwrap();
        assert_eq!(edge.initial_effort, 6.0);
        assert_eq!(sampler.oracle_calls(), 0);
        assert_eq!(sampler.open_len(), 1);
    }

    #[test]
    fn test_first_sample_resolves_target() {
        let mut sampler = sampler();
        let pair = sampler.sample().unwrap();
        assert_eq!(pair.from, DVector::from_row_slice(&[0.5, 0.5]));
        assert!(pair.to[0] >= 1.0 && pair.to[0] < 2.0);

        let target = sampler.target_edge().unwrap();
        assert_eq!((target.start, target.end), (0, 1));
        assert_eq!(target.status, EdgeStatus::Valid);
        assert_eq!(target.effort, 5.5);
        assert_eq!(sampler.oracle_calls(), 1);
        // other edges stay unresolved
        assert_eq!(sampler.edge_between(1, 2).unwrap().status, EdgeStatus::Unknown);
    }

    #[test]
    fn test_unsupported_variants() {
        let mut sampler = sampler();
        let near = DVector::from_row_slice(&[1.0, 0.5]);
        assert_eq!(
            sampler.sample_state(),
            Err(PlanningError::UnsupportedOperation("sample_state"))
        );
        assert_eq!(
            sampler.sample_near(&near, 0.1),
            Err(PlanningError::UnsupportedOperation("sample_near"))
        );
    }

    #[test]
    fn test_construction_errors() {
        let (space, abstraction) = corridor();
        let result = GuidedSampler::new(
            space.clone(),
            abstraction.clone(),
            UnsampleableGoal,
            DVector::from_row_slice(&[0.5, 0.5]),
            GuidedSamplerConfig::default(),
        );
        assert!(matches!(result, Err(PlanningError::InvalidGoal)));

        let result = GuidedSampler::new(
            space,
            abstraction,
            BallGoal::new(DVector::from_row_slice(&[3.5, 0.5]), 0.2),
            DVector::from_row_slice(&[-1.0, 0.5]),
            GuidedSamplerConfig::default(),
        );
        assert!(matches!(result, Err(PlanningError::InvalidStart)));
    }

    #[test]
    fn test_off_target_landing_expands_frontier() {
        let mut sampler = sampler();
        sampler.sample().unwrap();
        assert_eq!(sampler.open_len(), 1);
        // landed two cells ahead instead of in the target cell
        sampler.reached(&DVector::from_row_slice(&[2.5, 0.5]));
        assert_eq!(sampler.open_len(), 3);
        assert_eq!(sampler.vertices()[2].states().len(), 1);
    }
}
