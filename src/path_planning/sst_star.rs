//! SST* (Stable Sparse RRT*) kinodynamic planner
//!
//! Grows a tree of dynamically feasible motions from the start states.
//! Witnesses partition the explored space into neighborhoods of radius
//! `pruning_radius`; each keeps only its cheapest motion active. Replaced
//! motions become inactive and are reclaimed as soon as they are childless.
//! Both radii shrink by `xi` on an iteration schedule that grows with the
//! state and control dimensions, which gives asymptotic near-optimality.

use log::{debug, error, info, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::common::{
    ControlSegment, Cost, DirectedControlSampler, GoalRegion, NearestNeighbors,
    OptimizationObjective, PlannerStatus, PlanningContext, PlanningError, PlanningResult,
    ProblemDefinition, Propagation, Solution, StateSpace, TerminationCondition,
};
use crate::path_planning::motion_tree::{Motion, MotionId, MotionTree, Witness};
use crate::utils::LinearNearestNeighbors;

fn default_goal_bias() -> f64 {
    0.05
}

fn default_selection_radius() -> f64 {
    0.2
}

fn default_pruning_radius() -> f64 {
    0.1
}

fn default_n0() -> f64 {
    1000.0
}

fn default_xi() -> f64 {
    0.5
}

fn default_true() -> bool {
    true
}

/// Configuration for the SST* planner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SstConfig {
    /// Probability of sampling the goal region instead of the whole space
    #[serde(default = "default_goal_bias")]
    pub goal_bias: f64,

    /// Initial radius for best-first node selection
    #[serde(default = "default_selection_radius")]
    pub selection_radius: f64,

    /// Initial radius of witness neighborhoods
    #[serde(default = "default_pruning_radius")]
    pub pruning_radius: f64,

    /// Iterations before the first radius reduction
    #[serde(default = "default_n0")]
    pub n0: f64,

    /// Radius shrink factor, in (0, 1)
    #[serde(default = "default_xi")]
    pub xi: f64,

    /// Seed for the random number generator (entropy when absent)
    #[serde(default)]
    pub seed: Option<u64>,

    /// Remember the closest candidate to the goal while no exact solution exists
    #[serde(default = "default_true")]
    pub track_approximate: bool,
}

impl Default for SstConfig {
    fn default() -> Self {
        Self {
            goal_bias: default_goal_bias(),
            selection_radius: default_selection_radius(),
            pruning_radius: default_pruning_radius(),
            n0: default_n0(),
            xi: default_xi(),
            seed: None,
            track_approximate: true,
        }
    }
}

impl SstConfig {
    pub fn validate(&self) -> PlanningResult<()> {
        if !(0.0..=1.0).contains(&self.goal_bias) {
            return Err(PlanningError::InvalidParameter(format!(
                "goal_bias must be in [0, 1], got {}",
                self.goal_bias
            )));
        }
        if !(self.selection_radius > 0.0) || !(self.pruning_radius > 0.0) {
            return Err(PlanningError::InvalidParameter(
                "selection_radius and pruning_radius must be positive".to_string(),
            ));
        }
        if !(self.n0 >= 1.0) {
            return Err(PlanningError::InvalidParameter(format!(
                "n0 must be at least 1, got {}",
                self.n0
            )));
        }
        if !(self.xi > 0.0 && self.xi < 1.0) {
            return Err(PlanningError::InvalidParameter(format!(
                "xi must be in (0, 1), got {}",
                self.xi
            )));
        }
        Ok(())
    }
}

/// Counters of the most recent `solve` call
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SolveStats {
    pub iterations: u64,
    pub motions_created: u64,
    pub motions_reclaimed: u64,
    /// Propagations shorter than the minimum control duration
    pub propagations_discarded: u64,
    /// Motions alive when the call returned
    pub tree_size: usize,
    pub witnesses: usize,
    /// Number of radius reductions applied so far
    pub radius_generation: u32,
}

#[derive(Debug, Clone)]
struct RadiusSchedule {
    iterations: u64,
    bound: f64,
    generation: u32,
}

impl RadiusSchedule {
    fn new(n0: f64) -> Self {
        Self {
            iterations: 0,
            bound: n0,
            generation: 0,
        }
    }
}

pub struct SstStar<SP, DC, NN>
where
    SP: StateSpace,
    DC: DirectedControlSampler<SP::State>,
{
    space: SP,
    controls: DC,
    config: SstConfig,
    selection_radius: f64,
    pruning_radius: f64,
    tree: MotionTree<SP::State, DC::Control>,
    nn: NN,
    witnesses: Vec<Witness<SP::State>>,
    witness_nn: NN,
    rng: StdRng,
    starts_added: bool,
    schedule: RadiusSchedule,
    best_solution: Option<Solution<SP::State, DC::Control>>,
    approximate_solution: Option<Solution<SP::State, DC::Control>>,
    last_stats: SolveStats,
}

impl<SP, DC> SstStar<SP, DC, LinearNearestNeighbors<SP::State>>
where
    SP: StateSpace,
    DC: DirectedControlSampler<SP::State>,
{
    /// Create a planner backed by linear nearest neighbor indices
    pub fn new(space: SP, controls: DC, config: SstConfig) -> PlanningResult<Self> {
        Self::with_nearest_neighbors(
            space,
            controls,
            config,
            LinearNearestNeighbors::new(),
            LinearNearestNeighbors::new(),
        )
    }
}

impl<SP, DC, NN> SstStar<SP, DC, NN>
where
    SP: StateSpace,
    DC: DirectedControlSampler<SP::State>,
    NN: NearestNeighbors<SP::State>,
{
    /// Create a planner with caller supplied indices for motions and witnesses
    pub fn with_nearest_neighbors(
        space: SP,
        controls: DC,
        config: SstConfig,
        mut nn: NN,
        mut witness_nn: NN,
    ) -> PlanningResult<Self> {
        config.validate()?;
        nn.clear();
        witness_nn.clear();
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            space,
            controls,
            selection_radius: config.selection_radius,
            pruning_radius: config.pruning_radius,
            schedule: RadiusSchedule::new(config.n0),
            config,
            tree: MotionTree::new(),
            nn,
            witnesses: Vec::new(),
            witness_nn,
            rng,
            starts_added: false,
            best_solution: None,
            approximate_solution: None,
            last_stats: SolveStats::default(),
        })
    }

    pub fn config(&self) -> &SstConfig {
        &self.config
    }

    pub fn space(&self) -> &SP {
        &self.space
    }

    pub fn tree(&self) -> &MotionTree<SP::State, DC::Control> {
        &self.tree
    }

    pub fn witnesses(&self) -> &[Witness<SP::State>] {
        &self.witnesses
    }

    pub fn selection_radius(&self) -> f64 {
        self.selection_radius
    }

    pub fn pruning_radius(&self) -> f64 {
        self.pruning_radius
    }

    /// Cheapest trajectory reaching the goal found so far
    pub fn best_solution(&self) -> Option<&Solution<SP::State, DC::Control>> {
        self.best_solution.as_ref()
    }

    /// Closest approach to the goal while no exact solution exists
    pub fn approximate_solution(&self) -> Option<&Solution<SP::State, DC::Control>> {
        self.approximate_solution.as_ref()
    }

    pub fn last_stats(&self) -> SolveStats {
        self.last_stats
    }

    /// Free every motion and witness and restore the initial radii.
    /// Call this before solving a different problem.
    pub fn clear(&mut self) {
        self.tree.clear();
        self.nn.clear();
        self.witnesses.clear();
        self.witness_nn.clear();
        self.selection_radius = self.config.selection_radius;
        self.pruning_radius = self.config.pruning_radius;
        self.schedule = RadiusSchedule::new(self.config.n0);
        self.starts_added = false;
        self.best_solution = None;
        self.approximate_solution = None;
        self.last_stats = SolveStats::default();
    }

    /// Grow the tree until `ptc` fires. The tree persists across calls.
    pub fn solve<G, O, T>(
        &mut self,
        problem: &ProblemDefinition<SP::State, G>,
        ctx: &mut PlanningContext<O>,
        ptc: &mut T,
    ) -> PlanningResult<PlannerStatus>
    where
        G: GoalRegion<SP::State>,
        O: OptimizationObjective,
        T: TerminationCondition,
    {
        ctx.start_clock();
        let goal = &problem.goal;

        if !self.starts_added {
            self.add_start_states(&problem.start_states, ctx.objective());
        }
        if self.tree.is_empty() {
            error!("SST*: There are no valid initial states!");
            return Err(PlanningError::InvalidStart);
        }

        info!(
            "SST*: Starting planning with {} states already in datastructure",
            self.nn.len()
        );

        let mut stats = SolveStats {
            radius_generation: self.schedule.generation,
            ..SolveStats::default()
        };
        let min_duration = self.controls.min_control_duration();

        while !ptc.should_terminate() {
            self.advance_radius_schedule();

            let target = self.sample_target(goal);

            let selected = match self.select_node(&target, ctx.objective()) {
                Some(id) => id,
                None => {
                    stats.iterations += 1;
                    self.schedule.iterations += 1;
                    continue;
                }
            };

            let parent = &self.tree[selected];
            let propagation = self
                .controls
                .sample_to(&parent.control, &parent.state, &target, &mut self.rng);
            let parent_cost = parent.cost;

            if propagation.steps >= min_duration {
                let incremental =
                    Cost::new(propagation.steps as f64 * self.controls.step_size());
                let cost = ctx.objective().combine_costs(parent_cost, incremental);

                self.record_solution(selected, &propagation, cost, goal, ctx);

                let (created, reclaimed) = self.admit(selected, propagation, cost, ctx.objective());
                stats.motions_created += created;
                stats.motions_reclaimed += reclaimed;
            } else {
                stats.propagations_discarded += 1;
                trace!("SST*: discarded propagation of {} steps", propagation.steps);
            }

            stats.iterations += 1;
            self.schedule.iterations += 1;
        }

        debug_assert!(self.verify().is_ok(), "SST* tree invariants violated");

        stats.tree_size = self.tree.len();
        stats.witnesses = self.witnesses.len();
        stats.radius_generation = self.schedule.generation;
        self.last_stats = stats;

        info!(
            "SST*: Created {} states in {} iterations ({} reclaimed, {} witnesses)",
            stats.motions_created, stats.iterations, stats.motions_reclaimed, stats.witnesses
        );

        Ok(if self.best_solution.is_some() {
            PlannerStatus::exact()
        } else if self.approximate_solution.is_some() {
            PlannerStatus::approximate()
        } else {
            PlannerStatus::failed()
        })
    }

    /// Check the tree, the witness representatives and the motion index
    /// against each other
    pub fn verify(&self) -> PlanningResult<()> {
        self.tree.verify()?;

        let mut represented = std::collections::HashSet::new();
        for (i, witness) in self.witnesses.iter().enumerate() {
            if let Some(rep) = witness.representative {
                let motion = self.tree.get(rep).ok_or_else(|| {
                    PlanningError::InvariantViolation(format!(
                        "witness {} represents a freed motion",
                        i
                    ))
                })?;
                if motion.inactive {
                    return Err(PlanningError::InvariantViolation(format!(
                        "witness {} represents an inactive motion",
                        i
                    )));
                }
                if !represented.insert(rep) {
                    return Err(PlanningError::InvariantViolation(format!(
                        "motion {} represents more than one witness",
                        rep.index()
                    )));
                }
            }
        }

        let active = self.tree.iter().filter(|(_, m)| m.is_active()).count();
        if active != self.nn.len() {
            return Err(PlanningError::InvariantViolation(format!(
                "{} active motions but {} indexed",
                active,
                self.nn.len()
            )));
        }
        Ok(())
    }

    fn add_start_states<O: OptimizationObjective>(&mut self, starts: &[SP::State], objective: &O) {
        for start in starts {
            if !self.space.is_valid(start) {
                continue;
            }
            let root = Motion::root(start.clone(), self.controls.null_control(), objective.identity_cost());
            let id = self.tree.insert(root);
            self.nn.add(id.index(), start.clone());
            let witness = self.find_closest_witness(start);
            if self.witnesses[witness].representative.is_none() {
                self.witnesses[witness].representative = Some(id);
            }
        }
        self.starts_added = true;
    }

    fn advance_radius_schedule(&mut self) {
        if (self.schedule.iterations as f64) < self.schedule.bound {
            return;
        }
        self.schedule.generation += 1;
        self.selection_radius *= self.config.xi;
        self.pruning_radius *= self.config.xi;

        let k = self.schedule.generation as f64;
        let d = self.space.dimension() as f64;
        let l = self.controls.control_dimension() as f64;
        self.schedule.bound +=
            (1.0 + k.ln()) * self.config.xi.powf(-(d + l + 1.0) * k) * self.config.n0;

        debug!(
            "SST*: iteration {} completed, selection radius {:.4}, pruning radius {:.4}, next bound {:.0}",
            self.schedule.generation, self.selection_radius, self.pruning_radius, self.schedule.bound
        );
    }

    fn sample_target<G: GoalRegion<SP::State>>(&mut self, goal: &G) -> SP::State {
        if goal.can_sample() && self.rng.gen::<f64>() < self.config.goal_bias {
            if let Some(state) = goal.sample_goal(&mut self.rng) {
                return state;
            }
        }
        self.space.sample_uniform(&mut self.rng)
    }

    /// Cheapest active motion within the selection radius, falling back to
    /// the nearest active motion through a widening k-nearest search.
    fn select_node<O: OptimizationObjective>(&self, sample: &SP::State, objective: &O) -> Option<MotionId> {
        let space = &self.space;
        let distance = |a: &SP::State, b: &SP::State| space.distance(a, b);

        let mut best: Option<(MotionId, Cost)> = None;
        for index in self.nn.nearest_r(sample, self.selection_radius, distance) {
            let id = self.motion_id(index);
            let motion = &self.tree[id];
            if motion.inactive {
                continue;
            }
            let better = match best {
                Some((_, cost)) => objective.is_cost_better_than(motion.cost, cost),
                None => true,
            };
            if better {
                best = Some((id, motion.cost));
            }
        }
        if let Some((id, _)) = best {
            return Some(id);
        }

        let mut k = 1;
        loop {
            let found = self.nn.nearest_k(sample, k, distance);
            if let Some(&index) = found.iter().find(|&&i| self.tree[self.motion_id(i)].is_active()) {
                return Some(self.motion_id(index));
            }
            if found.len() < k {
                return None;
            }
            k += 5;
        }
    }

    /// Nearest witness to `state`, creating one when none lies within the
    /// pruning radius
    fn find_closest_witness(&mut self, state: &SP::State) -> usize {
        let space = &self.space;
        let closest = self
            .witness_nn
            .nearest(state, |a: &SP::State, b: &SP::State| space.distance(a, b))
            .filter(|&w| self.space.distance(&self.witnesses[w].state, state) <= self.pruning_radius);

        match closest {
            Some(w) => w,
            None => {
                let index = self.witnesses.len();
                self.witnesses.push(Witness {
                    state: state.clone(),
                    representative: None,
                });
                self.witness_nn.add(index, state.clone());
                index
            }
        }
    }

    /// Insert the propagated state if it beats its witness representative.
    /// Returns the number of created and reclaimed motions.
    fn admit<O: OptimizationObjective>(
        &mut self,
        parent: MotionId,
        propagation: Propagation<SP::State, DC::Control>,
        cost: Cost,
        objective: &O,
    ) -> (u64, u64) {
        let witness = self.find_closest_witness(&propagation.state);
        let previous = self.witnesses[witness].representative;

        let admitted = match previous {
            None => true,
            Some(rep) => objective.is_cost_better_than(cost, self.tree[rep].cost),
        };
        if !admitted {
            return (0, 0);
        }

        let state = propagation.state;
        let id = self.tree.insert(Motion::child(
            state.clone(),
            propagation.control,
            cost,
            propagation.steps,
            parent,
        ));
        self.nn.add(id.index(), state);
        self.witnesses[witness].representative = Some(id);

        let mut reclaimed = 0;
        if let Some(old) = previous {
            self.tree.deactivate(old);
            self.nn.remove(old.index());
            reclaimed = self.tree.reclaim(old) as u64;
        }
        (1, reclaimed)
    }

    fn record_solution<G, O>(
        &mut self,
        parent: MotionId,
        propagation: &Propagation<SP::State, DC::Control>,
        cost: Cost,
        goal: &G,
        ctx: &mut PlanningContext<O>,
    ) where
        G: GoalRegion<SP::State>,
        O: OptimizationObjective,
    {
        let goal_distance = goal.distance_to_goal(&propagation.state);

        if goal.is_satisfied(&propagation.state) && ctx.objective().is_satisfied(cost) {
            ctx.objective_mut().set_cost_threshold(cost);
            ctx.add_solution(cost);
            info!("SST*: Found solution with cost {}", cost);
            self.best_solution = Some(self.extract_solution(parent, propagation, cost, 0.0));
            self.approximate_solution = None;
            return;
        }

        if self.config.track_approximate && self.best_solution.is_none() {
            let closer = self
                .approximate_solution
                .as_ref()
                .map_or(true, |s| goal_distance < s.goal_distance);
            if closer {
                self.approximate_solution =
                    Some(self.extract_solution(parent, propagation, cost, goal_distance));
            }
        }
    }

    fn extract_solution(
        &self,
        parent: MotionId,
        propagation: &Propagation<SP::State, DC::Control>,
        cost: Cost,
        goal_distance: f64,
    ) -> Solution<SP::State, DC::Control> {
        let path = self.tree.path_to_root(parent);
        let mut states = Vec::with_capacity(path.len() + 1);
        let mut controls = Vec::with_capacity(path.len());
        for id in path {
            let motion = &self.tree[id];
            if motion.parent.is_some() {
                controls.push(ControlSegment {
                    control: motion.control.clone(),
                    steps: motion.steps,
                });
            }
            states.push(motion.state.clone());
        }
        states.push(propagation.state.clone());
        controls.push(ControlSegment {
            control: propagation.control.clone(),
            steps: propagation.steps,
        });
        Solution {
            cost,
            states,
            controls,
            goal_distance,
        }
    }

    fn motion_id(&self, index: usize) -> MotionId {
        MotionId::from_index(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::IterationTermination;
    use crate::path_planning::PathLengthObjective;
    use crate::utils::{BallGoal, RealVectorSpace, StraightLinePropagator};
    use nalgebra::DVector;

    fn planner(config: SstConfig) -> SstStar<RealVectorSpace, StraightLinePropagator, LinearNearestNeighbors<DVector<f64>>> {
        let space = RealVectorSpace::new(vec![(0.0, 1.0), (0.0, 1.0)]);
        let controls = StraightLinePropagator::new(space.clone(), 0.05, 1.0, 1, 10);
        SstStar::new(space, controls, config).unwrap()
    }

    fn problem() -> ProblemDefinition<DVector<f64>, BallGoal> {
        ProblemDefinition::new(
            DVector::from_row_slice(&[0.1, 0.1]),
            BallGoal::new(DVector::from_row_slice(&[0.9, 0.9]), 0.1),
        )
    }

    fn seeded() -> SstConfig {
        SstConfig {
            seed: Some(42),
            goal_bias: 0.2,
            ..SstConfig::default()
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(SstConfig::default().validate().is_ok());
        let bad = SstConfig {
            xi: 1.0,
            ..SstConfig::default()
        };
        assert!(matches!(bad.validate(), Err(PlanningError::InvalidParameter(_))));
        let bad = SstConfig {
            pruning_radius: 0.0,
            ..SstConfig::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_invalid_start() {
        let mut sst = planner(seeded());
        let problem = ProblemDefinition::new(
            DVector::from_row_slice(&[2.0, 2.0]),
            BallGoal::new(DVector::from_row_slice(&[0.9, 0.9]), 0.1),
        );
        let mut ctx = PlanningContext::new(PathLengthObjective::new());
        let result = sst.solve(&problem, &mut ctx, &mut IterationTermination::new(10));
        assert_eq!(result, Err(PlanningError::InvalidStart));
    }

    #[test]
    fn test_finds_solution_in_open_space() {
        let mut sst = planner(seeded());
        let mut ctx = PlanningContext::new(PathLengthObjective::new());
        let status = sst
            .solve(&problem(), &mut ctx, &mut IterationTermination::new(3000))
            .unwrap();
        assert!(status.is_exact());
        assert!(sst.verify().is_ok());

        let solution = sst.best_solution().unwrap();
        assert_eq!(solution.states[0], DVector::from_row_slice(&[0.1, 0.1]));
        assert_eq!(solution.controls.len(), solution.states.len() - 1);
        assert!(problem().goal.is_satisfied(solution.last_state().unwrap()));
        assert!((solution.cost.value() - solution.total_steps() as f64 * 0.05).abs() < 1e-9);

        // solution stream costs strictly improve
        let costs: Vec<f64> = ctx.solutions().iter().map(|r| r.cost.value()).collect();
        assert!(!costs.is_empty());
        assert!(costs.windows(2).all(|w| w[1] < w[0]));
        assert_eq!(ctx.objective().cost_threshold(), solution.cost);
    }

    #[test]
    fn test_radius_schedule() {
        let mut sst = planner(SstConfig {
            n0: 10.0,
            ..seeded()
        });
        let mut ctx = PlanningContext::new(PathLengthObjective::new());
        sst.solve(&problem(), &mut ctx, &mut IterationTermination::new(11))
            .unwrap();
        assert_eq!(sst.last_stats().radius_generation, 1);
        assert!((sst.selection_radius() - 0.1).abs() < 1e-12);
        assert!((sst.pruning_radius() - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_tree_persists_until_clear() {
        let mut sst = planner(seeded());
        let mut ctx = PlanningContext::new(PathLengthObjective::new());
        sst.solve(&problem(), &mut ctx, &mut IterationTermination::new(200))
            .unwrap();
        let size = sst.tree().len();
        assert!(size > 1);

        sst.solve(&problem(), &mut ctx, &mut IterationTermination::new(0))
            .unwrap();
        assert_eq!(sst.tree().len(), size);
        let roots = sst.tree().iter().filter(|(_, m)| m.parent.is_none()).count();
        assert_eq!(roots, 1);

        sst.clear();
        assert!(sst.tree().is_empty());
        assert!(sst.witnesses().is_empty());
        assert!(sst.best_solution().is_none());
        assert!((sst.selection_radius() - 0.2).abs() < 1e-12);
    }

    /// Never moves and accepts propagations of any duration
    struct Stalled;

    impl DirectedControlSampler<DVector<f64>> for Stalled {
        type Control = DVector<f64>;

        fn control_dimension(&self) -> usize {
            2
        }

        fn null_control(&self) -> DVector<f64> {
            DVector::zeros(2)
        }

        fn min_control_duration(&self) -> u32 {
            0
        }

        fn step_size(&self) -> f64 {
            0.05
        }

        fn sample_to<R: Rng + ?Sized>(
            &self,
            _previous: &DVector<f64>,
            source: &DVector<f64>,
            _target: &DVector<f64>,
            _rng: &mut R,
        ) -> Propagation<DVector<f64>, DVector<f64>> {
            Propagation {
                state: source.clone(),
                control: self.null_control(),
                steps: 0,
            }
        }
    }

    #[test]
    fn test_min_control_duration_comes_from_controls() {
        let space = RealVectorSpace::new(vec![(0.0, 1.0), (0.0, 1.0)]);
        let mut sst = SstStar::new(space.clone(), Stalled, seeded()).unwrap();
        let mut ctx = PlanningContext::new(PathLengthObjective::new());
        sst.solve(&problem(), &mut ctx, &mut IterationTermination::new(50))
            .unwrap();
        // zero-step results are accepted, and lose to the root at equal cost
        assert_eq!(sst.last_stats().propagations_discarded, 0);
        assert_eq!(sst.tree().len(), 1);

        let controls = StraightLinePropagator::new(space, 0.05, 1.0, 3, 10);
        let mut sst = SstStar::new(RealVectorSpace::new(vec![(0.0, 1.0), (0.0, 1.0)]), controls, seeded()).unwrap();
        let mut ctx = PlanningContext::new(PathLengthObjective::new());
        sst.solve(&problem(), &mut ctx, &mut IterationTermination::new(500))
            .unwrap();
        assert!(sst.tree().len() > 1);
        for (_, motion) in sst.tree().iter() {
            assert!(motion.parent.is_none() || motion.steps >= 3);
        }
        assert!(sst.verify().is_ok());
    }

    #[test]
    fn test_approximate_solution_when_goal_unreachable() {
        let mut sst = planner(SstConfig {
            goal_bias: 0.0,
            ..seeded()
        });
        let problem = ProblemDefinition::new(
            DVector::from_row_slice(&[0.1, 0.1]),
            BallGoal::new(DVector::from_row_slice(&[3.0, 3.0]), 0.1),
        );
        let mut ctx = PlanningContext::new(PathLengthObjective::new());
        let status = sst
            .solve(&problem, &mut ctx, &mut IterationTermination::new(300))
            .unwrap();
        assert_eq!(status, PlannerStatus::approximate());
        let approx = sst.approximate_solution().unwrap();
        assert!(approx.goal_distance > 0.1);
        assert!(ctx.solutions().is_empty());
    }
}
