//! Bounded real vector state space with circular obstacles
//!
//! Concrete collaborators for hosts and tests: the state space, a
//! straight-line directed control sampler and a ball-shaped goal region.

use nalgebra::DVector;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal, Uniform};

use crate::common::{DirectedControlSampler, GoalRegion, Propagation, StateSpace};

/// Circular obstacle (x, y, radius) acting on the first two coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleObstacle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

impl CircleObstacle {
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Self { x, y, radius }
    }

    pub fn contains(&self, state: &DVector<f64>) -> bool {
        if state.len() < 2 {
            return false;
        }
        let dx = state[0] - self.x;
        let dy = state[1] - self.y;
        dx * dx + dy * dy <= self.radius * self.radius
    }
}

/// Axis-aligned box of R^n
#[derive(Debug, Clone)]
pub struct RealVectorSpace {
    bounds: Vec<(f64, f64)>,
    obstacles: Vec<CircleObstacle>,
}

impl RealVectorSpace {
    pub fn new(bounds: Vec<(f64, f64)>) -> Self {
        Self {
            bounds,
            obstacles: Vec::new(),
        }
    }

    pub fn with_obstacles(mut self, obstacles: Vec<CircleObstacle>) -> Self {
        self.obstacles = obstacles;
        self
    }

    pub fn bounds(&self) -> &[(f64, f64)] {
        &self.bounds
    }

    pub fn obstacles(&self) -> &[CircleObstacle] {
        &self.obstacles
    }

    pub fn state(&self, coords: &[f64]) -> DVector<f64> {
        DVector::from_row_slice(coords)
    }

    pub fn satisfies_bounds(&self, state: &DVector<f64>) -> bool {
        state.len() == self.bounds.len()
            && state
                .iter()
                .zip(self.bounds.iter())
                .all(|(&v, &(lo, hi))| v >= lo && v <= hi)
    }

    /// Checks the segment `a -> b` at the given resolution
    pub fn is_segment_valid(&self, a: &DVector<f64>, b: &DVector<f64>, resolution: f64) -> bool {
        let length = (b - a).norm();
        let n = (length / resolution).ceil().max(1.0) as usize;
        (0..=n).all(|i| {
            let t = i as f64 / n as f64;
            self.is_valid(&(a + (b - a) * t))
        })
    }
}

impl StateSpace for RealVectorSpace {
    type State = DVector<f64>;

    fn dimension(&self) -> usize {
        self.bounds.len()
    }

    fn distance(&self, a: &DVector<f64>, b: &DVector<f64>) -> f64 {
        (a - b).norm()
    }

    fn is_valid(&self, state: &DVector<f64>) -> bool {
        self.satisfies_bounds(state) && !self.obstacles.iter().any(|o| o.contains(state))
    }

    fn sample_uniform<R: Rng + ?Sized>(&self, rng: &mut R) -> DVector<f64> {
        DVector::from_iterator(
            self.bounds.len(),
            self.bounds
                .iter()
                .map(|&(lo, hi)| if hi > lo { Uniform::new_inclusive(lo, hi).sample(rng) } else { lo }),
        )
    }

    fn sample_uniform_near<R: Rng + ?Sized>(
        &self,
        near: &DVector<f64>,
        distance: f64,
        rng: &mut R,
    ) -> DVector<f64> {
        DVector::from_iterator(
            self.bounds.len(),
            self.bounds.iter().enumerate().map(|(i, &(lo, hi))| {
                let low = (near[i] - distance).max(lo);
                let high = (near[i] + distance).min(hi);
                if high > low {
                    rng.gen_range(low..=high)
                } else {
                    low
                }
            }),
        )
    }
}

/// Moves in a straight line toward the target at constant speed, stopping
/// at the last valid step. Durations are drawn uniformly from
/// `[min_steps, max_steps]` and cut short once the target is passed.
#[derive(Debug, Clone)]
pub struct StraightLinePropagator {
    space: RealVectorSpace,
    step_size: f64,
    speed: f64,
    min_steps: u32,
    max_steps: u32,
}

impl StraightLinePropagator {
    pub fn new(space: RealVectorSpace, step_size: f64, speed: f64, min_steps: u32, max_steps: u32) -> Self {
        Self {
            space,
            step_size,
            speed,
            min_steps: min_steps.max(1),
            max_steps: max_steps.max(min_steps.max(1)),
        }
    }

    pub fn max_steps(&self) -> u32 {
        self.max_steps
    }
}

impl DirectedControlSampler<DVector<f64>> for StraightLinePropagator {
    type Control = DVector<f64>;

    fn control_dimension(&self) -> usize {
        self.space.dimension()
    }

    fn null_control(&self) -> DVector<f64> {
        DVector::zeros(self.space.dimension())
    }

    fn min_control_duration(&self) -> u32 {
        self.min_steps
    }

    fn step_size(&self) -> f64 {
        self.step_size
    }

    fn sample_to<R: Rng + ?Sized>(
        &self,
        _previous: &DVector<f64>,
        source: &DVector<f64>,
        target: &DVector<f64>,
        rng: &mut R,
    ) -> Propagation<DVector<f64>, DVector<f64>> {
        let delta = target - source;
        let length = delta.norm();
        let stride = self.speed * self.step_size;
        if length <= f64::EPSILON || stride <= 0.0 {
            return Propagation {
                state: source.clone(),
                control: self.null_control(),
                steps: 0,
            };
        }

        let velocity = delta * (self.speed / length);
        let needed = (length / stride - 1e-9).ceil() as u32;
        let duration = rng.gen_range(self.min_steps..=self.max_steps).min(needed);

        let mut state = source.clone();
        let mut steps = 0;
        while steps < duration {
            let next = &state + &velocity * self.step_size;
            if !self.space.is_valid(&next) {
                break;
            }
            state = next;
            steps += 1;
        }

        Propagation {
            state,
            control: velocity,
            steps,
        }
    }
}

/// Ball of radius `threshold` around a center state
#[derive(Debug, Clone)]
pub struct BallGoal {
    center: DVector<f64>,
    threshold: f64,
}

impl BallGoal {
    pub fn new(center: DVector<f64>, threshold: f64) -> Self {
        Self { center, threshold }
    }

    pub fn center(&self) -> &DVector<f64> {
        &self.center
    }
}

impl GoalRegion<DVector<f64>> for BallGoal {
    fn distance_to_goal(&self, state: &DVector<f64>) -> f64 {
        (state - &self.center).norm()
    }

    fn threshold(&self) -> f64 {
        self.threshold
    }

    fn can_sample(&self) -> bool {
        true
    }

    fn sample_goal<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<DVector<f64>> {
        let dim = self.center.len();
        let direction: DVector<f64> =
            DVector::from_iterator(dim, (0..dim).map(|_| StandardNormal.sample(&mut *rng)));
        let norm = direction.norm();
        if norm <= f64::EPSILON {
            return Some(self.center.clone());
        }
        let radius = self.threshold * rng.gen::<f64>().powf(1.0 / dim as f64);
        Some(&self.center + direction * (radius / norm))
    }
}
