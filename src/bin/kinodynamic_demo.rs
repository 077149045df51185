// SST* and guided sampling on a 2-D obstacle field
//
// usage: kinodynamic_demo [config.yaml]

use std::path::Path;

use log::{error, info};
use nalgebra::DVector;
use rand::rngs::StdRng;
use rand::SeedableRng;

use kinodynamic_planning::common::{
    AnyTermination, DirectedControlSampler, IterationTermination, TimedTermination,
};
use kinodynamic_planning::sampling::EdgeStatus;
use kinodynamic_planning::utils::{BallGoal, CircleObstacle, GridAbstraction, RealVectorSpace, StraightLinePropagator};
use kinodynamic_planning::{
    DirectedStateSampler, GuidedSampler, PathLengthObjective, PlannerConfig, PlanningContext,
    PlanningResult, ProblemDefinition, SstStar,
};

fn obstacle_field() -> RealVectorSpace {
    RealVectorSpace::new(vec![(0.0, 10.0), (0.0, 10.0)]).with_obstacles(vec![
        CircleObstacle::new(5.0, 5.0, 1.5),
        CircleObstacle::new(3.0, 7.5, 1.0),
        CircleObstacle::new(7.5, 2.5, 1.0),
        CircleObstacle::new(7.0, 7.5, 0.8),
    ])
}

fn run_sst(config: &PlannerConfig) -> PlanningResult<()> {
    let space = obstacle_field();
    let controls = StraightLinePropagator::new(space.clone(), 0.1, 1.0, 2, 20);
    let mut sst = SstStar::new(space, controls, config.sst.clone())?;

    let problem = ProblemDefinition::new(
        DVector::from_row_slice(&[1.0, 1.0]),
        BallGoal::new(DVector::from_row_slice(&[9.0, 9.0]), 0.5),
    );
    let mut ctx = PlanningContext::new(PathLengthObjective::new());
    let mut ptc = AnyTermination::new(
        TimedTermination::from_secs_f64(5.0),
        IterationTermination::new(20_000),
    );
    let status = sst.solve(&problem, &mut ctx, &mut ptc)?;

    info!("SST*: status {:?}, {} solutions", status, ctx.solutions().len());
    for record in ctx.solutions() {
        info!("  cost {} after {:?}", record.cost, record.elapsed);
    }
    if let Some(solution) = sst.best_solution() {
        info!(
            "SST*: best path has {} states and {} steps",
            solution.len(),
            solution.total_steps()
        );
    }
    Ok(())
}

fn run_guided(config: &PlannerConfig) -> PlanningResult<()> {
    let space = obstacle_field();
    let abstraction = GridAbstraction::new(space.clone(), vec![10, 10], 0.05)?;
    let propagator = StraightLinePropagator::new(space.clone(), 0.1, 1.0, 1, 15);
    let goal = BallGoal::new(DVector::from_row_slice(&[9.0, 9.0]), 0.5);
    let start = DVector::from_row_slice(&[1.0, 1.0]);
    let mut sampler = GuidedSampler::new(space, abstraction, goal, start, config.guided.clone())?;

    let mut rng = StdRng::seed_from_u64(config.guided.seed.unwrap_or(0));
    for iteration in 0..2000 {
        let pair = sampler.sample()?;
        let result = propagator.sample_to(&propagator.null_control(), &pair.from, &pair.to, &mut rng);
        if result.steps > 0 {
            sampler.reached(&result.state);
        }
        if sampler.goal_edge().is_some() {
            info!("Guided sampler: goal cell entered after {} samples", iteration + 1);
            break;
        }
    }

    let resolved = sampler
        .edges()
        .iter()
        .filter(|e| e.status != EdgeStatus::Unknown)
        .count();
    info!(
        "Guided sampler: {} of {} edges resolved with {} oracle calls",
        resolved,
        sampler.edges().len(),
        sampler.oracle_calls()
    );
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => match PlannerConfig::load(Path::new(&path)) {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => PlannerConfig::default(),
    };

    if let Err(e) = run_sst(&config).and_then(|_| run_guided(&config)) {
        error!("{}", e);
        std::process::exit(1);
    }
}
