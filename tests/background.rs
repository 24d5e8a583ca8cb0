//! Stepping solvers off the calling thread.

use shocktube::config::{SolverConfig, SpatialScheme, FluxScheme, TimeScheme};
use shocktube::ensemble::Ensemble;
use shocktube::setup::{GasProfile, PartitionedGas};
use shocktube::solver::{self, Simulation};
use shocktube::thread_pool::StepPool;




#[test]
fn background_steps_match_foreground_steps() {
    let tube = PartitionedGas::default();
    let config = SolverConfig::default();
    let pool = StepPool::new(2);

    let mut foreground = solver::build(&config, &tube).unwrap();
    let mut background = solver::build(&config, &tube).unwrap();

    for _ in 0..25 {
        foreground.update_dt_from_cfl();
        foreground.advance().unwrap();

        background.update_dt_from_cfl();
        let (returned, result) = pool.advance(background).wait().unwrap();
        result.unwrap();
        background = returned;
    }
    assert_eq!(background.iteration(), 25);
    assert_eq!(background.time(), foreground.time());
    assert_eq!(background.densities(), foreground.densities());
    assert_eq!(background.velocities(), foreground.velocities());
}

#[test]
fn a_snapshot_taken_before_a_step_is_unchanged_by_it() {
    let tube = PartitionedGas::default();
    let pool = StepPool::new(1);
    let before = tube.densities();

    let sim = solver::build(&SolverConfig::default(), &tube).unwrap();
    let snapshot = sim.densities();
    let (sim, result) = pool.advance(sim).wait().unwrap();
    result.unwrap();

    assert_eq!(snapshot, before);
    assert_ne!(sim.densities(), before);
}

#[test]
fn ensemble_runs_to_an_end_time_on_the_pool() {
    let configs = [
        SolverConfig::default(),
        SolverConfig::new(SpatialScheme::DiscontinuousGalerkin, FluxScheme::Hll, TimeScheme::Rk3),
    ];
    let configs: Vec<_> = configs.iter().map(|c| SolverConfig { cfl: 0.1, ..*c }).collect();
    let mut ensemble = Ensemble::from_configs(&PartitionedGas::default(), &configs, true).unwrap();
    let pool = StepPool::new(2);

    ensemble.advance_to_on(0.05, &pool).unwrap();
    assert_eq!(ensemble.len(), 2);
    assert!(ensemble.has_reached(0.05));
    for m in ensemble.members() {
        assert!((m.time() - 0.05).abs() < 1e-12);
        assert!(m.check_physical().is_ok());
    }
}
