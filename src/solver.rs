//! The solver facade: a field plus three pluggable strategies (interface
//! flux, spatial residual, time integrator) and the step-size state that
//! drives them.

use log::{debug, info, warn};
use crate::config::{FluxScheme, SolverConfig, SpatialScheme, TimeScheme};
use crate::error::{Error, Result};
use crate::hydro::euler::FluidState;
use crate::hydro::riemann::{self, FluxFn};
use crate::integrate::{self, TimeAdvancer};
use crate::mesh::Field;
use crate::payload::{FiniteVolume, Modal, Payload};
use crate::residual::ResidualFn;
use crate::setup::GasProfile;




/**
 * Object-safe view of a solver, independent of its payload kind. This is
 * what drivers hold when they run several schemes side by side.
 */
pub trait Simulation: GasProfile + Send {

    /// The `spatial:flux:time` strategy label, with `-` for unset ones.
    fn label(&self) -> String;

    /// Whether `advance` can run: fails with the error it would return if a
    /// strategy is unset.
    fn ready(&self) -> Result<()>;

    fn advance(&mut self) -> Result<()>;

    /// The CFL-limited step for the current field, if the fastest signal
    /// speed is finite and non-zero.
    fn cfl_dt(&self) -> Option<f64>;

    fn update_dt_from_cfl(&mut self) -> f64;

    fn dt(&self) -> f64;

    fn set_dt(&mut self, dt: f64);

    fn time(&self) -> f64;

    fn iteration(&self) -> u64;

    /// Cell-center coordinates, left to right.
    fn positions(&self) -> Vec<f64>;

    /// Check every cell average for negative density or pressure, without
    /// the clamping applied elsewhere.
    fn check_physical(&self) -> Result<()>;
}




/**
 * A one-dimensional Euler solver over payloads of kind `P`. The field is
 * replaced wholesale on every step; readers holding a clone of the previous
 * field keep seeing it unchanged.
 */
#[derive(Clone)]
pub struct Solver<P: Payload> {
    field: Field<P>,
    dx: f64,
    cfl: f64,
    dt: f64,
    time: f64,
    iteration: u64,
    flux: Option<(FluxScheme, FluxFn)>,
    residual: Option<(SpatialScheme, ResidualFn<P>)>,
    advancer: Option<(TimeScheme, TimeAdvancer<P>)>,
}




// ============================================================================
fn flux_fn(scheme: FluxScheme) -> FluxFn {
    match scheme {
        FluxScheme::LaxFriedrichs => riemann::lax_friedrichs,
        FluxScheme::Hll => riemann::hll,
        FluxScheme::Hllc => riemann::hllc,
        FluxScheme::Roe => riemann::roe,
    }
}

fn time_advancer<P: Payload>(scheme: TimeScheme) -> TimeAdvancer<P> {
    match scheme {
        TimeScheme::Euler => integrate::forward_euler,
        TimeScheme::Rk3 => integrate::ssp_rk3,
    }
}




// ============================================================================
impl<P: Payload> Solver<P> {

    /**
     * Create a solver of `num_cells` cells of width `dx`, filled with gas at
     * unit density and pressure, at rest. No strategies are set.
     */
    pub fn new(num_cells: usize, dx: f64) -> Self {
        let state = FluidState::new(1.0, 0.0, 1.0);
        Self::from_field(Field::uniform(num_cells, dx, |_, _| P::from_state(&state)), dx)
    }

    /**
     * Create a solver whose cells copy the density, pressure, and velocity of
     * an existing gas description, cell by cell.
     */
    pub fn from_profile<G: GasProfile + ?Sized>(profile: &G, dx: f64) -> Self {
        let states = profile.states();
        Self::from_field(Field::uniform(states.len(), dx, |i, _| P::from_state(&states[i])), dx)
    }

    /**
     * Create a solver by projecting a function of position onto each cell.
     */
    pub fn from_fn<F>(num_cells: usize, dx: f64, f: F) -> Self
    where
        F: Fn(f64) -> FluidState,
    {
        Self::from_field(Field::project(num_cells, dx, f), dx)
    }

    fn from_field(field: Field<P>, dx: f64) -> Self {
        let defaults = SolverConfig::default();
        Self {
            field,
            dx,
            cfl: defaults.cfl,
            dt: defaults.dt,
            time: 0.0,
            iteration: 0,
            flux: None,
            residual: None,
            advancer: None,
        }
    }

    pub fn set_flux_scheme(&mut self, scheme: FluxScheme) {
        self.flux = Some((scheme, flux_fn(scheme)))
    }

    /// Select the residual calculator. Fails if the scheme does not apply
    /// to this solver's payload kind; the previous choice is then kept.
    pub fn set_spatial_scheme(&mut self, scheme: SpatialScheme) -> Result<()> {
        self.residual = Some((scheme, P::residual_fn(scheme)?));
        Ok(())
    }

    pub fn set_time_scheme(&mut self, scheme: TimeScheme) {
        self.advancer = Some((scheme, time_advancer(scheme)))
    }

    /**
     * Apply a full configuration: the three strategies, CFL, Δt, and Δx.
     */
    pub fn configure(&mut self, config: &SolverConfig) -> Result<()> {
        config.validate()?;
        self.set_spatial_scheme(config.spatial)?;
        self.set_flux_scheme(config.flux);
        self.set_time_scheme(config.time);
        self.cfl = config.cfl;
        self.dt = config.dt;
        self.set_dx(config.dx);
        info!("configured {} solver {} on {} cells (dx = {}, cfl = {})", P::KIND, self.label(), self.field.len(), self.dx, self.cfl);
        Ok(())
    }

    pub fn cfl(&self) -> f64 {
        self.cfl
    }

    pub fn set_cfl(&mut self, cfl: f64) {
        self.cfl = cfl
    }

    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Change the cell spacing. Cell data is kept; cell centers move.
    pub fn set_dx(&mut self, dx: f64) {
        if dx != self.dx {
            let payloads = self.field.payloads();
            self.field = Field::uniform(payloads.len(), dx, |i, _| payloads[i]);
            self.dx = dx;
        }
    }

    /// A cheap snapshot of the current field.
    pub fn field(&self) -> Field<P> {
        self.field.clone()
    }

    /**
     * Take one step of size Δt with the configured strategies. Fails without
     * touching the field if any strategy is unset.
     */
    pub fn advance(&mut self) -> Result<()> {
        let (flux, residual, advancer) = self.strategies()?;
        let next = advancer(&self.field, self.dt, &|field: &Field<P>| residual(flux, field));
        self.field = next;
        self.time += self.dt;
        self.iteration += 1;

        debug!("[{}] iteration {} t = {:.6} dt = {:.3e}", self.label(), self.iteration, self.time, self.dt);
        Ok(())
    }

    fn strategies(&self) -> Result<(FluxFn, ResidualFn<P>, TimeAdvancer<P>)> {
        let (_, flux) = self.flux.ok_or(Error::StrategyUnset("flux"))?;
        let (_, residual) = self.residual.ok_or(Error::StrategyUnset("residual"))?;
        let (_, advancer) = self.advancer.ok_or(Error::StrategyUnset("time integrator"))?;
        Ok((flux, residual, advancer))
    }

    /// Largest |u| + c over the cell averages; NaN if any cell has diverged.
    pub fn max_signal_speed(&self) -> f64 {
        self.field
            .states()
            .map(|s| s.max_signal_speed())
            .fold(0.0, |a: f64, b| if a.is_nan() || b.is_nan() { f64::NAN } else { a.max(b) })
    }
}




// ============================================================================
impl<P: Payload> GasProfile for Solver<P> {
    fn num_cells(&self) -> usize {
        self.field.len()
    }

    fn densities(&self) -> Vec<f64> {
        self.field.states().map(|s| s.density()).collect()
    }

    fn pressures(&self) -> Vec<f64> {
        self.field.states().map(|s| s.pressure()).collect()
    }

    fn velocities(&self) -> Vec<f64> {
        self.field.states().map(|s| s.velocity()).collect()
    }
}

impl<P: Payload> Simulation for Solver<P> {

    fn label(&self) -> String {
        let name = |n: Option<&'static str>| n.unwrap_or("-");
        format!(
            "{}:{}:{}",
            name(self.residual.map(|(s, _)| s.name())),
            name(self.flux.map(|(s, _)| s.name())),
            name(self.advancer.map(|(s, _)| s.name())))
    }

    fn ready(&self) -> Result<()> {
        self.strategies().map(|_| ())
    }

    fn advance(&mut self) -> Result<()> {
        Solver::advance(self)
    }

    fn cfl_dt(&self) -> Option<f64> {
        let speed = self.max_signal_speed();
        if speed.is_finite() && speed > 0.0 {
            Some(self.cfl * self.dx / speed)
        } else {
            None
        }
    }

    /**
     * Set Δt = CFL Δx / max(|u| + c). If the wave speed is zero or not
     * finite, the previous Δt is kept. Returns the Δt now in effect.
     */
    fn update_dt_from_cfl(&mut self) -> f64 {
        match self.cfl_dt() {
            Some(dt) => self.dt = dt,
            None => warn!("[{}] wave speed {} gives no CFL step, keeping dt = {}", self.label(), self.max_signal_speed(), self.dt),
        }
        self.dt
    }

    fn dt(&self) -> f64 {
        self.dt
    }

    fn set_dt(&mut self, dt: f64) {
        self.dt = dt
    }

    fn time(&self) -> f64 {
        self.time
    }

    fn iteration(&self) -> u64 {
        self.iteration
    }

    fn positions(&self) -> Vec<f64> {
        self.field.iter().map(|c| c.x).collect()
    }

    fn check_physical(&self) -> Result<()> {
        for (cell, c) in self.field.iter().enumerate() {
            FluidState::try_from_conserved(c.payload.average()).map_err(|source| Error::Physical { cell, source })?;
        }
        Ok(())
    }
}




// ============================================================================
/**
 * Build a configured solver from a gas description. The payload kind
 * follows from the spatial scheme: Godunov runs on cell averages,
 * discontinuous Galerkin on modal coefficients.
 */
pub fn build<G: GasProfile + ?Sized>(config: &SolverConfig, profile: &G) -> Result<Box<dyn Simulation>> {
    match config.spatial {
        SpatialScheme::Godunov => {
            let mut solver = Solver::<FiniteVolume>::from_profile(profile, config.dx);
            solver.configure(config)?;
            Ok(Box::new(solver))
        }
        SpatialScheme::DiscontinuousGalerkin => {
            let mut solver = Solver::<Modal>::from_profile(profile, config.dx);
            solver.configure(config)?;
            Ok(Box::new(solver))
        }
    }
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::*;
    use crate::hydro::euler::Conserved;
    use crate::setup::{PartitionedGas, Reservoir};

    fn sod() -> Box<dyn Simulation> {
        build(&SolverConfig::default(), &PartitionedGas::default()).unwrap()
    }

    #[test]
    fn advancing_without_strategies_fails_fast() {
        let mut solver = Solver::<FiniteVolume>::new(10, 0.1);
        assert!(matches!(solver.advance(), Err(Error::StrategyUnset("flux"))));
        solver.set_flux_scheme(FluxScheme::Hll);
        assert!(matches!(solver.advance(), Err(Error::StrategyUnset("residual"))));
        solver.set_spatial_scheme(SpatialScheme::Godunov).unwrap();
        assert!(matches!(solver.advance(), Err(Error::StrategyUnset("time integrator"))));
        assert_eq!(solver.iteration(), 0);
        assert!(matches!(solver.ready(), Err(Error::StrategyUnset("time integrator"))));
        solver.set_time_scheme(TimeScheme::Euler);
        assert!(solver.ready().is_ok());
        assert!(solver.advance().is_ok());
        assert_eq!(solver.label(), "godunov:hll:euler");
    }

    #[test]
    fn residual_scheme_must_match_payload_kind() {
        let mut solver = Solver::<FiniteVolume>::new(10, 0.1);
        assert!(matches!(solver.set_spatial_scheme(SpatialScheme::DiscontinuousGalerkin), Err(Error::NotImplemented(_))));
        let mut solver = Solver::<Modal>::new(10, 0.1);
        assert!(solver.set_spatial_scheme(SpatialScheme::DiscontinuousGalerkin).is_ok());
        assert!(solver.set_spatial_scheme(SpatialScheme::Godunov).is_err());
        assert_eq!(solver.label(), "dg:-:-");
    }

    #[test]
    fn uniform_state_is_a_fixed_point_of_every_configuration() {
        let gas = Reservoir::new(0.8, 1.3);
        let tube = PartitionedGas::new(12, gas, gas).unwrap();
        for &spatial in SpatialScheme::ALL.iter() {
            for &flux in FluxScheme::ALL.iter() {
                for &time in TimeScheme::ALL.iter() {
                    let config = SolverConfig { dx: 0.1, ..SolverConfig::new(spatial, flux, time) };
                    let mut solver = build(&config, &tube).unwrap();
                    for _ in 0..5 {
                        solver.advance().unwrap();
                    }
                    for (d, u) in solver.densities().iter().zip(solver.velocities()) {
                        assert!((d - 0.8).abs() < 1e-12, "{} density {}", config.label(), d);
                        assert!(u.abs() < 1e-12, "{} velocity {}", config.label(), u);
                    }
                }
            }
        }
    }

    #[test]
    fn cfl_step_uses_the_fastest_signal() {
        let mut solver = sod();
        let dt = solver.update_dt_from_cfl();
        let fastest = (1.4f64).sqrt();
        assert!((dt - 0.3 * 0.01 / fastest).abs() < 1e-15);
        assert_eq!(solver.dt(), dt);
    }

    #[test]
    fn cfl_update_keeps_previous_step_without_a_wave_speed() {
        let mut solver = Solver::<FiniteVolume>::new(0, 0.1);
        solver.set_dt(0.02);
        assert_eq!(solver.update_dt_from_cfl(), 0.02);
    }

    #[test]
    fn advance_accumulates_time_and_keeps_old_snapshots() {
        let mut solver = Solver::<FiniteVolume>::from_profile(&PartitionedGas::default(), 0.01);
        solver.configure(&SolverConfig::default()).unwrap();
        let before = solver.field();
        solver.advance().unwrap();
        solver.advance().unwrap();
        assert_eq!(solver.iteration(), 2);
        assert!((solver.time() - 0.002).abs() < 1e-15);
        assert_eq!(before[50].state().density(), 0.125);
        assert!(solver.field()[50].state().density() > 0.125);
    }

    #[test]
    fn profiles_round_trip_through_a_solver() {
        let gas = PartitionedGas::default();
        let solver = Solver::<Modal>::from_profile(&gas, 0.01);
        assert_eq!(solver.densities(), gas.densities());
        assert_eq!(solver.velocities(), gas.velocities());
        let copy = Solver::<FiniteVolume>::from_profile(&solver, 0.01);
        for (a, b) in copy.pressures().iter().zip(gas.pressures()) {
            assert!((a - b).abs() < 1e-14);
        }
        assert!(copy.check_physical().is_ok());
    }

    #[test]
    fn strict_check_reports_the_offending_cell() {
        let solver = Solver::<FiniteVolume>::new(4, 0.25);
        let mut payloads = solver.field().payloads();
        payloads[2] = FiniteVolume(Conserved(1.0, 0.0, -1.0));
        let broken = Solver { field: solver.field().with_payloads(payloads).unwrap(), ..solver };
        assert!(matches!(broken.check_physical(), Err(Error::Physical { cell: 2, .. })));
    }
}
