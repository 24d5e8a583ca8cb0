use log::{info, warn};
use rayon::prelude::*;
use crate::config::SolverConfig;
use crate::error::{Error, Result};
use crate::setup::GasProfile;
use crate::solver::{self, Simulation};
use crate::thread_pool::{PendingStep, StepPool};




/**
 * A group of independent solvers started from the same gas description and
 * advanced in lockstep, e.g. to compare schemes on one plot. Members share no
 * state; each step runs them in parallel.
 *
 * In dynamic-interval mode the ensemble recomputes one common Δt before each
 * step, the smallest CFL-limited step over all members, and applies it to
 * every member. Otherwise each member keeps its own Δt.
 */
pub struct Ensemble {
    members: Vec<Box<dyn Simulation>>,
    dynamic_dt: bool,
    steps: u64,
}




// ============================================================================
impl Ensemble {

    pub fn new(dynamic_dt: bool) -> Self {
        Self { members: Vec::new(), dynamic_dt, steps: 0 }
    }

    /**
     * Build one member per configuration, each seeded from `profile`.
     */
    pub fn from_configs<G>(profile: &G, configs: &[SolverConfig], dynamic_dt: bool) -> Result<Self>
    where
        G: GasProfile + ?Sized,
    {
        let members = configs
            .iter()
            .map(|config| solver::build(config, profile))
            .collect::<Result<Vec<_>>>()?;
        info!("ensemble of {} solver(s) on {} cells, dynamic dt {}", members.len(), profile.num_cells(), dynamic_dt);
        Ok(Self { members, dynamic_dt, steps: 0 })
    }

    pub fn push(&mut self, member: Box<dyn Simulation>) {
        self.members.push(member)
    }

    pub fn members(&self) -> &[Box<dyn Simulation>] {
        &self.members
    }

    /// Hand the members back, e.g. to run them on a background pool.
    pub fn into_members(self) -> Vec<Box<dyn Simulation>> {
        self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn dynamic_dt(&self) -> bool {
        self.dynamic_dt
    }

    pub fn set_dynamic_dt(&mut self, dynamic_dt: bool) {
        self.dynamic_dt = dynamic_dt
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Elapsed time of the slowest member, zero for an empty ensemble.
    pub fn time(&self) -> f64 {
        self.members.iter().map(|m| m.time()).reduce(f64::min).unwrap_or(0.0)
    }

    /**
     * The smallest CFL-limited step over the members, or `None` if no member
     * has a usable wave speed.
     */
    pub fn common_dt(&self) -> Option<f64> {
        self.members.iter().filter_map(|m| m.cfl_dt()).reduce(f64::min)
    }

    /**
     * Advance every member by one step, in parallel on the rayon pool. Every
     * member's strategies are checked first, so an unconfigured member fails
     * the step before any member has moved.
     */
    pub fn step(&mut self) -> Result<()> {
        self.step_with_limit(None, None)
    }

    /**
     * Advance every member by one step on a background step pool. The
     * members are moved to the workers and collected again before this
     * returns.
     */
    pub fn step_on(&mut self, pool: &StepPool) -> Result<()> {
        self.step_with_limit(None, Some(pool))
    }

    /**
     * Advance until the elapsed time reaches `end_time`. The last step is
     * shortened so that no member steps past it.
     */
    pub fn advance_to(&mut self, end_time: f64) -> Result<()> {
        self.advance_to_with(end_time, None)
    }

    pub fn advance_to_on(&mut self, end_time: f64, pool: &StepPool) -> Result<()> {
        self.advance_to_with(end_time, Some(pool))
    }

    /// Whether the elapsed time is within rounding of `end_time`, or past it.
    pub fn has_reached(&self, end_time: f64) -> bool {
        end_time - self.time() <= 1e-12 * end_time.abs().max(1.0)
    }

    fn advance_to_with(&mut self, end_time: f64, pool: Option<&StepPool>) -> Result<()> {
        while !self.has_reached(end_time) {
            let before = self.time();
            self.step_with_limit(Some(end_time), pool)?;

            if self.time() <= before {
                return Err(Error::InvalidConfig(format!("time is stuck at {} with a non-positive dt", before)));
            }
        }
        Ok(())
    }

    fn step_with_limit(&mut self, end_time: Option<f64>, pool: Option<&StepPool>) -> Result<()> {
        for m in &self.members {
            m.ready()?;
        }
        if self.dynamic_dt {
            match self.common_dt() {
                Some(dt) => self.members.iter_mut().for_each(|m| m.set_dt(dt)),
                None => warn!("no member has a usable wave speed, keeping each member's dt"),
            }
        }
        // one entry per member: the dt to put back after a shortened step
        let mut restore: Vec<Option<f64>> = vec![None; self.members.len()];

        if let Some(end_time) = end_time {
            for (m, saved) in self.members.iter_mut().zip(restore.iter_mut()) {
                let remaining = end_time - m.time();
                if remaining < m.dt() {
                    *saved = Some(m.dt());
                    m.set_dt(remaining.max(0.0));
                }
            }
        }
        let result = match pool {
            None => self
                .members
                .par_iter_mut()
                .filter(|m| m.dt() > 0.0)
                .map(|m| m.advance())
                .collect::<Result<Vec<_>>>()
                .map(|_| ()),
            Some(pool) => self.advance_on(pool, &mut restore),
        };

        for (m, saved) in self.members.iter_mut().zip(restore) {
            if let Some(dt) = saved {
                m.set_dt(dt);
            }
        }
        result?;
        self.steps += 1;
        Ok(())
    }

    /// Step every member on the pool. Entries of `restore` belonging to a
    /// member that is lost are removed with it.
    fn advance_on(&mut self, pool: &StepPool, restore: &mut Vec<Option<f64>>) -> Result<()> {
        enum Slot {
            Idle(Box<dyn Simulation>),
            Busy(PendingStep<Box<dyn Simulation>>),
        }
        let slots: Vec<_> = std::mem::take(&mut self.members)
            .into_iter()
            .map(|m| if m.dt() > 0.0 { Slot::Busy(pool.advance(m)) } else { Slot::Idle(m) })
            .collect();

        let mut result = Ok(());
        let mut lost = Vec::new();

        // collect every slot before reporting; a member is lost only if its
        // own step panicked
        for (n, slot) in slots.into_iter().enumerate() {
            let step = match slot {
                Slot::Idle(m) => {
                    self.members.push(m);
                    Ok(())
                }
                Slot::Busy(pending) => match pending.wait() {
                    Ok((m, step)) => {
                        self.members.push(m);
                        step
                    }
                    Err(e) => {
                        warn!("background step of member {} was lost", n);
                        lost.push(n);
                        Err(e)
                    }
                },
            };
            result = result.and(step);
        }
        for n in lost.into_iter().rev() {
            restore.remove(n);
        }
        result
    }
}
