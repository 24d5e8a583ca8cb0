use core_affinity::{get_core_ids, set_for_current, CoreId};
use crossbeam_channel::{bounded, unbounded, Receiver, Sender, TryRecvError};
use std::cell::{self, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::thread;
use crate::error::{Error, Result};
use crate::solver::Simulation;

type Job = Box<dyn FnOnce() + Send + 'static>;

struct Worker {
    handle: Option<thread::JoinHandle<()>>,
    sender: Option<Sender<Job>>,
}

/// A small pool of worker threads that run solver steps off the caller's
/// thread. Workers are pinned to cores when the platform reports core ids.
/// Submissions go round-robin.
///
/// A step is submitted by moving the solver into the pool, and the solver
/// comes back through the returned [`PendingStep`]. A caller therefore
/// cannot start a second step, or read the solver, while one is in flight.
///
pub struct StepPool {
    workers: Vec<Worker>,
    current_worker_id: cell::Cell<usize>,
}

/// Completion handle for one background step. Dropping it discards the
/// solver once the step finishes.
///
pub struct PendingStep<S> {
    receiver: Receiver<(S, Result<()>)>,
    outcome: RefCell<Option<Result<(S, Result<()>)>>>,
}

impl StepPool {
    /// Create a pool with at most the given number of threads (at least one).
    /// If the system reports fewer cores than requested, the number of cores
    /// is used instead; if it reports none, the threads run unpinned.
    ///
    pub fn new(num_threads: usize) -> Self {
        let num_threads = num_threads.max(1);
        let core_ids: Vec<Option<CoreId>> = match get_core_ids() {
            Some(ids) if !ids.is_empty() => ids.into_iter().take(num_threads).map(Some).collect(),
            _ => (0..num_threads).map(|_| None).collect(),
        };
        let workers = core_ids
            .into_iter()
            .map(|core_id| {
                let (sender, receiver): (Sender<Job>, Receiver<Job>) = unbounded();
                let handle = thread::spawn(move || {
                    if let Some(core_id) = core_id {
                        set_for_current(core_id);
                    }
                    // a panicking step loses its solver but not the worker
                    for job in receiver {
                        let _ = panic::catch_unwind(AssertUnwindSafe(job));
                    }
                });
                Worker {
                    handle: Some(handle),
                    sender: Some(sender),
                }
            })
            .collect();

        StepPool {
            workers,
            current_worker_id: cell::Cell::new(0),
        }
    }

    /// Return the number of worker threads in the pool.
    ///
    pub fn num_threads(&self) -> usize {
        self.workers.len()
    }

    /// Move a solver onto the next worker and take one step there.
    ///
    pub fn advance<S>(&self, mut solver: Box<S>) -> PendingStep<Box<S>>
    where
        S: Simulation + ?Sized + 'static,
    {
        let (sender, receiver) = bounded(1);
        self.spawn(move || {
            let result = solver.advance();
            // the caller may have dropped its handle
            let _ = sender.send((solver, result));
        });
        PendingStep { receiver, outcome: RefCell::new(None) }
    }

    /// Send a job to the current worker and move on to the next one. If the
    /// worker is gone the job is dropped, which disconnects its result
    /// channel.
    ///
    fn spawn<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let worker_id = self.current_worker_id.get();
        self.current_worker_id.set((worker_id + 1) % self.num_threads());

        if let Some(sender) = self.workers[worker_id].sender.as_ref() {
            let _ = sender.send(Box::new(job));
        }
    }
}

impl<S> PendingStep<S> {
    /// Whether the step has finished, so that `wait` will not block. A step
    /// whose worker went away without reporting also counts as finished.
    ///
    pub fn is_done(&self) -> bool {
        let mut outcome = self.outcome.borrow_mut();
        if outcome.is_none() {
            match self.receiver.try_recv() {
                Ok(done) => *outcome = Some(Ok(done)),
                Err(TryRecvError::Disconnected) => *outcome = Some(Err(Error::WorkerDisconnected)),
                Err(TryRecvError::Empty) => {}
            }
        }
        outcome.is_some()
    }

    /// Block until the step finishes, then return the solver together with
    /// the result of its `advance`. Fails if the worker went away without
    /// reporting, e.g. because the step panicked; the solver is then lost.
    ///
    pub fn wait(self) -> Result<(S, Result<()>)> {
        match self.outcome.into_inner() {
            Some(outcome) => outcome,
            None => self.receiver.recv().map_err(|_| Error::WorkerDisconnected),
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::*;
    use crate::config::SolverConfig;
    use crate::payload::FiniteVolume;
    use crate::setup::{GasProfile, PartitionedGas};
    use crate::solver::{self, Solver};

    #[test]
    fn background_step_returns_the_advanced_solver() {
        let pool = StepPool::new(2);
        assert!(pool.num_threads() >= 1);
        let sim = solver::build(&SolverConfig::default(), &PartitionedGas::default()).unwrap();
        let (sim, result) = pool.advance(sim).wait().unwrap();
        assert!(result.is_ok());
        assert_eq!(sim.iteration(), 1);
    }

    #[test]
    fn background_step_reports_strategy_errors() {
        let pool = StepPool::new(1);
        let sim = Box::new(Solver::<FiniteVolume>::new(8, 0.1));
        let (sim, result) = pool.advance(sim).wait().unwrap();
        assert!(matches!(result, Err(Error::StrategyUnset(_))));
        assert_eq!(sim.iteration(), 0);
    }

    #[test]
    fn independent_solvers_step_concurrently() {
        let pool = StepPool::new(4);
        let pending: Vec<_> = (0..6)
            .map(|_| solver::build(&SolverConfig::default(), &PartitionedGas::default()).unwrap())
            .map(|sim| pool.advance(sim))
            .collect();
        for p in pending {
            let (sim, result) = p.wait().unwrap();
            assert!(result.is_ok());
            assert_eq!(sim.iteration(), 1);
        }
    }

    #[test]
    fn finished_step_is_done() {
        let pool = StepPool::new(1);
        let sim = Box::new(Solver::<FiniteVolume>::new(8, 0.1));
        let pending = pool.advance(sim);
        while !pending.is_done() {
            thread::yield_now();
        }
        assert!(pending.wait().is_ok());
    }

    struct Faulty;

    impl GasProfile for Faulty {
        fn num_cells(&self) -> usize { 0 }
        fn densities(&self) -> Vec<f64> { Vec::new() }
        fn pressures(&self) -> Vec<f64> { Vec::new() }
        fn velocities(&self) -> Vec<f64> { Vec::new() }
    }

    impl Simulation for Faulty {
        fn label(&self) -> String { "faulty".to_string() }
        fn ready(&self) -> Result<()> { Ok(()) }
        fn advance(&mut self) -> Result<()> { panic!("step blew up") }
        fn cfl_dt(&self) -> Option<f64> { None }
        fn update_dt_from_cfl(&mut self) -> f64 { 0.001 }
        fn dt(&self) -> f64 { 0.001 }
        fn set_dt(&mut self, _: f64) {}
        fn time(&self) -> f64 { 0.0 }
        fn iteration(&self) -> u64 { 0 }
        fn positions(&self) -> Vec<f64> { Vec::new() }
        fn check_physical(&self) -> Result<()> { Ok(()) }
    }

    #[test]
    fn panicking_step_is_done_and_reports_disconnection() {
        let pool = StepPool::new(1);
        let pending = pool.advance(Box::new(Faulty));
        while !pending.is_done() {
            thread::yield_now();
        }
        assert!(pending.is_done());
        assert!(matches!(pending.wait(), Err(Error::WorkerDisconnected)));

        // the worker survives and keeps taking steps
        let sim = solver::build(&SolverConfig::default(), &PartitionedGas::default()).unwrap();
        let (sim, result) = pool.advance(sim).wait().unwrap();
        assert!(result.is_ok());
        assert_eq!(sim.iteration(), 1);
    }
}
