use clap::Parser;
use log::{info, warn, LevelFilter};
use simple_logger::SimpleLogger;
use shocktube::config::{SolverConfig, DEFAULT_CFL, DEFAULT_DT, DEFAULT_DX, DEFAULT_NUM_CELLS};
use shocktube::ensemble::Ensemble;
use shocktube::hydro::gas;
use shocktube::setup::{PartitionedGas, Reservoir};
use shocktube::thread_pool::StepPool;

#[derive(Debug, Parser)]
#[clap(version, about = "Evolve a two-reservoir shock tube and print the cell profiles")]
struct Opts {
    /// Strategy triple spatial:flux:time; repeat to compare schemes
    #[clap(short = 's', long = "scheme", default_value = "godunov:hllc:rk3")]
    schemes: Vec<SolverConfig>,

    #[clap(short = 'n', long, default_value_t = DEFAULT_NUM_CELLS)]
    num_cells: usize,

    #[clap(long, default_value_t = DEFAULT_DX)]
    dx: f64,

    #[clap(long, default_value_t = DEFAULT_DT)]
    dt: f64,

    #[clap(long, default_value_t = DEFAULT_CFL)]
    cfl: f64,

    /// Recompute a common CFL-limited dt before every step
    #[clap(long)]
    dynamic_dt: bool,

    #[clap(long, default_value = "1.0")]
    left_density: f64,

    #[clap(long, default_value = "1.0")]
    left_pressure: f64,

    #[clap(long, default_value = "0.125")]
    right_density: f64,

    #[clap(long, default_value = "0.1")]
    right_pressure: f64,

    /// Partition index; moving it away from the midpoint rescales the
    /// reservoirs unless --non-ideal is given
    #[clap(short = 'p', long)]
    partition: Option<usize>,

    #[clap(long)]
    non_ideal: bool,

    #[clap(long, default_value_t = gas::DEFAULT_SPECIFIC_HEAT_RATIO)]
    gamma: f64,

    #[clap(long, default_value = "100")]
    steps: u64,

    /// Run to this time instead of a fixed number of steps
    #[clap(short = 't', long)]
    end_time: Option<f64>,

    /// Check every cell for negative density or pressure after each step
    #[clap(long)]
    strict: bool,

    /// Step the solvers on this many background worker threads
    #[clap(long)]
    threads: Option<usize>,

    #[clap(long, default_value = "info")]
    log_level: LevelFilter,
}

fn check(ensemble: &Ensemble) -> shocktube::Result<()> {
    for m in ensemble.members() {
        if let Err(e) = m.check_physical() {
            warn!("[{}] {}", m.label(), e);
            return Err(e);
        }
    }
    Ok(())
}

fn run(opts: &Opts, ensemble: &mut Ensemble, pool: Option<&StepPool>) -> shocktube::Result<()> {
    match opts.end_time {
        Some(end_time) if !opts.strict => match pool {
            Some(pool) => ensemble.advance_to_on(end_time, pool),
            None => ensemble.advance_to(end_time),
        },
        Some(end_time) => {
            while !ensemble.has_reached(end_time) {
                let target = ensemble.time() + ensemble.common_dt().unwrap_or(opts.dt);
                match pool {
                    Some(pool) => ensemble.advance_to_on(target.min(end_time), pool)?,
                    None => ensemble.advance_to(target.min(end_time))?,
                }
                check(ensemble)?;
            }
            Ok(())
        }
        None => {
            for _ in 0..opts.steps {
                match pool {
                    Some(pool) => ensemble.step_on(pool)?,
                    None => ensemble.step()?,
                }
                if opts.strict {
                    check(ensemble)?;
                }
            }
            Ok(())
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let opts = Opts::parse();
    SimpleLogger::new().with_level(opts.log_level).init()?;
    gas::set_specific_heat_ratio(opts.gamma);

    let mut tube = PartitionedGas::new(
        opts.num_cells,
        Reservoir::new(opts.left_density, opts.left_pressure),
        Reservoir::new(opts.right_density, opts.right_pressure))?;
    tube.set_ideal_gas(!opts.non_ideal);

    if let Some(partition) = opts.partition {
        tube.set_partition_index(partition)?;
    }
    let configs: Vec<_> = opts
        .schemes
        .iter()
        .map(|s| SolverConfig { cfl: opts.cfl, dt: opts.dt, dx: opts.dx, ..*s })
        .collect();

    let mut ensemble = Ensemble::from_configs(&tube, &configs, opts.dynamic_dt)?;
    let pool = opts.threads.map(StepPool::new);
    run(&opts, &mut ensemble, pool.as_ref())?;

    info!("finished after {} steps at t = {:.6}", ensemble.steps(), ensemble.time());

    let members = ensemble.members();
    let labels: Vec<_> = members.iter().map(|m| m.label()).collect();
    println!("# x {}", labels.iter().map(|l| format!("rho[{0}] p[{0}] u[{0}]", l)).collect::<Vec<_>>().join(" "));

    let columns: Vec<_> = members.iter().map(|m| (m.densities(), m.pressures(), m.velocities())).collect();
    let positions = members.first().map(|m| m.positions()).unwrap_or_default();

    for (i, x) in positions.iter().enumerate() {
        let row: Vec<_> = columns
            .iter()
            .map(|(d, p, u)| format!("{:.8e} {:.8e} {:.8e}", d[i], p[i], u[i]))
            .collect();
        println!("{:.6} {}", x, row.join(" "));
    }
    Ok(())
}
