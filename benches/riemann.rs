use criterion::{black_box, criterion_group, criterion_main, Criterion};
use shocktube::hydro::euler::FluidState;
use shocktube::hydro::riemann::{hll, hllc, lax_friedrichs, roe, FluxFn};
use shocktube::mesh::Field;
use shocktube::payload::{FiniteVolume, Modal};
use shocktube::residual::{galerkin, godunov};

const NUM_CELLS: usize = 1000;




fn interface_states(n: usize) -> Vec<(FluidState, FluidState)> {
    (0..n)
        .map(|i| {
            let phase = i as f64 * 0.1;
            let l = FluidState::new(1.0 + 0.5 * phase.sin(), 0.3 * phase.cos(), 1.0 + 0.2 * phase.cos());
            let r = FluidState::new(0.6 + 0.3 * phase.cos(), -0.2 * phase.sin(), 0.4 + 0.1 * phase.sin());
            (l, r)
        })
        .collect()
}

fn sod(x: f64) -> FluidState {
    if x < 0.5 {
        FluidState::new(1.0, 0.0, 1.0)
    } else {
        FluidState::new(0.125, 0.0, 0.1)
    }
}




// ============================================================================
fn bench_fluxes(c: &mut Criterion) {
    let mut group = c.benchmark_group("flux");
    let states = interface_states(NUM_CELLS);
    let fluxes: [(&str, FluxFn); 4] = [("lax-friedrichs", lax_friedrichs), ("hll", hll), ("hllc", hllc), ("roe", roe)];

    for (name, flux) in fluxes.iter() {
        group.bench_function(*name, |b| {
            b.iter(|| {
                let mut total = 0.0;
                for (l, r) in &states {
                    total += flux(black_box(l), black_box(r)).0;
                }
                total
            })
        });
    }
    group.finish();
}




// ============================================================================
fn bench_residuals(c: &mut Criterion) {
    let mut group = c.benchmark_group("residual");
    let dx = 1.0 / NUM_CELLS as f64;
    let fv: Field<FiniteVolume> = Field::project(NUM_CELLS, dx, sod);
    let dg: Field<Modal> = Field::project(NUM_CELLS, dx, sod);

    group.bench_function("godunov-hllc", |b| b.iter(|| godunov(hllc, black_box(&fv))));
    group.bench_function("dg-hllc", |b| b.iter(|| galerkin(hllc, black_box(&dg))));
    group.finish();
}

criterion_group!(benches, bench_fluxes, bench_residuals);
criterion_main!(benches);
