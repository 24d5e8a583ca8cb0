//! Approximate Riemann solvers. Each takes the fluid states on the left and
//! right of a single interface and returns the numerical flux through it.
//! All of them are consistent: given the same state on both sides, they
//! return the physical flux of that state.

use super::euler::{Conserved, FluidState};
use super::gas::{self, NUMERICAL_FLOOR};




/// Signature shared by the interface flux strategies.
pub type FluxFn = fn(&FluidState, &FluidState) -> Conserved;




// ============================================================================
/**
 * Lax-Friedrichs (Rusanov) flux, using the largest signal speed on either
 * side as the dissipation coefficient.
 */
pub fn lax_friedrichs(pl: &FluidState, pr: &FluidState) -> Conserved {
    let ul = pl.to_conserved();
    let ur = pr.to_conserved();
    let fl = pl.flux_vector();
    let fr = pr.flux_vector();
    let alpha = pl.max_signal_speed().max(pr.max_signal_speed());

    (fl + fr - (ur - ul) * alpha) * 0.5
}




// ============================================================================
/**
 * Two-wave HLL flux with Davis wave speed estimates.
 */
pub fn hll(pl: &FluidState, pr: &FluidState) -> Conserved {
    let (alm, alp) = pl.outer_wavespeeds();
    let (arm, arp) = pr.outer_wavespeeds();
    let sl = alm.min(arm);
    let sr = alp.max(arp);

    if sl >= 0.0 {
        pl.flux_vector()
    } else if sr <= 0.0 {
        pr.flux_vector()
    } else {
        let ul = pl.to_conserved();
        let ur = pr.to_conserved();
        let fl = pl.flux_vector();
        let fr = pr.flux_vector();
        (fl * sr - fr * sl + (ur - ul) * (sl * sr)) / (sr - sl)
    }
}




// ============================================================================
/**
 * HLLC flux: HLL with the contact wave restored. The middle wave speed S*
 * comes from the pressure and momentum balance across the outer waves, and
 * the two star-region fluxes use the direction vector (0, 1, S*). On ties
 * the leftmost matching case wins.
 */
pub fn hllc(pl: &FluidState, pr: &FluidState) -> Conserved {
    let (alm, alp) = pl.outer_wavespeeds();
    let (arm, arp) = pr.outer_wavespeeds();
    let sl = alm.min(arm);
    let sr = alp.max(arp);

    if sl >= 0.0 {
        return pl.flux_vector();
    }

    let (dl, vl, ql) = (pl.density(), pl.velocity(), pl.pressure());
    let (dr, vr, qr) = (pr.density(), pr.velocity(), pr.pressure());
    let ml = dl * (sl - vl);
    let mr = dr * (sr - vr);
    let ss = (qr - ql + ml * vl - mr * vr) / (ml - mr);

    let star_flux = |s: &FluidState, sk: f64, mk: f64| {
        let d_star = Conserved(0.0, 1.0, ss);
        (ss * (sk * s.to_conserved() - s.flux_vector())
            + d_star * (sk * (s.pressure() + mk * (ss - s.velocity()))))
            / (sk - ss)
    };

    if ss >= 0.0 {
        star_flux(pl, sl, ml)
    } else if sr >= 0.0 {
        star_flux(pr, sr, mr)
    } else {
        pr.flux_vector()
    }
}




// ============================================================================
/**
 * Roe flux in its fully linearized form: the Roe-averaged flux Jacobian is
 * applied to the sum of the two conserved states, and the upwind correction
 * sums |λ| α r over the acoustic, entropy, and acoustic characteristic
 * families. Wave strengths come from the density, pressure, and velocity
 * jumps. The averaged sound speed squared is floored so a vacuum-clamped
 * state cannot produce a division by zero.
 */
pub fn roe(pl: &FluidState, pr: &FluidState) -> Conserved {
    let gamma_law_index = gas::specific_heat_ratio();
    let sl = pl.density().sqrt();
    let sr = pr.density().sqrt();

    let v = (sl * pl.velocity() + sr * pr.velocity()) / (sl + sr);
    let h = (sl * pl.enthalpy() + sr * pr.enthalpy()) / (sl + sr);
    let c2 = ((gamma_law_index - 1.0) * (h - 0.5 * v * v)).max(NUMERICAL_FLOOR);
    let c = c2.sqrt();
    let d = sl * sr;

    let dd = pr.density() - pl.density();
    let dp = pr.pressure() - pl.pressure();
    let dv = pr.velocity() - pl.velocity();

    let alpha = [
        0.5 * (dp - c * d * dv) / c2,
        dd - dp / c2,
        0.5 * (dp + c * d * dv) / c2,
    ];
    let lambda = [v - c, v, v + c];
    let r = [
        Conserved(1.0, v - c, h - v * c),
        Conserved(1.0, v, 0.5 * v * v),
        Conserved(1.0, v + c, h + v * c),
    ];

    let u = pl.to_conserved() + pr.to_conserved();
    let g = gamma_law_index;
    let jacobian_times_u = Conserved(
        u.1,
        0.5 * (g - 3.0) * v * v * u.0 + (3.0 - g) * v * u.1 + (g - 1.0) * u.2,
        (0.5 * (g - 1.0) * v * v * v - v * h) * u.0 + (h - (g - 1.0) * v * v) * u.1 + g * v * u.2,
    );

    let dissipation = (0..3).fold(Conserved::zero(), |acc, k| acc + r[k] * (lambda[k].abs() * alpha[k]));

    (jacobian_times_u - dissipation) * 0.5
}
