//! Spatial residuals: the time derivative of every cell's payload, given an
//! interface flux strategy and the current field. Both domain ends are
//! reflective walls, imposed through a ghost state equal to the adjacent
//! boundary state with its velocity negated.

use crate::basis::{self, GAUSS_2, NUM_MODES};
use crate::hydro::euler::{Conserved, FluidState};
use crate::hydro::riemann::FluxFn;
use crate::mesh::Field;
use crate::payload::{FiniteVolume, Modal};




/// Signature shared by the residual calculators. The returned vector holds
/// one time derivative per cell, aligned with the field.
pub type ResidualFn<P> = fn(FluxFn, &Field<P>) -> Vec<P>;




/**
 * Compute the fluxes at the N + 1 faces of a field, given the states just
 * left and right of each face. Entry j is the flux through the left face
 * of cell j; the walls at both ends see the mirrored boundary state.
 */
fn face_fluxes<L, R>(flux: FluxFn, num_cells: usize, left_of_face: L, right_of_face: R) -> Vec<Conserved>
where
    L: Fn(usize) -> FluidState,
    R: Fn(usize) -> FluidState,
{
    if num_cells == 0 {
        return Vec::new();
    }
    let mut fluxes = Vec::with_capacity(num_cells + 1);
    let first = right_of_face(0);
    fluxes.push(flux(&first.reflect(), &first));

    for j in 1..num_cells {
        fluxes.push(flux(&left_of_face(j), &right_of_face(j)));
    }
    let last = left_of_face(num_cells);
    fluxes.push(flux(&last, &last.reflect()));
    fluxes
}




// ============================================================================
/**
 * First-order Godunov finite-volume residual,
 * R_j = (F_{j-1/2} - F_{j+1/2}) / Δx_j, with the face fluxes computed from
 * neighboring cell averages.
 */
pub fn godunov(flux: FluxFn, field: &Field<FiniteVolume>) -> Vec<FiniteVolume> {
    let states: Vec<_> = field.states().collect();
    let fluxes = face_fluxes(flux, states.len(), |j| states[j - 1], |j| states[j]);

    field
        .iter()
        .zip(fluxes.windows(2))
        .map(|(cell, f)| FiniteVolume((f[0] - f[1]) / cell.w))
        .collect()
}




// ============================================================================
/**
 * Discontinuous Galerkin residual for the modal coefficients. For each
 * mode m the derivative is a volume term, the two-point Gauss integral of
 * F(U_h(ξ)) dφ_m/dξ, plus a surface term from the face fluxes, which are
 * computed from the reconstructed face states of the two adjoining cells:
 *
 * R_m = (2m + 1) / Δx [ ∫ F(U_h) φ_m' dξ - (F_{j+1/2} φ_m(1) - F_{j-1/2} φ_m(-1)) ]
 */
pub fn galerkin(flux: FluxFn, field: &Field<Modal>) -> Vec<Modal> {
    let cells = field.cells();
    let fluxes = face_fluxes(
        flux,
        cells.len(),
        |j| cells[j - 1].right_face_state(),
        |j| cells[j].left_face_state());

    cells
        .iter()
        .zip(fluxes.windows(2))
        .map(|(cell, f)| {
            let mut rate = [Conserved::zero(); NUM_MODES];

            for (m, rm) in rate.iter_mut().enumerate() {
                let volume = basis::integrate(&GAUSS_2, |xi| {
                    cell.state_at(xi).flux_vector() * basis::legendre_derivative(m, xi)
                });
                let surface = f[1] * basis::legendre(m, 1.0) - f[0] * basis::legendre(m, -1.0);
                *rm = (volume - surface) * ((2 * m + 1) as f64 / cell.w);
            }
            Modal(rate)
        })
        .collect()
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::*;
    use crate::hydro::riemann::{hll, hllc, lax_friedrichs, roe};
    use crate::payload::Payload;

    const FLUXES: [FluxFn; 4] = [lax_friedrichs, hll, hllc, roe];

    #[test]
    fn uniform_rest_state_has_zero_godunov_residual() {
        let s = FluidState::new(1.3, 0.0, 0.7);
        let field = Field::uniform(16, 0.1, |_, _| FiniteVolume::from_state(&s));
        for flux in FLUXES.iter() {
            for r in godunov(*flux, &field) {
                assert!(r.0.max_abs_diff(&Conserved::zero()) < 1e-12);
            }
        }
    }

    #[test]
    fn uniform_rest_state_has_zero_galerkin_residual() {
        let s = FluidState::new(1.3, 0.0, 0.7);
        let field = Field::uniform(16, 0.1, |_, _| Modal::from_state(&s));
        for flux in FLUXES.iter() {
            for r in galerkin(*flux, &field) {
                for m in 0..NUM_MODES {
                    assert!(r.coefficient(m).max_abs_diff(&Conserved::zero()) < 1e-11);
                }
            }
        }
    }

    #[test]
    fn godunov_residual_conserves_mass() {
        let field = Field::uniform(20, 0.05, |i, _| {
            let s = if i < 10 { FluidState::new(1.0, 0.3, 1.0) } else { FluidState::new(0.125, -0.2, 0.1) };
            FiniteVolume::from_state(&s)
        });
        for flux in FLUXES.iter() {
            let rate: f64 = godunov(*flux, &field).iter().zip(field.iter()).map(|(r, c)| r.0.mass_density() * c.w).sum();
            assert!(rate.abs() < 1e-12, "mass rate {}", rate);
        }
    }

    #[test]
    fn galerkin_mean_mode_matches_godunov_for_piecewise_constant_data() {
        let init = |i: usize| if i < 5 { FluidState::new(1.0, 0.0, 1.0) } else { FluidState::new(0.125, 0.0, 0.1) };
        let fv = Field::uniform(10, 0.1, |i, _| FiniteVolume::from_state(&init(i)));
        let dg = Field::uniform(10, 0.1, |i, _| Modal::from_state(&init(i)));
        let rf = godunov(hllc, &fv);
        let rd = galerkin(hllc, &dg);
        for (a, b) in rf.iter().zip(&rd) {
            assert!(a.0.max_abs_diff(&b.coefficient(0)) < 1e-12);
        }
    }

    #[test]
    fn empty_field_has_empty_residual() {
        let field: Field<FiniteVolume> = Field::uniform(0, 0.1, |_, _| FiniteVolume::default());
        assert!(godunov(hllc, &field).is_empty());
    }
}
