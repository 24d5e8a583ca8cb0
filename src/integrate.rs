//! Explicit time integrators. Each is a pure function of the current field,
//! the step size, and a residual closure, and returns the next field; the
//! input field is never modified.

use crate::mesh::Field;
use crate::payload::Payload;




/// Signature shared by the time integrators.
pub type TimeAdvancer<P> = fn(&Field<P>, f64, &dyn Fn(&Field<P>) -> Vec<P>) -> Field<P>;




/**
 * Forward Euler: U^{n+1} = U^n + Δt R(U^n).
 */
pub fn forward_euler<P: Payload>(field: &Field<P>, dt: f64, rhs: &dyn Fn(&Field<P>) -> Vec<P>) -> Field<P> {
    let r = rhs(field);
    field.zip_map(&r, |c, r| c.payload + *r * dt)
}




/**
 * Third-order strong-stability-preserving Runge-Kutta (Shu-Osher form):
 *
 * U1 = U^n + Δt R(U^n)
 * U2 = 3/4 U^n + 1/4 U1 + 1/4 Δt R(U1)
 * U^{n+1} = 1/3 U^n + 2/3 U2 + 2/3 Δt R(U2)
 */
pub fn ssp_rk3<P: Payload>(field: &Field<P>, dt: f64, rhs: &dyn Fn(&Field<P>) -> Vec<P>) -> Field<P> {
    let un = field.payloads();

    let r0 = rhs(field);
    let u1 = field.zip_map(&r0, |c, r| c.payload + *r * dt);

    let r1 = rhs(&u1);
    let u2 = u1.zip_map(&r1, |c, r| c.payload * 0.25 + *r * (0.25 * dt));
    let u2 = u2.zip_map(&un, |c, u| *u * 0.75 + c.payload);

    let r2 = rhs(&u2);
    let u3 = u2.zip_map(&r2, |c, r| c.payload * (2.0 / 3.0) + *r * (2.0 / 3.0 * dt));
    u3.zip_map(&un, |c, u| *u * (1.0 / 3.0) + c.payload)
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::*;
    use crate::hydro::euler::Conserved;
    use crate::payload::FiniteVolume;

    /// dU/dt = -U, applied componentwise.
    fn decay(field: &Field<FiniteVolume>) -> Vec<FiniteVolume> {
        field.iter().map(|c| c.payload * -1.0).collect()
    }

    fn one_cell() -> Field<FiniteVolume> {
        Field::uniform(1, 1.0, |_, _| FiniteVolume(Conserved(1.0, 1.0, 1.0)))
    }

    #[test]
    fn forward_euler_takes_one_linear_step() {
        let next = forward_euler(&one_cell(), 0.1, &decay);
        assert!(((next[0].payload.0).0 - 0.9).abs() < 1e-15);
    }

    #[test]
    fn ssp_rk3_matches_the_third_order_taylor_polynomial() {
        let h: f64 = 0.1;
        let next = ssp_rk3(&one_cell(), h, &decay);
        let taylor = 1.0 - h + h * h / 2.0 - h * h * h / 6.0;
        assert!(((next[0].payload.0).0 - taylor).abs() < 1e-15);
    }

    #[test]
    fn ssp_rk3_error_shrinks_at_third_order() {
        let error = |steps: usize| {
            let dt = 1.0 / steps as f64;
            let mut field = one_cell();
            for _ in 0..steps {
                field = ssp_rk3(&field, dt, &decay);
            }
            ((field[0].payload.0).0 - (-1.0f64).exp()).abs()
        };
        let ratio = error(10) / error(20);
        assert!(ratio > 7.0 && ratio < 9.0, "ratio {}", ratio);
    }

    #[test]
    fn integrators_do_not_touch_their_input() {
        let field = one_cell();
        let _ = ssp_rk3(&field, 0.5, &decay);
        assert_eq!(field[0].payload.0, Conserved(1.0, 1.0, 1.0));
    }
}
