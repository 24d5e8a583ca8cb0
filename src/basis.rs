//! Legendre modal basis and Gauss-Legendre quadrature on the reference
//! interval [-1, +1].
//!
//! Legendre polynomials are orthogonal on [-1, 1] with weight 1:
//! ∫ φ_m φ_n dξ = 2 / (2n + 1) δ_mn

use std::ops::{Add, Mul};




/// Highest polynomial degree of the modal expansion.
pub const ORDER: usize = 2;

/// Number of modal coefficients per cell.
pub const NUM_MODES: usize = ORDER + 1;

/// Two-point Gauss-Legendre rule, exact for cubics. Used by the volume
/// integral of the discontinuous Galerkin residual.
pub const GAUSS_2: [(f64, f64); 2] = [
    (-0.577_350_269_189_625_8, 1.0),
    (0.577_350_269_189_625_8, 1.0),
];

/// Three-point Gauss-Legendre rule, exact for quintics. Used to project
/// initial data onto the modal basis.
pub const GAUSS_3: [(f64, f64); 3] = [
    (-0.774_596_669_241_483_4, 5.0 / 9.0),
    (0.0, 8.0 / 9.0),
    (0.774_596_669_241_483_4, 5.0 / 9.0),
];




/**
 * Evaluate the Legendre polynomial φ_n(ξ) by the three-term recurrence
 * (n + 1) φ_{n+1} = (2n + 1) ξ φ_n - n φ_{n-1}.
 */
pub fn legendre(n: usize, xi: f64) -> f64 {
    legendre_and_derivative(n, xi).0
}

/**
 * Evaluate dφ_n/dξ.
 */
pub fn legendre_derivative(n: usize, xi: f64) -> f64 {
    legendre_and_derivative(n, xi).1
}

/**
 * Evaluate φ_n(ξ) and its derivative together. The derivative is carried
 * through the recurrence, so the endpoints ξ = ±1 need no special case.
 */
pub fn legendre_and_derivative(n: usize, xi: f64) -> (f64, f64) {
    let (mut p0, mut p1) = (1.0, xi);
    let (mut d0, mut d1) = (0.0, 1.0);

    if n == 0 {
        return (p0, d0);
    }
    for k in 1..n {
        let k = k as f64;
        let p2 = ((2.0 * k + 1.0) * xi * p1 - k * p0) / (k + 1.0);
        let d2 = ((2.0 * k + 1.0) * (p1 + xi * d1) - k * d0) / (k + 1.0);
        p0 = p1;
        p1 = p2;
        d0 = d1;
        d1 = d2;
    }
    (p1, d1)
}

/**
 * Integrate a function over [-1, 1] with the given Gauss rule. The
 * integrand may return any vector-like value.
 */
pub fn integrate<T, F>(rule: &[(f64, f64)], f: F) -> T
where
    T: Default + Add<Output = T> + Mul<f64, Output = T>,
    F: Fn(f64) -> T,
{
    rule.iter().fold(T::default(), |acc, &(x, w)| acc + f(x) * w)
}
