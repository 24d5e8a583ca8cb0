//! Gas dynamics of a single spatial point: the ideal-gas constants, the
//! conservative and primitive descriptions of the gas, and the approximate
//! Riemann solvers used to couple neighboring points.

pub mod error;
pub mod euler;
pub mod gas;
pub mod riemann;
