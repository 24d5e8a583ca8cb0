//! Shocktube is a one-dimensional solver for the compressible Euler equations,
//! built around the classic shock tube: two ideal-gas reservoirs separated by
//! a partition, which is removed at t = 0 to launch a rarefaction, a contact
//! discontinuity, and a shock.
//!
//! A solver combines three pluggable strategies: an approximate Riemann
//! solver for the interface fluxes (Lax-Friedrichs, HLL, HLLC, or Roe), a
//! spatial residual (first-order Godunov finite volumes, or a modal
//! discontinuous Galerkin scheme on Legendre polynomials), and an explicit
//! time integrator (forward Euler or SSP-RK3). Fields are immutable values,
//! so every step publishes a new field and readers of the old one are never
//! disturbed. Several solvers can be stepped side by side with an
//! [`ensemble::Ensemble`], or one step at a time off-thread with a
//! [`thread_pool::StepPool`].

pub mod basis;
pub mod config;
pub mod ensemble;
pub mod error;
pub mod hydro;
pub mod integrate;
pub mod mesh;
pub mod payload;
pub mod residual;
pub mod setup;
pub mod solver;
pub mod thread_pool;

pub use error::{Error, Result};
