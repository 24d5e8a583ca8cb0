//! Per-cell data carried by a field. The two payload kinds share a small
//! capability set: they add elementwise, scale by a number, and convert to
//! and from a fluid state at the cell average. Time integrators need only
//! that capability set; residual calculators are specific to a kind.

use std::ops::{Add, Mul};
use crate::basis::{self, GAUSS_3, NUM_MODES};
use crate::config::SpatialScheme;
use crate::error::{Error, Result};
use crate::hydro::euler::{Conserved, FluidState};
use crate::residual::{self, ResidualFn};




/**
 * Capability interface of a cell payload.
 */
pub trait Payload:
    Copy + Default + Send + Sync + Add<Output = Self> + Mul<f64, Output = Self> + 'static
{
    /// Short name of the payload kind, for log and error messages.
    const KIND: &'static str;

    /// Build a payload whose cell average is the given state. Higher
    /// moments, if any, are zero.
    fn from_state(state: &FluidState) -> Self;

    /// Build a payload from a state varying over the cell. The closure is
    /// evaluated at reference coordinates ξ in [-1, 1].
    fn project<F: Fn(f64) -> FluidState>(f: F) -> Self;

    /// The conserved cell average.
    fn average(&self) -> Conserved;

    /// The fluid state at the cell average.
    fn state(&self) -> FluidState {
        FluidState::from_conserved(self.average())
    }

    /// Return the residual calculator for this payload kind, or a
    /// not-implemented error if the scheme does not apply to it.
    fn residual_fn(scheme: SpatialScheme) -> Result<ResidualFn<Self>>;
}




/**
 * Finite-volume payload: the cell average of the conserved variables.
 */
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FiniteVolume(pub Conserved);




/**
 * Modal payload: coefficients of a local Legendre expansion of the
 * conserved variables. Coefficient 0 is the cell average.
 */
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Modal(pub [Conserved; NUM_MODES]);




// ============================================================================
impl Add for FiniteVolume {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl Mul<f64> for FiniteVolume {
    type Output = Self;
    fn mul(self, a: f64) -> Self {
        Self(self.0 * a)
    }
}

impl Payload for FiniteVolume {
    const KIND: &'static str = "finite-volume";

    fn from_state(state: &FluidState) -> Self {
        Self(state.to_conserved())
    }

    fn project<F: Fn(f64) -> FluidState>(f: F) -> Self {
        Self(basis::integrate(&GAUSS_3, |xi| f(xi).to_conserved()) * 0.5)
    }

    fn average(&self) -> Conserved {
        self.0
    }

    fn residual_fn(scheme: SpatialScheme) -> Result<ResidualFn<Self>> {
        match scheme {
            SpatialScheme::Godunov => Ok(residual::godunov as ResidualFn<Self>),
            SpatialScheme::DiscontinuousGalerkin => Err(Error::NotImplemented(format!(
                "{} residual for {} payloads", scheme, Self::KIND))),
        }
    }
}




// ============================================================================
impl Modal {

    pub fn coefficient(&self, m: usize) -> Conserved {
        self.0[m]
    }

    /**
     * Reconstruct the conserved variables at reference coordinate ξ.
     */
    pub fn at(&self, xi: f64) -> Conserved {
        self.0
            .iter()
            .enumerate()
            .fold(Conserved::zero(), |acc, (m, um)| acc + *um * basis::legendre(m, xi))
    }

    pub fn state_at(&self, xi: f64) -> FluidState {
        FluidState::from_conserved(self.at(xi))
    }

    pub fn left_face_state(&self) -> FluidState {
        self.state_at(-1.0)
    }

    pub fn right_face_state(&self) -> FluidState {
        self.state_at(1.0)
    }
}

impl Add for Modal {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        let mut data = self.0;
        for (a, b) in data.iter_mut().zip(other.0.iter()) {
            *a = *a + *b;
        }
        Self(data)
    }
}

impl Mul<f64> for Modal {
    type Output = Self;
    fn mul(self, s: f64) -> Self {
        let mut data = self.0;
        for a in data.iter_mut() {
            *a = *a * s;
        }
        Self(data)
    }
}

impl Payload for Modal {
    const KIND: &'static str = "modal";

    fn from_state(state: &FluidState) -> Self {
        let mut data = [Conserved::zero(); NUM_MODES];
        data[0] = state.to_conserved();
        Self(data)
    }

    /// L2 projection onto φ_0..φ_N, U_m = (2m + 1) / 2 ∫ U φ_m dξ.
    fn project<F: Fn(f64) -> FluidState>(f: F) -> Self {
        let samples: Vec<_> = GAUSS_3.iter().map(|&(xi, _)| f(xi).to_conserved()).collect();
        let mut data = [Conserved::zero(); NUM_MODES];

        for (m, um) in data.iter_mut().enumerate() {
            let moment = GAUSS_3
                .iter()
                .zip(&samples)
                .fold(Conserved::zero(), |acc, (&(xi, w), u)| acc + *u * (w * basis::legendre(m, xi)));
            *um = moment * (0.5 * (2 * m + 1) as f64);
        }
        Self(data)
    }

    fn average(&self) -> Conserved {
        self.0[0]
    }

    fn residual_fn(scheme: SpatialScheme) -> Result<ResidualFn<Self>> {
        match scheme {
            SpatialScheme::DiscontinuousGalerkin => Ok(residual::galerkin as ResidualFn<Self>),
            SpatialScheme::Godunov => Err(Error::NotImplemented(format!(
                "{} residual for {} payloads", scheme, Self::KIND))),
        }
    }
}
