use std::ops::{Add, Div, Mul, Neg, Sub};
use super::error::Error;
use super::gas::{self, NUMERICAL_FLOOR};




/**
 * A triple of conserved quantities per unit length: mass density, momentum
 * density, and total energy density. The same type carries flux vectors and
 * time derivatives, since those share the component layout.
 */
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Conserved(pub f64, pub f64, pub f64);




/**
 * The gas description at one spatial point, stored in primitive form
 * (density, velocity, pressure). Conversions from conservative variables
 * never fail: a density at or below `NUMERICAL_FLOOR` is raised to the
 * floor and its velocity is forced to zero, and a negative pressure is
 * raised to the floor as well.
 */
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FluidState {
    density: f64,
    velocity: f64,
    pressure: f64,
}




// ============================================================================
impl Conserved {

    pub fn zero() -> Self {
        Self(0.0, 0.0, 0.0)
    }

    pub fn mass_density(&self) -> f64 {
        self.0
    }

    pub fn momentum_density(&self) -> f64 {
        self.1
    }

    pub fn energy_density(&self) -> f64 {
        self.2
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.0, self.1, self.2]
    }

    /// Largest absolute difference between corresponding components.
    pub fn max_abs_diff(&self, other: &Self) -> f64 {
        (self.0 - other.0).abs()
            .max((self.1 - other.1).abs())
            .max((self.2 - other.2).abs())
    }
}

impl From<[f64; 3]> for Conserved {
    fn from(a: [f64; 3]) -> Self {
        Self(a[0], a[1], a[2])
    }
}




// ============================================================================
impl Add<Conserved> for Conserved {
    type Output = Self;
    fn add(self, u: Self) -> Self {
        Self(self.0 + u.0, self.1 + u.1, self.2 + u.2)
    }
}

impl Sub<Conserved> for Conserved {
    type Output = Self;
    fn sub(self, u: Self) -> Self {
        Self(self.0 - u.0, self.1 - u.1, self.2 - u.2)
    }
}

impl Mul<f64> for Conserved {
    type Output = Self;
    fn mul(self, a: f64) -> Self {
        Self(self.0 * a, self.1 * a, self.2 * a)
    }
}

impl Mul<Conserved> for f64 {
    type Output = Conserved;
    fn mul(self, u: Conserved) -> Conserved {
        Conserved(self * u.0, self * u.1, self * u.2)
    }
}

impl Div<f64> for Conserved {
    type Output = Self;
    fn div(self, a: f64) -> Self {
        Self(self.0 / a, self.1 / a, self.2 / a)
    }
}

impl Neg for Conserved {
    type Output = Self;
    fn neg(self) -> Self {
        Self(-self.0, -self.1, -self.2)
    }
}




// ============================================================================
impl FluidState {

    /**
     * Construct a state from primitive variables. Density and pressure are
     * clamped to the numerical floor.
     */
    pub fn new(density: f64, velocity: f64, pressure: f64) -> Self {
        let (density, velocity) = if density > NUMERICAL_FLOOR {
            (density, velocity)
        } else {
            (NUMERICAL_FLOOR, 0.0)
        };
        Self {
            density,
            velocity,
            pressure: pressure.max(NUMERICAL_FLOOR),
        }
    }

    /**
     * Recover the primitive state from a conserved triple, clamping rather
     * than rejecting unphysical values.
     */
    pub fn from_conserved(u: Conserved) -> Self {
        let gamma_law_index = gas::specific_heat_ratio();
        let density = u.mass_density();

        if density > NUMERICAL_FLOOR {
            let velocity = u.momentum_density() / density;
            let ek = 0.5 * density * velocity * velocity;
            let pressure = (u.energy_density() - ek) * (gamma_law_index - 1.0);
            Self { density, velocity, pressure: pressure.max(NUMERICAL_FLOOR) }
        } else {
            let pressure = u.energy_density() * (gamma_law_index - 1.0);
            Self { density: NUMERICAL_FLOOR, velocity: 0.0, pressure: pressure.max(NUMERICAL_FLOOR) }
        }
    }

    /**
     * Strict twin of `from_conserved`: a negative mass density or gas
     * pressure is reported as an error instead of being clamped.
     */
    pub fn try_from_conserved(u: Conserved) -> Result<Self, Error> {
        let gamma_law_index = gas::specific_heat_ratio();
        let density = u.mass_density();

        if density < 0.0 || !density.is_finite() {
            return Err(Error::NegativeMassDensity(density));
        }
        let velocity = if density == 0.0 { 0.0 } else { u.momentum_density() / density };
        let pressure = (u.energy_density() - 0.5 * density * velocity * velocity) * (gamma_law_index - 1.0);

        if pressure < 0.0 || !pressure.is_finite() {
            Err(Error::NegativeGasPressure(pressure))
        } else {
            Ok(Self::new(density, velocity, pressure))
        }
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn pressure(&self) -> f64 {
        self.pressure
    }

    pub fn momentum(&self) -> f64 {
        self.density * self.velocity
    }

    pub fn total_energy(&self) -> f64 {
        let gamma_law_index = gas::specific_heat_ratio();
        self.pressure / (gamma_law_index - 1.0) + 0.5 * self.density * self.velocity * self.velocity
    }

    pub fn sound_speed_squared(&self) -> f64 {
        gas::specific_heat_ratio() * self.pressure / self.density
    }

    pub fn sound_speed(&self) -> f64 {
        self.sound_speed_squared().sqrt()
    }

    /// Specific total enthalpy, h = γ/(γ-1) p/ρ + u²/2.
    pub fn enthalpy(&self) -> f64 {
        let gamma_law_index = gas::specific_heat_ratio();
        gamma_law_index / (gamma_law_index - 1.0) * self.pressure / self.density
            + 0.5 * self.velocity * self.velocity
    }

    pub fn specific_internal_energy(&self) -> f64 {
        self.pressure / self.density / (gas::specific_heat_ratio() - 1.0)
    }

    pub fn temperature(&self) -> f64 {
        self.pressure / (self.density * gas::gas_constant())
    }

    pub fn mach_number(&self) -> f64 {
        self.velocity.abs() / self.sound_speed()
    }

    pub fn outer_wavespeeds(&self) -> (f64, f64) {
        let cs = self.sound_speed();
        (self.velocity - cs, self.velocity + cs)
    }

    pub fn max_signal_speed(&self) -> f64 {
        self.velocity.abs() + self.sound_speed()
    }

    pub fn to_conserved(&self) -> Conserved {
        Conserved(self.density, self.momentum(), self.total_energy())
    }

    pub fn flux_vector(&self) -> Conserved {
        let u = self.to_conserved();
        let pg = self.pressure;
        let vn = self.velocity;
        Conserved(u.1, u.1 * vn + pg, vn * (u.2 + pg))
    }

    /// The mirror image of this state across a wall: same density and
    /// pressure, negated velocity.
    pub fn reflect(&self) -> Self {
        Self { velocity: -self.velocity, ..*self }
    }
}
