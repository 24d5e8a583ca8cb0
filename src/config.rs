//! Strategy selectors and the per-solver run configuration.

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::error::{Error, Result};




pub const DEFAULT_NUM_CELLS: usize = 100;
pub const DEFAULT_CFL: f64 = 0.3;
pub const DEFAULT_DT: f64 = 0.001;
pub const DEFAULT_DX: f64 = 0.01;




/// Interface flux (approximate Riemann solver) selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FluxScheme {
    LaxFriedrichs,
    Hll,
    Hllc,
    Roe,
}

/// Spatial residual selector. Each scheme implies a payload kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpatialScheme {
    Godunov,
    DiscontinuousGalerkin,
}

/// Explicit time integrator selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeScheme {
    Euler,
    Rk3,
}




/**
 * Everything a solver needs besides its initial data.
 */
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    pub flux: FluxScheme,
    pub spatial: SpatialScheme,
    pub time: TimeScheme,
    pub cfl: f64,
    pub dt: f64,
    pub dx: f64,
}




// ============================================================================
impl FluxScheme {
    pub const ALL: [FluxScheme; 4] = [Self::LaxFriedrichs, Self::Hll, Self::Hllc, Self::Roe];

    pub fn name(&self) -> &'static str {
        match self {
            Self::LaxFriedrichs => "lax-friedrichs",
            Self::Hll => "hll",
            Self::Hllc => "hllc",
            Self::Roe => "roe",
        }
    }
}

impl SpatialScheme {
    pub const ALL: [SpatialScheme; 2] = [Self::Godunov, Self::DiscontinuousGalerkin];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Godunov => "godunov",
            Self::DiscontinuousGalerkin => "dg",
        }
    }
}

impl TimeScheme {
    pub const ALL: [TimeScheme; 2] = [Self::Euler, Self::Rk3];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Euler => "euler",
            Self::Rk3 => "rk3",
        }
    }
}

macro_rules! selector_text {
    ($selector:ident, $what:literal) => {
        impl fmt::Display for $selector {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.name())
            }
        }

        impl FromStr for $selector {
            type Err = Error;
            fn from_str(s: &str) -> Result<Self> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.name() == s)
                    .ok_or_else(|| Error::InvalidConfig(format!("unknown {} '{}'", $what, s)))
            }
        }
    };
}

selector_text!(FluxScheme, "flux scheme");
selector_text!(SpatialScheme, "spatial scheme");
selector_text!(TimeScheme, "time scheme");




// ============================================================================
impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            flux: FluxScheme::Hllc,
            spatial: SpatialScheme::Godunov,
            time: TimeScheme::Rk3,
            cfl: DEFAULT_CFL,
            dt: DEFAULT_DT,
            dx: DEFAULT_DX,
        }
    }
}

impl SolverConfig {

    pub fn new(spatial: SpatialScheme, flux: FluxScheme, time: TimeScheme) -> Self {
        Self { flux, spatial, time, ..Self::default() }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("cfl", self.cfl), ("dt", self.dt), ("dx", self.dx)].iter() {
            if !(*value > 0.0 && value.is_finite()) {
                return Err(Error::InvalidConfig(format!("{} must be positive, got {}", name, value)));
            }
        }
        Ok(())
    }

    /// A short label naming the three strategies, e.g. `godunov:hllc:rk3`.
    pub fn label(&self) -> String {
        format!("{}:{}:{}", self.spatial, self.flux, self.time)
    }
}

impl FromStr for SolverConfig {
    type Err = Error;

    /**
     * Parse a `spatial:flux:time` triple, keeping the default numbers.
     */
    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<_> = s.split(':').collect();
        match parts.as_slice() {
            [spatial, flux, time] => Ok(Self::new(spatial.parse()?, flux.parse()?, time.parse()?)),
            _ => Err(Error::InvalidConfig(format!("expected spatial:flux:time, got '{}'", s))),
        }
    }
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn selectors_parse_their_own_names() {
        for flux in FluxScheme::ALL.iter() {
            assert_eq!(flux.name().parse::<FluxScheme>().unwrap(), *flux);
        }
        assert_eq!("dg".parse::<SpatialScheme>().unwrap(), SpatialScheme::DiscontinuousGalerkin);
        assert!("rk4".parse::<TimeScheme>().is_err());
    }

    #[test]
    fn scheme_triple_parses() {
        let config: SolverConfig = "dg:roe:euler".parse().unwrap();
        assert_eq!(config.spatial, SpatialScheme::DiscontinuousGalerkin);
        assert_eq!(config.flux, FluxScheme::Roe);
        assert_eq!(config.time, TimeScheme::Euler);
        assert_eq!(config.label(), "dg:roe:euler");
        assert!("godunov:hllc".parse::<SolverConfig>().is_err());
    }

    #[test]
    fn non_positive_numbers_are_rejected() {
        let config = SolverConfig { cfl: 0.0, ..SolverConfig::default() };
        assert!(config.validate().is_err());
        assert!(SolverConfig::default().validate().is_ok());
    }

    #[test]
    fn config_survives_cbor_encoding() {
        let config = SolverConfig::new(SpatialScheme::DiscontinuousGalerkin, FluxScheme::Hll, TimeScheme::Rk3);
        let mut bytes = Vec::new();
        ciborium::ser::into_writer(&config, &mut bytes).unwrap();
        let back: SolverConfig = ciborium::de::from_reader(&bytes[..]).unwrap();
        assert_eq!(back, config);
    }
}
