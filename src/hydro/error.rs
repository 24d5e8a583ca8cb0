use thiserror::Error;

/**
 * Error to represent invalid hydrodynamics data found by strict primitive
 * variable recovery. The default recovery clamps these cases instead.
 */
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum Error {
    #[error("negative gas pressure: {0}")]
    NegativeGasPressure(f64),

    #[error("negative mass density: {0}")]
    NegativeMassDensity(f64),
}
