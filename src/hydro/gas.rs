//! Process-wide ideal-gas constants and the numerical floors applied when
//! recovering primitive variables.
//!
//! The specific heat ratio and gas constant are shared by every fluid state
//! in the process, rather than carried per state. They are stored as the bit
//! patterns of `f64` values in atomics, so they can be tuned from a
//! presentation thread while solvers run elsewhere. A change takes effect for
//! conversions performed after it; a step that is already in flight may see
//! either value.

use std::sync::atomic::{AtomicU64, Ordering};

/// Default ratio of specific heats (diatomic ideal gas).
pub const DEFAULT_SPECIFIC_HEAT_RATIO: f64 = 1.4;

/// Default specific gas constant of air, J / (kg K).
pub const DEFAULT_GAS_CONSTANT: f64 = 287.0;

/// Smallest density or pressure reported by a conversion from conservative
/// variables. Negative or zero results are raised to this value so the sound
/// speed stays defined.
pub const NUMERICAL_FLOOR: f64 = 1e-12;

static SPECIFIC_HEAT_RATIO: AtomicU64 = AtomicU64::new(0x3FF6_6666_6666_6666);
static GAS_CONSTANT: AtomicU64 = AtomicU64::new(0x4071_F000_0000_0000);

/// Return the process-wide ratio of specific heats, γ.
pub fn specific_heat_ratio() -> f64 {
    f64::from_bits(SPECIFIC_HEAT_RATIO.load(Ordering::Relaxed))
}

/// Set the process-wide ratio of specific heats, γ.
pub fn set_specific_heat_ratio(gamma_law_index: f64) {
    SPECIFIC_HEAT_RATIO.store(gamma_law_index.to_bits(), Ordering::Relaxed)
}

/// Return the process-wide specific gas constant, R.
pub fn gas_constant() -> f64 {
    f64::from_bits(GAS_CONSTANT.load(Ordering::Relaxed))
}

/// Set the process-wide specific gas constant, R.
pub fn set_gas_constant(gas_constant: f64) {
    GAS_CONSTANT.store(gas_constant.to_bits(), Ordering::Relaxed)
}
