//! The two-reservoir shock tube initial condition, and the snapshot trait
//! through which a solver can be seeded from any per-cell gas description.

use serde::{Deserialize, Serialize};
use crate::config::DEFAULT_NUM_CELLS;
use crate::error::{Error, Result};
use crate::hydro::euler::FluidState;




/**
 * A read-only per-cell gas description: one density, pressure, and velocity
 * per cell, ordered left to right. Implemented by the initial condition and
 * by every solver, so a new solver can start from either.
 */
pub trait GasProfile {
    fn num_cells(&self) -> usize;
    fn densities(&self) -> Vec<f64>;
    fn pressures(&self) -> Vec<f64>;
    fn velocities(&self) -> Vec<f64>;

    /// The primitive states, assembled from the three sequences.
    fn states(&self) -> Vec<FluidState> {
        let (d, p, u) = (self.densities(), self.pressures(), self.velocities());
        d.iter()
            .zip(&p)
            .zip(&u)
            .map(|((&d, &p), &u)| FluidState::new(d, u, p))
            .collect()
    }
}




/**
 * The gas in one reservoir, at rest.
 */
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reservoir {
    pub density: f64,
    pub pressure: f64,
}

impl Reservoir {
    pub fn new(density: f64, pressure: f64) -> Self {
        Self { density, pressure }
    }

    fn validate(&self, side: &str) -> Result<()> {
        if !(self.density > 0.0 && self.density.is_finite()) || !(self.pressure > 0.0 && self.pressure.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "{} reservoir needs positive density and pressure, got ({}, {})",
                side, self.density, self.pressure)));
        }
        Ok(())
    }

    fn scaled(self, factor: f64) -> Self {
        Self::new(self.density / factor, self.pressure / factor)
    }
}




/**
 * Two reservoirs separated by a partition. Cells [0, partition) hold the
 * left gas, cells [partition, N) the right gas. In ideal-gas mode, moving
 * the partition compresses or expands each side isothermally: density and
 * pressure scale inversely with the segment length.
 */
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PartitionedGas {
    num_cells: usize,
    partition: usize,
    left: Reservoir,
    right: Reservoir,
    ideal_gas: bool,
}




// ============================================================================
impl Default for PartitionedGas {
    fn default() -> Self {
        Self {
            num_cells: DEFAULT_NUM_CELLS,
            partition: DEFAULT_NUM_CELLS / 2,
            left: Reservoir::new(1.0, 1.0),
            right: Reservoir::new(0.125, 0.1),
            ideal_gas: true,
        }
    }
}

impl PartitionedGas {

    /**
     * Create a tube of `num_cells` cells with the partition at the midpoint.
     */
    pub fn new(num_cells: usize, left: Reservoir, right: Reservoir) -> Result<Self> {
        let gas = Self { num_cells, partition: num_cells / 2, left, right, ideal_gas: true };
        gas.validate()?;
        Ok(gas)
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_cells < 2 {
            return Err(Error::InvalidConfig(format!("a shock tube needs at least two cells, got {}", self.num_cells)));
        }
        if self.partition == 0 || self.partition >= self.num_cells {
            return Err(Error::PartitionOutOfRange { index: self.partition, num_cells: self.num_cells });
        }
        self.left.validate("left")?;
        self.right.validate("right")
    }

    pub fn partition_index(&self) -> usize {
        self.partition
    }

    /**
     * Move the partition. The index must lie strictly inside (0, N). In
     * ideal-gas mode the left state is divided by new / old and the right
     * state by (N - new) / (N - old); otherwise both are left unchanged.
     */
    pub fn set_partition_index(&mut self, index: usize) -> Result<()> {
        if index == 0 || index >= self.num_cells {
            return Err(Error::PartitionOutOfRange { index, num_cells: self.num_cells });
        }
        if self.ideal_gas {
            let n = self.num_cells as f64;
            let (old, new) = (self.partition as f64, index as f64);
            self.left = self.left.scaled(new / old);
            self.right = self.right.scaled((n - new) / (n - old));
        }
        self.partition = index;
        Ok(())
    }

    /// Change the number of cells. The partition returns to the midpoint
    /// and the reservoir states are kept as they are.
    pub fn set_num_cells(&mut self, num_cells: usize) -> Result<()> {
        if num_cells < 2 {
            return Err(Error::InvalidConfig(format!("a shock tube needs at least two cells, got {}", num_cells)));
        }
        self.num_cells = num_cells;
        self.partition = num_cells / 2;
        Ok(())
    }

    pub fn left(&self) -> Reservoir {
        self.left
    }

    pub fn right(&self) -> Reservoir {
        self.right
    }

    pub fn set_left(&mut self, left: Reservoir) -> Result<()> {
        left.validate("left")?;
        self.left = left;
        Ok(())
    }

    pub fn set_right(&mut self, right: Reservoir) -> Result<()> {
        right.validate("right")?;
        self.right = right;
        Ok(())
    }

    pub fn ideal_gas(&self) -> bool {
        self.ideal_gas
    }

    pub fn set_ideal_gas(&mut self, ideal_gas: bool) {
        self.ideal_gas = ideal_gas
    }

    fn repeat<F: Fn(&Reservoir) -> f64>(&self, f: F) -> Vec<f64> {
        (0..self.num_cells)
            .map(|i| if i < self.partition { f(&self.left) } else { f(&self.right) })
            .collect()
    }
}

impl GasProfile for PartitionedGas {
    fn num_cells(&self) -> usize {
        self.num_cells
    }

    fn densities(&self) -> Vec<f64> {
        self.repeat(|r| r.density)
    }

    fn pressures(&self) -> Vec<f64> {
        self.repeat(|r| r.pressure)
    }

    fn velocities(&self) -> Vec<f64> {
        vec![0.0; self.num_cells]
    }
}
