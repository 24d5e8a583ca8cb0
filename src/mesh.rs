use std::ops::Index;
use std::sync::Arc;
use crate::error::{Error, Result};
use crate::hydro::euler::FluidState;
use crate::payload::{Modal, Payload};




/**
 * A cell of a one-dimensional mesh: its center coordinate, its width, and
 * the data it carries.
 */
#[derive(Clone, Copy, Debug)]
pub struct Cell<P> {
    pub x: f64,
    pub w: f64,
    pub payload: P,
}




/**
 * An ordered, left-to-right sequence of cells. A field is an immutable
 * value: the cells sit behind an `Arc`, so cloning a field is cheap and a
 * clone held by a reader is never disturbed by a solver publishing its
 * successor. Operations that change data build a new field.
 */
#[derive(Clone, Debug)]
pub struct Field<P> {
    cells: Arc<[Cell<P>]>,
}




// ============================================================================
impl<P> Cell<P> {

    pub fn left_edge(&self) -> f64 {
        self.x - 0.5 * self.w
    }

    pub fn right_edge(&self) -> f64 {
        self.x + 0.5 * self.w
    }

    /// Map a coordinate in this cell to the reference interval [-1, 1].
    pub fn reference_coordinate(&self, x: f64) -> f64 {
        (x - self.x) / (0.5 * self.w)
    }

    /// Map a reference coordinate to physical space.
    pub fn physical_coordinate(&self, xi: f64) -> f64 {
        self.x + 0.5 * self.w * xi
    }
}

impl<P: Payload> Cell<P> {
    pub fn state(&self) -> FluidState {
        self.payload.state()
    }
}

impl Cell<Modal> {

    /// The reconstructed state at a point of the cell, given in physical
    /// coordinates. The caller keeps `x` inside the cell.
    pub fn state_at_x(&self, x: f64) -> FluidState {
        self.payload.state_at(self.reference_coordinate(x))
    }

    /// The reconstructed state at a quadrature point ξ in [-1, 1].
    pub fn state_at(&self, xi: f64) -> FluidState {
        self.payload.state_at(xi)
    }

    pub fn left_face_state(&self) -> FluidState {
        self.payload.left_face_state()
    }

    pub fn right_face_state(&self) -> FluidState {
        self.payload.right_face_state()
    }
}




// ============================================================================
impl<P: Copy> Field<P> {

    /**
     * Generate a field of `num_cells` cells of width `dx`, starting at x = 0,
     * with payloads from a closure of the cell index and center.
     */
    pub fn uniform<F>(num_cells: usize, dx: f64, f: F) -> Self
    where
        F: Fn(usize, f64) -> P,
    {
        Self::from_widths(&vec![dx; num_cells], f)
    }

    /**
     * Generate a field with a per-cell width, starting at x = 0.
     */
    pub fn from_widths<F>(widths: &[f64], f: F) -> Self
    where
        F: Fn(usize, f64) -> P,
    {
        let mut left = 0.0;
        let cells: Vec<_> = widths
            .iter()
            .enumerate()
            .map(|(i, &w)| {
                let x = left + 0.5 * w;
                left += w;
                Cell { x, w, payload: f(i, x) }
            })
            .collect();
        Self { cells: cells.into() }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Cell<P>] {
        &self.cells
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cell<P>> + '_ {
        self.cells.iter()
    }

    pub fn first(&self) -> Option<&Cell<P>> {
        self.cells.first()
    }

    pub fn last(&self) -> Option<&Cell<P>> {
        self.cells.last()
    }

    /// Total extent of the field, the sum of the cell widths.
    pub fn extent(&self) -> f64 {
        self.cells.iter().map(|c| c.w).sum()
    }

    pub fn payloads(&self) -> Vec<P> {
        self.cells.iter().map(|c| c.payload).collect()
    }

    /**
     * Return a field with the same geometry and the given payloads, one per
     * cell in order.
     */
    pub fn with_payloads(&self, payloads: Vec<P>) -> Result<Self> {
        if payloads.len() != self.len() {
            return Err(Error::PayloadLength { expected: self.len(), found: payloads.len() });
        }
        Ok(self.zip_map(&payloads, |_, p| *p))
    }

    /**
     * Return a field with the same geometry and each payload replaced by a
     * function of the old cell.
     */
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(&Cell<P>) -> P,
    {
        let cells: Vec<_> = self.cells.iter().map(|c| Cell { payload: f(c), ..*c }).collect();
        Self { cells: cells.into() }
    }

    /// Build a new field by combining each cell with the corresponding
    /// entry of `other`. Entries beyond the shorter of the two are ignored.
    pub(crate) fn zip_map<T, F>(&self, other: &[T], f: F) -> Self
    where
        F: Fn(&Cell<P>, &T) -> P,
    {
        let cells: Vec<_> = self.cells.iter().zip(other).map(|(c, t)| Cell { payload: f(c, t), ..*c }).collect();
        Self { cells: cells.into() }
    }
}

impl<P: Payload> Field<P> {

    /**
     * Generate a field by projecting a function of position onto each cell.
     */
    pub fn project<F>(num_cells: usize, dx: f64, f: F) -> Self
    where
        F: Fn(f64) -> FluidState,
    {
        let field = Self::uniform(num_cells, dx, |_, _| P::default());
        field.map(|cell| P::project(|xi| f(cell.physical_coordinate(xi))))
    }

    pub fn states(&self) -> impl Iterator<Item = FluidState> + '_ {
        self.cells.iter().map(|c| c.state())
    }

    /// Total mass Σ ρ_i w_i.
    pub fn total_mass(&self) -> f64 {
        self.cells.iter().map(|c| c.payload.average().mass_density() * c.w).sum()
    }

    /// Total energy Σ (ρE)_i w_i.
    pub fn total_energy(&self) -> f64 {
        self.cells.iter().map(|c| c.payload.average().energy_density() * c.w).sum()
    }
}

impl<P> Index<usize> for Field<P> {
    type Output = Cell<P>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.cells[index]
    }
}
