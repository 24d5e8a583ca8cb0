use thiserror::Error;
use crate::hydro;




/**
 * Errors raised by solver configuration, initial-condition editing, and
 * field reconstruction. Numerical degeneracies are not errors: they are
 * clamped where primitive variables are recovered.
 */
#[derive(Debug, Error)]
pub enum Error {
    #[error("not implemented: advance requires a {0} strategy to be set")]
    StrategyUnset(&'static str),

    #[error("not implemented: {0}")]
    NotImplemented(String),

    #[error("partition index {index} must lie strictly inside (0, {num_cells})")]
    PartitionOutOfRange { index: usize, num_cells: usize },

    #[error("payload array has {found} entries but the field has {expected} cells")]
    PayloadLength { expected: usize, found: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unphysical state in cell {cell}: {source}")]
    Physical { cell: usize, source: hydro::error::Error },

    #[error("background step worker disconnected before reporting completion")]
    WorkerDisconnected,
}

pub type Result<T> = std::result::Result<T, Error>;
