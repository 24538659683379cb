//! Hamiltonian cycle construction strategies.
//!
//! Five independent strategies over the shared [`Grid`](crate::grid::Grid)
//! model, all producing the same artifact: a grid of direction codes tracing
//! one closed tour over every cell.
//! - [`SnakeCycle`]: deterministic boustrophedon loop, the seed for
//!   mutation-based mixing
//! - [`BackbiteMixer`]: Markov-chain mixing via endpoint reversal moves
//! - [`DominoOverlay`]: two random domino tilings overlaid into disjoint
//!   loops, merged with 2×2 edge swaps
//! - [`BlockDoubling`]: 2×2 seed loops merged pairwise, doubling block size
//!   per level (power-of-two grids)
//! - [`DfsTreeMerger`] / [`WilsonMerger`]: seed loops glued along a random
//!   spanning tree of the half-resolution grid

use crate::error::{Error, Result};
use crate::grid::Grid;

/// Common surface of the construction strategies.
pub trait CycleGenerator {
    /// Side length of the grid this generator builds.
    fn size(&self) -> usize;

    /// Runs the construction to completion, returning a grid whose codes
    /// trace a single Hamiltonian cycle.
    fn generate(&mut self) -> Result<Grid>;
}

/// Grid graphs only carry Hamiltonian cycles when the cell count is even, so
/// every strategy insists on an even side of at least 2.
pub(crate) fn require_even(n: usize) -> Result<()> {
    if n < 2 || n % 2 != 0 {
        return Err(Error::InvalidInput(format!(
            "grid side must be even and at least 2, got {}",
            n
        )));
    }
    Ok(())
}

mod blocks;

pub mod backbite;
pub mod block_doubling;
pub mod dfs_tree;
pub mod domino;
pub mod snake;
pub mod wilson;

pub use backbite::{BackbiteMixer, StepOutcome};
pub use block_doubling::BlockDoubling;
pub use dfs_tree::DfsTreeMerger;
pub use domino::DominoOverlay;
pub use snake::SnakeCycle;
pub use wilson::WilsonMerger;
