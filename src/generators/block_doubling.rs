//! Divide-and-conquer in reverse: seed the whole grid with 2×2 loops, then
//! repeatedly stitch 2×2 groups of same-size blocks into one block of twice
//! the side, until a single cycle spans the grid. Needs a power-of-two side
//! so the halving is exact at every level.

use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::error::{Error, Result};
use crate::generators::blocks::{seed_loops, Orientation};
use crate::generators::CycleGenerator;
use crate::grid::{Cell, Direction, Grid};

/// Recursive block-merging construction for power-of-two grids.
///
/// Per level, each group of four blocks picks three of its four adjacency
/// edges at random (any three span the group) and merges along them. A merge
/// scans the shared boundary for a spot where the two loops flow in opposite
/// directions and swaps that pair of edges across the boundary.
#[derive(Debug)]
pub struct BlockDoubling<R: Rng> {
    n: usize,
    rng: R,
}

impl BlockDoubling<ChaCha20Rng> {
    pub fn seeded(n: usize, seed: u64) -> Result<Self> {
        Self::new(n, ChaCha20Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> BlockDoubling<R> {
    pub fn new(n: usize, rng: R) -> Result<Self> {
        if n < 2 || !n.is_power_of_two() {
            return Err(Error::InvalidInput(format!(
                "grid side must be a power of two of at least 2, got {}",
                n
            )));
        }
        Ok(BlockDoubling { n, rng })
    }

    fn merge_level(&mut self, grid: &mut Grid, size: usize) {
        let step = size * 2;
        debug!("merging {0}x{0} blocks into {1}x{1}", size, step);
        for r in (0..self.n).step_by(step) {
            for c in (0..self.n).step_by(step) {
                // The four adjacency edges of the block group, each tagged
                // with the left/top block it starts from. Three of them make
                // a spanning tree of the group.
                let mut edges = [
                    (true, (r, c)),
                    (false, (r, c)),
                    (false, (r, c + size)),
                    (true, (r + size, c)),
                ];
                edges.shuffle(&mut self.rng);
                for &(horizontal, origin) in edges.iter().take(3) {
                    if horizontal {
                        self.merge_horizontal(grid, origin, size);
                    } else {
                        self.merge_vertical(grid, origin, size);
                    }
                }
            }
        }
    }

    /// Merges the block whose top-left cell is `origin` with the block to
    /// its right. Looks along the shared vertical boundary for a row pair
    /// where the left loop runs down while the right loop runs up (or the
    /// mirror image) and reroutes both across the boundary.
    fn merge_horizontal(&mut self, grid: &mut Grid, origin: Cell, size: usize) {
        let (r1, _) = origin;
        let x = origin.1 + size;
        let mut candidates = Vec::new();
        for i in r1..r1 + size - 1 {
            if grid.get((i, x - 1)) == Some(Direction::Down)
                && grid.get((i + 1, x)) == Some(Direction::Up)
            {
                candidates.push((i, true));
            } else if grid.get((i + 1, x - 1)) == Some(Direction::Up)
                && grid.get((i, x)) == Some(Direction::Down)
            {
                candidates.push((i, false));
            }
        }
        if candidates.is_empty() {
            warn!(
                "no swap spot on the boundary at column {}, rows {}..{}",
                x,
                r1,
                r1 + size
            );
            return;
        }
        let (i, left_runs_down) = candidates[self.rng.gen_range(0..candidates.len())];
        if left_runs_down {
            grid.set((i, x - 1), Direction::Right);
            grid.set((i + 1, x), Direction::Left);
        } else {
            grid.set((i + 1, x - 1), Direction::Right);
            grid.set((i, x), Direction::Left);
        }
    }

    /// Merges the block whose top-left cell is `origin` with the block below
    /// it, mirroring [`BlockDoubling::merge_horizontal`] across the diagonal.
    fn merge_vertical(&mut self, grid: &mut Grid, origin: Cell, size: usize) {
        let (_, c1) = origin;
        let y = origin.0 + size;
        let mut candidates = Vec::new();
        for j in c1..c1 + size - 1 {
            if grid.get((y - 1, j)) == Some(Direction::Right)
                && grid.get((y, j + 1)) == Some(Direction::Left)
            {
                candidates.push((j, true));
            } else if grid.get((y - 1, j + 1)) == Some(Direction::Left)
                && grid.get((y, j)) == Some(Direction::Right)
            {
                candidates.push((j, false));
            }
        }
        if candidates.is_empty() {
            warn!(
                "no swap spot on the boundary at row {}, columns {}..{}",
                y,
                c1,
                c1 + size
            );
            return;
        }
        let (j, top_runs_right) = candidates[self.rng.gen_range(0..candidates.len())];
        if top_runs_right {
            grid.set((y - 1, j), Direction::Down);
            grid.set((y, j + 1), Direction::Up);
        } else {
            grid.set((y - 1, j + 1), Direction::Down);
            grid.set((y, j), Direction::Up);
        }
    }
}

impl<R: Rng> CycleGenerator for BlockDoubling<R> {
    fn size(&self) -> usize {
        self.n
    }

    fn generate(&mut self) -> Result<Grid> {
        let mut grid = Grid::new(self.n);
        let orientation = Orientation::random(&mut self.rng);
        seed_loops(&mut grid, orientation);

        let mut size = 2;
        while size < self.n {
            self.merge_level(&mut grid, size);
            size *= 2;
        }

        grid.trace((0, 0))?;
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_sizes() {
        for n in [0, 1, 3, 6, 12] {
            assert!(BlockDoubling::seeded(n, 1).is_err(), "accepted {}", n);
        }
        for n in [2, 4, 8] {
            assert!(BlockDoubling::seeded(n, 1).is_ok(), "rejected {}", n);
        }
    }

    #[test]
    fn test_produces_hamiltonian_cycles() {
        for n in [2, 4, 8, 16, 32] {
            let grid = BlockDoubling::seeded(n, 11).unwrap().generate().unwrap();
            let order = grid.trace((0, 0)).unwrap();
            assert_eq!(order.len(), n * n);
        }
    }

    #[test]
    fn test_equal_seeds_agree() {
        let a = BlockDoubling::seeded(16, 4).unwrap().generate().unwrap();
        let b = BlockDoubling::seeded(16, 4).unwrap().generate().unwrap();
        assert_eq!(a, b);
    }
}
