//! Spanning-tree cycle construction: 2×2 seed loops glued together along a
//! randomized depth-first spanning tree of the half-resolution block grid.

use bitvec::prelude::*;
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::error::Result;
use crate::generators::blocks::{merge_blocks, seed_loops, Orientation};
use crate::generators::{require_even, CycleGenerator};
use crate::grid::{neighbors, Grid};

/// Builds a Hamiltonian cycle by merging seed loops along a DFS tree. The
/// tree is randomized by shuffling the neighbor order at every step, which
/// biases toward long corridors (unlike [`WilsonMerger`], which is uniform
/// over spanning trees).
///
/// [`WilsonMerger`]: crate::generators::WilsonMerger
#[derive(Debug)]
pub struct DfsTreeMerger<R: Rng> {
    n: usize,
    rng: R,
}

impl DfsTreeMerger<ChaCha20Rng> {
    pub fn seeded(n: usize, seed: u64) -> Result<Self> {
        Self::new(n, ChaCha20Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> DfsTreeMerger<R> {
    pub fn new(n: usize, rng: R) -> Result<Self> {
        require_even(n)?;
        Ok(DfsTreeMerger { n, rng })
    }
}

impl<R: Rng> CycleGenerator for DfsTreeMerger<R> {
    fn size(&self) -> usize {
        self.n
    }

    fn generate(&mut self) -> Result<Grid> {
        let mut grid = Grid::new(self.n);
        let orientation = Orientation::random(&mut self.rng);
        seed_loops(&mut grid, orientation);

        let m = self.n / 2;
        let mut visited = bitvec![0; m * m];
        visited.set(0, true);
        let mut stack = vec![(0, 0)];
        let mut merges = 0;

        while let Some(&cur) = stack.last() {
            let mut nbs = neighbors(m, cur);
            nbs.shuffle(&mut self.rng);
            let next = nbs.into_iter().find(|nb| !visited[nb.0 * m + nb.1]);
            match next {
                Some(nb) => {
                    visited.set(nb.0 * m + nb.1, true);
                    merge_blocks(&mut grid, orientation, cur, nb);
                    merges += 1;
                    stack.push(nb);
                }
                None => {
                    stack.pop();
                }
            }
        }
        debug!("merged {} block pairs along the dfs tree", merges);

        grid.trace((0, 0))?;
        Ok(grid)
    }
}
