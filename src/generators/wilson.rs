//! Uniform spanning-tree cycle construction (Wilson's algorithm). Identical
//! block seeding and splicing to the DFS variant, but the tree over the
//! half-resolution grid is sampled uniformly via loop-erased random walks,
//! so the induced cycle distribution inherits that uniformity at the block
//! level.

use std::collections::HashMap;

use bitvec::prelude::*;
use log::debug;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::error::{Error, Result};
use crate::generators::blocks::{merge_blocks, seed_loops, Orientation};
use crate::generators::{require_even, CycleGenerator};
use crate::grid::{neighbors, Cell, Grid};

/// Samples a uniform spanning tree of the m×m grid graph and returns its
/// edges as (cell, parent-ward successor) pairs, in the order the cells
/// joined the tree.
///
/// Each round starts a random walk from a uniformly drawn out-of-tree cell,
/// recording only the latest exit taken from every visited cell; revisiting
/// a cell therefore erases the loop walked since. Once the walk hits the
/// tree, retracing the surviving successor pointers yields a loop-free
/// branch.
fn wilson_tree<R: Rng>(m: usize, rng: &mut R) -> Result<Vec<(Cell, Cell)>> {
    let mut in_tree = bitvec![0; m * m];
    let root = (rng.gen_range(0..m), rng.gen_range(0..m));
    in_tree.set(root.0 * m + root.1, true);

    let mut edges = Vec::with_capacity(m * m - 1);
    let mut remaining = m * m - 1;
    let mut successor: HashMap<Cell, Cell> = HashMap::new();

    while remaining > 0 {
        let mut start = (rng.gen_range(0..m), rng.gen_range(0..m));
        while in_tree[start.0 * m + start.1] {
            start = (rng.gen_range(0..m), rng.gen_range(0..m));
        }

        successor.clear();
        let mut cur = start;
        while !in_tree[cur.0 * m + cur.1] {
            let nbs = neighbors(m, cur);
            let next = nbs[rng.gen_range(0..nbs.len())];
            successor.insert(cur, next);
            cur = next;
        }

        let mut cur = start;
        while !in_tree[cur.0 * m + cur.1] {
            in_tree.set(cur.0 * m + cur.1, true);
            remaining -= 1;
            let next = successor.get(&cur).copied().ok_or_else(|| {
                Error::InvariantViolation(format!("walk left no successor at {:?}", cur))
            })?;
            edges.push((cur, next));
            cur = next;
        }
    }
    Ok(edges)
}

/// Builds a Hamiltonian cycle by merging 2×2 seed loops along a uniform
/// spanning tree of the block grid.
#[derive(Debug)]
pub struct WilsonMerger<R: Rng> {
    n: usize,
    rng: R,
}

impl WilsonMerger<ChaCha20Rng> {
    pub fn seeded(n: usize, seed: u64) -> Result<Self> {
        Self::new(n, ChaCha20Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> WilsonMerger<R> {
    pub fn new(n: usize, rng: R) -> Result<Self> {
        require_even(n)?;
        Ok(WilsonMerger { n, rng })
    }
}

impl<R: Rng> CycleGenerator for WilsonMerger<R> {
    fn size(&self) -> usize {
        self.n
    }

    fn generate(&mut self) -> Result<Grid> {
        let mut grid = Grid::new(self.n);
        let orientation = Orientation::random(&mut self.rng);
        seed_loops(&mut grid, orientation);

        let edges = wilson_tree(self.n / 2, &mut self.rng)?;
        debug!("sampled a spanning tree with {} edges", edges.len());
        for (cell, next) in edges {
            merge_blocks(&mut grid, orientation, cell, next);
        }

        grid.trace((0, 0))?;
        Ok(grid)
    }
}
