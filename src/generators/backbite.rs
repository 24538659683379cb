//! Backbite (reversal-move) mixing of Hamiltonian cycles.
//!
//! The chain state is a Hamiltonian path over all cells. Each move picks one
//! path endpoint and one of its grid neighbors, then either rotates the whole
//! ring (the neighbor is the other endpoint), rejects (the neighbor already
//! follows the endpoint on the path), or reverses the segment between the
//! endpoint and the neighbor, handing the endpoint role to a new cell. Run
//! long enough, the walk forgets the deterministic snake it started from.

use log::debug;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::error::{Error, Result};
use crate::generators::{require_even, CycleGenerator, SnakeCycle};
use crate::grid::{neighbors, Cell, Grid};
use crate::path::TourPath;

/// Default mixing budget multiplier: `n³ · MIX_FACTOR` effective moves.
const MIX_FACTOR: usize = 10;
/// Closure-phase attempt cap multiplier: `n² · CLOSE_FACTOR` steps.
const CLOSE_FACTOR: usize = 1000;

/// What a single mixing step did to the tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// A segment was reversed and one endpoint moved.
    Reversed,
    /// The drawn neighbor was the other endpoint; the ring was rotated to a
    /// fresh cut instead of closing.
    Rotated,
    /// The drawn neighbor already follows the endpoint; nothing changed.
    Rejected,
}

/// MCMC sampler over Hamiltonian cycles of an n×n grid.
///
/// `generate` mixes for the configured budget and then steps until the tour
/// closes, so repeated calls keep extending the same chain. [`step`] is
/// public for callers that want to watch the walk move by move.
///
/// [`step`]: BackbiteMixer::step
#[derive(Debug)]
pub struct BackbiteMixer<R: Rng> {
    n: usize,
    iterations: usize,
    tour: TourPath,
    rng: R,
}

impl BackbiteMixer<ChaCha20Rng> {
    /// Deterministic mixer over a ChaCha20 stream.
    pub fn seeded(n: usize, seed: u64) -> Result<Self> {
        Self::new(n, ChaCha20Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> BackbiteMixer<R> {
    /// Creates a mixer seeded with the snake cycle. Requires even `n` ≥ 2.
    pub fn new(n: usize, rng: R) -> Result<Self> {
        require_even(n)?;
        let seed = SnakeCycle::new(n)?.order();
        Ok(BackbiteMixer {
            n,
            iterations: n * n * n * MIX_FACTOR,
            tour: TourPath::new(n, seed),
            rng,
        })
    }

    /// Overrides the default mixing budget of `n³ · 10` effective moves.
    /// Rejected attempts never count against the budget.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// True while the tour endpoints are grid-adjacent.
    pub fn is_closed(&self) -> bool {
        self.tour.is_closed()
    }

    /// The current tour order, head first.
    pub fn path(&self) -> &[Cell] {
        self.tour.cells()
    }

    /// Performs one backbite attempt and reports what happened.
    pub fn step(&mut self) -> Result<StepOutcome> {
        let at_head = self.rng.gen_bool(0.5);
        let (active, other) = if at_head {
            (self.tour.head(), self.tour.tail())
        } else {
            (self.tour.tail(), self.tour.head())
        };

        let nbs = neighbors(self.n, active);
        let target = nbs[self.rng.gen_range(0..nbs.len())];

        if target == other {
            // The closing edge came up; rotate to a random cut so the chain
            // keeps moving instead of freezing on one cycle.
            let cut = self.rng.gen_range(0..self.tour.len() - 1);
            self.tour.rotate(cut);
            return Ok(StepOutcome::Rotated);
        }

        let k = self.tour.position(target);
        if self.tour.cells()[k] != target {
            return Err(Error::InvariantViolation(format!(
                "tour position index is stale for {:?}",
                target
            )));
        }
        let len = self.tour.len();
        if (at_head && k == 1) || (!at_head && k == len - 2) {
            // Already the endpoint's path successor; the move would rebuild
            // the edge it removes.
            return Ok(StepOutcome::Rejected);
        }

        if at_head {
            self.tour.reverse_prefix(k);
        } else {
            self.tour.reverse_suffix(k);
        }
        Ok(StepOutcome::Reversed)
    }
}

impl<R: Rng> CycleGenerator for BackbiteMixer<R> {
    fn size(&self) -> usize {
        self.n
    }

    fn generate(&mut self) -> Result<Grid> {
        let mut moves = 0;
        while moves < self.iterations {
            match self.step()? {
                StepOutcome::Rejected => {}
                _ => moves += 1,
            }
        }

        // Mixing rarely parks the endpoints next to each other, so walk on
        // until they are. Case A cannot fire here: an open tour's endpoints
        // are not adjacent, so the closing edge is never drawn.
        let cap = CLOSE_FACTOR * self.n * self.n;
        let mut attempts = 0;
        while !self.tour.is_closed() {
            if attempts == cap {
                return Err(Error::NonConvergence(format!(
                    "endpoints still apart after {} closure attempts",
                    cap
                )));
            }
            self.step()?;
            attempts += 1;
        }
        debug!("tour closed after {} post-mix attempts", attempts);

        Grid::from_cycle(self.n, self.tour.cells())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::are_adjacent;

    #[test]
    fn test_rejects_bad_sizes() {
        assert!(BackbiteMixer::seeded(3, 1).is_err());
        assert!(BackbiteMixer::seeded(0, 1).is_err());
        assert!(BackbiteMixer::seeded(4, 1).is_ok());
    }

    #[test]
    fn test_zero_budget_returns_the_seed_cycle() {
        // The snake seed is already closed, so with no mixing the output is
        // the snake cycle itself.
        let grid = BackbiteMixer::seeded(4, 9)
            .unwrap()
            .with_iterations(0)
            .generate()
            .unwrap();
        let snake = SnakeCycle::new(4).unwrap().generate().unwrap();
        assert_eq!(grid, snake);
    }

    #[test]
    fn test_step_preserves_the_tour() {
        let mut mixer = BackbiteMixer::seeded(4, 7).unwrap();
        let mut reversals = 0;
        for _ in 0..300 {
            if mixer.step().unwrap() == StepOutcome::Reversed {
                reversals += 1;
            }
            let cells = mixer.path();
            assert_eq!(cells.len(), 16);
            for pair in cells.windows(2) {
                assert!(are_adjacent(pair[0], pair[1]));
            }
        }
        assert!(reversals > 0);
    }

    #[test]
    fn test_mixes_into_hamiltonian_cycles() {
        for n in [4, 6, 8] {
            let grid = BackbiteMixer::seeded(n, 42).unwrap().generate().unwrap();
            let order = grid.trace((0, 0)).unwrap();
            assert_eq!(order.len(), n * n);
        }
    }

    #[test]
    fn test_equal_seeds_agree() {
        let a = BackbiteMixer::seeded(8, 1234).unwrap().generate().unwrap();
        let b = BackbiteMixer::seeded(8, 1234).unwrap().generate().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_generate_continues_the_chain() {
        let mut mixer = BackbiteMixer::seeded(6, 5).unwrap().with_iterations(500);
        let first = mixer.generate().unwrap();
        let second = mixer.generate().unwrap();
        assert!(first.trace((0, 0)).is_ok());
        assert!(second.trace((0, 0)).is_ok());
    }
}
