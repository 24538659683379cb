//! 2×2 seed loops and the deterministic two-block splice shared by the
//! spanning-tree strategies. Coarse coordinates address the (n/2)×(n/2) grid
//! of blocks; fine coordinates address cells.

use rand::Rng;

use crate::grid::{are_adjacent, Cell, Direction, Grid};

/// Rotation sense of the seed loops. One choice applies to the whole grid
/// for a given run, which is what makes the merge rewrite below a fixed
/// two-cell lookup instead of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Clockwise,
    CounterClockwise,
}

impl Orientation {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        if rng.gen() {
            Orientation::CounterClockwise
        } else {
            Orientation::Clockwise
        }
    }
}

/// Fills every 2×2 block with an independent loop of the given orientation.
/// The grid side must be even.
pub fn seed_loops(grid: &mut Grid, orientation: Orientation) {
    let n = grid.size();
    for r in (0..n).step_by(2) {
        for c in (0..n).step_by(2) {
            match orientation {
                Orientation::Clockwise => {
                    grid.set((r, c), Direction::Right);
                    grid.set((r, c + 1), Direction::Down);
                    grid.set((r + 1, c + 1), Direction::Left);
                    grid.set((r + 1, c), Direction::Up);
                }
                Orientation::CounterClockwise => {
                    grid.set((r, c), Direction::Down);
                    grid.set((r + 1, c), Direction::Right);
                    grid.set((r + 1, c + 1), Direction::Up);
                    grid.set((r, c + 1), Direction::Left);
                }
            }
        }
    }
}

/// Splices the loops of two 4-adjacent coarse blocks into one by rewriting
/// the two boundary cells whose flow runs along the shared edge. Which pair
/// of cells that is follows from the orientation and the blocks' relative
/// position alone, so the argument order does not matter.
pub fn merge_blocks(grid: &mut Grid, orientation: Orientation, a: Cell, b: Cell) {
    debug_assert!(are_adjacent(a, b), "blocks {:?} and {:?} not adjacent", a, b);
    // Normalize to (left-or-top, right-or-bottom).
    let (first, second) = if b.0 < a.0 || b.1 < a.1 { (b, a) } else { (a, b) };
    let (fr, fc) = (first.0 * 2, first.1 * 2);
    let (sr, sc) = (second.0 * 2, second.1 * 2);
    let side_by_side = first.0 == second.0;
    match (side_by_side, orientation) {
        (true, Orientation::Clockwise) => {
            // Left block's NE corner stops turning down and crosses over;
            // right block's SW corner flows back.
            grid.set((fr, fc + 1), Direction::Right);
            grid.set((sr + 1, sc), Direction::Left);
        }
        (true, Orientation::CounterClockwise) => {
            grid.set((fr + 1, fc + 1), Direction::Right);
            grid.set((sr, sc), Direction::Left);
        }
        (false, Orientation::Clockwise) => {
            grid.set((fr + 1, fc + 1), Direction::Down);
            grid.set((sr, sc), Direction::Up);
        }
        (false, Orientation::CounterClockwise) => {
            grid.set((fr + 1, fc), Direction::Down);
            grid.set((sr, sc + 1), Direction::Up);
        }
    }
}
