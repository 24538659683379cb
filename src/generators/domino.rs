//! Domino-overlay cycle construction. Two independent random domino tilings
//! of the grid are overlaid; since each tiling gives every cell exactly one
//! partner, the union is 2-regular, i.e. a set of disjoint loops covering
//! all cells. Perpendicular edge swaps inside 2×2 windows then fuse loops
//! pairwise until a single Hamiltonian cycle remains.

use std::collections::VecDeque;

use bitvec::prelude::*;
use log::{debug, warn};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::error::{Error, Result};
use crate::generators::{require_even, CycleGenerator};
use crate::grid::{Cell, Direction, Grid};
use crate::union_find::UnionFind;

/// Tiling randomization attempts per cell: each tiling receives `n² · 5`
/// random 2×2 flip tries before the overlay is formed.
const FLIP_FACTOR: usize = 5;
/// Full restarts allowed when the merge scan finds no joinable window.
const RESTART_CAP: usize = 10;

/// Hamiltonian cycles from overlaid random domino tilings.
///
/// The merge loop is deliberately conservative: every pass rescans all 2×2
/// windows for parallel same-axis overlay edges joining two different loops,
/// applies exactly one swap, and recounts. A pass with no candidates means
/// the overlay wedged itself into an unmergeable state; the whole
/// construction restarts with fresh tilings, up to [`RESTART_CAP`] times.
#[derive(Debug)]
pub struct DominoOverlay<R: Rng> {
    n: usize,
    rng: R,
}

impl DominoOverlay<ChaCha20Rng> {
    pub fn seeded(n: usize, seed: u64) -> Result<Self> {
        Self::new(n, ChaCha20Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> DominoOverlay<R> {
    pub fn new(n: usize, rng: R) -> Result<Self> {
        require_even(n)?;
        Ok(DominoOverlay { n, rng })
    }

    /// One full construction attempt. `Ok(None)` reports a merge deadlock.
    fn try_build(&mut self) -> Result<Option<Grid>> {
        let mut t1 = horizontal_tiling(self.n);
        let mut t2 = vertical_tiling(self.n);
        self.randomize_tiling(&mut t1);
        self.randomize_tiling(&mut t2);

        let mut overlay = Overlay::build(&t1, &t2)?;
        debug!("overlay starts with {} loops", overlay.components);

        while overlay.components > 1 {
            let candidates = overlay.merge_candidates();
            if candidates.is_empty() {
                warn!(
                    "no joinable window among {} remaining loops",
                    overlay.components
                );
                return Ok(None);
            }
            let (window, horizontal) = candidates[self.rng.gen_range(0..candidates.len())];
            overlay.apply_merge(window, horizontal)?;
            if overlay.components % 10 == 0 {
                debug!("{} loops remaining", overlay.components);
            }
        }

        overlay.into_grid().map(Some)
    }

    fn randomize_tiling(&mut self, tiling: &mut Grid) {
        let attempts = self.n * self.n * FLIP_FACTOR;
        for _ in 0..attempts {
            let r = self.rng.gen_range(0..self.n - 1);
            let c = self.rng.gen_range(0..self.n - 1);
            flip_window(tiling, r, c);
        }
    }
}

impl<R: Rng> CycleGenerator for DominoOverlay<R> {
    fn size(&self) -> usize {
        self.n
    }

    fn generate(&mut self) -> Result<Grid> {
        for attempt in 1..=RESTART_CAP {
            if let Some(grid) = self.try_build()? {
                return Ok(grid);
            }
            warn!("restarting with fresh tilings (attempt {})", attempt);
        }
        Err(Error::NonConvergence(format!(
            "merge search deadlocked {} times in a row",
            RESTART_CAP
        )))
    }
}

/// The trivial all-horizontal tiling: each cell paired with its row
/// neighbor, both halves pointing at each other.
fn horizontal_tiling(n: usize) -> Grid {
    let mut grid = Grid::new(n);
    for r in 0..n {
        for c in (0..n).step_by(2) {
            grid.set((r, c), Direction::Right);
            grid.set((r, c + 1), Direction::Left);
        }
    }
    grid
}

/// The trivial all-vertical tiling.
fn vertical_tiling(n: usize) -> Grid {
    let mut grid = Grid::new(n);
    for c in 0..n {
        for r in (0..n).step_by(2) {
            grid.set((r, c), Direction::Down);
            grid.set((r + 1, c), Direction::Up);
        }
    }
    grid
}

/// Rotates the dominoes in the 2×2 window at `(r, c)` when it holds exactly
/// two parallel dominoes; any other pattern is left alone.
fn flip_window(tiling: &mut Grid, r: usize, c: usize) {
    use Direction::*;
    let quad = [
        tiling.get((r, c)),
        tiling.get((r, c + 1)),
        tiling.get((r + 1, c)),
        tiling.get((r + 1, c + 1)),
    ];
    if quad == [Some(Right), Some(Left), Some(Right), Some(Left)] {
        tiling.set((r, c), Down);
        tiling.set((r + 1, c), Up);
        tiling.set((r, c + 1), Down);
        tiling.set((r + 1, c + 1), Up);
    } else if quad == [Some(Down), Some(Down), Some(Up), Some(Up)] {
        tiling.set((r, c), Right);
        tiling.set((r, c + 1), Left);
        tiling.set((r + 1, c), Right);
        tiling.set((r + 1, c + 1), Left);
    }
}

/// The 2-regular union of two tilings, with per-loop membership tracked in
/// a disjoint-set forest. A double edge (both tilings pairing the same two
/// cells) is legal and forms a 2-cycle.
struct Overlay {
    n: usize,
    adj: Vec<[Cell; 2]>,
    uf: UnionFind,
    components: usize,
}

impl Overlay {
    fn build(t1: &Grid, t2: &Grid) -> Result<Overlay> {
        let n = t1.size();
        let len = n * n;
        let mut adj = Vec::with_capacity(len);
        for r in 0..n {
            for c in 0..n {
                let partner = |t: &Grid| {
                    t.next_cell((r, c)).ok_or_else(|| {
                        Error::InvariantViolation(format!("tiling leaves {:?} unpaired", (r, c)))
                    })
                };
                adj.push([partner(t1)?, partner(t2)?]);
            }
        }

        // Count the loops and record which one each cell belongs to.
        let mut uf = UnionFind::new(len);
        let mut seen = bitvec![0; len];
        let mut components = 0;
        for start in 0..len {
            if seen[start] {
                continue;
            }
            components += 1;
            seen.set(start, true);
            let mut queue = VecDeque::from([start]);
            while let Some(cur) = queue.pop_front() {
                uf.union(start, cur);
                for &(nr, nc) in &adj[cur] {
                    let nb = nr * n + nc;
                    if !seen[nb] {
                        seen.set(nb, true);
                        queue.push_back(nb);
                    }
                }
            }
        }

        Ok(Overlay {
            n,
            adj,
            uf,
            components,
        })
    }

    fn id(&self, cell: Cell) -> usize {
        cell.0 * self.n + cell.1
    }

    fn has_edge(&self, a: Cell, b: Cell) -> bool {
        self.adj[self.id(a)].contains(&b)
    }

    /// All 2×2 windows whose top edge pair (horizontal case) or left edge
    /// pair (vertical case) exists in the overlay and joins two loops. The
    /// flag distinguishes the two patterns.
    fn merge_candidates(&mut self) -> Vec<(Cell, bool)> {
        let mut out = Vec::new();
        for r in 0..self.n - 1 {
            for c in 0..self.n - 1 {
                let tl = (r, c);
                let tr = (r, c + 1);
                let bl = (r + 1, c);
                let br = (r + 1, c + 1);
                if self.has_edge(tl, tr)
                    && self.has_edge(bl, br)
                    && !self.uf.connected(self.id(tl), self.id(bl))
                {
                    out.push((tl, true));
                }
                if self.has_edge(tl, bl)
                    && self.has_edge(tr, br)
                    && !self.uf.connected(self.id(tl), self.id(tr))
                {
                    out.push((tl, false));
                }
            }
        }
        out
    }

    /// Swaps the window's parallel edge pair for the perpendicular pair,
    /// fusing the two loops it touched.
    fn apply_merge(&mut self, window: Cell, horizontal: bool) -> Result<()> {
        let (r, c) = window;
        let tl = (r, c);
        let tr = (r, c + 1);
        let bl = (r + 1, c);
        let br = (r + 1, c + 1);

        let joined = if horizontal {
            // (tl-tr), (bl-br) become (tl-bl), (tr-br).
            self.replace(tl, tr, bl)?;
            self.replace(tr, tl, br)?;
            self.replace(bl, br, tl)?;
            self.replace(br, bl, tr)?;
            self.uf.union(self.id(tl), self.id(bl))
        } else {
            // (tl-bl), (tr-br) become (tl-tr), (bl-br).
            self.replace(tl, bl, tr)?;
            self.replace(bl, tl, br)?;
            self.replace(tr, br, tl)?;
            self.replace(br, tr, bl)?;
            self.uf.union(self.id(tl), self.id(tr))
        };
        if !joined {
            return Err(Error::InvariantViolation(format!(
                "swap at {:?} rejoined a single loop",
                window
            )));
        }
        self.components -= 1;
        Ok(())
    }

    /// Rewrites one slot of `at`'s pair list from `old` to `new`. Exactly
    /// one occurrence moves, which keeps double edges intact.
    fn replace(&mut self, at: Cell, old: Cell, new: Cell) -> Result<()> {
        let slots = &mut self.adj[at.0 * self.n + at.1];
        if slots[0] == old {
            slots[0] = new;
        } else if slots[1] == old {
            slots[1] = new;
        } else {
            return Err(Error::InvariantViolation(format!(
                "edge {:?}-{:?} missing from the overlay",
                at, old
            )));
        }
        Ok(())
    }

    /// Walks the single remaining loop from (0, 0) and renders it as
    /// direction codes, re-validating the Hamiltonian invariant on the way.
    fn into_grid(self) -> Result<Grid> {
        let len = self.n * self.n;
        let mut order = Vec::with_capacity(len);
        let mut cur = (0, 0);
        let mut next = self.adj[0][0];
        for _ in 0..len {
            order.push(cur);
            let slots = self.adj[next.0 * self.n + next.1];
            let follow = if slots[0] == cur { slots[1] } else { slots[0] };
            cur = next;
            next = follow;
        }
        Grid::from_cycle(self.n, &order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_perfect_matching(tiling: &Grid) {
        let n = tiling.size();
        for r in 0..n {
            for c in 0..n {
                let partner = tiling.next_cell((r, c)).unwrap();
                assert_eq!(tiling.next_cell(partner), Some((r, c)));
            }
        }
    }

    #[test]
    fn test_rejects_bad_sizes() {
        assert!(DominoOverlay::seeded(5, 1).is_err());
        assert!(DominoOverlay::seeded(0, 1).is_err());
        assert!(DominoOverlay::seeded(6, 1).is_ok());
    }

    #[test]
    fn test_flip_literal() {
        let mut tiling = horizontal_tiling(2);
        flip_window(&mut tiling, 0, 0);
        assert_eq!(tiling.codes(), vec![vec![4, 4], vec![2, 2]]);
        // Flipping again restores the starting pattern.
        flip_window(&mut tiling, 0, 0);
        assert_eq!(tiling.codes(), vec![vec![3, 1], vec![3, 1]]);
        // A mixed window is left alone.
        let mut mixed = horizontal_tiling(4);
        flip_window(&mut mixed, 0, 0);
        let before = mixed.clone();
        flip_window(&mut mixed, 0, 1);
        assert_eq!(mixed, before);
    }

    #[test]
    fn test_randomized_tilings_stay_perfect_matchings() {
        let mut builder = DominoOverlay::seeded(8, 3).unwrap();
        let mut t1 = horizontal_tiling(8);
        let mut t2 = vertical_tiling(8);
        builder.randomize_tiling(&mut t1);
        builder.randomize_tiling(&mut t2);
        assert_perfect_matching(&t1);
        assert_perfect_matching(&t2);
    }

    #[test]
    fn test_component_counting_and_single_merge() {
        // Hand-built overlay with exactly two 8-cell loops: the horizontal
        // tiling rings rows 0-1 and rows 2-3 when the second tiling pairs
        // the outer columns vertically and the inner columns horizontally.
        let t1 = horizontal_tiling(4);
        let mut t2 = Grid::new(4);
        for r in [0, 2] {
            t2.set((r, 0), Direction::Down);
            t2.set((r + 1, 0), Direction::Up);
            t2.set((r, 3), Direction::Down);
            t2.set((r + 1, 3), Direction::Up);
            t2.set((r, 1), Direction::Right);
            t2.set((r, 2), Direction::Left);
            t2.set((r + 1, 1), Direction::Right);
            t2.set((r + 1, 2), Direction::Left);
        }
        assert_perfect_matching(&t2);

        let mut overlay = Overlay::build(&t1, &t2).unwrap();
        assert_eq!(overlay.components, 2);

        // The window under (1, 0) holds two horizontal overlay edges, one
        // per loop.
        let candidates = overlay.merge_candidates();
        assert!(candidates.contains(&((1, 0), true)));

        overlay.apply_merge((1, 0), true).unwrap();
        assert_eq!(overlay.components, 1);

        let grid = overlay.into_grid().unwrap();
        assert_eq!(grid.trace((0, 0)).unwrap().len(), 16);
    }

    #[test]
    fn test_double_edges_form_two_cell_loops() {
        // Identical tilings double every edge: each domino becomes its own
        // 2-cell loop.
        let t = horizontal_tiling(4);
        let overlay = Overlay::build(&t, &t).unwrap();
        assert_eq!(overlay.components, 8);
    }

    #[test]
    fn test_produces_hamiltonian_cycles() {
        for n in [2, 4, 6, 8] {
            let grid = DominoOverlay::seeded(n, 15).unwrap().generate().unwrap();
            let order = grid.trace((0, 0)).unwrap();
            assert_eq!(order.len(), n * n);

            let mut incoming = vec![0usize; n * n];
            for r in 0..n {
                for c in 0..n {
                    let (nr, nc) = grid.next_cell((r, c)).unwrap();
                    incoming[nr * n + nc] += 1;
                }
            }
            assert!(incoming.iter().all(|&d| d == 1));
        }
    }

    #[test]
    fn test_equal_seeds_agree() {
        let a = DominoOverlay::seeded(8, 123).unwrap().generate().unwrap();
        let b = DominoOverlay::seeded(8, 123).unwrap().generate().unwrap();
        assert_eq!(a, b);
    }
}
