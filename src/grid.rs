//! Grid data model shared by every construction strategy: per-cell direction
//! codes, 4-connected adjacency helpers, and Hamiltonian-cycle tracing.

use std::fmt;

use bitvec::prelude::*;

use crate::error::{Error, Result};

/// A grid coordinate as `(row, col)`, 0-indexed, row-major.
pub type Cell = (usize, usize);

/// Direction of travel from a cell to the next cell in the cycle.
///
/// The discriminants match the external numeric encoding consumed by
/// renderers: 1 = left, 2 = up, 3 = right, 4 = down, with 0 reserved for
/// "unset".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    Left = 1,
    Up = 2,
    Right = 3,
    Down = 4,
}

impl Direction {
    /// All four directions in code order.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Up,
        Direction::Right,
        Direction::Down,
    ];

    /// The numeric wire code for this direction.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Decodes a numeric wire code. Returns `None` for 0 (unset) and for
    /// anything above 4.
    pub fn from_code(code: u8) -> Option<Direction> {
        match code {
            1 => Some(Direction::Left),
            2 => Some(Direction::Up),
            3 => Some(Direction::Right),
            4 => Some(Direction::Down),
            _ => None,
        }
    }

    /// The reverse direction.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
        }
    }

    /// Row/column offset of one step in this direction.
    pub fn offset(self) -> (isize, isize) {
        match self {
            Direction::Left => (0, -1),
            Direction::Up => (-1, 0),
            Direction::Right => (0, 1),
            Direction::Down => (1, 0),
        }
    }
}

/// Returns the direction code leading from `from` to `to` if the two cells
/// are 4-adjacent, `None` otherwise.
pub fn direction_between(from: Cell, to: Cell) -> Option<Direction> {
    let (r, c) = from;
    let (nr, nc) = to;
    if nr == r && nc + 1 == c {
        Some(Direction::Left)
    } else if nr == r && nc == c + 1 {
        Some(Direction::Right)
    } else if nr + 1 == r && nc == c {
        Some(Direction::Up)
    } else if nr == r + 1 && nc == c {
        Some(Direction::Down)
    } else {
        None
    }
}

/// True when `a` and `b` are 4-adjacent (Manhattan distance exactly 1).
pub fn are_adjacent(a: Cell, b: Cell) -> bool {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1) == 1
}

/// In-bounds 4-neighbors of `cell` on an `n`×`n` grid, in up/down/left/right
/// order. Border cells get 2 or 3 neighbors, interior cells 4.
pub fn neighbors(n: usize, cell: Cell) -> Vec<Cell> {
    let (r, c) = cell;
    let mut out = Vec::with_capacity(4);
    if r > 0 {
        out.push((r - 1, c));
    }
    if r + 1 < n {
        out.push((r + 1, c));
    }
    if c > 0 {
        out.push((r, c - 1));
    }
    if c + 1 < n {
        out.push((r, c + 1));
    }
    out
}

/// An `n`×`n` lattice of direction codes, stored as a flat row-major arena.
///
/// A fully constructed grid encodes a Hamiltonian cycle: every cell holds the
/// direction of travel to the next cell, and following the codes for exactly
/// n² steps from any start visits every cell once and returns to the start.
/// During construction cells may be unset (`None`, wire code 0) or describe
/// several disjoint loops; [`Grid::trace`] is the arbiter of whether the
/// final invariant holds.
///
/// # Example
/// ```
/// use hamcycle::grid::Grid;
///
/// // The 2x2 clockwise loop.
/// let grid = Grid::from_cycle(2, &[(0, 0), (0, 1), (1, 1), (1, 0)]).unwrap();
/// assert_eq!(grid.codes(), vec![vec![3, 4], vec![2, 1]]);
///
/// // Tracing from any cell walks the same loop.
/// let order = grid.trace((1, 1)).unwrap();
/// assert_eq!(order, vec![(1, 1), (1, 0), (0, 0), (0, 1)]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    n: usize,
    cells: Vec<Option<Direction>>,
}

impl Grid {
    /// Creates an `n`×`n` grid with every cell unset.
    pub fn new(n: usize) -> Self {
        Grid {
            n,
            cells: vec![None; n * n],
        }
    }

    /// Side length of the grid.
    pub fn size(&self) -> usize {
        self.n
    }

    fn idx(&self, cell: Cell) -> usize {
        assert!(
            cell.0 < self.n && cell.1 < self.n,
            "cell {:?} outside {}x{} grid",
            cell,
            self.n,
            self.n
        );
        cell.0 * self.n + cell.1
    }

    /// The direction stored at `cell`, or `None` when unset.
    pub fn get(&self, cell: Cell) -> Option<Direction> {
        self.cells[self.idx(cell)]
    }

    /// Stores `dir` at `cell`, replacing any previous code.
    pub fn set(&mut self, cell: Cell, dir: Direction) {
        let i = self.idx(cell);
        self.cells[i] = Some(dir);
    }

    /// Follows the direction code at `cell` one step. Returns `None` when the
    /// cell is unset or the code points off the grid.
    pub fn next_cell(&self, cell: Cell) -> Option<Cell> {
        let (dr, dc) = self.get(cell)?.offset();
        let r = cell.0.checked_add_signed(dr)?;
        let c = cell.1.checked_add_signed(dc)?;
        (r < self.n && c < self.n).then_some((r, c))
    }

    /// Builds a grid from an ordered closed tour over all n² cells, writing
    /// the direction code of each consecutive hop (the last cell links back
    /// to the first). Fails with [`Error::InvariantViolation`] when the
    /// sequence is the wrong length, leaves the grid, repeats a cell, or
    /// contains a non-adjacent hop.
    pub fn from_cycle(n: usize, order: &[Cell]) -> Result<Grid> {
        let len = n * n;
        if order.len() != len {
            return Err(Error::InvariantViolation(format!(
                "cycle covers {} of {} cells",
                order.len(),
                len
            )));
        }
        let mut grid = Grid::new(n);
        let mut seen = bitvec![0; len];
        for (i, &cell) in order.iter().enumerate() {
            if cell.0 >= n || cell.1 >= n {
                return Err(Error::InvariantViolation(format!(
                    "cell {:?} outside {}x{} grid",
                    cell, n, n
                )));
            }
            let slot = cell.0 * n + cell.1;
            if seen[slot] {
                return Err(Error::InvariantViolation(format!(
                    "cell {:?} appears twice in the cycle",
                    cell
                )));
            }
            seen.set(slot, true);
            let next = order[(i + 1) % len];
            let dir = direction_between(cell, next).ok_or_else(|| {
                Error::InvariantViolation(format!(
                    "{:?} and {:?} are not grid neighbors",
                    cell, next
                ))
            })?;
            grid.set(cell, dir);
        }
        Ok(grid)
    }

    /// Follows direction codes from `start` for exactly n² steps and returns
    /// the visit order. Succeeds only when the codes form a single
    /// Hamiltonian cycle: every cell set, no cell revisited, and the walk
    /// closing back on `start`.
    pub fn trace(&self, start: Cell) -> Result<Vec<Cell>> {
        if start.0 >= self.n || start.1 >= self.n {
            return Err(Error::InvalidInput(format!(
                "start {:?} outside {}x{} grid",
                start, self.n, self.n
            )));
        }
        let len = self.n * self.n;
        let mut seen = bitvec![0; len];
        let mut order = Vec::with_capacity(len);
        let mut cur = start;
        for _ in 0..len {
            let slot = cur.0 * self.n + cur.1;
            if seen[slot] {
                return Err(Error::InvariantViolation(format!(
                    "walk revisits {:?} after {} of {} cells",
                    cur,
                    order.len(),
                    len
                )));
            }
            seen.set(slot, true);
            order.push(cur);
            cur = self.next_cell(cur).ok_or_else(|| {
                Error::InvariantViolation(format!("no usable direction at {:?}", cur))
            })?;
        }
        if cur != start {
            return Err(Error::InvariantViolation(format!(
                "walk from {:?} ends at {:?} instead of closing",
                start, cur
            )));
        }
        Ok(order)
    }

    /// The numeric code matrix in the external encoding: 0 for unset cells,
    /// 1..=4 for left/up/right/down.
    pub fn codes(&self) -> Vec<Vec<u8>> {
        (0..self.n)
            .map(|r| {
                (0..self.n)
                    .map(|c| self.cells[r * self.n + c].map_or(0, Direction::code))
                    .collect()
            })
            .collect()
    }
}

impl fmt::Display for Grid {
    /// One comma-terminated row of numeric codes per line, the plain-text
    /// format the downstream map tooling reads.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.n {
            for c in 0..self.n {
                let code = self.cells[r * self.n + c].map_or(0, Direction::code);
                write!(f, "{},", code)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
