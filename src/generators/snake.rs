//! Deterministic boustrophedon ("lawnmower") Hamiltonian cycle. The least
//! interesting cycle on the grid, but every mutation-based strategy needs a
//! valid one to start from.

use crate::error::Result;
use crate::generators::{require_even, CycleGenerator};
use crate::grid::{Cell, Grid};

/// Builds the closed snake tour: the top row left to right, the remaining
/// rows sweeping back and forth inside columns `1..n`, and column 0 climbing
/// back up to the start.
///
/// # Example
/// ```
/// use hamcycle::generators::{CycleGenerator, SnakeCycle};
///
/// let grid = SnakeCycle::new(4).unwrap().generate().unwrap();
/// assert_eq!(grid.trace((0, 0)).unwrap().len(), 16);
/// ```
#[derive(Debug, Clone)]
pub struct SnakeCycle {
    n: usize,
}

impl SnakeCycle {
    pub fn new(n: usize) -> Result<Self> {
        require_even(n)?;
        Ok(SnakeCycle { n })
    }

    /// The cycle's cell order, starting from (0, 0).
    pub fn order(&self) -> Vec<Cell> {
        let n = self.n;
        let mut order = Vec::with_capacity(n * n);
        for c in 0..n {
            order.push((0, c));
        }
        for r in 1..n {
            if r % 2 == 1 {
                for c in (1..n).rev() {
                    order.push((r, c));
                }
            } else {
                for c in 1..n {
                    order.push((r, c));
                }
            }
        }
        for r in (1..n).rev() {
            order.push((r, 0));
        }
        order
    }
}

impl CycleGenerator for SnakeCycle {
    fn size(&self) -> usize {
        self.n
    }

    fn generate(&mut self) -> Result<Grid> {
        Grid::from_cycle(self.n, &self.order())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_sizes() {
        assert!(SnakeCycle::new(0).is_err());
        assert!(SnakeCycle::new(1).is_err());
        assert!(SnakeCycle::new(5).is_err());
        assert!(SnakeCycle::new(2).is_ok());
    }

    #[test]
    fn test_two_by_two() {
        let grid = SnakeCycle::new(2).unwrap().generate().unwrap();
        assert_eq!(grid.codes(), vec![vec![3, 4], vec![2, 1]]);
    }

    #[test]
    fn test_four_by_four_literal() {
        let mut snake = SnakeCycle::new(4).unwrap();
        assert_eq!(
            snake.order(),
            vec![
                (0, 0),
                (0, 1),
                (0, 2),
                (0, 3),
                (1, 3),
                (1, 2),
                (1, 1),
                (2, 1),
                (2, 2),
                (2, 3),
                (3, 3),
                (3, 2),
                (3, 1),
                (3, 0),
                (2, 0),
                (1, 0),
            ]
        );
        let grid = snake.generate().unwrap();
        assert_eq!(
            grid.codes(),
            vec![
                vec![3, 3, 3, 4],
                vec![2, 4, 1, 1],
                vec![2, 3, 3, 4],
                vec![2, 1, 1, 1],
            ]
        );
    }

    #[test]
    fn test_hamiltonian_and_degree_invariants() {
        for n in [2, 4, 8, 16] {
            let grid = SnakeCycle::new(n).unwrap().generate().unwrap();
            let order = grid.trace((0, 0)).unwrap();
            assert_eq!(order.len(), n * n);

            // Every cell is entered exactly once.
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
}
