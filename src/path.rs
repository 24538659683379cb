//! Mutable tour over grid cells, optimized for the two primitives the
//! reversal mixer runs millions of times: segment reversal at either endpoint
//! and whole-cycle rotation. A position index keeps target lookups O(1);
//! reversals pay only for the segment they touch.

use crate::grid::{are_adjacent, Cell};

/// An ordered tour of distinct cells on an n×n grid.
///
/// Consecutive entries are always 4-adjacent. The tour is a path while its
/// two endpoints are apart and becomes a cycle candidate once they are
/// adjacent (see [`TourPath::is_closed`]). The mixer keeps one covering all
/// n² cells; shorter tours are only used to exercise the move algebra.
#[derive(Debug, Clone)]
pub struct TourPath {
    n: usize,
    cells: Vec<Cell>,
    /// Position of each on-tour cell, indexed row-major.
    pos: Vec<usize>,
}

impl TourPath {
    /// Wraps an ordering of distinct cells on an `n`×`n` grid.
    pub fn new(n: usize, cells: Vec<Cell>) -> Self {
        assert!(!cells.is_empty() && cells.len() <= n * n);
        let mut pos = vec![0; n * n];
        for (i, &(r, c)) in cells.iter().enumerate() {
            pos[r * n + c] = i;
        }
        TourPath { n, cells, pos }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// First cell of the tour.
    pub fn head(&self) -> Cell {
        self.cells[0]
    }

    /// Last cell of the tour.
    pub fn tail(&self) -> Cell {
        self.cells[self.cells.len() - 1]
    }

    /// True once the endpoints are grid neighbors, i.e. adding the closing
    /// edge would turn the path into a cycle.
    pub fn is_closed(&self) -> bool {
        are_adjacent(self.head(), self.tail())
    }

    /// Position of an on-tour `cell` in the current ordering.
    pub fn position(&self, cell: Cell) -> usize {
        self.pos[cell.0 * self.n + cell.1]
    }

    /// The current ordering.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Consumes the tour, yielding the ordering.
    pub fn into_cells(self) -> Vec<Cell> {
        self.cells
    }

    fn reindex(&mut self, range: std::ops::Range<usize>) {
        for i in range {
            let (r, c) = self.cells[i];
            self.pos[r * self.n + c] = i;
        }
    }

    /// Reverses the prefix `cells[..k]`, so the old head moves next to
    /// `cells[k]` and `cells[k - 1]` becomes the new head. This realizes the
    /// backbite that removes edge `(cells[k-1], cells[k])` and adds edge
    /// `(head, cells[k])`.
    pub fn reverse_prefix(&mut self, k: usize) {
        assert!(k >= 2 && k < self.cells.len(), "prefix cut out of range");
        self.cells[..k].reverse();
        self.reindex(0..k);
    }

    /// Reverses the suffix `cells[k + 1..]`, so the old tail moves next to
    /// `cells[k]` and `cells[k + 1]` becomes the new tail. This realizes the
    /// backbite that removes edge `(cells[k], cells[k+1])` and adds edge
    /// `(tail, cells[k])`.
    pub fn reverse_suffix(&mut self, k: usize) {
        assert!(k + 2 < self.cells.len(), "suffix cut out of range");
        self.cells[k + 1..].reverse();
        let from = k + 1;
        self.reindex(from..self.cells.len());
    }

    /// Rotates a closed tour so the cut falls between `cells[cut]` and
    /// `cells[cut + 1]`: that edge opens and the two cells become the new
    /// tail and head. Only meaningful while [`TourPath::is_closed`] holds.
    pub fn rotate(&mut self, cut: usize) {
        assert!(self.is_closed(), "rotation requires adjacent endpoints");
        assert!(cut + 1 < self.cells.len(), "cut out of range");
        self.cells.rotate_left(cut + 1);
        self.reindex(0..self.cells.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_valid_path(tour: &TourPath) {
        for pair in tour.cells().windows(2) {
            assert!(are_adjacent(pair[0], pair[1]), "broken hop {:?}", pair);
        }
        for (i, &cell) in tour.cells().iter().enumerate() {
            assert_eq!(tour.position(cell), i);
        }
    }

    #[test]
    fn test_endpoints_and_lookup() {
        let tour = TourPath::new(
            3,
            vec![(0, 0), (0, 1), (0, 2), (1, 2), (1, 1), (1, 0), (2, 0), (2, 1), (2, 2)],
        );
        assert_eq!(tour.len(), 9);
        assert_eq!(tour.head(), (0, 0));
        assert_eq!(tour.tail(), (2, 2));
        assert!(!tour.is_closed());
        assert_eq!(tour.position((1, 1)), 4);
        assert_valid_path(&tour);
    }

    #[test]
    fn test_reverse_suffix() {
        // Tail (1,1) backbites its neighbor (0,1) at index 1: the suffix
        // after the target flips and the old tail lands next to it.
        let mut tour = TourPath::new(3, vec![(0, 0), (0, 1), (0, 2), (1, 2), (1, 1)]);
        tour.reverse_suffix(1);
        assert_eq!(tour.cells(), &[(0, 0), (0, 1), (1, 1), (1, 2), (0, 2)]);
        assert_eq!(tour.tail(), (0, 2));
        assert_valid_path(&tour);
    }

    #[test]
    fn test_reverse_prefix() {
        // Head (0,1) backbites its neighbor (1,1) at index 3: the prefix
        // before the target flips and the old head lands next to it.
        let mut tour = TourPath::new(3, vec![(0, 1), (0, 0), (1, 0), (1, 1), (1, 2)]);
        tour.reverse_prefix(3);
        assert_eq!(tour.cells(), &[(1, 0), (0, 0), (0, 1), (1, 1), (1, 2)]);
        assert_eq!(tour.head(), (1, 0));
        assert_valid_path(&tour);
    }

    #[test]
    fn test_rotate_moves_the_cut() {
        // Border ring of the 3x3 grid, 8 cells.
        let mut tour = TourPath::new(
            3,
            vec![(0, 0), (0, 1), (0, 2), (1, 2), (2, 2), (2, 1), (2, 0), (1, 0)],
        );
        assert!(tour.is_closed());
        tour.rotate(2);
        assert_eq!(
            tour.cells(),
            &[(1, 2), (2, 2), (2, 1), (2, 0), (1, 0), (0, 0), (0, 1), (0, 2)]
        );
        assert_eq!(tour.head(), (1, 2));
        assert_eq!(tour.tail(), (0, 2));
        assert!(tour.is_closed());
        assert_valid_path(&tour);
    }
}
