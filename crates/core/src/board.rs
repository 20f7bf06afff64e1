//! Board module - manages the settled cells
//!
//! The board is a 10x20 grid where each cell is either empty or occupied.
//! Uses a flat array so the grid is never reallocated.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19 (top to bottom)

use arrayvec::ArrayVec;

use crate::types::{BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

/// Row-major grid of occupied flags, the shape exported to renderers
pub type Grid = [[bool; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];

/// The game board - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [bool; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [false; BOARD_SIZE],
        }
    }

    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * (BOARD_WIDTH as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<bool> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, occupied: bool) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = occupied;
                true
            }
            None => false,
        }
    }

    /// Check if position is within bounds and empty
    pub fn is_valid(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(false))
    }

    /// Check if position is within bounds and occupied
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(true))
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= BOARD_HEIGHT as usize {
            return false;
        }
        let start = y * BOARD_WIDTH as usize;
        let end = start + BOARD_WIDTH as usize;
        self.cells[start..end].iter().all(|&cell| cell)
    }

    /// Clear all full rows and return the row indices that were cleared (sorted bottom to top).
    ///
    /// Rows above each cleared row shift down; the vacated top rows become empty.
    /// A board built with full rows already in it can clear more than four at once.
    pub fn clear_full_rows(&mut self) -> ArrayVec<usize, { BOARD_HEIGHT as usize }> {
        let mut cleared_rows = ArrayVec::new();
        let width = BOARD_WIDTH as usize;
        let mut write_y = BOARD_HEIGHT as usize;

        for read_y in (0..BOARD_HEIGHT as usize).rev() {
            if self.is_row_full(read_y) {
                cleared_rows.push(read_y);
            } else {
                write_y -= 1;
                if write_y != read_y {
                    let src_start = read_y * width;
                    let dst_start = write_y * width;
                    self.cells
                        .copy_within(src_start..src_start + width, dst_start);
                }
            }
        }

        for cell in &mut self.cells[..write_y * width] {
            *cell = false;
        }

        cleared_rows
    }

    /// Settle a piece onto the board at given position with given shape.
    /// Returns false (and leaves the board untouched) if any cell is out of bounds or occupied.
    pub fn lock_piece(&mut self, shape: &[(i8, i8)], x: i8, y: i8) -> bool {
        if !shape.iter().all(|&(dx, dy)| self.is_valid(x + dx, y + dy)) {
            return false;
        }

        for &(dx, dy) in shape {
            self.set(x + dx, y + dy, true);
        }

        true
    }

    /// Number of occupied cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell).count()
    }

    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    /// Copy the cells into a row-major grid
    pub fn write_grid(&self, out: &mut Grid) {
        let width = BOARD_WIDTH as usize;
        for (y, row) in out.iter_mut().enumerate() {
            row.copy_from_slice(&self.cells[y * width..(y + 1) * width]);
        }
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells = [false; BOARD_SIZE];
    }

    /// Fill a whole row except for the listed columns (test and bench helper)
    pub fn fill_row_except(&mut self, y: i8, holes: &[i8]) {
        for x in 0..BOARD_WIDTH as i8 {
            self.set(x, y, !holes.contains(&x));
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_index_calculation() {
        assert_eq!(Board::index(0, 0), Some(0));
        assert_eq!(Board::index(9, 0), Some(9));
        assert_eq!(Board::index(0, 1), Some(10));
        assert_eq!(Board::index(9, 19), Some(199));
        assert_eq!(Board::index(-1, 0), None);
        assert_eq!(Board::index(10, 0), None);
        assert_eq!(Board::index(0, 20), None);
    }

    #[test]
    fn test_board_flat_array() {
        let mut board = Board::new();

        board.set(0, 0, true);
        board.set(5, 10, true);

        assert_eq!(board.get(0, 0), Some(true));
        assert_eq!(board.get(5, 10), Some(true));

        assert!(board.cells[0]);
        assert!(board.cells[10 * 10 + 5]);
        assert_eq!(board.occupied_count(), 2);
    }

    #[test]
    fn test_write_grid_matches_cells() {
        let mut board = Board::new();
        board.set(3, 5, true);
        board.set(9, 19, true);

        let mut grid = [[false; 10]; 20];
        board.write_grid(&mut grid);

        assert!(grid[5][3]);
        assert!(grid[19][9]);
        assert_eq!(grid.iter().flatten().filter(|&&c| c).count(), 2);
    }

    #[test]
    fn test_lock_piece_rejects_overlap_without_mutation() {
        let mut board = Board::new();
        board.set(4, 1, true);

        let shape = [(0, 0), (1, 0), (0, 1), (1, 1)];
        assert!(!board.lock_piece(&shape, 3, 0));
        assert_eq!(board.occupied_count(), 1);

        assert!(board.lock_piece(&shape, 0, 0));
        assert_eq!(board.occupied_count(), 5);
    }

    #[test]
    fn test_clear_more_than_four_rows() {
        let mut board = Board::new();
        for y in 14..=18 {
            board.fill_row_except(y, &[]);
        }
        board.set(2, 13, true);

        let cleared = board.clear_full_rows();
        assert_eq!(cleared.as_slice(), &[18, 17, 16, 15, 14]);
        assert_eq!(board.occupied_count(), 1);
        assert_eq!(board.get(2, 18), Some(true));
    }
}
