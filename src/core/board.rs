//! Board module - manages the game grid
//!
//! The board is a 10x20 grid where each cell can be empty or filled with a
//! piece kind (the kind doubles as the opaque color token). Uses a flat array
//! for cache locality and zero-allocation row operations.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19
//! (top to bottom).

use crate::core::pieces::{occupied_cells, Shape};
use crate::types::{Cell, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH * BOARD_HEIGHT) as usize;

/// The game board - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    /// Calculate flat index from (x, y) coordinates
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

    /// Get cell at position (x, y). Returns None if out of bounds.
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y). Returns false if out of bounds.
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if a single position is within bounds and empty
    pub fn is_free(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(None))
    }

    /// Check if a position is within bounds and filled
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Check that every occupied cell of `shape`, translated to (x, y), lies
    /// inside the board and over an empty cell.
    ///
    /// This is the single source of truth for collision: movement, rotation,
    /// hard drops and oracle-move validation all route through it.
    pub fn is_valid_placement(&self, shape: Shape, x: i8, y: i8) -> bool {
        occupied_cells(shape)
            .iter()
            .all(|&(dx, dy)| self.is_free(x + dx, y + dy))
    }

    /// Stamp every occupied cell of `shape` onto the board at (x, y).
    /// The caller guarantees the placement is valid.
    pub fn lock(&mut self, shape: Shape, x: i8, y: i8, kind: PieceKind) {
        for &(dx, dy) in &occupied_cells(shape) {
            self.set(x + dx, y + dy, Some(kind));
        }
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= BOARD_HEIGHT as usize {
            return false;
        }
        let start = y * BOARD_WIDTH as usize;
        let end = start + BOARD_WIDTH as usize;
        self.cells[start..end].iter().all(|cell| cell.is_some())
    }

    /// Remove every full row, keeping the relative order of the survivors,
    /// and re-pad with empty rows at the top. Returns the number of rows
    /// removed (0-4 per lock, since no piece is taller than 4).
    ///
    /// Uses a bottom-to-top two-pointer scan with zero allocation.
    pub fn clear_full_rows(&mut self) -> usize {
        let width = BOARD_WIDTH as usize;
        let mut cleared = 0;
        let mut write_y = BOARD_HEIGHT as usize;

        for read_y in (0..BOARD_HEIGHT as usize).rev() {
            if self.is_row_full(read_y) {
                cleared += 1;
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

        // Pad the vacated rows at the top back to empty.
        for cell in &mut self.cells[..write_y * width] {
            *cell = None;
        }

        cleared
    }

    /// Occupancy grid as 0/1 rows, the form the oracle protocol sends.
    pub fn to_bit_grid(&self) -> Vec<Vec<u8>> {
        let width = BOARD_WIDTH as usize;
        (0..BOARD_HEIGHT as usize)
            .map(|y| {
                self.cells[y * width..(y + 1) * width]
                    .iter()
                    .map(|cell| u8::from(cell.is_some()))
                    .collect()
            })
            .collect()
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Fill an entire row with one kind (test setup helper)
    #[cfg(test)]
    pub fn fill_row(&mut self, y: i8, kind: PieceKind) {
        for x in 0..BOARD_WIDTH as i8 {
            self.set(x, y, Some(kind));
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
    fn test_get_set_roundtrip() {
        let mut board = Board::new();
        board.set(0, 0, Some(PieceKind::I));
        board.set(5, 10, Some(PieceKind::T));

        assert_eq!(board.get(0, 0), Some(Some(PieceKind::I)));
        assert_eq!(board.get(5, 10), Some(Some(PieceKind::T)));
        assert_eq!(board.get(4, 10), Some(None));
        assert_eq!(board.get(10, 0), None);
    }

    #[test]
    fn test_clear_single_full_row_pads_top() {
        let mut board = Board::new();
        board.fill_row(19, PieceKind::I);
        board.set(3, 18, Some(PieceKind::O));

        assert_eq!(board.clear_full_rows(), 1);
        // The partial row above slid down one; the top row is empty again.
        assert_eq!(board.get(3, 19), Some(Some(PieceKind::O)));
        assert!((0..10).all(|x| board.get(x, 0) == Some(None)));
    }

    #[test]
    fn test_clear_preserves_relative_order() {
        let mut board = Board::new();
        board.set(0, 16, Some(PieceKind::S));
        board.fill_row(17, PieceKind::I);
        board.set(0, 18, Some(PieceKind::Z));
        board.fill_row(19, PieceKind::I);

        assert_eq!(board.clear_full_rows(), 2);
        assert_eq!(board.get(0, 18), Some(Some(PieceKind::S)));
        assert_eq!(board.get(0, 19), Some(Some(PieceKind::Z)));
    }

    #[test]
    fn test_clear_four_rows() {
        let mut board = Board::new();
        for y in 16..20 {
            board.fill_row(y, PieceKind::I);
        }
        assert_eq!(board.clear_full_rows(), 4);
        assert!(board.cells().iter().all(|cell| cell.is_none()));
    }

    #[test]
    fn test_lock_stamps_shape() {
        use crate::core::pieces::rotation_states;
        use crate::types::PieceKind;

        let mut board = Board::new();
        let shape = rotation_states(PieceKind::O)[0];
        board.lock(shape, 4, 18, PieceKind::O);

        assert!(board.is_occupied(4, 18));
        assert!(board.is_occupied(5, 18));
        assert!(board.is_occupied(4, 19));
        assert!(board.is_occupied(5, 19));
        assert!(board.is_free(3, 18));
    }

    #[test]
    fn test_bit_grid() {
        let mut board = Board::new();
        board.set(2, 5, Some(PieceKind::L));
        let grid = board.to_bit_grid();
        assert_eq!(grid.len(), 20);
        assert_eq!(grid[5][2], 1);
        assert_eq!(grid[5][3], 0);
    }
}
