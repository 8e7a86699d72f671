//! The playfield: a fixed 10x20 grid of optional cell colors.

use crate::tetromino::{Tetromino, TetrominoType};

pub const GRID_WIDTH: usize = 10;
pub const GRID_HEIGHT: usize = 20;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CellState {
    Empty,
    Filled(TetrominoType),
}

/// Dimensions never change after construction; cells change only through
/// `lock` and `clear_lines`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Grid {
    cells: Vec<Vec<CellState>>,
}

impl Grid {
    pub fn new() -> Self {
        Self {
            cells: vec![vec![CellState::Empty; GRID_WIDTH]; GRID_HEIGHT],
        }
    }

    pub fn from_cells(cells: Vec<Vec<CellState>>) -> Self {
        assert_eq!(cells.len(), GRID_HEIGHT);
        assert!(cells.iter().all(|row| row.len() == GRID_WIDTH));
        Self { cells }
    }

    pub fn rows(&self) -> &[Vec<CellState>] {
        &self.cells
    }

    /// Collision query with asymmetric bounds: hard walls left/right/below,
    /// free space above the visible playfield (lets pieces spawn off-screen).
    pub fn is_position_free(&self, x: i16, y: i16) -> bool {
        if x < 0 || x >= GRID_WIDTH as i16 || y >= GRID_HEIGHT as i16 {
            return false;
        }
        if y < 0 {
            return true;
        }
        self.cells[y as usize][x as usize] == CellState::Empty
    }

    /// True iff every cell the piece occupies passes `is_position_free`.
    pub fn is_valid_placement(&self, piece: &Tetromino) -> bool {
        piece
            .blocks()
            .iter()
            .all(|block| self.is_position_free(block.x, block.y))
    }

    /// Commit the piece's cells permanently. Cells still above the visible
    /// grid are skipped, never an error.
    pub fn lock(&mut self, piece: &Tetromino) {
        for block in piece.blocks() {
            if block.x >= 0
                && (block.x as usize) < GRID_WIDTH
                && block.y >= 0
                && (block.y as usize) < GRID_HEIGHT
            {
                self.cells[block.y as usize][block.x as usize] = CellState::Filled(piece.kind);
            }
        }
    }

    /// Remove every complete row and compact the stack. Scans bottom-to-top;
    /// after a shift the same row index is re-examined, which handles
    /// multiple and non-contiguous complete rows in one pass.
    pub fn clear_lines(&mut self) -> u32 {
        let mut cleared = 0;
        let mut y = GRID_HEIGHT as i32 - 1;

        while y >= 0 {
            if self.is_row_complete(y as usize) {
                for yy in (1..=y as usize).rev() {
                    self.cells[yy] = self.cells[yy - 1].clone();
                }
                self.cells[0] = vec![CellState::Empty; GRID_WIDTH];
                cleared += 1;
            } else {
                y -= 1;
            }
        }

        cleared
    }

    pub fn is_row_complete(&self, y: usize) -> bool {
        self.cells[y].iter().all(|cell| *cell != CellState::Empty)
    }

    pub fn filled_count_in_row(&self, y: usize) -> usize {
        self.cells[y]
            .iter()
            .filter(|cell| **cell != CellState::Empty)
            .count()
    }

    pub fn total_filled_cells(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| **cell != CellState::Empty)
            .count()
    }

    pub fn reset(&mut self) {
        for row in &mut self.cells {
            row.fill(CellState::Empty);
        }
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

pub mod test_helpers {
    use super::*;

    pub fn empty_cells() -> Vec<Vec<CellState>> {
        vec![vec![CellState::Empty; GRID_WIDTH]; GRID_HEIGHT]
    }

    pub fn fill_row(cells: &mut [Vec<CellState>], y: usize) {
        for x in 0..GRID_WIDTH {
            cells[y][x] = CellState::Filled(TetrominoType::T);
        }
    }

    pub fn fill_row_with_gap(cells: &mut [Vec<CellState>], y: usize, gap_x: usize) {
        for x in 0..GRID_WIDTH {
            if x != gap_x {
                cells[y][x] = CellState::Filled(TetrominoType::T);
            }
        }
    }
}
