//! Piece lifecycle: the active piece, the next-piece preview, and the
//! collision-checked operations that mutate them.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::grid::{Grid, GRID_HEIGHT};
use crate::tetromino::{kick_table, Position, Tetromino, TetrominoType, SECONDARY_KICKS};

// ============================================================================
// Piece Provider
// ============================================================================

pub trait PieceProvider {
    fn next_piece(&mut self) -> TetrominoType;
}

/// Draws each type independently and uniformly at random. No bag
/// de-duplication: droughts and streaks are possible.
pub struct RandomPieceProvider {
    rng: StdRng,
}

impl RandomPieceProvider {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic stream for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPieceProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceProvider for RandomPieceProvider {
    fn next_piece(&mut self) -> TetrominoType {
        TetrominoType::ALL[self.rng.gen_range(0..TetrominoType::ALL.len())]
    }
}

pub struct SequencePieceProvider {
    pieces: Vec<TetrominoType>,
    index: usize,
}

impl SequencePieceProvider {
    pub fn new(pieces: Vec<TetrominoType>) -> Self {
        Self { pieces, index: 0 }
    }
}

impl PieceProvider for SequencePieceProvider {
    fn next_piece(&mut self) -> TetrominoType {
        let piece = self.pieces[self.index % self.pieces.len()];
        self.index += 1;
        piece
    }
}

// ============================================================================
// Piece Manager
// ============================================================================

/// What happened when a piece came to rest. The controller turns this into
/// score, level, and game-over updates.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LockOutcome {
    /// Cells descended during a hard drop (scores 1 point each).
    pub cells_dropped: u32,
    /// Rows cleared by this lock.
    pub lines_cleared: u32,
    /// False when the replacement piece could not be placed (game over).
    pub spawned: bool,
}

pub struct PieceManager {
    pub current: Tetromino,
    pub next_kind: TetrominoType,
    provider: Box<dyn PieceProvider>,
}

impl PieceManager {
    pub fn new(mut provider: Box<dyn PieceProvider>) -> Self {
        let current = Tetromino::new(provider.next_piece());
        let next_kind = provider.next_piece();
        Self {
            current,
            next_kind,
            provider,
        }
    }

    /// Fixture constructor: a given active piece, preview drawn normally.
    pub fn with_current(current: Tetromino, mut provider: Box<dyn PieceProvider>) -> Self {
        let next_kind = provider.next_piece();
        Self {
            current,
            next_kind,
            provider,
        }
    }

    /// Plain translation, no wall kicks. Commits only if every occupied
    /// cell of the moved piece is free.
    pub fn move_piece(&mut self, grid: &Grid, dx: i16, dy: i16) -> bool {
        let moved = self.current.moved(dx, dy);
        if grid.is_valid_placement(&moved) {
            self.current = moved;
            true
        } else {
            false
        }
    }

    /// Clockwise quarter-turn with wall-kick resolution: try the primary
    /// candidate offsets for (kind, rotation) in order, then the secondary
    /// set. Total failure leaves the piece untouched.
    pub fn rotate_piece(&mut self, grid: &Grid) -> bool {
        let target = (self.current.rotation + 1) % 4;

        for &(dx, dy) in kick_table(self.current.kind, self.current.rotation) {
            if self.try_rotation(grid, dx, dy, target) {
                return true;
            }
        }

        if self.current.kind != TetrominoType::O {
            for &(dx, dy) in SECONDARY_KICKS.iter() {
                if self.try_rotation(grid, dx, dy, target) {
                    return true;
                }
            }
        }

        false
    }

    fn try_rotation(&mut self, grid: &Grid, dx: i16, dy: i16, target: usize) -> bool {
        let candidate = Tetromino {
            kind: self.current.kind,
            position: Position {
                x: self.current.position.x + dx,
                y: self.current.position.y + dy,
            },
            rotation: target,
        };
        if grid.is_valid_placement(&candidate) {
            self.current = candidate;
            true
        } else {
            false
        }
    }

    /// Single downward step; on contact, the full lock/clear/spawn sequence.
    pub fn soft_drop(&mut self, grid: &mut Grid) -> Option<LockOutcome> {
        if self.move_piece(grid, 0, 1) {
            None
        } else {
            Some(self.lock_and_spawn(grid, 0))
        }
    }

    /// Fall to the lowest legal position and lock immediately. The descent
    /// is capped at the grid height as a guard against runaway loops.
    pub fn hard_drop(&mut self, grid: &mut Grid) -> LockOutcome {
        let mut dropped = 0u32;
        while self.move_piece(grid, 0, 1) {
            dropped += 1;
            if dropped >= GRID_HEIGHT as u32 {
                break;
            }
        }
        self.lock_and_spawn(grid, dropped)
    }

    fn lock_and_spawn(&mut self, grid: &mut Grid, cells_dropped: u32) -> LockOutcome {
        grid.lock(&self.current);
        let lines_cleared = grid.clear_lines();
        let spawned = self.spawn_next(grid);
        LockOutcome {
            cells_dropped,
            lines_cleared,
            spawned,
        }
    }

    /// Promote the preview to active and draw a fresh preview. Returns
    /// false when the spawned piece collides inside the visible grid --
    /// cells still above it are exempt from the check.
    pub fn spawn_next(&mut self, grid: &Grid) -> bool {
        let kind = self.next_kind;
        self.next_kind = self.provider.next_piece();
        self.current = Tetromino::new(kind);

        self.current
            .blocks()
            .iter()
            .all(|block| block.y < 0 || grid.is_position_free(block.x, block.y))
    }

    /// Fresh active and preview pieces for a new run.
    pub fn reset(&mut self) {
        self.current = Tetromino::new(self.provider.next_piece());
        self.next_kind = self.provider.next_piece();
    }

    /// Where the active piece would land on a hard drop. None when it is
    /// already resting.
    pub fn ghost_piece(&self, grid: &Grid) -> Option<Tetromino> {
        let mut ghost = self.current.clone();
        let mut distance = 0;
        loop {
            let next = ghost.moved(0, 1);
            if !grid.is_valid_placement(&next) {
                break;
            }
            ghost = next;
            distance += 1;
        }
        if distance > 0 {
            Some(ghost)
        } else {
            None
        }
    }
}
