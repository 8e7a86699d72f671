//! Tetromino types, the static shape table, and SRS-style kick tables.

use crate::grid::GRID_WIDTH;

// ============================================================================
// Types
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Position {
    pub x: i16,
    pub y: i16,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TetrominoType {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

/// 4x4 occupancy mask, row-major: `mask[y][x]`.
pub type ShapeMask = [[bool; 4]; 4];

impl TetrominoType {
    pub const ALL: [TetrominoType; 7] = [
        TetrominoType::I,
        TetrominoType::J,
        TetrominoType::L,
        TetrominoType::O,
        TetrominoType::S,
        TetrominoType::T,
        TetrominoType::Z,
    ];

    /// Occupancy mask in the default (rotation 0) orientation.
    pub fn base_shape(self) -> ShapeMask {
        match self {
            TetrominoType::I => [
                [false, false, false, false],
                [true, true, true, true],
                [false, false, false, false],
                [false, false, false, false],
            ],
            TetrominoType::J => [
                [true, false, false, false],
                [true, true, true, false],
                [false, false, false, false],
                [false, false, false, false],
            ],
            TetrominoType::L => [
                [false, false, true, false],
                [true, true, true, false],
                [false, false, false, false],
                [false, false, false, false],
            ],
            TetrominoType::O => [
                [false, true, true, false],
                [false, true, true, false],
                [false, false, false, false],
                [false, false, false, false],
            ],
            TetrominoType::S => [
                [false, true, true, false],
                [true, true, false, false],
                [false, false, false, false],
                [false, false, false, false],
            ],
            TetrominoType::T => [
                [false, true, false, false],
                [true, true, true, false],
                [false, false, false, false],
                [false, false, false, false],
            ],
            TetrominoType::Z => [
                [true, true, false, false],
                [false, true, true, false],
                [false, false, false, false],
                [false, false, false, false],
            ],
        }
    }
}

// ============================================================================
// Wall-kick tables
// ============================================================================

pub type Kick = (i16, i16);

// Clockwise SRS offsets, indexed by the rotation the piece is leaving.
// Expressed in grid coordinates (y grows downward).

const O_KICKS: [Kick; 1] = [(0, 0)];

const I_KICKS: [[Kick; 5]; 4] = [
    [(0, 0), (-2, 0), (1, 0), (-2, 1), (1, -2)],
    [(0, 0), (-1, 0), (2, 0), (-1, -2), (2, 1)],
    [(0, 0), (2, 0), (-1, 0), (2, -1), (-1, 2)],
    [(0, 0), (1, 0), (-2, 0), (1, 2), (-2, -1)],
];

const JLSTZ_KICKS: [[Kick; 5]; 4] = [
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
];

/// Last-resort offsets tried when the whole primary table fails.
pub const SECONDARY_KICKS: [Kick; 8] = [
    (2, 0),
    (-2, 0),
    (0, 2),
    (0, -2),
    (1, 1),
    (-1, 1),
    (1, -1),
    (-1, -1),
];

/// Primary kick candidates for a clockwise turn out of `rotation`.
pub fn kick_table(kind: TetrominoType, rotation: usize) -> &'static [Kick] {
    match kind {
        TetrominoType::O => &O_KICKS,
        TetrominoType::I => &I_KICKS[rotation % 4],
        _ => &JLSTZ_KICKS[rotation % 4],
    }
}

// ============================================================================
// Tetromino
// ============================================================================

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Tetromino {
    pub kind: TetrominoType,
    /// Top-left corner of the 4x4 bounding box, in grid coordinates.
    /// Negative y means the piece is partially above the visible playfield.
    pub position: Position,
    pub rotation: usize,
}

impl Tetromino {
    /// New piece at the spawn position: horizontally centered, with the
    /// I piece one row higher to compensate for its row-1 mask.
    pub fn new(kind: TetrominoType) -> Self {
        let y = if kind == TetrominoType::I { -1 } else { 0 };
        Self {
            kind,
            position: Position {
                x: GRID_WIDTH as i16 / 2 - 2,
                y,
            },
            rotation: 0,
        }
    }

    pub fn new_at(kind: TetrominoType, x: i16, y: i16) -> Self {
        Self {
            kind,
            position: Position { x, y },
            rotation: 0,
        }
    }

    /// The base mask turned `rotation` quarter-turns clockwise.
    /// The O piece is rotation-invariant.
    pub fn rotated_shape(&self) -> ShapeMask {
        let mut shape = self.kind.base_shape();
        if self.kind == TetrominoType::O {
            return shape;
        }
        for _ in 0..self.rotation % 4 {
            let mut turned = [[false; 4]; 4];
            for (y, row) in shape.iter().enumerate() {
                for (x, &cell) in row.iter().enumerate() {
                    turned[x][3 - y] = cell;
                }
            }
            shape = turned;
        }
        shape
    }

    /// Does this piece occupy the absolute grid cell (gx, gy)?
    pub fn is_occupying(&self, gx: i16, gy: i16) -> bool {
        let lx = gx - self.position.x;
        let ly = gy - self.position.y;
        if !(0..4).contains(&lx) || !(0..4).contains(&ly) {
            return false;
        }
        self.rotated_shape()[ly as usize][lx as usize]
    }

    /// Absolute positions of the four occupied cells.
    pub fn blocks(&self) -> Vec<Position> {
        let shape = self.rotated_shape();
        let mut blocks = Vec::with_capacity(4);
        for (y, row) in shape.iter().enumerate() {
            for (x, &cell) in row.iter().enumerate() {
                if cell {
                    blocks.push(Position {
                        x: self.position.x + x as i16,
                        y: self.position.y + y as i16,
                    });
                }
            }
        }
        blocks
    }

    pub fn moved(&self, dx: i16, dy: i16) -> Self {
        Self {
            kind: self.kind,
            position: Position {
                x: self.position.x + dx,
                y: self.position.y + dy,
            },
            rotation: self.rotation,
        }
    }
}
