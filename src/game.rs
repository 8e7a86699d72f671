//! Game controller: owns the grid, the piece manager, the score/level
//! counters and the state machine, and drives the gravity tick.

use std::time::Duration;

use crate::grid::{CellState, Grid, GRID_HEIGHT, GRID_WIDTH};
use crate::input::Action;
use crate::manager::{LockOutcome, PieceManager, PieceProvider, RandomPieceProvider};
use crate::tetromino::Tetromino;

// ============================================================================
// Configuration
// ============================================================================

pub const INITIAL_LEVEL: u32 = 1;
pub const MAX_LEVEL: u32 = 15;
pub const LINES_PER_LEVEL: u32 = 10;

// Gravity interval shrinks with level: initial / (1 + level * factor).
const INITIAL_FALL_MS: u64 = 500;
const SPEED_FACTOR: f64 = 0.1;

// Scoring
pub const SCORE_SINGLE: u32 = 100;
pub const SCORE_DOUBLE: u32 = 300;
pub const SCORE_TRIPLE: u32 = 500;
pub const SCORE_TETRIS: u32 = 800;

// ============================================================================
// Types
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameState {
    StartScreen,
    Playing,
    Paused,
    GameOver,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GameEvent {
    PieceMoved,
    PieceRotated,
    PieceLocked,
    LinesCleared(u32),
    LevelUp(u32),
    Paused,
    Unpaused,
    GameStarted,
    GameRestarted,
    GameOver,
}

// ============================================================================
// Game
// ============================================================================

pub struct Game {
    pub grid: Grid,
    pub manager: PieceManager,
    pub score: u32,
    pub lines_cleared: u32,
    pub level: u32,
    pub state: GameState,
    events: Vec<GameEvent>,
}

impl Game {
    pub fn new() -> Self {
        Self::with_provider(Box::new(RandomPieceProvider::new()))
    }

    pub fn with_provider(provider: Box<dyn PieceProvider>) -> Self {
        Self {
            grid: Grid::new(),
            manager: PieceManager::new(provider),
            score: 0,
            lines_cleared: 0,
            level: INITIAL_LEVEL,
            state: GameState::StartScreen,
            events: Vec::new(),
        }
    }

    /// Fixture constructor: a prepared grid and active piece, already in
    /// the Playing state.
    pub fn with_grid(grid: Grid, piece: Tetromino) -> Self {
        Self {
            grid,
            manager: PieceManager::with_current(piece, Box::new(RandomPieceProvider::new())),
            score: 0,
            lines_cleared: 0,
            level: INITIAL_LEVEL,
            state: GameState::Playing,
            events: Vec::new(),
        }
    }

    /// Dispatch one abstract input action according to the current state.
    /// Mute and Quit are front-end concerns and never reach the core.
    pub fn handle_action(&mut self, action: Action) {
        match self.state {
            GameState::StartScreen => {
                if action == Action::Confirm {
                    self.start();
                }
            }
            GameState::Playing => match action {
                Action::MoveLeft => {
                    self.move_piece(-1, 0);
                }
                Action::MoveRight => {
                    self.move_piece(1, 0);
                }
                Action::SoftDrop => self.soft_drop(),
                Action::Rotate => {
                    self.rotate_piece();
                }
                Action::HardDrop => self.hard_drop(),
                Action::Pause => self.toggle_pause(),
                _ => {}
            },
            GameState::Paused => {
                if action == Action::Pause {
                    self.toggle_pause();
                }
            }
            GameState::GameOver => {
                if action == Action::Confirm {
                    self.restart();
                }
            }
        }
    }

    pub fn start(&mut self) {
        if self.state == GameState::StartScreen {
            self.state = GameState::Playing;
            self.events.push(GameEvent::GameStarted);
        }
    }

    pub fn move_piece(&mut self, dx: i16, dy: i16) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        if self.manager.move_piece(&self.grid, dx, dy) {
            self.events.push(GameEvent::PieceMoved);
            true
        } else {
            false
        }
    }

    pub fn rotate_piece(&mut self) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        if self.manager.rotate_piece(&self.grid) {
            self.events.push(GameEvent::PieceRotated);
            true
        } else {
            false
        }
    }

    pub fn soft_drop(&mut self) {
        if self.state != GameState::Playing {
            return;
        }
        if let Some(outcome) = self.manager.soft_drop(&mut self.grid) {
            self.apply_lock(outcome);
        }
    }

    pub fn hard_drop(&mut self) {
        if self.state != GameState::Playing {
            return;
        }
        let outcome = self.manager.hard_drop(&mut self.grid);
        self.apply_lock(outcome);
    }

    /// Gravity step. Same contact behavior as a soft drop, without any
    /// per-cell bonus.
    pub fn tick(&mut self) {
        if self.state != GameState::Playing {
            return;
        }
        if let Some(outcome) = self.manager.soft_drop(&mut self.grid) {
            self.apply_lock(outcome);
        }
    }

    fn apply_lock(&mut self, outcome: LockOutcome) {
        self.score += outcome.cells_dropped;
        self.events.push(GameEvent::PieceLocked);

        if outcome.lines_cleared > 0 {
            self.events
                .push(GameEvent::LinesCleared(outcome.lines_cleared));
            self.add_score(outcome.lines_cleared);
        }

        if !outcome.spawned {
            self.state = GameState::GameOver;
            self.events.push(GameEvent::GameOver);
        }
    }

    /// Score `lines` cleared in a single invocation and update the level.
    pub fn add_score(&mut self, lines: u32) {
        let base = match lines {
            0 => 0,
            1 => SCORE_SINGLE,
            2 => SCORE_DOUBLE,
            3 => SCORE_TRIPLE,
            _ => SCORE_TETRIS,
        };
        self.score += base * self.level;
        self.lines_cleared += lines;

        let new_level = (INITIAL_LEVEL + self.lines_cleared / LINES_PER_LEVEL).min(MAX_LEVEL);
        if new_level > self.level {
            self.level = new_level;
            self.events.push(GameEvent::LevelUp(new_level));
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.state {
            GameState::Playing => {
                self.state = GameState::Paused;
                self.events.push(GameEvent::Paused);
            }
            GameState::Paused => {
                self.state = GameState::Playing;
                self.events.push(GameEvent::Unpaused);
            }
            // No pausing from the start screen or after game over.
            GameState::StartScreen | GameState::GameOver => {}
        }
    }

    pub fn restart(&mut self) {
        self.grid.reset();
        self.score = 0;
        self.lines_cleared = 0;
        self.level = INITIAL_LEVEL;
        self.state = GameState::Playing;
        self.manager.reset();
        // Undrained events stay in the queue so a front end that has not
        // polled this frame still sees them ahead of the restart.
        self.events.push(GameEvent::GameRestarted);
    }

    /// Current gravity interval, shrinking as the level climbs.
    pub fn fall_interval(&self) -> Duration {
        let ms = INITIAL_FALL_MS as f64 / (1.0 + self.level as f64 * SPEED_FACTOR);
        Duration::from_millis(ms as u64)
    }

    /// Returns the visual grid state with the active piece overlaid.
    pub fn render_grid(&self) -> Vec<Vec<CellState>> {
        let mut visual: Vec<Vec<CellState>> = self.grid.rows().to_vec();

        for block in self.manager.current.blocks() {
            if block.x >= 0
                && (block.x as usize) < GRID_WIDTH
                && block.y >= 0
                && (block.y as usize) < GRID_HEIGHT
            {
                visual[block.y as usize][block.x as usize] =
                    CellState::Filled(self.manager.current.kind);
            }
        }

        visual
    }

    /// Hard-drop landing preview for rendering. Not part of simulation state.
    pub fn ghost_piece(&self) -> Option<Tetromino> {
        self.manager.ghost_piece(&self.grid)
    }

    /// Takes and clears all pending events.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_game_over(&self) -> bool {
        self.state == GameState::GameOver
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
