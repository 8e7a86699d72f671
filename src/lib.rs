//! Falling-block puzzle engine with a terminal front end.
//!
//! The simulation core (tetromino shapes and SRS-style rotation, the
//! playfield, piece lifecycle, scoring and the state machine) lives in this
//! library; the binary wraps it in a ratatui/crossterm interface.

pub mod game;
pub mod grid;
pub mod input;
pub mod manager;
pub mod sound;
pub mod tetromino;
