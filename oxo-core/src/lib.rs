//! OXO Core - Game engine and AI
//!
//! This crate provides the core game logic for OXO:
//! - Board representation (3x3 grid, row-major cells)
//! - Win and tie detection over the eight winning lines
//! - Computer opponents at three difficulty levels
//! - Turn-based game controller for human and computer play

pub mod board;
pub mod outcome;
pub mod ai;
pub mod game;
pub mod error;

// Re-exports for convenient access
pub use board::{Board, Player, CELL_COUNT, CENTER, CORNERS};
pub use outcome::{has_win, immediate_win, is_tie, winner, winning_line, WIN_LINES};
pub use ai::{heuristic_move, minimax_move, random_move, Bot, Difficulty};
pub use game::{Game, GameMode, GameStatus, MoveOutcome};
pub use error::GameError;
