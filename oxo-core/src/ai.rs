//! Computer opponents at three difficulty levels

use std::fmt;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Player, CELL_COUNT, CENTER, CORNERS};
use crate::error::GameError;
use crate::outcome::{has_win, immediate_win, is_tie};

// ============================================================================
// DIFFICULTY
// ============================================================================

/// Strategy tier for the computer opponent
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Uniform random over empty cells
    Easy,
    /// Win, block, center, corner, then random
    Medium,
    /// Exhaustive minimax
    Hard,
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Easy
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

// ============================================================================
// BOT
// ============================================================================

/// A computer player: a difficulty tier plus its own RNG stream
#[derive(Clone, Debug)]
pub struct Bot {
    pub difficulty: Difficulty,
    rng: ChaCha8Rng,
}

impl Bot {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    pub fn with_seed(difficulty: Difficulty, seed: u64) -> Self {
        Self {
            difficulty,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Pick a move for `player` on `board`
    ///
    /// Fails with `NoMovesAvailable` on a full board.
    pub fn choose_move(&mut self, board: &Board, player: Player) -> Result<usize, GameError> {
        let chosen = match self.difficulty {
            Difficulty::Easy => random_move(board, &mut self.rng),
            Difficulty::Medium => heuristic_move(board, player, &mut self.rng),
            Difficulty::Hard => minimax_move(board, player),
        };
        chosen.ok_or(GameError::NoMovesAvailable)
    }
}

// ============================================================================
// STRATEGIES
// ============================================================================

/// Uniformly random empty cell
pub fn random_move<R: Rng>(board: &Board, rng: &mut R) -> Option<usize> {
    let empty = board.empty_cells();
    if empty.is_empty() {
        return None;
    }
    Some(empty[rng.gen_range(0..empty.len())])
}

/// Rule-based move: win, block, center, corner, then random
///
/// Earlier rules strictly preempt later ones; a winnable line is taken
/// even when the opponent also threatens one.
pub fn heuristic_move<R: Rng>(board: &Board, player: Player, rng: &mut R) -> Option<usize> {
    if let Some(idx) = immediate_win(board, player) {
        return Some(idx);
    }
    if let Some(idx) = immediate_win(board, player.opponent()) {
        return Some(idx);
    }
    if board.is_empty(CENTER) {
        return Some(CENTER);
    }
    let corners: Vec<usize> = CORNERS
        .iter()
        .copied()
        .filter(|&i| board.is_empty(i))
        .collect();
    if !corners.is_empty() {
        return Some(corners[rng.gen_range(0..corners.len())]);
    }
    random_move(board, rng)
}

/// Exhaustive minimax from `player`'s perspective
///
/// The root scans cells 0-8 in order and keeps the first strictly
/// better score, so equal-valued moves resolve to the lowest index.
pub fn minimax_move(board: &Board, player: Player) -> Option<usize> {
    let mut best_move = None;
    let mut best_score = i32::MIN;

    for idx in 0..CELL_COUNT {
        if let Ok(child) = board.apply(idx, player) {
            let score = minimax(&child, player.opponent(), player);
            if score > best_score {
                best_score = score;
                best_move = Some(idx);
            }
        }
    }

    best_move
}

/// Score a position for `bot`: +1 bot wins, -1 opponent wins, 0 tie
fn minimax(board: &Board, to_move: Player, bot: Player) -> i32 {
    if has_win(board, bot) {
        return 1;
    }
    if has_win(board, bot.opponent()) {
        return -1;
    }
    if is_tie(board) {
        return 0;
    }

    let maximizing = to_move == bot;
    let mut best = if maximizing { i32::MIN } else { i32::MAX };

    for idx in 0..CELL_COUNT {
        if let Ok(child) = board.apply(idx, to_move) {
            let score = minimax(&child, to_move.opponent(), bot);
            best = if maximizing {
                best.max(score)
            } else {
                best.min(score)
            };
        }
    }

    best
}

// ============================================================================
// TESTS
// ============================================================================
