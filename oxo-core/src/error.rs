//! Error types for game operations

/// Errors produced by board mutation, move submission, and move selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("Invalid move: cell {0} is out of range or already occupied")]
    InvalidMove(usize),

    #[error("Move rejected: game is not accepting moves")]
    RejectedMove,

    #[error("No moves available: board is full")]
    NoMovesAvailable,
}
