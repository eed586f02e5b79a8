//! 3x3 board with row-major cell indexing

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Number of cells on the board
pub const CELL_COUNT: usize = 9;

/// Index of the center cell
pub const CENTER: usize = 4;

/// Indices of the corner cells
/// Order: top-left, top-right, bottom-left, bottom-right
pub const CORNERS: [usize; 4] = [0, 2, 6, 8];

/// Player marks
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// The opposing player
    pub fn opponent(&self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::X => write!(f, "X"),
            Player::O => write!(f, "O"),
        }
    }
}

/// Game board: 9 cells in row-major order
/// Index: 0 = top-left, 4 = center, 8 = bottom-right
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    cells: [Option<Player>; CELL_COUNT],
}

impl Board {
    /// Create an empty board
    pub const fn new() -> Self {
        Self {
            cells: [None; CELL_COUNT],
        }
    }

    /// Mark occupying `index`, if any
    pub fn get(&self, index: usize) -> Option<Player> {
        self.cells[index]
    }

    /// Check if `index` holds no mark
    pub fn is_empty(&self, index: usize) -> bool {
        self.cells[index].is_none()
    }

    /// Indices of all unoccupied cells, in ascending order
    pub fn empty_cells(&self) -> Vec<usize> {
        (0..CELL_COUNT).filter(|&i| self.cells[i].is_none()).collect()
    }

    /// Check if every cell is occupied
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| c.is_some())
    }

    /// Total number of marks on the board
    pub fn mark_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Number of marks belonging to `player`
    pub fn count(&self, player: Player) -> usize {
        self.cells.iter().filter(|&&c| c == Some(player)).count()
    }

    /// Place `player` at `index`, returning the resulting board
    ///
    /// Fails with `InvalidMove` if the index is out of range or the
    /// cell is already occupied; the receiver is never modified.
    pub fn apply(&self, index: usize, player: Player) -> Result<Board, GameError> {
        if index >= CELL_COUNT || self.cells[index].is_some() {
            return Err(GameError::InvalidMove(index));
        }
        let mut next = *self;
        next.cells[index] = Some(player);
        Ok(next)
    }

    /// Reset every cell to empty
    pub fn clear(&mut self) {
        self.cells = [None; CELL_COUNT];
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..3 {
            if row > 0 {
                writeln!(f)?;
            }
            for col in 0..3 {
                if col > 0 {
                    write!(f, " ")?;
                }
                match self.cells[row * 3 + col] {
                    Some(mark) => write!(f, "{}", mark)?,
                    None => write!(f, ".")?,
                }
            }
        }
        Ok(())
    }
}
