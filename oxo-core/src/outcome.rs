//! Win and tie detection over the eight fixed lines

use crate::board::{Board, Player};

/// The eight winning lines as cell-index triples
/// Order: rows top to bottom, columns left to right, then diagonals
pub const WIN_LINES: [[usize; 3]; 8] = [
    [0, 1, 2], // top row
    [3, 4, 5], // middle row
    [6, 7, 8], // bottom row
    [0, 3, 6], // left column
    [1, 4, 7], // middle column
    [2, 5, 8], // right column
    [0, 4, 8], // main diagonal
    [2, 4, 6], // anti-diagonal
];

/// Check whether `player` fully occupies any line
pub fn has_win(board: &Board, player: Player) -> bool {
    WIN_LINES
        .iter()
        .any(|line| line.iter().all(|&i| board.get(i) == Some(player)))
}

/// The completed line and its owner, if the board holds one
pub fn winning_line(board: &Board) -> Option<(Player, [usize; 3])> {
    for line in WIN_LINES {
        if let Some(mark) = board.get(line[0]) {
            if board.get(line[1]) == Some(mark) && board.get(line[2]) == Some(mark) {
                return Some((mark, line));
            }
        }
    }
    None
}

/// The player holding a completed line, if any
pub fn winner(board: &Board) -> Option<Player> {
    winning_line(board).map(|(mark, _)| mark)
}

/// Check for a tie: every cell occupied
///
/// Meaningful only after the win check; callers always test wins first.
pub fn is_tie(board: &Board) -> bool {
    board.is_full()
}

/// Cell completing a line for `player` this turn, if one exists
///
/// Scans the lines in fixed order and returns the empty cell of the
/// first line whose other two cells already belong to `player`.
pub fn immediate_win(board: &Board, player: Player) -> Option<usize> {
    for line in WIN_LINES {
        let own = line.iter().filter(|&&i| board.get(i) == Some(player)).count();
        if own == 2 {
            if let Some(&idx) = line.iter().find(|&&i| board.is_empty(i)) {
                return Some(idx);
            }
        }
    }
    None
}
