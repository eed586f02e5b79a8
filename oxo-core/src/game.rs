//! Turn controller and game state machine

use serde::{Deserialize, Serialize};

use crate::ai::{Bot, Difficulty};
use crate::board::{Board, Player, CELL_COUNT};
use crate::error::GameError;
use crate::outcome::{has_win, is_tie};

// ============================================================================
// CORE TYPES
// ============================================================================

/// Who controls the O seat
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    /// Two humans sharing the board
    HumanVsHuman,
    /// Human plays X; the computer plays O
    HumanVsComputer,
}

/// Lifecycle of a game session
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    NotStarted,
    InProgress,
    Won(Player),
    Tied,
}

/// Result of a successful move submission
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    /// Board after the move and the computer's reply, if any
    pub board: Board,
    /// Status after the move
    pub status: GameStatus,
    /// Player whose mark landed last
    pub last_mover: Player,
    /// Cell taken by the computer's reply, when one was played
    pub reply: Option<usize>,
}

// ============================================================================
// GAME CONTROLLER
// ============================================================================

/// Turn controller: owns the board, the turn, and the session status
///
/// X always moves first; in HumanVsComputer mode the computer holds
/// the O seat and answers each human move inside the same call.
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    turn: Player,
    status: GameStatus,
    mode: Option<GameMode>,
    bot: Option<Bot>,
}

impl Game {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Create a controller with no session started
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            turn: Player::X,
            status: GameStatus::NotStarted,
            mode: None,
            bot: None,
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    /// Board snapshot
    pub fn board(&self) -> Board {
        self.board
    }

    /// Session status
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Player to move
    pub fn turn(&self) -> Player {
        self.turn
    }

    /// Mode of the running session, if one was started
    pub fn mode(&self) -> Option<GameMode> {
        self.mode
    }

    /// Difficulty of the computer seat, if one is playing
    pub fn difficulty(&self) -> Option<Difficulty> {
        self.bot.as_ref().map(|b| b.difficulty)
    }

    // ========================================================================
    // GAME FLOW
    // ========================================================================

    /// Begin a session: clear the board, X to move
    ///
    /// In HumanVsComputer mode the computer plays O at `difficulty`,
    /// Easy when unspecified. Callable from any state.
    pub fn start(&mut self, mode: GameMode, difficulty: Option<Difficulty>) -> GameStatus {
        self.start_session(mode, difficulty, None)
    }

    /// `start` with a fixed RNG seed for the computer seat
    pub fn start_with_seed(
        &mut self,
        mode: GameMode,
        difficulty: Option<Difficulty>,
        seed: u64,
    ) -> GameStatus {
        self.start_session(mode, difficulty, Some(seed))
    }

    fn start_session(
        &mut self,
        mode: GameMode,
        difficulty: Option<Difficulty>,
        seed: Option<u64>,
    ) -> GameStatus {
        self.board.clear();
        self.turn = Player::X;
        self.mode = Some(mode);
        self.bot = match mode {
            GameMode::HumanVsHuman => None,
            GameMode::HumanVsComputer => {
                let tier = difficulty.unwrap_or_default();
                Some(match seed {
                    Some(s) => Bot::with_seed(tier, s),
                    None => Bot::new(tier),
                })
            }
        };
        self.status = GameStatus::InProgress;
        self.status
    }

    /// Submit a move for the player whose turn it is
    ///
    /// Rejected outright unless the game is in progress; an
    /// out-of-range index is `InvalidMove` and an occupied cell
    /// `RejectedMove`, neither changing any state. In HumanVsComputer
    /// mode a successful human move is answered by the computer before
    /// the call returns; the outcome carries the reply cell.
    pub fn submit_move(&mut self, index: usize) -> Result<MoveOutcome, GameError> {
        if self.status != GameStatus::InProgress {
            return Err(GameError::RejectedMove);
        }
        if index >= CELL_COUNT {
            return Err(GameError::InvalidMove(index));
        }
        if !self.board.is_empty(index) {
            return Err(GameError::RejectedMove);
        }

        let mut last_mover = self.turn;
        self.play(index)?;

        let mut reply = None;
        if self.status == GameStatus::InProgress && self.turn == Player::O {
            if let Some(bot) = self.bot.as_mut() {
                let idx = bot.choose_move(&self.board, Player::O)?;
                last_mover = Player::O;
                reply = Some(idx);
                self.play(idx)?;
            }
        }

        Ok(MoveOutcome {
            board: self.board,
            status: self.status,
            last_mover,
            reply,
        })
    }

    /// Apply one validated move, then transition or alternate
    ///
    /// Win check precedes tie check; on a terminal state the turn
    /// stops alternating.
    fn play(&mut self, index: usize) -> Result<(), GameError> {
        self.board = self.board.apply(index, self.turn)?;
        if has_win(&self.board, self.turn) {
            self.status = GameStatus::Won(self.turn);
        } else if is_tie(&self.board) {
            self.status = GameStatus::Tied;
        } else {
            self.turn = self.turn.opponent();
        }
        Ok(())
    }

    /// Clear the board for a rematch in the same mode
    ///
    /// InProgress when a mode is set, NotStarted otherwise. Safe in
    /// every state.
    pub fn reset(&mut self) -> GameStatus {
        self.board.clear();
        self.turn = Player::X;
        self.status = if self.mode.is_some() {
            GameStatus::InProgress
        } else {
            GameStatus::NotStarted
        };
        self.status
    }

    /// Forget the session entirely, mode and difficulty included
    pub fn full_reset(&mut self) -> GameStatus {
        self.board.clear();
        self.turn = Player::X;
        self.mode = None;
        self.bot = None;
        self.status = GameStatus::NotStarted;
        self.status
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CORNERS;

    fn board_with(xs: &[usize], os: &[usize]) -> Board {
        let mut board = Board::new();
        for &i in xs {
            board = board.apply(i, Player::X).unwrap();
        }
        for &i in os {
            board = board.apply(i, Player::O).unwrap();
        }
        board
    }

    fn hvh_game() -> Game {
        let mut game = Game::new();
        game.start(GameMode::HumanVsHuman, None);
        game
    }

    fn hvc_game(difficulty: Difficulty, seed: u64) -> Game {
        let mut game = Game::new();
        game.start_with_seed(GameMode::HumanVsComputer, Some(difficulty), seed);
        game
    }

    #[test]
    fn test_new_game_not_started() {
        let game = Game::new();
        assert_eq!(game.status(), GameStatus::NotStarted);
        assert_eq!(game.mode(), None);
        assert_eq!(game.difficulty(), None);
    }

    #[test]
    fn test_submit_before_start_rejected() {
        let mut game = Game::new();
        assert_eq!(game.submit_move(0), Err(GameError::RejectedMove));
        assert_eq!(game.status(), GameStatus::NotStarted);
    }

    #[test]
    fn test_start_clears_board_and_hands_x_the_turn() {
        let mut game = hvh_game();
        game.submit_move(0).unwrap();
        let status = game.start(GameMode::HumanVsHuman, None);
        assert_eq!(status, GameStatus::InProgress);
        assert_eq!(game.board(), Board::new());
        assert_eq!(game.turn(), Player::X);
    }

    #[test]
    fn test_difficulty_defaults_to_easy() {
        let mut game = Game::new();
        game.start(GameMode::HumanVsComputer, None);
        assert_eq!(game.difficulty(), Some(Difficulty::Easy));
    }

    #[test]
    fn test_two_player_turns_alternate() {
        let mut game = hvh_game();
        assert_eq!(game.turn(), Player::X);
        game.submit_move(0).unwrap();
        assert_eq!(game.turn(), Player::O);
        game.submit_move(4).unwrap();
        assert_eq!(game.turn(), Player::X);
    }

    #[test]
    fn test_win_ends_the_session() {
        let mut game = hvh_game();
        // X takes the top row across 0, 1, 2
        game.submit_move(0).unwrap();
        game.submit_move(3).unwrap();
        game.submit_move(1).unwrap();
        game.submit_move(4).unwrap();
        let outcome = game.submit_move(2).unwrap();
        assert_eq!(outcome.status, GameStatus::Won(Player::X));
        assert_eq!(outcome.last_mover, Player::X);
        assert_eq!(game.submit_move(5), Err(GameError::RejectedMove));
    }

    #[test]
    fn test_full_board_without_line_ties() {
        let mut game = hvh_game();
        // Fills to X O X / X O O / O X X with no line completed
        for &idx in &[0, 1, 2, 4, 3, 5, 7, 6, 8] {
            game.submit_move(idx).unwrap();
        }
        assert_eq!(game.status(), GameStatus::Tied);
    }

    #[test]
    fn test_occupied_cell_rejected_without_state_change() {
        let mut game = hvh_game();
        game.submit_move(4).unwrap();
        let board = game.board();
        let turn = game.turn();
        assert_eq!(game.submit_move(4), Err(GameError::RejectedMove));
        assert_eq!(game.board(), board);
        assert_eq!(game.turn(), turn);
    }

    #[test]
    fn test_out_of_range_index_is_invalid() {
        let mut game = hvh_game();
        assert_eq!(game.submit_move(9), Err(GameError::InvalidMove(9)));
        assert_eq!(game.board(), Board::new());
        assert_eq!(game.turn(), Player::X);
    }

    #[test]
    fn test_computer_replies_within_the_same_call() {
        let mut game = hvc_game(Difficulty::Hard, 11);
        let outcome = game.submit_move(4).unwrap();
        let reply = outcome.reply.unwrap();
        assert!(CORNERS.contains(&reply));
        assert_eq!(outcome.last_mover, Player::O);
        assert_eq!(game.board().mark_count(), 2);
        assert_eq!(game.turn(), Player::X);
    }

    #[test]
    fn test_winning_move_gets_no_reply() {
        let mut game = hvc_game(Difficulty::Easy, 3);
        game.board = board_with(&[0, 1], &[3, 4]);
        let outcome = game.submit_move(2).unwrap();
        assert_eq!(outcome.status, GameStatus::Won(Player::X));
        assert_eq!(outcome.last_mover, Player::X);
        assert_eq!(outcome.reply, None);
        assert_eq!(game.submit_move(5), Err(GameError::RejectedMove));
    }

    #[test]
    fn test_tie_on_final_cell_gets_no_reply() {
        let mut game = hvc_game(Difficulty::Hard, 5);
        game.board = board_with(&[0, 2, 3, 7], &[1, 4, 5, 6]);
        let outcome = game.submit_move(8).unwrap();
        assert_eq!(outcome.status, GameStatus::Tied);
        assert_eq!(outcome.reply, None);
    }

    #[test]
    fn test_medium_reply_completes_its_own_row() {
        let mut game = hvc_game(Difficulty::Medium, 13);
        game.board = board_with(&[0, 1], &[3, 4]);
        // X plays 7; O finishes its own middle row instead of blocking
        let outcome = game.submit_move(7).unwrap();
        assert_eq!(outcome.reply, Some(5));
        assert_eq!(outcome.status, GameStatus::Won(Player::O));
        assert_eq!(outcome.last_mover, Player::O);
    }

    #[test]
    fn test_reset_keeps_mode_and_difficulty() {
        let mut game = hvc_game(Difficulty::Hard, 2);
        game.submit_move(4).unwrap();
        let status = game.reset();
        assert_eq!(status, GameStatus::InProgress);
        assert_eq!(game.board(), Board::new());
        assert_eq!(game.turn(), Player::X);
        assert_eq!(game.mode(), Some(GameMode::HumanVsComputer));
        assert_eq!(game.difficulty(), Some(Difficulty::Hard));
    }

    #[test]
    fn test_reset_without_mode_stays_not_started() {
        let mut game = Game::new();
        assert_eq!(game.reset(), GameStatus::NotStarted);
    }

    #[test]
    fn test_full_reset_clears_mode() {
        let mut game = hvc_game(Difficulty::Medium, 2);
        game.submit_move(0).unwrap();
        assert_eq!(game.full_reset(), GameStatus::NotStarted);
        assert_eq!(game.mode(), None);
        assert_eq!(game.difficulty(), None);
        assert_eq!(game.board(), Board::new());
    }

    #[test]
    fn test_replay_reproduces_board_and_status() {
        let moves = [4, 0, 1, 7, 6, 2, 5];
        let mut game = hvh_game();
        for &idx in &moves {
            game.submit_move(idx).unwrap();
        }
        let board = game.board();
        let status = game.status();

        game.reset();
        for &idx in &moves {
            game.submit_move(idx).unwrap();
        }
        assert_eq!(game.board(), board);
        assert_eq!(game.status(), status);
    }
}
