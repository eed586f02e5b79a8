//! Play command - interactive game at the terminal
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: resolve_setup(), play_session(), announce_result()
//! - Level 3: play_one_game(), prompt helpers
//! - Level 4: parsing and rendering utilities

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use oxo_core::{winning_line, Board, Difficulty, Game, GameError, GameMode, GameStatus, Player};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Game mode: "two-player" or "computer" (prompted when omitted)
    #[arg(long)]
    pub mode: Option<String>,

    /// Computer difficulty: "easy", "medium" or "hard" (prompted when omitted)
    #[arg(long)]
    pub difficulty: Option<String>,

    /// RNG seed for the computer player
    #[arg(long)]
    pub seed: Option<u64>,

    /// Pause before the computer's reply, in milliseconds
    /// (800 on hard and 400 otherwise when omitted; 0 disables)
    #[arg(long)]
    pub delay_ms: Option<u64>,
}

/// Resolved session settings
#[derive(Clone, Copy, Debug)]
struct Setup {
    mode: GameMode,
    difficulty: Option<Difficulty>,
}

/// What the player asked for after a finished game
enum NextAction {
    Rematch,
    Menu,
    Quit,
}

/// Why a session ended
enum SessionEnd {
    Menu,
    Quit,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// This function reads like a table of contents:
/// 1. Resolve mode and difficulty (flags or prompts)
/// 2. Run a session of games in that setup
/// 3. Loop back to the menu or quit, as the player chooses
pub fn run(args: PlayArgs) -> Result<()> {
    let mut game = Game::new();
    let mut prompt_setup = false;

    loop {
        let setup = resolve_setup(&args, prompt_setup)?;

        tracing::info!(
            "Starting session: mode={:?}, difficulty={:?}",
            setup.mode,
            setup.difficulty
        );

        match play_session(&mut game, &setup, &args)? {
            SessionEnd::Menu => prompt_setup = true,
            SessionEnd::Quit => return Ok(()),
        }
    }
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Resolve the session setup from flags, prompting for whatever is missing
///
/// After a return to the menu everything is prompted again, like the
/// original mode-selection screen.
fn resolve_setup(args: &PlayArgs, force_prompt: bool) -> Result<Setup> {
    let mode = match (&args.mode, force_prompt) {
        (Some(value), false) => parse_mode(value)?,
        _ => prompt_mode()?,
    };

    let difficulty = match mode {
        GameMode::HumanVsHuman => None,
        GameMode::HumanVsComputer => Some(match (&args.difficulty, force_prompt) {
            (Some(value), false) => parse_difficulty(value)?,
            _ => prompt_difficulty()?,
        }),
    };

    Ok(Setup { mode, difficulty })
}

/// Play games in one setup until the player leaves for the menu or quits
fn play_session(game: &mut Game, setup: &Setup, args: &PlayArgs) -> Result<SessionEnd> {
    match args.seed {
        Some(seed) => game.start_with_seed(setup.mode, setup.difficulty, seed),
        None => game.start(setup.mode, setup.difficulty),
    };

    loop {
        play_one_game(game, args)?;
        announce_result(game);

        match prompt_next_action()? {
            NextAction::Rematch => {
                game.reset();
            }
            NextAction::Menu => {
                game.full_reset();
                return Ok(SessionEnd::Menu);
            }
            NextAction::Quit => return Ok(SessionEnd::Quit),
        }
    }
}

/// Render the final board and announce the result
fn announce_result(game: &Game) {
    println!("\n{}", render_board(&game.board()));
    if let Some(message) = result_message(game.status(), game.mode()) {
        println!("{}", message);
    }
    if let Some((_, line)) = winning_line(&game.board()) {
        println!("Winning line: {} {} {}", line[0], line[1], line[2]);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Drive one game to a terminal state
fn play_one_game(game: &mut Game, args: &PlayArgs) -> Result<()> {
    while game.status() == GameStatus::InProgress {
        println!("\n{}", render_board(&game.board()));
        println!("{}", turn_message(game));

        let idx = prompt_cell("Pick a cell (0-8): ")?;
        let mover = game.turn();
        let before = game.board();

        match game.submit_move(idx) {
            Ok(outcome) => {
                if let Some(reply) = outcome.reply {
                    // Show the human mark alone, pause, then reveal the reply
                    let interim = before.apply(idx, mover)?;
                    println!("\n{}", render_board(&interim));
                    think_pause(args, game.difficulty());
                    println!("Computer takes cell {}.", reply);
                }
            }
            Err(GameError::InvalidMove(_)) => println!("Cells run from 0 to 8."),
            Err(GameError::RejectedMove) => println!("That cell is already taken."),
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

/// Ask for a cell index until the input parses
fn prompt_cell(prompt: &str) -> Result<usize> {
    loop {
        let line = prompt_line(prompt)?;
        match line.parse::<usize>() {
            Ok(idx) => return Ok(idx),
            Err(_) => println!("Enter a cell number between 0 and 8."),
        }
    }
}

fn prompt_mode() -> Result<GameMode> {
    loop {
        let line = prompt_line("Mode: [1] two player, [2] against the computer: ")?;
        match line.as_str() {
            "1" => return Ok(GameMode::HumanVsHuman),
            "2" => return Ok(GameMode::HumanVsComputer),
            _ => println!("Enter 1 or 2."),
        }
    }
}

fn prompt_difficulty() -> Result<Difficulty> {
    loop {
        let line = prompt_line("Difficulty: [1] easy, [2] medium, [3] hard: ")?;
        match line.as_str() {
            "1" => return Ok(Difficulty::Easy),
            "2" => return Ok(Difficulty::Medium),
            "3" => return Ok(Difficulty::Hard),
            _ => println!("Enter 1, 2 or 3."),
        }
    }
}

fn prompt_next_action() -> Result<NextAction> {
    loop {
        let line = prompt_line("Play again? [r]ematch / [m]enu / [q]uit: ")?;
        match line.to_lowercase().as_str() {
            "r" | "rematch" | "y" | "yes" => return Ok(NextAction::Rematch),
            "m" | "menu" => return Ok(NextAction::Menu),
            "q" | "quit" | "n" | "no" => return Ok(NextAction::Quit),
            _ => println!("Enter r, m or q."),
        }
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Parse a mode flag value
fn parse_mode(value: &str) -> Result<GameMode> {
    match value {
        "two-player" | "2p" => Ok(GameMode::HumanVsHuman),
        "computer" | "cpu" => Ok(GameMode::HumanVsComputer),
        other => anyhow::bail!("Unknown mode: {} (expected two-player or computer)", other),
    }
}

/// Parse a difficulty flag value
fn parse_difficulty(value: &str) -> Result<Difficulty> {
    match value {
        "easy" => Ok(Difficulty::Easy),
        "medium" => Ok(Difficulty::Medium),
        "hard" => Ok(Difficulty::Hard),
        other => anyhow::bail!(
            "Unknown difficulty: {} (expected easy, medium or hard)",
            other
        ),
    }
}

/// Pause before revealing the computer's move
fn think_pause(args: &PlayArgs, difficulty: Option<Difficulty>) {
    let ms = args.delay_ms.unwrap_or_else(|| default_delay_ms(difficulty));
    if ms > 0 {
        thread::sleep(Duration::from_millis(ms));
    }
}

/// Default pacing: the harder the opponent, the longer the thinking
fn default_delay_ms(difficulty: Option<Difficulty>) -> u64 {
    match difficulty {
        Some(Difficulty::Hard) => 800,
        _ => 400,
    }
}

/// Status line shown above the prompt
fn turn_message(game: &Game) -> String {
    match game.mode() {
        Some(GameMode::HumanVsComputer) => "Your turn (X)".to_string(),
        _ => format!("Player {}'s turn", game.turn()),
    }
}

/// Result line for a terminal state, None while a game is running
fn result_message(status: GameStatus, mode: Option<GameMode>) -> Option<String> {
    let message = match (status, mode) {
        (GameStatus::Won(Player::X), Some(GameMode::HumanVsComputer)) => "You win!".to_string(),
        (GameStatus::Won(Player::O), Some(GameMode::HumanVsComputer)) => {
            "Computer wins!".to_string()
        }
        (GameStatus::Won(player), _) => format!("Player {} wins!", player),
        (GameStatus::Tied, _) => "It's a tie!".to_string(),
        _ => return None,
    };
    Some(message)
}

/// Render the board with cell numbers shown in empty cells
fn render_board(board: &Board) -> String {
    let mut lines = Vec::with_capacity(5);
    for row in 0..3 {
        if row > 0 {
            lines.push("---+---+---".to_string());
        }
        let cell = |col: usize| {
            let idx = row * 3 + col;
            board
                .get(idx)
                .map(|mark| mark.to_string())
                .unwrap_or_else(|| idx.to_string())
        };
        lines.push(format!(" {} | {} | {}", cell(0), cell(1), cell(2)));
    }
    lines.join("\n")
}

/// Prompt and read one trimmed line from stdin
fn prompt_line(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut input = String::new();
    let bytes = io::stdin()
        .read_line(&mut input)
        .context("Failed to read from stdin")?;
    if bytes == 0 {
        anyhow::bail!("Input closed");
    }
    Ok(input.trim().to_string())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode() {
        assert_eq!(parse_mode("two-player").unwrap(), GameMode::HumanVsHuman);
        assert_eq!(parse_mode("computer").unwrap(), GameMode::HumanVsComputer);
        assert!(parse_mode("network").is_err());
    }

    #[test]
    fn test_parse_difficulty() {
        assert_eq!(parse_difficulty("easy").unwrap(), Difficulty::Easy);
        assert_eq!(parse_difficulty("medium").unwrap(), Difficulty::Medium);
        assert_eq!(parse_difficulty("hard").unwrap(), Difficulty::Hard);
        assert!(parse_difficulty("brutal").is_err());
    }

    #[test]
    fn test_default_delay_scales_with_difficulty() {
        assert_eq!(default_delay_ms(Some(Difficulty::Hard)), 800);
        assert_eq!(default_delay_ms(Some(Difficulty::Medium)), 400);
        assert_eq!(default_delay_ms(Some(Difficulty::Easy)), 400);
        assert_eq!(default_delay_ms(None), 400);
    }

    #[test]
    fn test_render_board_numbers_empty_cells() {
        let rendered = render_board(&Board::new());
        assert_eq!(
            rendered,
            " 0 | 1 | 2\n---+---+---\n 3 | 4 | 5\n---+---+---\n 6 | 7 | 8"
        );
    }

    #[test]
    fn test_render_board_shows_marks() {
        let board = Board::new()
            .apply(4, Player::X)
            .unwrap()
            .apply(0, Player::O)
            .unwrap();
        let rendered = render_board(&board);
        assert!(rendered.contains(" O | 1 | 2"));
        assert!(rendered.contains(" 3 | X | 5"));
    }

    #[test]
    fn test_result_messages() {
        assert_eq!(
            result_message(GameStatus::Won(Player::X), Some(GameMode::HumanVsComputer)).as_deref(),
            Some("You win!")
        );
        assert_eq!(
            result_message(GameStatus::Won(Player::O), Some(GameMode::HumanVsComputer)).as_deref(),
            Some("Computer wins!")
        );
        assert_eq!(
            result_message(GameStatus::Won(Player::O), Some(GameMode::HumanVsHuman)).as_deref(),
            Some("Player O wins!")
        );
        assert_eq!(
            result_message(GameStatus::Tied, Some(GameMode::HumanVsHuman)).as_deref(),
            Some("It's a tie!")
        );
        assert_eq!(result_message(GameStatus::InProgress, None), None);
    }
}
