//! Pit command - play a series of games between two strategies
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_series(), report_results()
//! - Level 3: play_single_game(), compute_series_statistics()
//! - Level 4: parsing and formatting utilities

use anyhow::{Context, Result};
use clap::Args;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use oxo_core::{has_win, is_tie, Board, Bot, Difficulty, GameStatus, Player};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PitArgs {
    /// Strategy for the X seat: "easy", "medium" or "hard"
    #[arg(long, default_value = "easy")]
    pub x: String,

    /// Strategy for the O seat
    #[arg(long, default_value = "hard")]
    pub o: String,

    /// Number of games to play
    #[arg(long, default_value = "20")]
    pub games: usize,

    /// Base RNG seed; every game derives its own from it
    #[arg(long)]
    pub seed: Option<u64>,

    /// Play games across all cores
    #[arg(long)]
    pub parallel: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug)]
struct GameRecord {
    game_number: usize,
    status: GameStatus,
    moves: usize,
}

/// Aggregated series results
#[derive(Clone, Debug)]
struct SeriesResults {
    games: Vec<GameRecord>,
    x_wins: usize,
    o_wins: usize,
    ties: usize,
    avg_moves: f32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run pit command
///
/// This function reads like a table of contents:
/// 1. Resolve both strategies
/// 2. Play the series
/// 3. Report results
pub fn run(args: PitArgs) -> Result<()> {
    let x_tier = parse_tier(&args.x).with_context(|| format!("Bad --x value: {}", args.x))?;
    let o_tier = parse_tier(&args.o).with_context(|| format!("Bad --o value: {}", args.o))?;

    tracing::info!(
        "Starting series: {} (X) vs {} (O), {} games",
        x_tier,
        o_tier,
        args.games
    );

    let results = play_series(x_tier, o_tier, &args)?;

    report_results(&results, x_tier, o_tier, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Play all games in the series
fn play_series(x_tier: Difficulty, o_tier: Difficulty, args: &PitArgs) -> Result<SeriesResults> {
    let base_seed = resolve_base_seed(args.seed);
    tracing::debug!("Base seed: {}", base_seed);

    let configs = prepare_game_configs(args.games, base_seed);

    let records = if args.parallel {
        execute_games_parallel(x_tier, o_tier, &configs)?
    } else {
        execute_games(x_tier, o_tier, &configs)?
    };

    Ok(compute_series_statistics(records))
}

/// Report series results
fn report_results(results: &SeriesResults, x_tier: Difficulty, o_tier: Difficulty, args: &PitArgs) {
    if args.json {
        print_json_results(results, x_tier, o_tier);
    } else {
        print_text_results(results, x_tier, o_tier);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Configuration for a single game in a series
#[derive(Clone, Copy)]
struct GameConfig {
    game_number: usize,
    seed: u64,
}

/// Prepare per-game configurations
///
/// Seeds advance by two per game, one stream per seat.
fn prepare_game_configs(games: usize, base_seed: u64) -> Vec<GameConfig> {
    (0..games)
        .map(|i| GameConfig {
            game_number: i + 1,
            seed: base_seed.wrapping_add(2 * i as u64),
        })
        .collect()
}

/// Execute games sequentially
fn execute_games(
    x_tier: Difficulty,
    o_tier: Difficulty,
    configs: &[GameConfig],
) -> Result<Vec<GameRecord>> {
    configs
        .iter()
        .map(|gc| play_single_game(x_tier, o_tier, *gc))
        .collect()
}

/// Execute games in parallel using rayon
fn execute_games_parallel(
    x_tier: Difficulty,
    o_tier: Difficulty,
    configs: &[GameConfig],
) -> Result<Vec<GameRecord>> {
    configs
        .par_iter()
        .map(|gc| play_single_game(x_tier, o_tier, *gc))
        .collect()
}

/// Play one game with a bot in each seat
fn play_single_game(x_tier: Difficulty, o_tier: Difficulty, gc: GameConfig) -> Result<GameRecord> {
    let mut x_bot = Bot::with_seed(x_tier, gc.seed);
    let mut o_bot = Bot::with_seed(o_tier, gc.seed.wrapping_add(1));

    let mut board = Board::new();
    let mut turn = Player::X;
    let mut moves = 0usize;

    let status = loop {
        let bot = match turn {
            Player::X => &mut x_bot,
            Player::O => &mut o_bot,
        };
        let idx = bot.choose_move(&board, turn)?;
        board = board.apply(idx, turn)?;
        moves += 1;

        if has_win(&board, turn) {
            break GameStatus::Won(turn);
        }
        if is_tie(&board) {
            break GameStatus::Tied;
        }
        turn = turn.opponent();
    };

    tracing::debug!("Game {}: {:?} in {} moves", gc.game_number, status, moves);

    Ok(GameRecord {
        game_number: gc.game_number,
        status,
        moves,
    })
}

/// Compute aggregate statistics from game records
fn compute_series_statistics(games: Vec<GameRecord>) -> SeriesResults {
    let x_wins = games
        .iter()
        .filter(|g| g.status == GameStatus::Won(Player::X))
        .count();
    let o_wins = games
        .iter()
        .filter(|g| g.status == GameStatus::Won(Player::O))
        .count();
    let ties = games.iter().filter(|g| g.status == GameStatus::Tied).count();

    let total_moves: usize = games.iter().map(|g| g.moves).sum();
    let avg_moves = if games.is_empty() {
        0.0
    } else {
        total_moves as f32 / games.len() as f32
    };

    SeriesResults {
        games,
        x_wins,
        o_wins,
        ties,
        avg_moves,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Parse a strategy tier flag value
fn parse_tier(value: &str) -> Result<Difficulty> {
    match value {
        "easy" => Ok(Difficulty::Easy),
        "medium" => Ok(Difficulty::Medium),
        "hard" => Ok(Difficulty::Hard),
        other => anyhow::bail!(
            "Unknown strategy: {} (expected easy, medium or hard)",
            other
        ),
    }
}

/// Base seed: fixed for reproducibility, drawn from entropy otherwise
fn resolve_base_seed(seed: Option<u64>) -> u64 {
    match seed {
        Some(s) => s,
        None => ChaCha8Rng::from_entropy().gen(),
    }
}

/// Share of `part` in `total` as a percentage
fn percentage(part: usize, total: usize) -> f32 {
    if total > 0 {
        part as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

/// Print results as JSON
fn print_json_results(results: &SeriesResults, x_tier: Difficulty, o_tier: Difficulty) {
    #[derive(serde::Serialize)]
    struct JsonGame {
        game_number: usize,
        status: String,
        moves: usize,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        x_strategy: String,
        o_strategy: String,
        total_games: usize,
        x_wins: usize,
        o_wins: usize,
        ties: usize,
        x_win_rate: f32,
        avg_moves: f32,
        games: Vec<JsonGame>,
    }

    let total = results.games.len();
    let output = JsonOutput {
        x_strategy: x_tier.to_string(),
        o_strategy: o_tier.to_string(),
        total_games: total,
        x_wins: results.x_wins,
        o_wins: results.o_wins,
        ties: results.ties,
        x_win_rate: if total > 0 {
            results.x_wins as f32 / total as f32
        } else {
            0.0
        },
        avg_moves: results.avg_moves,
        games: results
            .games
            .iter()
            .map(|g| JsonGame {
                game_number: g.game_number,
                status: format!("{:?}", g.status),
                moves: g.moves,
            })
            .collect(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

/// Print results as text
fn print_text_results(results: &SeriesResults, x_tier: Difficulty, o_tier: Difficulty) {
    let total = results.games.len();

    println!("\n=== Series Results ===");
    println!("Pairing:     {} (X) vs {} (O)", x_tier, o_tier);
    println!("Total games: {}", total);
    println!(
        "X wins:      {} ({:.1}%)",
        results.x_wins,
        percentage(results.x_wins, total)
    );
    println!(
        "O wins:      {} ({:.1}%)",
        results.o_wins,
        percentage(results.o_wins, total)
    );
    println!(
        "Ties:        {} ({:.1}%)",
        results.ties,
        percentage(results.ties, total)
    );
    println!("Avg moves:   {:.1}", results.avg_moves);

    println!("\nGame details:");
    for game in &results.games {
        println!(
            "  Game {}: {:?} in {} moves",
            game.game_number, game.status, game.moves
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================
