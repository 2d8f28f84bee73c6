//! Simulate command - the machine plays both sides
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: resolve_config(), play_series(), report_results()
//! - Level 3: play_single_game(), machine_move(), compute_statistics()
//! - Level 4: pacing and formatting utilities

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{ensure, Context, Result};
use clap::Args;

use pasture_core::{Action, AlphaBetaAI, GameResult, Match, MatchConfig, Side};

use crate::render::{render_board, render_status};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args, Debug, Default)]
pub struct SimulateArgs {
    /// Match configuration JSON file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Board width in cells
    #[arg(long)]
    pub width: Option<u16>,

    /// Board height in cells
    #[arg(long)]
    pub height: Option<u16>,

    /// Search depth for Red
    #[arg(long)]
    pub red_depth: Option<u32>,

    /// Search depth for Blue
    #[arg(long)]
    pub blue_depth: Option<u32>,

    /// Number of games to play (the two configurations alternate colours)
    #[arg(long, default_value = "1")]
    pub games: usize,

    /// Minimum wall-clock time per machine move, in milliseconds
    #[arg(long, default_value = "0")]
    pub min_move_ms: u64,

    /// Do not print the board after every move
    #[arg(long)]
    pub quiet: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug, serde::Serialize)]
struct GameRecord {
    game_number: usize,
    swapped: bool,
    result: GameResult,
    moves: u32,
    red_cells: usize,
    blue_cells: usize,
    red_region: usize,
    blue_region: usize,
    #[serde(skip)]
    actions: Vec<Action>,
}

/// Aggregated series results
#[derive(Clone, Debug)]
struct SeriesResults {
    games: Vec<GameRecord>,
    red_wins: usize,
    blue_wins: usize,
    draws: usize,
    avg_moves: f32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run simulate command
///
/// 1. Resolve the configuration (file, then flags)
/// 2. Play the series
/// 3. Report results
pub fn run(args: SimulateArgs) -> Result<()> {
    let config = resolve_config(&args)?;

    tracing::info!(
        "Starting simulation: {}x{} board, red depth={}, blue depth={} ({} games)",
        config.width,
        config.height,
        config.red.depth,
        config.blue.depth,
        args.games
    );

    let results = play_series(&config, &args)?;

    report_results(&results, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Configuration file (or defaults) with command-line overrides applied
fn resolve_config(args: &SimulateArgs) -> Result<MatchConfig> {
    let mut config = load_config(args.config.as_ref())?;
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(depth) = args.red_depth {
        config.red.depth = depth;
    }
    if let Some(depth) = args.blue_depth {
        config.blue.depth = depth;
    }
    config.validate().context("Invalid match configuration")?;
    Ok(config)
}

/// Play all games in the series
fn play_series(config: &MatchConfig, args: &SimulateArgs) -> Result<SeriesResults> {
    let min_move = Duration::from_millis(args.min_move_ms);
    let mut games = Vec::with_capacity(args.games);

    for game_num in 0..args.games {
        // Alternate colours so each configuration plays both sides
        let swapped = game_num % 2 == 1;
        let record = play_single_game(config, game_num + 1, swapped, min_move, args.quiet)?;

        tracing::info!(
            "Game {}: {:?} ({} moves)",
            record.game_number,
            record.result,
            record.moves
        );

        games.push(record);
    }

    Ok(compute_statistics(games))
}

/// Report series results
fn report_results(results: &SeriesResults, args: &SimulateArgs) {
    if args.json {
        print_json_results(results);
    } else {
        print_text_results(results);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play one game to the end
fn play_single_game(
    config: &MatchConfig,
    game_number: usize,
    swapped: bool,
    min_move: Duration,
    quiet: bool,
) -> Result<GameRecord> {
    let mut game = config.new_match().context("Failed to set up the board")?;
    let (red_config, blue_config) = if swapped {
        (&config.blue, &config.red)
    } else {
        (&config.red, &config.blue)
    };
    let mut red = AlphaBetaAI::from_config(red_config);
    let mut blue = AlphaBetaAI::from_config(blue_config);
    let mut actions = Vec::new();

    while !game.is_over() {
        let ai = match game.side_to_move() {
            Side::Red => &mut red,
            Side::Blue => &mut blue,
        };
        let Some(action) = machine_move(&mut game, ai, min_move)? else {
            break;
        };
        actions.push(action);

        if !quiet {
            println!("{}", render_status(&game));
            println!("{}", render_board(&game));
        }
    }

    Ok(GameRecord {
        game_number,
        swapped,
        result: game.result(),
        moves: actions.len() as u32,
        red_cells: game.occupied_count(Side::Red),
        blue_cells: game.occupied_count(Side::Blue),
        red_region: game.largest_region(Side::Red),
        blue_region: game.largest_region(Side::Blue),
        actions,
    })
}

/// Search, pad to `min_move`, then play the chosen action.
/// `None` when the match is already over.
pub(crate) fn machine_move(
    game: &mut Match,
    ai: &mut AlphaBetaAI,
    min_move: Duration,
) -> Result<Option<Action>> {
    let started = Instant::now();
    let Some(action) = ai.best_action(game) else {
        return Ok(None);
    };
    pace(started, min_move);

    tracing::info!(
        side = ?game.side_to_move(),
        turn = game.turn(),
        nodes = ai.last_stats().nodes,
        "machine plays {:?}",
        action
    );
    ensure!(game.play(action), "search returned an illegal action: {:?}", action);
    Ok(Some(action))
}

/// Compute aggregate statistics from game records
fn compute_statistics(games: Vec<GameRecord>) -> SeriesResults {
    let red_wins = games
        .iter()
        .filter(|g| g.result == GameResult::RedWins)
        .count();
    let blue_wins = games
        .iter()
        .filter(|g| g.result == GameResult::BlueWins)
        .count();
    let draws = games
        .iter()
        .filter(|g| g.result == GameResult::Draw)
        .count();

    let total_moves: u32 = games.iter().map(|g| g.moves).sum();
    let avg_moves = if games.is_empty() {
        0.0
    } else {
        total_moves as f32 / games.len() as f32
    };

    SeriesResults {
        games,
        red_wins,
        blue_wins,
        draws,
        avg_moves,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Match configuration from a JSON file, or the defaults
pub(crate) fn load_config(path: Option<&PathBuf>) -> Result<MatchConfig> {
    match path {
        Some(path) => MatchConfig::load(path)
            .with_context(|| format!("Failed to load match configuration: {}", path.display())),
        None => Ok(MatchConfig::default()),
    }
}

/// Sleep out whatever is left of `min_move` since `started`
pub(crate) fn pace(started: Instant, min_move: Duration) {
    if let Some(remaining) = min_move.checked_sub(started.elapsed()) {
        thread::sleep(remaining);
    }
}

/// Print results as JSON
fn print_json_results(results: &SeriesResults) {
    #[derive(serde::Serialize)]
    struct JsonOutput<'a> {
        total_games: usize,
        red_wins: usize,
        blue_wins: usize,
        draws: usize,
        avg_moves: f32,
        games: &'a [GameRecord],
    }

    let output = JsonOutput {
        total_games: results.games.len(),
        red_wins: results.red_wins,
        blue_wins: results.blue_wins,
        draws: results.draws,
        avg_moves: results.avg_moves,
        games: &results.games,
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

/// Print results as text
fn print_text_results(results: &SeriesResults) {
    let total = results.games.len();

    println!("\n=== Simulation Results ===");
    println!("Total games: {}", total);
    println!("Red wins:    {} ({:.1}%)", results.red_wins, percentage(results.red_wins, total));
    println!("Blue wins:   {} ({:.1}%)", results.blue_wins, percentage(results.blue_wins, total));
    println!("Draws:       {} ({:.1}%)", results.draws, percentage(results.draws, total));
    println!("Avg moves:   {:.1}", results.avg_moves);

    println!("\n=== Game Details ===");
    for g in &results.games {
        println!(
            "Game {:3}: {:10} | {:3} moves | Red {:2} cells (region {:2}) | Blue {:2} cells (region {:2}){}",
            g.game_number,
            format!("{:?}", g.result),
            g.moves,
            g.red_cells,
            g.red_region,
            g.blue_cells,
            g.blue_region,
            if g.swapped { " [swapped]" } else { "" }
        );
    }
}

fn percentage(count: usize, total: usize) -> f32 {
    if total == 0 {
        0.0
    } else {
        100.0 * count as f32 / total as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_args() -> SimulateArgs {
        SimulateArgs {
            width: Some(4),
            height: Some(2),
            red_depth: Some(1),
            blue_depth: Some(1),
            games: 2,
            quiet: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = resolve_config(&small_args()).unwrap();
        assert_eq!((config.width, config.height), (4, 2));
        assert_eq!(config.red.depth, 1);
        assert_eq!(config.blue.depth, 1);
    }

    #[test]
    fn test_invalid_board_is_rejected() {
        let args = SimulateArgs {
            width: Some(3),
            height: Some(3),
            ..Default::default()
        };
        assert!(resolve_config(&args).is_err());
    }

    #[test]
    fn test_missing_config_file_has_context() {
        let args = SimulateArgs {
            config: Some(PathBuf::from("/nonexistent/pasture.json")),
            ..Default::default()
        };
        let err = resolve_config(&args).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to load match configuration"));
    }

    #[test]
    fn test_series_plays_to_the_end() {
        let args = small_args();
        let config = resolve_config(&args).unwrap();
        let results = play_series(&config, &args).unwrap();

        assert_eq!(results.games.len(), 2);
        assert_eq!(results.red_wins + results.blue_wins + results.draws, 2);
        for record in &results.games {
            assert_ne!(record.result, GameResult::Ongoing);
            assert_eq!(record.moves as usize, record.actions.len());
            // Two placements at least
            assert!(record.moves >= 2);
        }
        assert!(results.games[1].swapped);
    }

    #[test]
    fn test_pace_waits_out_the_minimum() {
        let started = Instant::now();
        pace(started, Duration::from_millis(20));
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_statistics_of_empty_series() {
        let results = compute_statistics(Vec::new());
        assert_eq!(results.avg_moves, 0.0);
        assert_eq!(percentage(0, 0), 0.0);
    }
}
