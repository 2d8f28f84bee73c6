//! Alpha-beta search over reversible moves

use std::cmp::Ordering;

use crate::config::AiConfig;
use crate::eval::{evaluate, Heuristics};
use crate::game::{Action, Match, Side};

// ============================================================================
// SEARCH RESULTS
// ============================================================================

/// Value of a searched position and the action that achieves it
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchResult {
    pub value: f32,
    /// `None` at leaves and terminal positions
    pub action: Option<Action>,
}

/// Counters for the last search
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub cutoffs: u64,
}

// ============================================================================
// ALPHA-BETA AI
// ============================================================================

/// Alpha-Beta AI player
#[derive(Clone, Debug)]
pub struct AlphaBetaAI {
    pub depth: u32,
    pub heuristics: Heuristics,
    stats: SearchStats,
}

impl AlphaBetaAI {
    pub fn new(depth: u32, heuristics: Heuristics) -> Self {
        Self {
            depth,
            heuristics,
            stats: SearchStats::default(),
        }
    }

    pub fn from_config(config: &AiConfig) -> Self {
        Self::new(config.depth, config.heuristics.clone())
    }

    /// Best action for the side to move, `None` once the match is over.
    /// The match is left exactly as it was, including any move under
    /// composition.
    pub fn best_action(&mut self, game: &mut Match) -> Option<Action> {
        if game.is_over() {
            return None;
        }

        self.stats = SearchStats::default();
        let result = alpha_beta(
            game,
            self.depth.max(1),
            f32::NEG_INFINITY,
            f32::INFINITY,
            &self.heuristics,
            &mut self.stats,
        );

        tracing::debug!(
            side = ?game.side_to_move(),
            turn = game.turn(),
            depth = self.depth,
            value = result.value,
            nodes = self.stats.nodes,
            cutoffs = self.stats.cutoffs,
            "chose {:?}",
            result.action
        );

        result.action
    }

    /// Play both sides until the match is over; returns the number of moves made
    pub fn play_game(&mut self, game: &mut Match) -> u32 {
        let mut moves_made = 0;
        while let Some(action) = self.best_action(game) {
            let _committed = game.apply(action);
            moves_made += 1;
        }
        moves_made
    }

    pub fn last_stats(&self) -> SearchStats {
        self.stats
    }
}

// ============================================================================
// MINIMAX WITH ALPHA-BETA
// ============================================================================

/// Minimax value of `game` searched `depth` plies deep within (`alpha`, `beta`).
///
/// Red maximises, Blue minimises. Every action is applied to `game` and
/// undone before the next one is tried, so `game` is unchanged on return.
pub fn search(
    game: &mut Match,
    depth: u32,
    alpha: f32,
    beta: f32,
    heuristics: &Heuristics,
) -> SearchResult {
    let mut stats = SearchStats::default();
    alpha_beta(game, depth, alpha, beta, heuristics, &mut stats)
}

fn alpha_beta(
    game: &mut Match,
    depth: u32,
    mut alpha: f32,
    mut beta: f32,
    heuristics: &Heuristics,
    stats: &mut SearchStats,
) -> SearchResult {
    stats.nodes += 1;

    if depth == 0 || game.is_over() {
        return SearchResult {
            value: evaluate(game, heuristics),
            action: None,
        };
    }

    let maximizing = game.side_to_move() == Side::Red;
    let ordered = ordered_actions(game, heuristics, maximizing);
    assert!(
        !ordered.is_empty(),
        "no legal actions for {:?} at turn {} although the match is not over",
        game.side_to_move(),
        game.turn()
    );

    // Leaves were already scored while ordering
    if depth == 1 {
        stats.nodes += ordered.len() as u64;
        let (value, action) = ordered[0];
        return SearchResult {
            value,
            action: Some(action),
        };
    }

    let mut best = SearchResult {
        value: if maximizing { f32::NEG_INFINITY } else { f32::INFINITY },
        action: Some(ordered[0].1),
    };

    for (_, action) in ordered {
        let undo = game.apply(action);
        let value = alpha_beta(game, depth - 1, alpha, beta, heuristics, stats).value;
        game.undo(undo);

        if maximizing {
            if value > best.value {
                best = SearchResult { value, action: Some(action) };
            }
            alpha = alpha.max(value);
            if value >= beta {
                stats.cutoffs += 1;
                break;
            }
        } else {
            if value < best.value {
                best = SearchResult { value, action: Some(action) };
            }
            beta = beta.min(value);
            if value <= alpha {
                stats.cutoffs += 1;
                break;
            }
        }
    }

    best
}

// ============================================================================
// MOVE ORDERING
// ============================================================================

/// Legal actions with their one-ply evaluation, best first for the mover
fn ordered_actions(game: &mut Match, heuristics: &Heuristics, maximizing: bool) -> Vec<(f32, Action)> {
    let mut scored: Vec<(f32, Action)> = game
        .legal_actions()
        .into_iter()
        .map(|action| {
            let undo = game.apply(action);
            let score = evaluate(game, heuristics);
            game.undo(undo);
            (score, action)
        })
        .collect();

    if maximizing {
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    } else {
        scored.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
    }
    scored
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Hex;
    use crate::game::{GameResult, SelectOutcome};

    fn placed_game() -> Match {
        let mut game = Match::new(4, 4).unwrap();
        let red = game.initial_cells()[0];
        assert!(game.play(Action::Place { cell: red }));
        let blue = *game.initial_cells().last().unwrap();
        assert!(game.play(Action::Place { cell: blue }));
        game
    }

    #[test]
    fn test_ai_returns_action() {
        let mut game = Match::new(4, 4).unwrap();
        let mut ai = AlphaBetaAI::new(2, Heuristics::default());
        let action = ai.best_action(&mut game);
        assert!(matches!(action, Some(Action::Place { .. })));
        assert!(ai.last_stats().nodes > 1);
    }

    #[test]
    fn test_search_leaves_match_untouched() {
        let mut game = placed_game();
        let before = game.clone();
        let result = search(&mut game, 3, f32::NEG_INFINITY, f32::INFINITY, &Heuristics::default());
        assert!(result.action.is_some());
        assert_eq!(game, before);
    }

    #[test]
    fn test_search_keeps_composed_move() {
        let mut game = placed_game();
        let source = game.movable_cells()[0];
        assert_eq!(game.select(Some(source)), SelectOutcome::Chosen(source));
        let target = game.grid().potential_targets(source)[0];
        assert_eq!(game.select(Some(target)), SelectOutcome::Targeted(target));
        let before = game.clone();

        let result = search(&mut game, 2, f32::NEG_INFINITY, f32::INFINITY, &Heuristics::default());
        assert!(result.action.is_some());
        assert_eq!(game, before);

        let mut ai = AlphaBetaAI::new(2, Heuristics::default());
        assert!(ai.best_action(&mut game).is_some());
        assert_eq!(game, before);
        assert_eq!(game.confirm(), Some(Action::Split { from: source, to: target, amount: 1 }));
    }

    #[test]
    fn test_depth_one_picks_best_evaluation() {
        let mut game = placed_game();
        let h = Heuristics::default();

        let mut best = f32::NEG_INFINITY;
        for action in game.legal_actions() {
            let undo = game.apply(action);
            best = best.max(evaluate(&game, &h));
            game.undo(undo);
        }

        let result = search(&mut game, 1, f32::NEG_INFINITY, f32::INFINITY, &h);
        assert_eq!(result.value, best);

        let undo = game.apply(result.action.unwrap());
        assert_eq!(evaluate(&game, &h), best);
        game.undo(undo);
    }

    #[test]
    fn test_minimizer_picks_lowest_evaluation() {
        let mut game = Match::new(4, 4).unwrap();
        assert!(game.play(Action::Place { cell: game.initial_cells()[0] }));
        let h = Heuristics::default();

        let lowest = game
            .legal_actions()
            .into_iter()
            .map(|action| {
                let undo = game.apply(action);
                let value = evaluate(&game, &h);
                game.undo(undo);
                value
            })
            .fold(f32::INFINITY, f32::min);

        let result = search(&mut game, 1, f32::NEG_INFINITY, f32::INFINITY, &h);
        assert_eq!(result.value, lowest);
    }

    #[test]
    fn test_ai_takes_winning_split() {
        // Splitting into (0, 1) joins Red's cells and wins the region tie-break;
        // splitting along the other line only draws.
        let herds = [
            (Hex::from_offset(0, 0), Side::Red, 2),
            (Hex::from_offset(0, 2), Side::Blue, 1),
            (Hex::from_offset(3, 3), Side::Blue, 1),
        ];
        let mut game = Match::from_position(4, 4, 5, Side::Red, &herds).unwrap();
        let winning = game.grid().cell_at_offset(0, 1).unwrap();

        for depth in 1..=3 {
            let mut ai = AlphaBetaAI::new(depth, Heuristics::default());
            let action = ai.best_action(&mut game).unwrap();
            assert!(matches!(action, Action::Split { to, .. } if to == winning));
        }

        let mut ai = AlphaBetaAI::new(2, Heuristics::default());
        let action = ai.best_action(&mut game).unwrap();
        assert!(game.play(action));
        assert_eq!(game.result(), GameResult::RedWins);
    }

    #[test]
    fn test_lost_position_still_yields_action() {
        // Every Red split leaves Blue ahead on cells
        let herds = [
            (Hex::from_offset(0, 0), Side::Red, 2),
            (Hex::from_offset(3, 0), Side::Blue, 1),
            (Hex::from_offset(3, 2), Side::Blue, 1),
            (Hex::from_offset(1, 3), Side::Blue, 1),
        ];
        let mut game = Match::from_position(4, 4, 5, Side::Red, &herds).unwrap();
        let result = search(&mut game, 2, f32::NEG_INFINITY, f32::INFINITY, &Heuristics::default());
        assert_eq!(result.value, f32::NEG_INFINITY);
        assert!(result.action.is_some());
    }

    #[test]
    fn test_terminal_position_has_no_action() {
        let herds = [
            (Hex::from_offset(0, 0), Side::Red, 1),
            (Hex::from_offset(3, 3), Side::Blue, 1),
        ];
        let mut game = Match::from_position(4, 4, 5, Side::Red, &herds).unwrap();
        assert_eq!(game.result(), GameResult::Draw);
        let mut ai = AlphaBetaAI::new(2, Heuristics::default());
        assert_eq!(ai.best_action(&mut game), None);
    }

    #[test]
    fn test_play_game_reaches_the_end() {
        let mut game = Match::new(4, 2).unwrap();
        let mut ai = AlphaBetaAI::new(2, Heuristics::default());
        let moves = ai.play_game(&mut game);
        assert!(game.is_over());
        assert!(moves >= 2);
        assert_eq!(game.herd_total(Side::Red), game.initial_herd());
        assert_eq!(game.herd_total(Side::Blue), game.initial_herd());
    }
}
