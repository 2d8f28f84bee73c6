//! Position evaluation

use crate::cell::CellId;
use crate::game::{GameResult, Match, Side};
use serde::{Deserialize, Serialize};

/// Heuristic weights for position evaluation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Heuristics {
    /// Bonus per friendly neighbour
    pub friendly_weight: f32,
    /// Penalty per sheep stuck in a surrounded herd, beyond the one that holds the cell
    pub surrounded_weight: f32,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            friendly_weight: 0.1,
            surrounded_weight: 1.0,
        }
    }
}

/// Score of a proven win for Red; Blue's wins score the negation
pub const WIN_VALUE: f32 = f32::INFINITY;

/// Evaluate position from Red's perspective (positive favours Red)
pub fn evaluate(game: &Match, heuristics: &Heuristics) -> f32 {
    match game.result() {
        GameResult::RedWins => return WIN_VALUE,
        GameResult::BlueWins => return -WIN_VALUE,
        // Neither side prefers a draw over the other
        GameResult::Draw => return 0.0,
        GameResult::Ongoing => {}
    }

    game.grid()
        .cells()
        .filter(|(_, cell)| !cell.is_free())
        .map(|(id, _)| cell_value(game, id, heuristics))
        .sum()
}

/// Contribution of a single occupied cell, signed by its owner
pub fn cell_value(game: &Match, id: CellId, heuristics: &Heuristics) -> f32 {
    let grid = game.grid();
    let herd = match grid.cell(id).herd() {
        Some(h) => h,
        None => return 0.0,
    };

    let free = grid.free_neighbour_count(id) as f32;
    let friendly = grid.friendly_neighbour_count(id) as f32;
    let size = herd.size as f32;

    let mut value = free * size + friendly * heuristics.friendly_weight;
    if free == 0.0 {
        value -= surrounded_penalty(herd.size, heuristics);
    }

    match herd.side {
        Side::Red => value,
        Side::Blue => -value,
    }
}

/// Sheep in a surrounded herd can never move again
fn surrounded_penalty(size: u32, heuristics: &Heuristics) -> f32 {
    heuristics.surrounded_weight * size.saturating_sub(1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Hex;

    #[test]
    fn test_empty_board_is_neutral() {
        let game = Match::new(4, 4).unwrap();
        assert_eq!(evaluate(&game, &Heuristics::default()), 0.0);
    }

    #[test]
    fn test_mirrored_position_is_neutral() {
        // Corners (0, 0) and (3, 3) of a 4x4 board have the same neighbourhood size
        let herds = [
            (Hex::from_offset(0, 0), Side::Red, 8),
            (Hex::from_offset(3, 3), Side::Blue, 8),
        ];
        let game = Match::from_position(4, 4, 3, Side::Red, &herds).unwrap();
        let h = Heuristics::default();
        let red = cell_value(&game, game.grid().cell_at_offset(0, 0).unwrap(), &h);
        let blue = cell_value(&game, game.grid().cell_at_offset(3, 3).unwrap(), &h);
        assert_eq!(evaluate(&game, &h), red + blue);
        assert!(red > 0.0);
        assert!(blue < 0.0);
    }

    #[test]
    fn test_free_neighbours_times_herd() {
        let herds = [
            (Hex::from_offset(1, 1), Side::Red, 5),
            (Hex::from_offset(1, 0), Side::Red, 1),
            (Hex::from_offset(3, 3), Side::Blue, 2),
        ];
        let game = Match::from_position(4, 4, 3, Side::Red, &herds).unwrap();
        let h = Heuristics::default();
        let id = game.grid().cell_at_offset(1, 1).unwrap();
        // Six neighbours, one of them friendly
        let expected = 5.0 * 5.0 + 0.1;
        assert!((cell_value(&game, id, &h) - expected).abs() < 1e-5);
    }

    #[test]
    fn test_surrounded_herd_is_penalised() {
        // Red corner herd walled in by Blue
        let herds = [
            (Hex::from_offset(0, 0), Side::Red, 4),
            (Hex::from_offset(1, 0), Side::Blue, 1),
            (Hex::from_offset(0, 1), Side::Blue, 1),
        ];
        let game = Match::from_position(4, 4, 3, Side::Blue, &herds).unwrap();
        let h = Heuristics::default();
        let id = game.grid().cell_at_offset(0, 0).unwrap();
        assert!(game.grid().is_surrounded(id));
        assert_eq!(cell_value(&game, id, &h), -3.0);
    }

    #[test]
    fn test_terminal_overrides_heuristic() {
        let herds = [
            (Hex::from_offset(0, 0), Side::Red, 1),
            (Hex::from_offset(2, 0), Side::Red, 1),
            (Hex::from_offset(3, 3), Side::Blue, 1),
        ];
        let game = Match::from_position(4, 4, 7, Side::Blue, &herds).unwrap();
        assert_eq!(evaluate(&game, &Heuristics::default()), f32::INFINITY);

        let herds = [
            (Hex::from_offset(0, 0), Side::Red, 1),
            (Hex::from_offset(2, 0), Side::Blue, 1),
            (Hex::from_offset(3, 3), Side::Blue, 1),
        ];
        let game = Match::from_position(4, 4, 7, Side::Red, &herds).unwrap();
        assert_eq!(evaluate(&game, &Heuristics::default()), f32::NEG_INFINITY);
    }

    #[test]
    fn test_draw_scores_neutral() {
        // Red's open interior cell would outscore Blue's corner
        let herds = [
            (Hex::from_offset(1, 1), Side::Red, 1),
            (Hex::from_offset(0, 0), Side::Blue, 1),
        ];
        let game = Match::from_position(4, 4, 5, Side::Red, &herds).unwrap();
        assert_eq!(game.result(), GameResult::Draw);
        assert_eq!(evaluate(&game, &Heuristics::default()), 0.0);
    }
}
