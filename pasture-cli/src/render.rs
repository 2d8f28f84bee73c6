//! Text rendering of a match
//!
//! Flat-topped hexes become two text lines per row: even columns on the
//! first line, odd columns (which sit half a cell lower) on the second.

use std::fmt::Write;

use pasture_core::{CellId, Match, Side, Staged};

const CELL_WIDTH: usize = 6;

fn side_letter(side: Side) -> char {
    match side {
        Side::Red => 'R',
        Side::Blue => 'B',
    }
}

/// Label of one cell, bracketed when focused
fn cell_label(game: &Match, id: CellId) -> String {
    let cell = game.grid().cell(id);
    let body = match (cell.staged(), cell.herd()) {
        (Staged::Planned(n), _) => format!("*{}", n),
        (Staged::Unstaged, Some(herd)) => format!("{}{}", side_letter(herd.side), herd.size),
        (Staged::Unstaged, None) if cell.is_targeted() => "o".to_string(),
        (Staged::Unstaged, None) => ".".to_string(),
    };

    if game.should_be_focused(id, false) {
        format!("{:^width$}", format!("[{}]", body), width = CELL_WIDTH)
    } else {
        format!("{:^width$}", body, width = CELL_WIDTH)
    }
}

/// Whole board with column and row numbers
pub fn render_board(game: &Match) -> String {
    let grid = game.grid();
    let mut out = String::new();

    out.push_str("    ");
    for col in 0..grid.width() {
        let _ = write!(out, "{:^width$}", col, width = CELL_WIDTH);
    }
    out.push('\n');

    for row in 0..grid.height() as i16 {
        for parity in 0..2 {
            if parity == 0 {
                let _ = write!(out, "{:>3} ", row);
            } else {
                out.push_str("    ");
            }
            for col in 0..grid.width() as i16 {
                match grid.cell_at_offset(col, row) {
                    Some(id) if col % 2 == parity => out.push_str(&cell_label(game, id)),
                    _ => out.push_str(&" ".repeat(CELL_WIDTH)),
                }
            }
            out.truncate(out.trim_end().len());
            out.push('\n');
        }
    }

    out
}

/// One-line status: turn, side to move, herds on the board
pub fn render_status(game: &Match) -> String {
    if game.is_over() {
        return match game.winner() {
            Some(side) => format!("Turn {}: {:?} has won", game.turn(), side),
            None => format!("Turn {}: draw", game.turn()),
        };
    }
    format!(
        "Turn {}: {:?} to move ({:?}) | Red {} cells, Blue {} cells",
        game.turn(),
        game.side_to_move(),
        game.phase(),
        game.occupied_count(Side::Red),
        game.occupied_count(Side::Blue),
    )
}
