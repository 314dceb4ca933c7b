//! Colorized terminal rendering of a board

use colored::{ColoredString, Colorize};

use crate::twixt::{Cell, GameState, Move, Player};

fn empty_cell(pos: Move, size: usize) -> ColoredString {
    let on_x_edge = pos.row == 0 || pos.row + 1 == size;
    let on_o_edge = pos.col == 0 || pos.col + 1 == size;
    match (on_x_edge, on_o_edge) {
        (true, true) => "·".dimmed(),
        (true, false) => "·".red().dimmed(),
        (false, true) => "·".blue().dimmed(),
        (false, false) => "·".normal(),
    }
}

fn pin(player: Player) -> ColoredString {
    match player {
        Player::X => "X".bright_red().bold(),
        Player::O => "O".bright_blue().bold(),
    }
}

/// Render the board with column and row indices.
///
/// X pins are red and O pins blue. Empty cells on X's goal rows are tinted
/// red and those on O's goal columns blue.
pub fn render_board(state: &GameState) -> String {
    let board = state.board();
    let size = board.size();
    let mut out = String::new();

    out.push_str("   ");
    for col in 0..size {
        out.push_str(&format!("{col:>2}"));
    }
    out.push('\n');

    for row in 0..size {
        out.push_str(&format!("{row:>2} "));
        for col in 0..size {
            let pos = Move::new(row, col);
            let symbol = match board.get(pos).and_then(Cell::owner) {
                Some(player) => pin(player),
                None => empty_cell(pos, size),
            };
            out.push_str(&format!(" {symbol}"));
        }
        out.push('\n');
    }

    out
}

/// One-line status under the board
pub fn render_status(state: &GameState) -> String {
    match state.outcome() {
        Some(crate::twixt::GameOutcome::Win(player)) => {
            format!("{} wins!", pin(player))
        }
        Some(crate::twixt::GameOutcome::Draw) => "Draw.".to_string(),
        None => format!("{} to move", pin(state.to_move())),
    }
}
