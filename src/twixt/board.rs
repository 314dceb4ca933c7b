//! Board representation and basic cell operations

use std::fmt;

use serde::{Deserialize, Serialize};

/// Side length of the reference board
pub const DEFAULT_BOARD_SIZE: usize = 6;

/// A cell on the Twixt board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    X,
    O,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' => Some(Cell::Empty),
            'X' | 'x' => Some(Cell::X),
            'O' | 'o' => Some(Cell::O),
            _ => None,
        }
    }

    pub fn owner(self) -> Option<Player> {
        match self {
            Cell::X => Some(Player::X),
            Cell::O => Some(Player::O),
            Cell::Empty => None,
        }
    }
}

/// A player in the game
///
/// `X` moves first and connects the top row to the bottom row.
/// `O` connects the left column to the right column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    #[serde(alias = "x")]
    X,
    #[serde(alias = "o")]
    O,
}

impl Player {
    /// Get the opponent player
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Convert player to cell
    pub fn to_cell(self) -> Cell {
        match self {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }

    pub fn to_char(self) -> char {
        self.to_cell().to_char()
    }

    /// Whether a pin at `pos` lies on this player's start edge
    pub fn on_start_edge(self, pos: Move) -> bool {
        match self {
            Player::X => pos.row == 0,
            Player::O => pos.col == 0,
        }
    }

    /// Whether a pin at `pos` lies on this player's goal edge
    pub fn on_goal_edge(self, pos: Move, size: usize) -> bool {
        match self {
            Player::X => pos.row + 1 == size,
            Player::O => pos.col + 1 == size,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl std::str::FromStr for Player {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "x" | "X" | "1" => Ok(Player::X),
            "o" | "O" | "2" => Ok(Player::O),
            other => Err(crate::Error::InvalidConfiguration {
                message: format!("unknown player '{other}' (expected x or o)"),
            }),
        }
    }
}

/// A board coordinate; as an action, the cell a pin is placed on
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Move {
    pub row: usize,
    pub col: usize,
}

impl Move {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Apply a signed offset, returning `None` if the result leaves a `size`×`size` board
    pub fn offset(self, dr: isize, dc: isize, size: usize) -> Option<Move> {
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        (row < size && col < size).then_some(Move { row, col })
    }

    pub fn manhattan(self, other: Move) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Square grid of cells, stored row-major
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create an empty `size`×`size` board
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    /// Parse a board from rows of `.`, `X` and `O`; whitespace is ignored.
    pub fn from_rows(rows: &[&str]) -> Option<Self> {
        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);
        for row in rows {
            let parsed: Option<Vec<Cell>> = row
                .chars()
                .filter(|c| !c.is_whitespace())
                .map(Cell::from_char)
                .collect();
            let parsed = parsed?;
            if parsed.len() != size {
                return None;
            }
            cells.extend(parsed);
        }
        Some(Self { size, cells })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn in_bounds(&self, pos: Move) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    /// Get the cell at `pos`; out-of-bounds coordinates read as `None`
    pub fn get(&self, pos: Move) -> Option<Cell> {
        self.in_bounds(pos)
            .then(|| self.cells[pos.row * self.size + pos.col])
    }

    pub fn is_empty(&self, pos: Move) -> bool {
        self.get(pos) == Some(Cell::Empty)
    }

    pub fn is_owned_by(&self, pos: Move, player: Player) -> bool {
        self.get(pos) == Some(player.to_cell())
    }

    pub(crate) fn set(&mut self, pos: Move, cell: Cell) {
        let index = pos.row * self.size + pos.col;
        self.cells[index] = cell;
    }

    /// All coordinates in row-major scan order
    pub fn positions(&self) -> impl Iterator<Item = Move> + '_ {
        (0..self.size).flat_map(move |row| (0..self.size).map(move |col| Move { row, col }))
    }

    /// Empty cells in row-major scan order
    pub fn empty_positions(&self) -> Vec<Move> {
        self.positions().filter(|&pos| self.is_empty(pos)).collect()
    }

    /// Pins owned by `player` in row-major scan order
    pub fn pins(&self, player: Player) -> Vec<Move> {
        self.positions()
            .filter(|&pos| self.is_owned_by(pos, player))
            .collect()
    }

    pub fn is_full(&self) -> bool {
        !self.cells.contains(&Cell::Empty)
    }

    /// Row-major character encoding, e.g. `X....O...`
    pub fn encode(&self) -> String {
        self.cells.iter().map(|&c| c.to_char()).collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.chunks(self.size).enumerate() {
            let line: Vec<String> = row.iter().map(|c| c.to_char().to_string()).collect();
            write!(f, "{}", line.join(" "))?;
            if i + 1 < self.size {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new(6);
        assert_eq!(board.size(), 6);
        assert_eq!(board.empty_positions().len(), 36);
        assert!(!board.is_full());
    }

    #[test]
    fn test_out_of_bounds_reads_none() {
        let board = Board::new(4);
        assert_eq!(board.get(Move::new(4, 0)), None);
        assert_eq!(board.get(Move::new(0, 4)), None);
        assert!(!board.is_empty(Move::new(9, 9)));
    }

    #[test]
    fn test_scan_order_is_row_major() {
        let board = Board::new(3);
        let order: Vec<Move> = board.positions().collect();
        assert_eq!(order[0], Move::new(0, 0));
        assert_eq!(order[1], Move::new(0, 1));
        assert_eq!(order[3], Move::new(1, 0));
        assert_eq!(order[8], Move::new(2, 2));
    }

    #[test]
    fn test_from_rows() {
        let board = Board::from_rows(&["X..", ".O.", "..X"]).unwrap();
        assert_eq!(board.get(Move::new(0, 0)), Some(Cell::X));
        assert_eq!(board.get(Move::new(1, 1)), Some(Cell::O));
        assert_eq!(board.pins(Player::X), vec![Move::new(0, 0), Move::new(2, 2)]);

        assert!(Board::from_rows(&["X..", ".O"]).is_none());
        assert!(Board::from_rows(&["X.Z", "...", "..."]).is_none());
    }

    #[test]
    fn test_offset_stays_in_bounds() {
        let pos = Move::new(0, 1);
        assert_eq!(pos.offset(-1, 0, 6), None);
        assert_eq!(pos.offset(1, -1, 6), Some(Move::new(1, 0)));
        assert_eq!(pos.offset(2, 5, 6), None);
    }

    #[test]
    fn test_edges() {
        assert!(Player::X.on_start_edge(Move::new(0, 3)));
        assert!(Player::X.on_goal_edge(Move::new(5, 0), 6));
        assert!(Player::O.on_start_edge(Move::new(3, 0)));
        assert!(Player::O.on_goal_edge(Move::new(2, 5), 6));
        assert!(!Player::O.on_goal_edge(Move::new(5, 2), 6));
    }

    #[test]
    fn test_display() {
        let board = Board::from_rows(&["X.", ".O"]).unwrap();
        assert_eq!(format!("{board}"), "X .\n. O");
    }

    #[test]
    fn test_player_from_str() {
        assert_eq!("x".parse::<Player>().unwrap(), Player::X);
        assert_eq!("O".parse::<Player>().unwrap(), Player::O);
        assert!("z".parse::<Player>().is_err());
    }
}
