//! Game state: board, side to move, links, and outcome

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{
    board::{Board, DEFAULT_BOARD_SIZE, Move, Player},
    game::GameOutcome,
    links::LinkSet,
    rules::ConnectionRule,
};

/// Smallest board on which both players have distinct start and goal edges
pub const MIN_BOARD_SIZE: usize = 2;
/// Largest supported board
pub const MAX_BOARD_SIZE: usize = 26;

/// Complete game state
///
/// Cells only ever go from empty to occupied and links are only ever added,
/// so a state can be cloned to produce independent search successors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameState {
    board: Board,
    rule: ConnectionRule,
    links: LinkSet,
    to_move: Player,
    outcome: Option<GameOutcome>,
}

impl GameState {
    /// Empty 6×6 board under the adjacency rule, X to move
    pub fn new() -> Self {
        Self::empty(DEFAULT_BOARD_SIZE, ConnectionRule::Adjacency)
    }

    /// Empty board of the given size and rule, X to move
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if `size` is outside
    /// [`MIN_BOARD_SIZE`]..=[`MAX_BOARD_SIZE`].
    pub fn with_rules(size: usize, rule: ConnectionRule) -> Result<Self, crate::Error> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
            return Err(crate::Error::InvalidConfiguration {
                message: format!(
                    "board size {size} is outside {MIN_BOARD_SIZE}..={MAX_BOARD_SIZE}"
                ),
            });
        }
        Ok(Self::empty(size, rule))
    }

    fn empty(size: usize, rule: ConnectionRule) -> Self {
        Self {
            board: Board::new(size),
            rule,
            links: LinkSet::new(),
            to_move: Player::X,
            outcome: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn size(&self) -> usize {
        self.board.size()
    }

    pub fn rule(&self) -> ConnectionRule {
        self.rule
    }

    pub fn links(&self) -> &LinkSet {
        &self.links
    }

    /// Player whose turn it is; after a win this stays the winner
    pub fn to_move(&self) -> Player {
        self.to_move
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn winner(&self) -> Option<Player> {
        match self.outcome {
            Some(GameOutcome::Win(player)) => Some(player),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    /// In bounds and the target cell is empty
    pub fn is_valid_move(&self, mv: Move) -> bool {
        self.board.is_empty(mv)
    }

    /// Empty cells in row-major order; empty once the game is over
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.board.empty_positions()
    }

    /// Place a pin for the side to move, in place.
    ///
    /// On failure the state is left untouched.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::GameOver`] if the game has already ended
    /// - [`crate::Error::InvalidMove`] if `mv` is out of bounds or occupied
    pub fn apply_move(&mut self, mv: Move) -> Result<(), crate::Error> {
        if self.is_terminal() {
            return Err(crate::Error::GameOver);
        }
        if !self.is_valid_move(mv) {
            return Err(crate::Error::InvalidMove {
                row: mv.row,
                col: mv.col,
            });
        }

        let player = self.to_move;
        self.board.set(mv, player.to_cell());
        self.rule
            .record_links(&self.board, &mut self.links, mv, player);

        if self.rule.has_connection(&self.board, &self.links, player) {
            self.outcome = Some(GameOutcome::Win(player));
        } else if self.board.is_full() {
            self.outcome = Some(GameOutcome::Draw);
        } else {
            self.to_move = player.opponent();
        }
        Ok(())
    }

    /// Apply a move to a copy of this state
    #[must_use = "successor returns a new state; the original is unchanged"]
    pub fn successor(&self, mv: Move) -> Result<GameState, crate::Error> {
        let mut next = self.clone();
        next.apply_move(mv)?;
        Ok(next)
    }

    /// Key for tabular learners: row-major cells plus the side to move, e.g. `X...O..._O`
    pub fn encode(&self) -> String {
        format!("{}_{}", self.board.encode(), self.to_move.to_char())
    }

    /// Replay a move sequence from an empty board
    pub fn from_moves(
        size: usize,
        rule: ConnectionRule,
        moves: &[Move],
    ) -> Result<GameState, crate::Error> {
        let mut state = Self::with_rules(size, rule)?;
        for &mv in moves {
            state.apply_move(mv)?;
        }
        Ok(state)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.board)?;
        match self.outcome {
            Some(GameOutcome::Win(player)) => write!(f, "{player} wins"),
            Some(GameOutcome::Draw) => write!(f, "draw"),
            None => write!(f, "{} to move", self.to_move),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::twixt::links::Link;

    #[test]
    fn test_new_state() {
        let state = GameState::new();
        assert_eq!(state.size(), 6);
        assert_eq!(state.to_move(), Player::X);
        assert!(!state.is_terminal());
        assert_eq!(state.legal_moves().len(), 36);
    }

    #[test]
    fn test_apply_move_alternates_players() {
        let mut state = GameState::new();
        state.apply_move(Move::new(0, 0)).unwrap();
        assert_eq!(state.to_move(), Player::O);
        state.apply_move(Move::new(3, 3)).unwrap();
        assert_eq!(state.to_move(), Player::X);
        assert_eq!(state.legal_moves().len(), 34);
    }

    #[test]
    fn test_invalid_moves_leave_state_unchanged() {
        let mut state = GameState::new();
        state.apply_move(Move::new(2, 2)).unwrap();
        let before = state.clone();

        let occupied = state.apply_move(Move::new(2, 2));
        assert!(matches!(
            occupied,
            Err(crate::Error::InvalidMove { row: 2, col: 2 })
        ));
        let out_of_bounds = state.apply_move(Move::new(6, 0));
        assert!(matches!(
            out_of_bounds,
            Err(crate::Error::InvalidMove { row: 6, col: 0 })
        ));
        assert_eq!(state, before);
    }

    #[test]
    fn test_vertical_win_for_x() {
        let state = GameState::from_moves(
            3,
            ConnectionRule::Adjacency,
            &[
                Move::new(0, 1),
                Move::new(0, 0),
                Move::new(1, 1),
                Move::new(1, 0),
                Move::new(2, 1),
            ],
        )
        .unwrap();
        assert!(state.is_terminal());
        assert_eq!(state.winner(), Some(Player::X));
        assert_eq!(state.to_move(), Player::X);
        assert!(state.legal_moves().is_empty());
    }

    #[test]
    fn test_moves_after_game_over_rejected() {
        let mut state = GameState::from_moves(
            2,
            ConnectionRule::Adjacency,
            &[Move::new(0, 0), Move::new(0, 1), Move::new(1, 0)],
        )
        .unwrap();
        assert_eq!(state.winner(), Some(Player::X));
        assert!(matches!(
            state.apply_move(Move::new(1, 1)),
            Err(crate::Error::GameOver)
        ));
    }

    #[test]
    fn test_draw_when_board_fills_without_connection() {
        // Under the bridge rule a 2x2 board can never form a link.
        let state = GameState::from_moves(
            2,
            ConnectionRule::Bridge,
            &[
                Move::new(0, 0),
                Move::new(0, 1),
                Move::new(1, 1),
                Move::new(1, 0),
            ],
        )
        .unwrap();
        assert!(state.is_terminal());
        assert_eq!(state.outcome(), Some(GameOutcome::Draw));
        assert_eq!(state.winner(), None);
    }

    #[test]
    fn test_bridge_links_recorded_on_placement() {
        let mut state = GameState::with_rules(6, ConnectionRule::Bridge).unwrap();
        state.apply_move(Move::new(0, 0)).unwrap(); // X
        state.apply_move(Move::new(5, 5)).unwrap(); // O
        state.apply_move(Move::new(2, 1)).unwrap(); // X, knight from (0,0)

        let expected = Link::new(Move::new(0, 0), Move::new(2, 1));
        assert!(state.links().contains(Player::X, &expected));
        assert_eq!(state.links().len(Player::O), 0);
    }

    #[test]
    fn test_successor_keeps_links_and_original() {
        let mut state = GameState::with_rules(6, ConnectionRule::Bridge).unwrap();
        state.apply_move(Move::new(0, 0)).unwrap();
        state.apply_move(Move::new(5, 5)).unwrap();

        let next = state.successor(Move::new(2, 1)).unwrap();
        assert_eq!(next.links().len(Player::X), 1);
        assert_eq!(state.links().len(Player::X), 0);
        assert!(state.is_valid_move(Move::new(2, 1)));
    }

    #[test]
    fn test_encode() {
        let mut state = GameState::with_rules(3, ConnectionRule::Adjacency).unwrap();
        assert_eq!(state.encode(), "........._X");
        state.apply_move(Move::new(0, 1)).unwrap();
        assert_eq!(state.encode(), ".X......._O");
    }

    #[test]
    fn test_with_rules_rejects_bad_size() {
        assert!(GameState::with_rules(1, ConnectionRule::Adjacency).is_err());
        assert!(GameState::with_rules(27, ConnectionRule::Bridge).is_err());
    }
}
