//! Connection rules and the connectivity oracle
//!
//! Two rule variants decide which pins count as connected:
//!
//! - [`ConnectionRule::Adjacency`]: pins touching in any of the 8 directions.
//! - [`ConnectionRule::Bridge`]: pins joined by a recorded [`Link`], which is
//!   created when a pin is placed a knight's move away from a friendly pin.
//!
//! A game uses exactly one rule for its whole lifetime.

use std::{collections::VecDeque, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::{
    board::{Board, Move, Player},
    links::{Link, LinkSet},
};

/// King-move neighbourhood
pub const ADJACENT_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Knight-move neighbourhood used for bridges
pub const KNIGHT_OFFSETS: [(isize, isize); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionRule {
    #[default]
    Adjacency,
    Bridge,
}

impl ConnectionRule {
    pub fn offsets(self) -> &'static [(isize, isize); 8] {
        match self {
            ConnectionRule::Adjacency => &ADJACENT_OFFSETS,
            ConnectionRule::Bridge => &KNIGHT_OFFSETS,
        }
    }

    /// Record a link for every friendly pin a knight's move from `pin`.
    ///
    /// Only the bridge rule keeps links; under adjacency this is a no-op.
    pub fn record_links(self, board: &Board, links: &mut LinkSet, pin: Move, player: Player) {
        if self != ConnectionRule::Bridge {
            return;
        }
        for &(dr, dc) in &KNIGHT_OFFSETS {
            if let Some(other) = pin.offset(dr, dc, board.size())
                && board.is_owned_by(other, player)
            {
                links.insert(player, Link::new(pin, other));
            }
        }
    }

    /// Pins connected to `pin` for `player` under this rule
    pub fn neighbors(self, board: &Board, links: &LinkSet, pin: Move, player: Player) -> Vec<Move> {
        match self {
            ConnectionRule::Adjacency => ADJACENT_OFFSETS
                .iter()
                .filter_map(|&(dr, dc)| pin.offset(dr, dc, board.size()))
                .filter(|&next| board.is_owned_by(next, player))
                .collect(),
            ConnectionRule::Bridge => links.linked_pins(player, pin),
        }
    }

    /// Whether `player` has a connected chain from their start edge to their goal edge.
    ///
    /// Breadth-first from every start-edge pin; each cell is visited at most once.
    pub fn has_connection(self, board: &Board, links: &LinkSet, player: Player) -> bool {
        let size = board.size();
        let mut visited = vec![false; size * size];
        let mut queue = VecDeque::new();

        for pin in board.pins(player) {
            if player.on_start_edge(pin) {
                visited[pin.row * size + pin.col] = true;
                queue.push_back(pin);
            }
        }

        while let Some(pin) = queue.pop_front() {
            if player.on_goal_edge(pin, size) {
                return true;
            }
            for next in self.neighbors(board, links, pin, player) {
                let index = next.row * size + next.col;
                if !visited[index] {
                    visited[index] = true;
                    queue.push_back(next);
                }
            }
        }

        false
    }

    /// Number of steps on the shortest path from `from` to `to` through `player`'s pins.
    ///
    /// Under adjacency the target cell may be stepped on regardless of owner.
    /// Returns `None` when unreachable.
    pub fn path_distance(
        self,
        board: &Board,
        links: &LinkSet,
        from: Move,
        to: Move,
        player: Player,
    ) -> Option<usize> {
        let size = board.size();
        if !board.in_bounds(from) || !board.in_bounds(to) {
            return None;
        }

        let mut visited = vec![false; size * size];
        let mut queue = VecDeque::new();
        visited[from.row * size + from.col] = true;
        queue.push_back((from, 0));

        while let Some((pin, dist)) = queue.pop_front() {
            if pin == to {
                return Some(dist);
            }
            let next_pins: Vec<Move> = match self {
                ConnectionRule::Adjacency => ADJACENT_OFFSETS
                    .iter()
                    .filter_map(|&(dr, dc)| pin.offset(dr, dc, size))
                    .filter(|&next| next == to || board.is_owned_by(next, player))
                    .collect(),
                ConnectionRule::Bridge => links.linked_pins(player, pin),
            };
            for next in next_pins {
                let index = next.row * size + next.col;
                if !visited[index] {
                    visited[index] = true;
                    queue.push_back((next, dist + 1));
                }
            }
        }

        None
    }
}

impl fmt::Display for ConnectionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionRule::Adjacency => write!(f, "adjacency"),
            ConnectionRule::Bridge => write!(f, "bridge"),
        }
    }
}

impl FromStr for ConnectionRule {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "adjacency" | "adjacent" => Ok(ConnectionRule::Adjacency),
            "bridge" | "bridges" | "knight" => Ok(ConnectionRule::Bridge),
            other => Err(crate::Error::InvalidConfiguration {
                message: format!("unknown connection rule '{other}' (expected adjacency or bridge)"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(rows: &[&str]) -> Board {
        Board::from_rows(rows).unwrap()
    }

    #[test]
    fn test_adjacency_vertical_chain() {
        let b = board(&[
            "..X.", //
            ".X..", //
            ".X..", //
            "..X.",
        ]);
        let links = LinkSet::new();
        assert!(ConnectionRule::Adjacency.has_connection(&b, &links, Player::X));
        assert!(!ConnectionRule::Adjacency.has_connection(&b, &links, Player::O));
    }

    #[test]
    fn test_adjacency_broken_chain() {
        let b = board(&[
            "..X.", //
            ".X..", //
            "....", //
            "..X.",
        ]);
        assert!(!ConnectionRule::Adjacency.has_connection(&b, &LinkSet::new(), Player::X));
    }

    #[test]
    fn test_adjacency_horizontal_player() {
        let b = board(&[
            "....", //
            "OO..", //
            "..OO", //
            "....",
        ]);
        assert!(ConnectionRule::Adjacency.has_connection(&b, &LinkSet::new(), Player::O));
    }

    #[test]
    fn test_bridge_requires_links() {
        // Knight-spaced pins with no recorded links are not connected.
        let b = board(&[
            "X...", //
            "..X.", //
            "...X", //
            ".X..",
        ]);
        let links = LinkSet::new();
        assert!(!ConnectionRule::Bridge.has_connection(&b, &links, Player::X));

        let mut links = LinkSet::new();
        links.insert(Player::X, Link::new(Move::new(0, 0), Move::new(1, 2)));
        links.insert(Player::X, Link::new(Move::new(1, 2), Move::new(3, 1)));
        assert!(ConnectionRule::Bridge.has_connection(&b, &links, Player::X));
    }

    #[test]
    fn test_bridge_cycle_terminates() {
        // Knight-move 4-cycle that never reaches the bottom row.
        let mut b = Board::new(5);
        let ring = [
            Move::new(0, 1),
            Move::new(1, 3),
            Move::new(3, 2),
            Move::new(2, 0),
        ];
        for &pin in &ring {
            b.set(pin, Player::X.to_cell());
        }
        let mut links = LinkSet::new();
        for &pin in &ring {
            ConnectionRule::Bridge.record_links(&b, &mut links, pin, Player::X);
        }
        assert_eq!(links.len(Player::X), 4);
        assert!(!ConnectionRule::Bridge.has_connection(&b, &links, Player::X));
    }

    #[test]
    fn test_record_links_only_under_bridge() {
        let mut b = Board::new(4);
        b.set(Move::new(0, 0), Player::X.to_cell());
        b.set(Move::new(2, 1), Player::X.to_cell());
        b.set(Move::new(1, 2), Player::O.to_cell());

        let mut links = LinkSet::new();
        ConnectionRule::Adjacency.record_links(&b, &mut links, Move::new(2, 1), Player::X);
        assert!(links.is_empty());

        ConnectionRule::Bridge.record_links(&b, &mut links, Move::new(2, 1), Player::X);
        assert!(links.contains(Player::X, &Link::new(Move::new(0, 0), Move::new(2, 1))));
        assert_eq!(links.len(Player::X), 1);
    }

    #[test]
    fn test_path_distance() {
        let b = board(&[
            "X...", //
            "X...", //
            ".X..", //
            "..X.",
        ]);
        let links = LinkSet::new();
        let rule = ConnectionRule::Adjacency;
        assert_eq!(
            rule.path_distance(&b, &links, Move::new(0, 0), Move::new(3, 2), Player::X),
            Some(3)
        );
        assert_eq!(
            rule.path_distance(&b, &links, Move::new(0, 0), Move::new(0, 0), Player::X),
            Some(0)
        );
        assert_eq!(
            rule.path_distance(&b, &links, Move::new(0, 0), Move::new(0, 3), Player::X),
            None
        );
    }

    #[test]
    fn test_rule_from_str() {
        assert_eq!("bridge".parse::<ConnectionRule>().unwrap(), ConnectionRule::Bridge);
        assert_eq!(
            "Adjacency".parse::<ConnectionRule>().unwrap(),
            ConnectionRule::Adjacency
        );
        assert!("diagonal".parse::<ConnectionRule>().is_err());
    }
}
