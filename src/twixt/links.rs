//! Bridges recorded between a player's pins

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::board::{Move, Player};

/// Unordered pair of pins, stored with the smaller coordinate first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Link {
    a: Move,
    b: Move,
}

impl Link {
    pub fn new(p: Move, q: Move) -> Self {
        if p <= q {
            Self { a: p, b: q }
        } else {
            Self { a: q, b: p }
        }
    }

    pub fn ends(&self) -> (Move, Move) {
        (self.a, self.b)
    }

    /// The end opposite `pin`, if `pin` is one of the ends
    pub fn other(&self, pin: Move) -> Option<Move> {
        if self.a == pin {
            Some(self.b)
        } else if self.b == pin {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Per-player link sets. Membership only grows over a game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinkSet {
    x: BTreeSet<Link>,
    o: BTreeSet<Link>,
}

impl LinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, player: Player, link: Link) -> bool {
        self.links_mut(player).insert(link)
    }

    pub fn contains(&self, player: Player, link: &Link) -> bool {
        self.links(player).contains(link)
    }

    pub fn links(&self, player: Player) -> &BTreeSet<Link> {
        match player {
            Player::X => &self.x,
            Player::O => &self.o,
        }
    }

    fn links_mut(&mut self, player: Player) -> &mut BTreeSet<Link> {
        match player {
            Player::X => &mut self.x,
            Player::O => &mut self.o,
        }
    }

    /// Pins linked to `pin` for `player`, in coordinate order
    pub fn linked_pins(&self, player: Player, pin: Move) -> Vec<Move> {
        self.links(player)
            .iter()
            .filter_map(|link| link.other(pin))
            .collect()
    }

    pub fn len(&self, player: Player) -> usize {
        self.links(player).len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty() && self.o.is_empty()
    }
}
