//! Action-value table for tabular Q-learning

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::twixt::Move;

/// Q-table mapping (state key, action) pairs to Q-values
///
/// Keys come from [`GameState::encode`](crate::twixt::GameState::encode).
/// Unseen pairs read as `0.0`; entries are only created by [`QTable::set`]
/// and [`QTable::update`] and are never pruned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QTable {
    values: HashMap<String, HashMap<Move, f64>>,
}

impl QTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Q-value for a state-action pair, `0.0` when never written
    pub fn get_or_default(&self, state: &str, action: Move) -> f64 {
        self.values
            .get(state)
            .and_then(|actions| actions.get(&action))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn set(&mut self, state: &str, action: Move, value: f64) {
        self.values
            .entry(state.to_string())
            .or_default()
            .insert(action, value);
    }

    /// Every stored Q-value
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.values().flat_map(|actions| actions.values().copied())
    }

    /// `max_a Q(state, a)` over recorded actions, or `0.0` for an unseen state
    pub fn best_next(&self, state: &str) -> f64 {
        self.values
            .get(state)
            .and_then(|actions| actions.values().copied().reduce(f64::max))
            .unwrap_or(0.0)
    }

    /// Off-policy one-step update, returning the new value
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
    pub fn update(
        &mut self,
        state: &str,
        action: Move,
        reward: f64,
        next_state: &str,
        alpha: f64,
        gamma: f64,
    ) -> f64 {
        let current_q = self.get_or_default(state, action);
        let td_target = reward + gamma * self.best_next(next_state);
        let new_q = current_q + alpha * (td_target - current_q);
        self.set(state, action, new_q);
        new_q
    }

    /// Number of stored (state, action) entries
    pub fn len(&self) -> usize {
        self.values.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// State keys with at least one recorded action
    pub fn states(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn state_count(&self) -> usize {
        self.values.len()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}
