//! Baseline players implementing the [`Learner`] port

use rand::{SeedableRng, random, rngs::StdRng, seq::IndexedRandom};

use crate::{
    Result,
    evaluator::Evaluator,
    minimax::{MinimaxAgent, SearchResult},
    ports::Learner,
    twixt::{GameState, Move},
};

/// Alpha-beta search player
#[derive(Debug, Clone)]
pub struct MinimaxLearner {
    name: String,
    agent: MinimaxAgent,
    last_search: Option<SearchResult>,
}

impl MinimaxLearner {
    pub fn new(depth: usize, evaluator: Evaluator) -> Self {
        Self {
            name: format!("Minimax(depth={depth})"),
            agent: MinimaxAgent::new(depth, evaluator),
            last_search: None,
        }
    }

    /// Statistics of the most recent search, if any
    pub fn last_search(&self) -> Option<&SearchResult> {
        self.last_search.as_ref()
    }
}

impl Learner for MinimaxLearner {
    fn select_move(&mut self, state: &GameState) -> Result<Move> {
        let result = self.agent.search(state, self.agent.depth());
        self.last_search = Some(result);
        result.best_move.ok_or(crate::Error::NoValidMoves)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Uniform random baseline
#[derive(Debug, Clone)]
pub struct RandomLearner {
    name: String,
    rng: StdRng,
}

impl RandomLearner {
    pub fn new(name: String) -> Self {
        Self {
            name,
            rng: StdRng::seed_from_u64(random()),
        }
    }

    /// Create a new random learner with a deterministic seed
    pub fn with_seed(name: String, seed: u64) -> Self {
        Self {
            name,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Learner for RandomLearner {
    fn select_move(&mut self, state: &GameState) -> Result<Move> {
        state
            .legal_moves()
            .choose(&mut self.rng)
            .copied()
            .ok_or(crate::Error::NoValidMoves)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        Ok(())
    }
}
