//! Learner port - anything that can pick a move in a Twixt position
//!
//! Implemented by the search agent, the Q-learning agent (greedy play) and a
//! uniform random baseline, so matches and evaluation runs can pair any two
//! of them.

use crate::{
    Result,
    twixt::{GameState, Move},
};

/// Move-selection interface shared by every kind of player
///
/// # Examples
///
/// ```no_run
/// use twixt::{ports::Learner, twixt::GameState};
///
/// fn opening_move(player: &mut dyn Learner) -> twixt::Result<()> {
///     let state = GameState::new();
///     let mv = player.select_move(&state)?;
///     println!("{} opens at {mv}", player.name());
///     Ok(())
/// }
/// ```
pub trait Learner: Send {
    /// Select a move for the side to move in `state`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NoValidMoves`] if the state has no legal moves.
    fn select_move(&mut self, state: &GameState) -> Result<Move>;

    /// Name used in reports and progress output.
    fn name(&self) -> &str;

    /// Reset to initial conditions. Stateless players keep the default no-op.
    fn reset(&mut self) -> Result<()> {
        Ok(())
    }

    /// Seed the internal random number generator, if there is one.
    ///
    /// Pipelines call this when given a deterministic seed so runs can be
    /// reproduced.
    fn set_rng_seed(&mut self, _seed: u64) -> Result<()> {
        Ok(())
    }
}
