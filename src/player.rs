use crate::action::Action;
use crate::regret::RoundRegret;
use crate::strategy::{RandomSource, Strategy};

/// A self-play agent. Owns its strategy for its whole lifetime.
#[derive(Debug, Clone, Default)]
pub struct Player {
    strategy: Strategy,
}

impl Player {
    pub fn new(strategy: Strategy) -> Self {
        Player { strategy }
    }

    /// Pick this round's action from the current strategy.
    pub fn act<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Action {
        self.strategy.sample(rng)
    }

    pub fn learn(&mut self, round_regret: &RoundRegret) {
        self.strategy.update(round_regret);
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }
}
