//! Counterfactual regret for a single realized round.

use std::ops::{Index, IndexMut};

use crate::action::{Action, NUM_ACTIONS};

/// Per-action values for one round, indexed by `Action`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RoundRegret(pub [f64; NUM_ACTIONS]);

impl RoundRegret {
    pub fn new(rock: f64, paper: f64, scissors: f64) -> Self {
        RoundRegret([rock, paper, scissors])
    }

    pub fn values(&self) -> &[f64; NUM_ACTIONS] {
        &self.0
    }
}

impl Index<Action> for RoundRegret {
    type Output = f64;

    fn index(&self, action: Action) -> &f64 {
        &self.0[action.index()]
    }
}

impl IndexMut<Action> for RoundRegret {
    fn index_mut(&mut self, action: Action) -> &mut f64 {
        &mut self.0[action.index()]
    }
}

/// Regret of every candidate action from the perspective of the player who
/// played `own`, holding the opponent's move fixed.
#[derive(Debug, Clone, Copy)]
pub struct RegretCalculator {
    own: Action,
    opponent: Action,
}

impl RegretCalculator {
    pub fn new(own: Action, opponent: Action) -> Self {
        RegretCalculator { own, opponent }
    }

    /// Payoff the player actually received this round.
    #[inline]
    pub fn actual_utility(&self) -> i32 {
        self.own.utility(self.opponent)
    }

    /// How much better `candidate` would have scored than the action played.
    #[inline]
    pub fn regret(&self, candidate: Action) -> f64 {
        (candidate.utility(self.opponent) - self.actual_utility()) as f64
    }

    pub fn regrets(&self) -> RoundRegret {
        let mut out = RoundRegret::default();
        for action in Action::ALL {
            out[action] = self.regret(action);
        }
        out
    }
}
