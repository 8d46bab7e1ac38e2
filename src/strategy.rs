//! Regret-matching mixed strategy over the three actions.
//!
//! Weights are kept as percentages (summing to 100) so that a uniform draw
//! in [0, 100) maps directly onto an action. The time-averaged strategy,
//! not the current weights, is what converges to equilibrium.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::action::{Action, NUM_ACTIONS};
use crate::error::{RpsError, RpsResult};
use crate::regret::RoundRegret;

/// Total mass of a normalized weight vector.
pub const WEIGHT_TOTAL: f64 = 100.0;

// ---------------------------------------------------------------------------
// Random source
// ---------------------------------------------------------------------------

/// Source of uniform draws in `[0, WEIGHT_TOTAL)` used for sampling.
pub trait RandomSource {
    fn draw(&mut self) -> f64;
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn draw(&mut self) -> f64 {
        self.gen_range(0.0..WEIGHT_TOTAL)
    }
}

// ---------------------------------------------------------------------------
// Strategy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    /// Current normalized weights, summing to `WEIGHT_TOTAL`.
    weights: [f64; NUM_ACTIONS],
    /// Cumulative signed regret. Never reset or clamped.
    regrets: [f64; NUM_ACTIONS],
    /// Sum of the normalized weights after every round, initial state included.
    weight_sums: [f64; NUM_ACTIONS],
}

impl Default for Strategy {
    fn default() -> Self {
        let uniform = WEIGHT_TOTAL / NUM_ACTIONS as f64;
        Strategy {
            weights: [uniform; NUM_ACTIONS],
            regrets: [0.0; NUM_ACTIONS],
            weight_sums: [uniform; NUM_ACTIONS],
        }
    }
}

impl Strategy {
    /// Build a strategy from unnormalized initial weights.
    ///
    /// Weights must be finite and non-negative with a positive total.
    pub fn new(rock: f64, paper: f64, scissors: f64) -> RpsResult<Self> {
        Self::from_weights([rock, paper, scissors])
    }

    pub fn from_weights(initial: [f64; NUM_ACTIONS]) -> RpsResult<Self> {
        if initial.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(RpsError::InvalidWeights(format!(
                "{:?} must be finite and non-negative",
                initial
            )));
        }
        let total: f64 = initial.iter().sum();
        if total <= 0.0 {
            return Err(RpsError::InvalidWeights(format!(
                "{:?} must have a positive total",
                initial
            )));
        }

        let weights = normalize(initial, total);
        Ok(Strategy {
            weights,
            regrets: [0.0; NUM_ACTIONS],
            weight_sums: weights,
        })
    }

    pub fn weights(&self) -> &[f64; NUM_ACTIONS] {
        &self.weights
    }

    pub fn weight(&self, action: Action) -> f64 {
        self.weights[action.index()]
    }

    pub fn cumulative_regret(&self, action: Action) -> f64 {
        self.regrets[action.index()]
    }

    pub fn weight_sums(&self) -> &[f64; NUM_ACTIONS] {
        &self.weight_sums
    }

    // -----------------------------------------------------------------------
    // Sampling
    // -----------------------------------------------------------------------

    /// Sample an action from the current weights.
    pub fn sample<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Action {
        self.action_at(rng.draw())
    }

    /// Resolve a draw in `[0, WEIGHT_TOTAL]` to an action.
    ///
    /// Intervals are half-open `[start, end)` in canonical order, so a draw
    /// on a shared boundary belongs to the later action. The last interval
    /// also admits `WEIGHT_TOTAL` itself.
    pub fn action_at(&self, draw: f64) -> Action {
        let mut end = 0.0;
        for action in Action::ALL {
            end += self.weights[action.index()];
            if draw < end {
                return action;
            }
        }
        Action::ALL[NUM_ACTIONS - 1]
    }

    // -----------------------------------------------------------------------
    // Regret-matching update
    // -----------------------------------------------------------------------

    /// Fold one round of regret into the strategy.
    pub fn update(&mut self, round_regret: &RoundRegret) {
        for (acc, r) in self.regrets.iter_mut().zip(round_regret.values()) {
            *acc += r;
        }

        let mut raw = self.regrets.map(|r| r.max(0.0));
        let mut total: f64 = raw.iter().sum();
        if total <= 0.0 {
            // No action has an edge: go back to uniform play
            raw = [1.0; NUM_ACTIONS];
            total = NUM_ACTIONS as f64;
        }

        self.weights = normalize(raw, total);
        for (sum, w) in self.weight_sums.iter_mut().zip(self.weights.iter()) {
            *sum += w;
        }
    }

    // -----------------------------------------------------------------------
    // Average strategy
    // -----------------------------------------------------------------------

    /// Time-averaged strategy as probabilities summing to 1.
    pub fn average_strategy(&self) -> [f64; NUM_ACTIONS] {
        let total: f64 = self.weight_sums.iter().sum();
        if total > 0.0 {
            self.weight_sums.map(|s| s / total)
        } else {
            [1.0 / NUM_ACTIONS as f64; NUM_ACTIONS]
        }
    }

    /// Time-averaged strategy in percent, rounded to two decimals.
    pub fn average_percentages(&self) -> [f64; NUM_ACTIONS] {
        self.average_strategy()
            .map(|p| (p * WEIGHT_TOTAL * 100.0).round() / 100.0)
    }

    /// Best-response value against the average strategy.
    ///
    /// Zero at the uniform equilibrium, positive for any exploitable mix.
    pub fn exploitability(&self) -> f64 {
        let avg = self.average_strategy();
        Action::ALL
            .iter()
            .map(|&a| {
                Action::ALL
                    .iter()
                    .map(|&b| avg[b.index()] * a.utility(b) as f64)
                    .sum::<f64>()
            })
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

fn normalize(raw: [f64; NUM_ACTIONS], total: f64) -> [f64; NUM_ACTIONS] {
    raw.map(|w| WEIGHT_TOTAL * w / total)
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pct = self.average_percentages();
        let parts: Vec<String> = Action::ALL
            .iter()
            .map(|a| format!("{}: {:.2}%", a, pct[a.index()]))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}
