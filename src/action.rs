//! The three rock-paper-scissors moves and their zero-sum payoff table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RpsError;

/// Number of actions available to each player.
pub const NUM_ACTIONS: usize = 3;

/// Payoff for the row action against the column action, in canonical order
/// (Rock, Paper, Scissors).
const PAYOFFS: [[i32; NUM_ACTIONS]; NUM_ACTIONS] = [
    //  R   P   S
    [0, -1, 1],  // Rock
    [1, 0, -1],  // Paper
    [-1, 1, 0],  // Scissors
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Rock,
    Paper,
    Scissors,
}

impl Action {
    /// All actions in canonical order. Sampling intervals and reports follow it.
    pub const ALL: [Action; NUM_ACTIONS] = [Action::Rock, Action::Paper, Action::Scissors];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Action::Rock => 0,
            Action::Paper => 1,
            Action::Scissors => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Action> {
        Action::ALL.get(index).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Rock => "Rock",
            Action::Paper => "Paper",
            Action::Scissors => "Scissors",
        }
    }

    /// Payoff of playing `self` against `opponent`: +1 win, 0 tie, -1 loss.
    #[inline]
    pub fn utility(self, opponent: Action) -> i32 {
        PAYOFFS[self.index()][opponent.index()]
    }

    pub fn beats(self, opponent: Action) -> bool {
        self.utility(opponent) > 0
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Action {
    type Err = RpsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rock" | "r" => Ok(Action::Rock),
            "paper" | "p" => Ok(Action::Paper),
            "scissors" | "s" => Ok(Action::Scissors),
            _ => Err(RpsError::InvalidAction(s.to_string())),
        }
    }
}
