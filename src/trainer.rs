//! Self-play training loop.
//!
//! Two players repeatedly act against each other; after every round each
//! player learns the counterfactual regret of its own action against the
//! opponent's realized move. Independent runs can be fanned out over the
//! rayon pool, each with its own seeded RNG.

use std::path::Path;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::action::{Action, NUM_ACTIONS};
use crate::error::{RpsError, RpsResult};
use crate::player::Player;
use crate::regret::{RegretCalculator, RoundRegret};
use crate::strategy::{RandomSource, Strategy};

pub const DEFAULT_ITERATIONS: usize = 50_000;
pub const DEFAULT_PLAYER_ONE: [f64; NUM_ACTIONS] = [1.0, 1.0, 1.0];
pub const DEFAULT_PLAYER_TWO: [f64; NUM_ACTIONS] = [4.0, 3.0, 3.0];

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainerConfig {
    pub iterations: usize,
    /// Unnormalized initial weights (Rock, Paper, Scissors).
    pub player_one: [f64; NUM_ACTIONS],
    pub player_two: [f64; NUM_ACTIONS],
    /// Fixed seed for reproducible runs. A random seed is picked otherwise.
    pub seed: Option<u64>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            iterations: DEFAULT_ITERATIONS,
            player_one: DEFAULT_PLAYER_ONE,
            player_two: DEFAULT_PLAYER_TWO,
            seed: None,
        }
    }
}

impl TrainerConfig {
    pub fn validate(&self) -> RpsResult<()> {
        Strategy::from_weights(self.player_one)?;
        Strategy::from_weights(self.player_two)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Trainer
// ---------------------------------------------------------------------------

/// What happened in one round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundOutcome {
    pub action_one: Action,
    pub action_two: Action,
    pub regret_one: RoundRegret,
    pub regret_two: RoundRegret,
}

pub struct Trainer {
    player_one: Player,
    player_two: Player,
    /// Average strategies in percent at construction, for reporting.
    initial: [[f64; NUM_ACTIONS]; 2],
    rounds: usize,
}

impl Trainer {
    pub fn new(player_one: Player, player_two: Player) -> Self {
        let initial = [
            player_one.strategy().average_percentages(),
            player_two.strategy().average_percentages(),
        ];
        Trainer {
            player_one,
            player_two,
            initial,
            rounds: 0,
        }
    }

    pub fn from_config(config: &TrainerConfig) -> RpsResult<Self> {
        let one = Strategy::from_weights(config.player_one)?;
        let two = Strategy::from_weights(config.player_two)?;
        Ok(Trainer::new(Player::new(one), Player::new(two)))
    }

    pub fn player_one(&self) -> &Player {
        &self.player_one
    }

    pub fn player_two(&self) -> &Player {
        &self.player_two
    }

    /// Number of rounds played so far.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Apply a round in which the two actions are already known.
    pub fn resolve_round(&mut self, action_one: Action, action_two: Action) -> RoundOutcome {
        let regret_one = RegretCalculator::new(action_one, action_two).regrets();
        let regret_two = RegretCalculator::new(action_two, action_one).regrets();

        self.player_one.learn(&regret_one);
        self.player_two.learn(&regret_two);
        self.rounds += 1;

        RoundOutcome {
            action_one,
            action_two,
            regret_one,
            regret_two,
        }
    }

    /// Sample both actions from the current strategies, then learn from them.
    pub fn play_round<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> RoundOutcome {
        let action_one = self.player_one.act(rng);
        let action_two = self.player_two.act(rng);
        self.resolve_round(action_one, action_two)
    }

    pub fn train<R: RandomSource + ?Sized>(&mut self, iterations: usize, rng: &mut R) {
        for _ in 0..iterations {
            self.play_round(rng);
        }
    }

    pub fn report(&self, seed: u64, elapsed_secs: f64) -> TrainingReport {
        TrainingReport {
            iterations: self.rounds,
            seed,
            elapsed_secs,
            player_one: PlayerReport::new(self.initial[0], self.player_one.strategy()),
            player_two: PlayerReport::new(self.initial[1], self.player_two.strategy()),
        }
    }
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerReport {
    /// Average strategy in percent before training.
    pub initial: [f64; NUM_ACTIONS],
    /// Average strategy in percent after training.
    pub trained: [f64; NUM_ACTIONS],
    pub exploitability: f64,
}

impl PlayerReport {
    fn new(initial: [f64; NUM_ACTIONS], strategy: &Strategy) -> Self {
        PlayerReport {
            initial,
            trained: strategy.average_percentages(),
            exploitability: strategy.exploitability(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub iterations: usize,
    pub seed: u64,
    pub elapsed_secs: f64,
    pub player_one: PlayerReport,
    pub player_two: PlayerReport,
}

/// Write reports to disk as a JSON array.
pub fn save_reports(path: &Path, reports: &[TrainingReport]) -> RpsResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(reports)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn load_reports(path: &Path) -> RpsResult<Vec<TrainingReport>> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

// ---------------------------------------------------------------------------
// Runs
// ---------------------------------------------------------------------------

/// Run one complete training session described by `config`.
pub fn run_training(config: &TrainerConfig) -> RpsResult<TrainingReport> {
    let mut trainer = Trainer::from_config(config)?;
    let seed = config.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);

    let start = Instant::now();
    trainer.train(config.iterations, &mut rng);
    Ok(trainer.report(seed, start.elapsed().as_secs_f64()))
}

/// Run `games` independent sessions in parallel.
///
/// Game `i` is seeded with `base + i`, so a fixed base seed reproduces every
/// game regardless of scheduling.
pub fn train_parallel(config: &TrainerConfig, games: usize) -> RpsResult<Vec<TrainingReport>> {
    if games == 0 {
        return Err(RpsError::InvalidValue("games must be at least 1".to_string()));
    }
    config.validate()?;
    let base = config.seed.unwrap_or_else(rand::random);

    (0..games)
        .into_par_iter()
        .map(|i| {
            let game_config = TrainerConfig {
                seed: Some(base.wrapping_add(i as u64)),
                ..config.clone()
            };
            run_training(&game_config)
        })
        .collect()
}
