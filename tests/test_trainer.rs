//! Self-play training: the scripted first round, long-run convergence,
//! parallel runs, and report persistence.

use approx::assert_abs_diff_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

use rps_regret::action::Action;
use rps_regret::player::Player;
use rps_regret::regret::RoundRegret;
use rps_regret::strategy::Strategy;
use rps_regret::trainer::{
    load_reports, run_training, save_reports, train_parallel, Trainer, TrainerConfig,
};

fn classic_trainer() -> Trainer {
    let one = Player::new(Strategy::new(1.0, 1.0, 1.0).unwrap());
    let two = Player::new(Strategy::new(4.0, 3.0, 3.0).unwrap());
    Trainer::new(one, two)
}

fn assert_near_uniform(pct: [f64; 3], tolerance: f64, who: &str) {
    for (i, &p) in pct.iter().enumerate() {
        assert!(
            (p - 100.0 / 3.0).abs() < tolerance,
            "{} action {} at {:.2}% is not within {} points of uniform ({:?})",
            who,
            i,
            p,
            tolerance,
            pct,
        );
    }
}

// ---------------------------------------------------------------------------
// Scripted round
// ---------------------------------------------------------------------------

#[test]
fn rock_vs_paper_first_round() {
    let mut trainer = classic_trainer();
    assert_eq!(trainer.player_one().strategy().weights(), &[100.0 / 3.0; 3]);
    assert_eq!(trainer.player_two().strategy().weights(), &[40.0, 30.0, 30.0]);

    let outcome = trainer.resolve_round(Action::Rock, Action::Paper);
    assert_eq!(outcome.regret_one, RoundRegret::new(0.0, 1.0, 2.0));
    assert_eq!(outcome.regret_two, RoundRegret::new(-1.0, 0.0, -2.0));

    // Player one now leans on its positive regrets: 0 / 1/3 / 2/3
    let one = trainer.player_one().strategy();
    assert_eq!(one.weight(Action::Rock), 0.0);
    assert!((one.weight(Action::Paper) - 100.0 / 3.0).abs() < 1e-9);
    assert!((one.weight(Action::Scissors) - 200.0 / 3.0).abs() < 1e-9);

    // Player two has no positive regret anywhere and resets to uniform
    let two = trainer.player_two().strategy();
    for a in Action::ALL {
        assert!((two.weight(a) - 100.0 / 3.0).abs() < 1e-9);
    }
    assert_eq!(trainer.rounds(), 1);
}

#[test]
fn players_learn_independently() {
    let mut trainer = classic_trainer();
    trainer.resolve_round(Action::Scissors, Action::Scissors);
    let one = trainer.player_one().strategy();
    let two = trainer.player_two().strategy();
    // Same regrets from a tie, same resulting weights regardless of the start
    assert_eq!(one.weights(), two.weights());
    assert_eq!(one.weight(Action::Rock), 100.0);
    assert_ne!(one.weight_sums(), two.weight_sums());
}

#[test]
fn play_round_is_reproducible() {
    let mut a = classic_trainer();
    let mut b = classic_trainer();
    let mut rng_a = StdRng::seed_from_u64(5);
    let mut rng_b = StdRng::seed_from_u64(5);
    for _ in 0..200 {
        assert_eq!(a.play_round(&mut rng_a), b.play_round(&mut rng_b));
    }
    assert_eq!(a.player_one().strategy(), b.player_one().strategy());
}

// ---------------------------------------------------------------------------
// Convergence
// ---------------------------------------------------------------------------

#[test]
fn symmetric_start_converges_to_uniform() {
    let config = TrainerConfig {
        iterations: 50_000,
        player_one: [1.0, 1.0, 1.0],
        player_two: [1.0, 1.0, 1.0],
        seed: Some(2024),
    };
    let report = run_training(&config).unwrap();
    assert_eq!(report.iterations, 50_000);
    assert_near_uniform(report.player_one.trained, 5.0, "player one");
    assert_near_uniform(report.player_two.trained, 5.0, "player two");
}

#[test]
fn biased_start_converges_to_uniform() {
    let config = TrainerConfig {
        seed: Some(7),
        ..TrainerConfig::default()
    };
    let report = run_training(&config).unwrap();
    assert_eq!(report.player_two.initial, [40.0, 30.0, 30.0]);
    assert_near_uniform(report.player_one.trained, 5.0, "player one");
    assert_near_uniform(report.player_two.trained, 5.0, "player two");
    assert!(report.player_one.exploitability < 0.1);
    assert!(report.player_two.exploitability < 0.1);
}

#[test]
fn more_training_lowers_exploitability() {
    let short = run_training(&TrainerConfig {
        iterations: 10,
        seed: Some(11),
        ..TrainerConfig::default()
    })
    .unwrap();
    let long = run_training(&TrainerConfig {
        iterations: 50_000,
        seed: Some(11),
        ..TrainerConfig::default()
    })
    .unwrap();
    assert!(
        long.player_two.exploitability < short.player_two.exploitability,
        "exploitability {} should drop below {}",
        long.player_two.exploitability,
        short.player_two.exploitability,
    );
}

// ---------------------------------------------------------------------------
// Parallel runs
// ---------------------------------------------------------------------------

#[test]
fn parallel_games_match_sequential_seeds() {
    let config = TrainerConfig {
        iterations: 2_000,
        seed: Some(100),
        ..TrainerConfig::default()
    };
    let reports = train_parallel(&config, 4).unwrap();
    assert_eq!(reports.len(), 4);

    for (i, report) in reports.iter().enumerate() {
        assert_eq!(report.seed, 100 + i as u64);
        let sequential = run_training(&TrainerConfig {
            seed: Some(100 + i as u64),
            ..config.clone()
        })
        .unwrap();
        assert_eq!(report.player_one, sequential.player_one);
        assert_eq!(report.player_two, sequential.player_two);
    }
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[test]
fn reports_roundtrip_through_json() {
    let config = TrainerConfig {
        iterations: 500,
        seed: Some(3),
        ..TrainerConfig::default()
    };
    let reports = train_parallel(&config, 2).unwrap();

    let path = std::env::temp_dir()
        .join(format!("rps-regret-test-{}", std::process::id()))
        .join("report.json");
    save_reports(&path, &reports).unwrap();
    let loaded = load_reports(&path).unwrap();
    assert_eq!(loaded.len(), reports.len());
    for (a, b) in loaded.iter().zip(&reports) {
        assert_eq!(a.seed, b.seed);
        assert_eq!(a.iterations, b.iterations);
        assert_eq!(a.player_one.initial, b.player_one.initial);
        assert_eq!(a.player_two.trained, b.player_two.trained);
        assert_abs_diff_eq!(a.player_one.exploitability, b.player_one.exploitability, epsilon = 1e-12);
    }

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn loading_a_missing_report_fails() {
    let path = std::env::temp_dir().join("rps-regret-does-not-exist.json");
    assert!(load_reports(&path).is_err());
}
