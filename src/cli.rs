use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use colored::Colorize;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::action::{Action, NUM_ACTIONS};
use crate::display::{
    payoff_table, print_error, print_section, print_success, regret_table, strategy_table,
};
use crate::error::{RpsError, RpsResult};
use crate::regret::RegretCalculator;
use crate::strategy::Strategy;
use crate::trainer::{
    load_reports, save_reports, train_parallel, Trainer, TrainerConfig, TrainingReport,
    DEFAULT_ITERATIONS,
};

#[derive(Parser)]
#[command(name = "rps", version = "1.0.0", about = "Rock-paper-scissors self-play with regret matching.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train two players against each other and report their average strategies
    Train {
        /// Number of rounds to play
        #[arg(short = 'n', long, default_value_t = DEFAULT_ITERATIONS)]
        iterations: usize,
        /// Player one's initial weights as rock,paper,scissors
        #[arg(long, default_value = "1,1,1")]
        p1: String,
        /// Player two's initial weights as rock,paper,scissors
        #[arg(long, default_value = "4,3,3")]
        p2: String,
        /// Seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,
        /// Number of independent games to run in parallel
        #[arg(short, long, default_value = "1")]
        games: usize,
        /// Write the training report(s) to this JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the payoff table
    Payoffs,
    /// Show the regret of every action for one round
    Regret {
        /// Action you played (rock, paper, scissors or r/p/s)
        own: String,
        /// Action the opponent played
        opponent: String,
    },
    /// Print a saved training report
    Show {
        /// Report file written by `rps train --output`
        file: PathBuf,
    },
}

/// Parse a weight triple such as "4,3,3".
pub fn parse_weights(s: &str) -> RpsResult<[f64; NUM_ACTIONS]> {
    let parts: Vec<&str> = s.split(',').map(|p| p.trim()).collect();
    if parts.len() != NUM_ACTIONS {
        return Err(RpsError::InvalidValue(format!(
            "expected {} comma-separated weights, got '{}'",
            NUM_ACTIONS, s
        )));
    }
    let mut weights = [0.0; NUM_ACTIONS];
    for (w, part) in weights.iter_mut().zip(parts) {
        *w = part
            .parse::<f64>()
            .map_err(|_| RpsError::InvalidValue(format!("'{}' is not a number", part)))?;
    }
    Ok(weights)
}

pub fn run() {
    let cli = Cli::parse();
    dispatch(cli);
}

pub fn run_with_args(args: Vec<String>) {
    let cli = Cli::parse_from(args);
    dispatch(cli);
}

fn dispatch(cli: Cli) {
    match cli.command {
        Commands::Train {
            iterations,
            p1,
            p2,
            seed,
            games,
            output,
        } => cmd_train(iterations, p1, p2, seed, games, output),
        Commands::Payoffs => cmd_payoffs(),
        Commands::Regret { own, opponent } => cmd_regret(own, opponent),
        Commands::Show { file } => cmd_show(file),
    }
}

fn cmd_train(
    iterations: usize,
    p1: String,
    p2: String,
    seed: Option<u64>,
    games: usize,
    output: Option<PathBuf>,
) {
    let config = match build_config(iterations, &p1, &p2, seed) {
        Ok(c) => c,
        Err(e) => {
            print_error(&e.to_string());
            return;
        }
    };

    if games == 0 {
        print_error("Games must be at least 1");
        return;
    }

    let reports = if games > 1 {
        train_many(&config, games)
    } else {
        train_single(&config)
    };

    let reports = match reports {
        Ok(r) => r,
        Err(e) => {
            print_error(&e.to_string());
            return;
        }
    };

    if let Some(path) = output {
        match save_reports(&path, &reports) {
            Ok(()) => print_success(&format!("  Report written to {}", path.display())),
            Err(e) => print_error(&e.to_string()),
        }
    }
}

fn build_config(iterations: usize, p1: &str, p2: &str, seed: Option<u64>) -> RpsResult<TrainerConfig> {
    let config = TrainerConfig {
        iterations,
        player_one: parse_weights(p1)?,
        player_two: parse_weights(p2)?,
        seed,
    };
    config.validate()?;
    Ok(config)
}

fn train_single(config: &TrainerConfig) -> RpsResult<Vec<TrainingReport>> {
    let mut trainer = Trainer::from_config(config)?;
    let seed = config.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);

    println!();
    println!(
        "  {} Running for {} iterations | seed {}",
        "RPS".bold(),
        config.iterations.to_string().bold(),
        seed,
    );
    println!();
    println!(
        "{}",
        strategy_table(
            &[
                ("Player one".to_string(), trainer.player_one().strategy().average_percentages()),
                ("Player two".to_string(), trainer.player_two().strategy().average_percentages()),
            ],
            "Strategy at start",
        )
    );

    let start = Instant::now();
    trainer.train(config.iterations, &mut rng);
    let report = trainer.report(seed, start.elapsed().as_secs_f64());

    println!();
    print_report(&report);
    Ok(vec![report])
}

fn train_many(config: &TrainerConfig, games: usize) -> RpsResult<Vec<TrainingReport>> {
    println!();
    println!(
        "  {} Running {} games of {} iterations in parallel",
        "RPS".bold(),
        games.to_string().bold(),
        config.iterations,
    );
    println!();
    println!(
        "{}",
        strategy_table(
            &[
                ("Player one".to_string(), Strategy::from_weights(config.player_one)?.average_percentages()),
                ("Player two".to_string(), Strategy::from_weights(config.player_two)?.average_percentages()),
            ],
            "Strategy at start",
        )
    );

    let start = Instant::now();
    let reports = train_parallel(config, games)?;

    let mut rows = Vec::with_capacity(reports.len() * 2 + 2);
    for (i, r) in reports.iter().enumerate() {
        rows.push((format!("Game {} (seed {}) P1", i + 1, r.seed), r.player_one.trained));
        rows.push((format!("Game {} (seed {}) P2", i + 1, r.seed), r.player_two.trained));
    }
    rows.push(("Mean P1".to_string(), mean_trained(&reports, |r| r.player_one.trained)));
    rows.push(("Mean P2".to_string(), mean_trained(&reports, |r| r.player_two.trained)));

    println!();
    println!("{}", strategy_table(&rows, "Strategy at end"));
    println!();
    println!(
        "  {} Complete: {} games in {:.2}s",
        "Training".bold(),
        reports.len().to_string().bold(),
        start.elapsed().as_secs_f64(),
    );
    println!();
    Ok(reports)
}

fn mean_trained<F>(reports: &[TrainingReport], pick: F) -> [f64; NUM_ACTIONS]
where
    F: Fn(&TrainingReport) -> [f64; NUM_ACTIONS],
{
    let mut mean = [0.0; NUM_ACTIONS];
    for r in reports {
        for (m, v) in mean.iter_mut().zip(pick(r)) {
            *m += v;
        }
    }
    let n = reports.len().max(1) as f64;
    mean.map(|m| (m / n * 100.0).round() / 100.0)
}

fn print_report(report: &TrainingReport) {
    println!(
        "{}",
        strategy_table(
            &[
                ("Player one".to_string(), report.player_one.trained),
                ("Player two".to_string(), report.player_two.trained),
            ],
            "Strategy at end",
        )
    );
    println!();
    println!(
        "  {} {} iterations in {:.2}s | exploitability P1 {:.4}, P2 {:.4}",
        "Training".bold(),
        report.iterations,
        report.elapsed_secs,
        report.player_one.exploitability,
        report.player_two.exploitability,
    );
    println!();
}

fn cmd_payoffs() {
    print_section("Payoff table", "row action vs column action");
    println!("{}", payoff_table());
}

fn cmd_regret(own: String, opponent: String) {
    let (own, opponent) = match (own.parse::<Action>(), opponent.parse::<Action>()) {
        (Ok(a), Ok(b)) => (a, b),
        (Err(e), _) | (_, Err(e)) => {
            print_error(&e.to_string());
            return;
        }
    };

    let calc = RegretCalculator::new(own, opponent);
    print_section(
        "Round",
        &format!("{} vs {} scores {:+}", own, opponent, calc.actual_utility()),
    );
    println!("{}", regret_table(&calc.regrets()));
}

fn cmd_show(file: PathBuf) {
    let reports = match load_reports(&file) {
        Ok(r) => r,
        Err(e) => {
            print_error(&format!("Could not read {}: {}", file.display(), e));
            return;
        }
    };

    for report in &reports {
        println!();
        println!("  {} seed {}", "RPS".bold(), report.seed);
        println!(
            "{}",
            strategy_table(
                &[
                    ("Player one".to_string(), report.player_one.initial),
                    ("Player two".to_string(), report.player_two.initial),
                ],
                "Strategy at start",
            )
        );
        println!();
        print_report(report);
    }
}
