//! Arena CLI: run bot-vs-bot Kalaha experiments from the command line.
//!
//! Usage:
//!   cargo run --release --bin arena -- --games 1000 --p1 greedy --p2 random
//!   cargo run --release --bin arena -- --games 200 --stones 12 --no-alternate-seats

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use kalaha_engine::engine::arena::run_arena;
use kalaha_engine::engine::bot_strategy::{strategy_from_name, BotStrategy};
use kalaha_engine::games::RulesRegistry;

#[derive(Parser)]
#[command(name = "arena", about = "Run bot-vs-bot arena experiments for Kalaha")]
struct Cli {
    /// Number of games to play
    #[arg(long, default_value = "100")]
    games: usize,

    /// Random seed
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Starting stones per playing pit
    #[arg(long, default_value = "6")]
    stones: u32,

    /// Keep the same strategy on player one's side every game
    #[arg(long)]
    no_alternate_seats: bool,

    /// P1 strategy: "random" or "greedy"
    #[arg(long, default_value = "greedy")]
    p1: String,

    /// P2 strategy: "random" or "greedy"
    #[arg(long, default_value = "random")]
    p2: String,
}

fn build_strategy(seat: &str, name: &str) -> Option<(String, Box<dyn BotStrategy>)> {
    strategy_from_name(name).map(|s| (format!("{}:{}", seat, name), s))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let (Some(p1), Some(p2)) = (build_strategy("p1", &cli.p1), build_strategy("p2", &cli.p2))
    else {
        eprintln!(
            "Unknown strategy (p1={}, p2={}); expected \"random\" or \"greedy\"",
            cli.p1, cli.p2
        );
        return ExitCode::FAILURE;
    };

    let alternate_seats = !cli.no_alternate_seats;
    eprintln!(
        "Arena: {} games, seed={}, stones={}, alternate_seats={}",
        cli.games, cli.seed, cli.stones, alternate_seats
    );
    eprintln!("  {} vs {}", p1.0, p2.0);
    eprintln!();

    let registry = RulesRegistry::new();
    let rules = match registry.rules_for(2) {
        Ok(rules) => rules,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let total = cli.games;
    let progress_cb = move |done: usize, _total: usize| {
        eprint!("\r  [{}/{}] games completed", done, total);
    };

    let strategies = [p1, p2];
    let result = run_arena(
        rules,
        &strategies,
        cli.games,
        cli.seed,
        cli.stones,
        alternate_seats,
        Some(&progress_cb),
    );

    eprintln!("\r                                    "); // clear progress line
    match result {
        Ok(result) => {
            println!("{}", result.summary());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
