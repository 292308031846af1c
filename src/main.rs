//! Othello-Rust: an Othello engine with alpha-beta search.
//!
//! ## Usage
//!
//! - `othello-rust` - Play a demo game, engine against itself
//! - `othello-rust protocol` - Start the text protocol on stdin/stdout
//! - `othello-rust demo` - Play the demo game
//!
//! Search and evaluation options apply to every mode, e.g.
//! `othello-rust --depth 4 --mobility protocol`. Set `RUST_LOG=debug` to
//! see search statistics on stderr.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use log::info;

use othello_rust::constants::DEFAULT_DEPTH;
use othello_rust::player::play_game;
use othello_rust::protocol::ProtocolEngine;
use othello_rust::{EvalConfig, PassPolicy, Player, SearchParams, Side};

/// Othello-Rust: an Othello engine with alpha-beta search
#[derive(Parser)]
#[command(name = "othello-rust")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Search depth in plies
    #[arg(long, global = true, default_value_t = DEFAULT_DEPTH,
          value_parser = clap::value_parser!(u32).range(1..))]
    depth: u32,

    /// Add the mobility term to the evaluation
    #[arg(long, global = true)]
    mobility: bool,

    /// Drop the disk parity term
    #[arg(long, global = true)]
    no_parity: bool,

    /// Drop the corner term
    #[arg(long, global = true)]
    no_corners: bool,

    /// Drop the stability term
    #[arg(long, global = true)]
    no_stability: bool,

    /// Amplitude of random noise added to every evaluation
    #[arg(long, global = true, default_value_t = 0)]
    noise: u16,

    /// Seed for the evaluation noise
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// What the search does when the side to move must pass
    #[arg(long, global = true, value_enum, default_value_t = PassArg::Evaluate)]
    pass_policy: PassArg,

    /// Disable alpha-beta cutoffs (plain minimax)
    #[arg(long, global = true)]
    no_pruning: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the text protocol server on stdin/stdout
    Protocol,
    /// Play the engine against itself and print the game
    Demo,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum PassArg {
    /// Score the position where a side must pass
    Evaluate,
    /// Continue the search with the other side at the same depth
    Recurse,
}

impl Cli {
    fn search_params(&self) -> SearchParams {
        SearchParams {
            depth: self.depth,
            pruning: !self.no_pruning,
            pass_policy: match self.pass_policy {
                PassArg::Evaluate => PassPolicy::Evaluate,
                PassArg::Recurse => PassPolicy::Recurse,
            },
            eval: EvalConfig {
                parity: !self.no_parity,
                mobility: self.mobility,
                corners: !self.no_corners,
                stability: !self.no_stability,
                noise: i32::from(self.noise),
                seed: self.seed,
            },
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let params = cli.search_params();

    match cli.command {
        Some(Commands::Protocol) => {
            info!("starting protocol loop with {params:?}");
            let mut engine = ProtocolEngine::with_params(params);
            engine.run_stdio()?;
        }
        Some(Commands::Demo) | None => run_demo(params)?,
    }
    Ok(())
}

fn run_demo(params: SearchParams) -> Result<()> {
    println!("Othello-Rust: alpha-beta engine, depth {}\n", params.depth);

    let mut black = Player::with_params(Side::Black, params);
    // Offset the seed so both sides do not draw identical noise
    let white_params = SearchParams {
        eval: EvalConfig {
            seed: params.eval.seed.map(|s| s.wrapping_add(1)),
            ..params.eval
        },
        ..params
    };
    let mut white = Player::with_params(Side::White, white_params);

    let mut turn = 0;
    let end = play_game(&mut black, &mut white, |side, mv, board| {
        turn += 1;
        match mv {
            Some(mv) => println!("{turn:>2}. {side} {mv}"),
            None => println!("{turn:>2}. {side} passes"),
        }
        println!("{board}");
    })?;

    let (b, w) = (end.count_black(), end.count_white());
    let result = match b.cmp(&w) {
        std::cmp::Ordering::Greater => "black wins",
        std::cmp::Ordering::Less => "white wins",
        std::cmp::Ordering::Equal => "draw",
    };
    println!("Final: black {b}, white {w} ({result})");
    Ok(())
}
