//! Command line board generator.
//!
//! Prints board codes with a text rendering of each board, or renders a
//! board from an existing code.

use clap::Parser;
use mapgen_core::{
    decode_board_from_code, generate_board_with, render, Board, GenerationEvent, RulesOverrides, TopologyCatalog,
    Variant,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Board variant: normal or large
    #[clap(short, long, default_value = "normal")]
    variant: Variant,
    /// Lowest allowed score for three meeting tiles
    #[clap(long)]
    min: Option<u32>,
    /// Highest allowed score for three meeting tiles
    #[clap(long)]
    max: Option<u32>,
    /// Most triples allowed above the high score threshold
    #[clap(long)]
    max300: Option<u32>,
    /// Lowest allowed average score per resource
    #[clap(long)]
    min_resource: Option<u32>,
    /// Highest allowed average score per resource
    #[clap(long)]
    max_resource: Option<u32>,
    /// Most tiles of one landscape in a row
    #[clap(long)]
    max_row: Option<u32>,
    /// Most tiles of one landscape in a column arc
    #[clap(long)]
    max_column: Option<u32>,
    /// Candidate boards to draw before giving up
    #[clap(short, long)]
    attempts: Option<u32>,
    /// Allow harbors next to tiles producing their resource
    #[clap(long)]
    no_harbor_check: bool,
    /// Boards to generate
    #[clap(short, long, default_value = "1")]
    count: usize,
    /// Print codes with row delimiters
    #[clap(short, long)]
    delimiter: bool,
    /// Seed for reproducible boards
    #[clap(short, long)]
    seed: Option<u64>,
    /// Render an existing code instead of generating
    #[clap(long)]
    code: Option<String>,
}

impl Args {
    fn overrides(&self) -> RulesOverrides {
        RulesOverrides {
            min: self.min,
            max: self.max,
            max300: self.max300,
            minr: self.min_resource,
            maxr: self.max_resource,
            max_row: self.max_row,
            max_column: self.max_column,
            attempts: self.attempts,
            validate_harbors: self.no_harbor_check.then_some(false),
        }
    }
}

fn print_board(board: &Board, delimited: bool) {
    println!("{}", board.game_code(delimited));
    println!("{}", render::for_topology(board.topology()).render(board));
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let catalog = TopologyCatalog::new();

    if let Some(code) = &args.code {
        let board = decode_board_from_code(code, &catalog)?;
        print_board(&board, args.delimiter);
        return Ok(());
    }

    let topology = catalog.get(args.variant);
    let rules = args.overrides().resolve(args.variant);
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let log_event = |event: GenerationEvent| {
        debug!(attempts = event.attempts, elapsed = ?event.elapsed, "{:?}", event.outcome);
    };

    for index in 0..args.count {
        let generated = generate_board_with(topology, &rules, &mut rng, &log_event)?;
        if index > 0 {
            println!();
        }
        println!("# {} board after {} attempts", args.variant, generated.attempts);
        print_board(&generated.board, args.delimiter);
    }

    Ok(())
}
