//! Split a class into random groups of 2, 3 and 4 students while keeping
//! apart the students who must not work together.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod constraints;
mod engine;
mod error;
mod group;
mod remainder;
mod report;
mod terminal;

use config::{ConfigLocator, LoadOutcome, CONFIG_FILE_NAME};
use constraints::validate;
use engine::{GroupingEngine, DEFAULT_ATTEMPTS};
use terminal::{stdin_is_terminal, Interrupt};

const TARGET_SIZES: [usize; 3] = [2, 3, 4];

#[derive(Parser, Debug)]
#[command(name = "klassen-gruppen")]
#[command(about = "Random groups of 2, 3 and 4 that respect who must not work together")]
struct Args {
    /// Class file to use instead of searching for klasse.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Independent attempts per group size
    #[arg(long, default_value_t = DEFAULT_ATTEMPTS)]
    attempts: usize,

    /// Random seed for reproducible groupings
    #[arg(long)]
    seed: Option<u64>,

    /// Exit without waiting for Enter
    #[arg(long)]
    no_pause: bool,

    /// Log debug details to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.attempts == 0 {
        bail!("--attempts must be at least 1");
    }

    // Set up Ctrl+C handler
    let interrupt = Interrupt::install();
    let pause = !args.no_pause && stdin_is_terminal();

    let mut out = io::stdout().lock();
    report::banner(&mut out)?;

    let outcome = match &args.config {
        Some(path) => config::load_or_create_at(path),
        None => ConfigLocator::from_env(CONFIG_FILE_NAME).load_or_create(),
    }
    .context("failed to load the class configuration")?;

    let config = match outcome {
        LoadOutcome::Loaded { path, config } => {
            writeln!(
                out,
                "Class file: {} ({} students)",
                path.display(),
                config.roster.len()
            )?;
            config
        }
        LoadOutcome::SetupRequired { path } => {
            writeln!(
                out,
                "❗️ '{}' not found. A sample file was created.",
                path.display()
            )?;
            writeln!(out, "\nPlease edit this file and start the program again.")?;
            drop(out);
            if pause {
                interrupt.wait_for_enter("\n❗️ Press Enter to exit and review the class file.");
            }
            return Ok(());
        }
    };

    let issues = validate(&config.constraints);
    if !issues.is_empty() {
        warn!(count = issues.len(), "class file has asymmetric conflicts");
    }
    report::symmetry(&mut out, &issues)?;

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut engine = GroupingEngine::new(&config.roster, &config.constraints, rng);

    for target_size in TARGET_SIZES {
        if !interrupt.is_running() {
            warn!(target_size, "interrupted, skipping remaining group sizes");
            break;
        }

        let search = engine.best_of(target_size, args.attempts);
        info!(
            target_size,
            attempts = search.attempts_run,
            groups = search.result.groups.len(),
            leftover = search.result.leftover.len(),
            "grouping finished"
        );
        report::grouping(&mut out, target_size, &search.result)?;
    }

    report::rule(&mut out)?;
    writeln!(out)?;
    out.flush()?;
    drop(out);

    // Keep the console window open when started by double-click
    if pause && interrupt.is_running() {
        interrupt.wait_for_enter("\nPress Enter to exit...");
    }
    Ok(())
}
