//! CLI frontend for Privy: inspect and sample the private members of Rust types.

mod commands;
mod config;

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::PickConfig;

#[derive(Parser)]
#[command(
    name = "privy",
    about = "Privy: find the private fields and behaviors a test generator cannot reach",
    version,
    propagate_version = true
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List private fields and behaviors declared by types in Rust sources
    Inspect {
        /// A .rs file or a directory of .rs files
        path: PathBuf,

        /// Only inspect this type (bare name or module path)
        #[arg(short = 't', long = "type")]
        type_name: Option<String>,

        /// Output format: table, json
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Draw private members of one type the way a test generator would
    Pick {
        /// A .rs file or a directory of .rs files
        path: PathBuf,

        /// The type to sample (bare name or module path)
        #[arg(short = 't', long = "type")]
        type_name: String,

        /// Number of draws
        #[arg(short = 'n', long, default_value = "1000")]
        draws: usize,

        /// RNG seed for reproducible draws
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Output format: table, json
        #[arg(short, long, default_value = "table")]
        format: String,
    },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Inspect {
            path,
            type_name,
            format,
        } => commands::inspect::run(&path, type_name.as_deref(), &format),
        Commands::Pick {
            path,
            type_name,
            draws,
            seed,
            format,
        } => {
            let config = PickConfig::default().with_seed(seed).with_draws(draws);
            commands::pick::run(&path, &type_name, &config, &format)
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
