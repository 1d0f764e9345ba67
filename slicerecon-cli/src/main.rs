//! Command-line driver for slicerecon.
//!
//! Binds a settings file against the built-in algorithms and reconstructs
//! events read from JSON files.
#![allow(clippy::uninlined_format_args)]

mod event;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use log::{debug, info};
use slicerecon_algorithms::builtin_registry;
use slicerecon_core::{NeutrinoParent, ParentSettings};
use thiserror::Error;

use event::{EventFile, EventSummary};

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] slicerecon_core::ConfigError),

    #[error("Invalid event file {path}: {source}")]
    Event {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Reconstruction of {path} failed: {source}")]
    Run {
        path: PathBuf,
        source: slicerecon_core::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Two-pass, slice-based event reconstruction.
#[derive(Parser)]
#[command(name = "slicerecon")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconstruct events
    Run {
        /// Settings file (JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Event file(s) (JSON)
        #[arg(required = true)]
        input: Vec<PathBuf>,

        /// Print summaries as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that a settings file binds
    Check {
        /// Settings file (JSON)
        #[arg(short, long)]
        config: PathBuf,
    },

    /// List the registered algorithms
    Algorithms,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let registry = builtin_registry();

    match cli.command {
        Commands::Run {
            config,
            input,
            json,
        } => {
            let settings = ParentSettings::from_path(&config)?;
            let mut parent = NeutrinoParent::from_settings(&settings, &registry)?;
            debug!("settings bound from {}", config.display());

            let start = Instant::now();
            let mut summaries = Vec::with_capacity(input.len());

            for path in &input {
                let event = EventFile::from_path(path)?;
                let mut store = event.into_store(parent.hit_list_names()).map_err(|source| {
                    CliError::Run {
                        path: path.clone(),
                        source,
                    }
                })?;

                parent.run(&mut store).map_err(|source| CliError::Run {
                    path: path.clone(),
                    source,
                })?;

                let summary = EventSummary::new(path, parent.last_run(), &store);
                info!("{}: {} slices", path.display(), summary.run.slices);
                summaries.push(summary);
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&summaries)?);
            } else {
                for summary in &summaries {
                    print!("{}", summary);
                }
                println!(
                    "Reconstructed {} events in {:.2}s",
                    summaries.len(),
                    start.elapsed().as_secs_f64()
                );
            }
        }

        Commands::Check { config } => {
            let settings = ParentSettings::from_path(&config)?;
            let parent = NeutrinoParent::from_settings(&settings, &registry)?;
            println!("{}: OK", config.display());
            if cli.verbose {
                println!("{:#?}", parent);
            }
        }

        Commands::Algorithms => {
            println!("Clustering:");
            for name in registry.clustering_names() {
                println!("  {}", name);
            }
            println!("Slicing tools:");
            for name in registry.slicing_tool_names() {
                println!("  {}", name);
            }
            println!("Algorithms:");
            for name in registry.algorithm_names() {
                println!("  {}", name);
            }
        }
    }

    Ok(())
}
