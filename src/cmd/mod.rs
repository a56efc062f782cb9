mod check;
mod generate;
mod plan;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate as generate_completions, Shell};
use fixture_gen::Scale;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "forum-fixtures")]
#[command(version)]
#[command(
    about = "Generate deterministic, referentially consistent SQL fixtures for forum load tests",
    long_about = None
)]
pub struct Cli {
    /// Verbose logging (debug level unless RUST_LOG is set)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate segment SQL files and import scripts
    Generate {
        /// Output directory for segment files
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Scale preset: small, medium, large, or full
        #[arg(short, long)]
        scale: Option<Scale>,

        /// Random seed for timestamps and view counts
        #[arg(long)]
        seed: Option<u64>,

        /// YAML config file with count overrides
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Rows per INSERT statement
        #[arg(long)]
        batch_size: Option<usize>,

        /// Do not write import_all.sh / import_all.bat
        #[arg(long)]
        no_scripts: bool,

        /// Show progress during generation
        #[arg(short, long)]
        progress: bool,

        /// Print the plan without writing files
        #[arg(long)]
        dry_run: bool,
    },

    /// Generate in memory and verify referential invariants
    Check {
        /// Scale preset: small, medium, large, or full
        #[arg(short, long)]
        scale: Option<Scale>,

        /// Random seed for timestamps and view counts
        #[arg(long)]
        seed: Option<u64>,

        /// YAML config file with count overrides
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output results as JSON
        #[arg(long)]
        json: bool,

        /// Show progress during generation
        #[arg(short, long)]
        progress: bool,
    },

    /// Show row counts, hot ranges and like pool size
    Plan {
        /// Scale preset: small, medium, large, or full
        #[arg(short, long)]
        scale: Option<Scale>,

        /// YAML config file with count overrides
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate {
            output,
            scale,
            seed,
            config,
            batch_size,
            no_scripts,
            progress,
            dry_run,
        } => generate::run(
            output, scale, seed, config, batch_size, no_scripts, progress, dry_run,
        ),
        Commands::Check {
            scale,
            seed,
            config,
            json,
            progress,
        } => check::run(scale, seed, config, json, progress),
        Commands::Plan {
            scale,
            config,
            json,
        } => plan::run(scale, config, json),
        Commands::Completions { shell } => {
            generate_completions(
                shell,
                &mut Cli::command(),
                "forum-fixtures",
                &mut io::stdout(),
            );
            Ok(())
        }
    }
}
