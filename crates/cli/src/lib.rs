//! nestkv CLI -- run command sessions, generate and verify scripts.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod session;

pub use session::{run_session, LineError, RunOptions, SessionSummary};

#[derive(Debug, Parser)]
#[command(
    name = "nestkv",
    about = "In-memory key-value store with nested transactions"
)]
pub struct App {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Read commands line by line and print their results
    Run(RunArgs),
    /// Generate random command scripts with recorded expected outputs
    Generate(GenerateArgs),
    /// Replay generated scripts and compare against their recorded outputs
    Verify(VerifyArgs),
    /// Normalise whitespace in command script files
    Fmt(FmtArgs),
}

#[derive(Debug, Parser)]
pub struct RunArgs {
    /// Read commands from this file instead of stdin
    #[arg(long)]
    pub input: Option<PathBuf>,
    /// Output results as JSON (one object per input line)
    #[arg(long)]
    pub json: bool,
    /// Print each command before its result
    #[arg(long)]
    pub echo: bool,
}

#[derive(Debug, Parser)]
pub struct GenerateArgs {
    /// Number of scripts to generate
    #[arg(long)]
    pub n_script: u64,
    /// Number of commands per script (excluding the final END)
    #[arg(long)]
    pub n_command: u64,
    /// Number of distinct variable names
    #[arg(long)]
    pub n_variable: u64,
    /// Number of distinct values
    #[arg(long)]
    pub n_value: u64,
    /// Maximum number of simultaneously open transactions
    #[arg(long, default_value_t = 4)]
    pub max_depth: u64,
    /// Output directory for generated script files
    #[arg(long)]
    pub output_dir: PathBuf,
}

#[derive(Debug, Parser)]
pub struct VerifyArgs {
    /// Input directory containing generated script JSON files
    #[arg(long)]
    pub input_dir: PathBuf,
    /// Print mismatch details on FAIL
    #[arg(long)]
    pub verbose: bool,
    /// Output results as JSON (one object per file)
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Parser)]
pub struct FmtArgs {
    /// Script files, or directories containing `.kv` files
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
    /// Check formatting without modifying files (exit 1 if unformatted)
    #[arg(long)]
    pub check: bool,
}

impl From<&RunArgs> for RunOptions {
    fn from(args: &RunArgs) -> Self {
        Self {
            json: args.json,
            echo: args.echo,
        }
    }
}
