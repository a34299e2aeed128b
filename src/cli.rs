use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Empirical bias correction of climate model output.
#[derive(Parser)]
#[command(
    name = "biascorr",
    version,
    about = "Quantile mapping and scaled distribution mapping for climate model output"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Correct every cell of a JSON cell file.
    Correct(CorrectArgs),
    /// Parse and validate a configuration file without running anything.
    CheckConfig(CheckConfigArgs),
}

/// Correction method selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MethodArg {
    /// Empirical quantile mapping.
    Qm,
    /// Scaled distribution mapping.
    Sdm,
}

/// Arguments for the `correct` subcommand.
#[derive(clap::Args)]
pub struct CorrectArgs {
    /// Path to the input cell file (JSON).
    #[arg(short, long)]
    pub input: PathBuf,

    /// Path for the result file (JSON).
    #[arg(short, long)]
    pub output: PathBuf,

    /// Path to a TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the method from the config file.
    #[arg(short, long, value_enum)]
    pub method: Option<MethodArg>,

    /// Number of worker threads (default: one per core).
    #[arg(short, long)]
    pub threads: Option<usize>,
}

/// Arguments for the `check-config` subcommand.
#[derive(clap::Args)]
pub struct CheckConfigArgs {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "biascorr.toml")]
    pub config: PathBuf,
}
