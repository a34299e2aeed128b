mod check_cmd;
mod cli;
mod config;
mod convert;
mod correct_cmd;
mod logging;

use std::process;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Correct(args) => correct_cmd::run(args),
        Command::CheckConfig(args) => check_cmd::run(args),
    }
}
