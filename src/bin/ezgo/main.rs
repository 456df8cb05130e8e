//! ezgo CLI - CGO builds on Windows without a system C toolchain

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("!!! ezgo: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();

    let default_filter = if cli.quiet {
        "ezgo=error"
    } else if cli.verbose {
        "ezgo=debug"
    } else {
        "ezgo=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    let quiet = cli.quiet;
    match cli.command {
        Commands::Env(args) => commands::env::execute(args, quiet).map(|()| 0),
        Commands::Mod(args) => commands::module::execute(args).map(|()| 0),
        Commands::Pkg(args) => commands::pkg::execute(args, quiet).map(|()| 0),
        Commands::Shell(args) => commands::shell::execute(args, quiet),
        Commands::Go(args) => commands::go::execute(args, quiet),
    }
}
