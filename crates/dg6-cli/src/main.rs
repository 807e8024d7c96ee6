//! DataGuide 6 ingestion CLI.

use std::process::ExitCode;

use clap::Parser;
use dg6_cli::logging::init_logging;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command};
use crate::commands::{run_detect, run_ingest, run_init, run_layouts, run_open};

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli.color.write_global();
    if let Err(error) = init_logging(&cli.log_config()) {
        eprintln!("error: failed to initialize logging: {error}");
        return ExitCode::FAILURE;
    }

    let layouts_dir = cli.layouts_dir.as_deref();
    let outcome = match &cli.command {
        Command::Detect(args) => run_detect(args, layouts_dir),
        Command::Layouts => run_layouts(layouts_dir),
        Command::Init(args) => run_init(args, layouts_dir),
        Command::Ingest(args) => run_ingest(args, layouts_dir),
        Command::Open(args) => run_open(args, layouts_dir),
    };
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}
