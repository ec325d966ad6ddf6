//! tourgame CLI - route engine and scoreboard for the TSP game
//!
//! Command-line interface for solving layouts, comparing strategies and
//! serving the game API.

use std::process::ExitCode;

use tourgame::cli::{run_cli, Args};

fn main() -> ExitCode {
    run_cli(Args::parse())
}
