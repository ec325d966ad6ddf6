//! CLI module for tourgame.
//!
//! All CLI logic lives here rather than in main.rs so it can be tested.
//! The entry point `run_cli` is called from main.rs with parsed arguments.

mod args;
mod commands;
mod output;

pub use args::{Args, Command};
pub use commands::{compare, run_cli, scores, serve, solve};
pub use output::{
    format_comparison, format_route, format_scores, format_solution, print_comparison, print_help, print_scores,
    print_solution, print_version, version_line,
};
