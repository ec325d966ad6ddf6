//! CLI argument parsing.
//!
//! Hand-rolled so parsing stays testable from any iterator of strings.

use std::path::PathBuf;
use std::str::FromStr;

use crate::heuristics::Strategy;
use crate::store::Scope;

/// CLI arguments container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    /// The command to execute.
    pub command: Command,
}

/// Available CLI commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Build a tour over a city file with one strategy
    Solve {
        /// Path to the city YAML file.
        cities_path: PathBuf,
        /// Strategy to run.
        strategy: Strategy,
        /// Seed override for the random strategy.
        seed: Option<u64>,
        /// Optional configuration file.
        config_path: Option<PathBuf>,
    },
    /// Run every strategy over a city file
    Compare {
        /// Path to the city YAML file.
        cities_path: PathBuf,
        /// Seed override for the random strategy.
        seed: Option<u64>,
        /// Optional configuration file.
        config_path: Option<PathBuf>,
    },
    /// Start the HTTP API
    Serve {
        /// Optional configuration file.
        config_path: Option<PathBuf>,
    },
    /// Print the high-score table
    Scores {
        /// Ranking scope.
        scope: Scope,
        /// Only runs with this agent tag.
        agent_type: Option<String>,
        /// Maximum rows.
        limit: Option<usize>,
        /// Database file (defaults to the configured store).
        db_path: Option<PathBuf>,
    },
    /// Show help
    Help,
    /// Show version
    Version,
}

impl Args {
    /// Parse command-line arguments from an iterator.
    #[must_use]
    pub fn parse_from<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
        Self::parse_from_vec(&args)
    }

    /// Parse command-line arguments from the environment.
    #[must_use]
    pub fn parse() -> Self {
        Self::parse_from(std::env::args())
    }

    fn parse_from_vec(args: &[String]) -> Self {
        if args.len() < 2 {
            return Self {
                command: Command::Help,
            };
        }

        let command = match args[1].as_str() {
            "solve" => Self::parse_solve_command(args),
            "compare" => Self::parse_compare_command(args),
            "serve" => Self::parse_serve_command(args),
            "scores" => Self::parse_scores_command(args),
            "-h" | "--help" | "help" => Command::Help,
            "-V" | "--version" | "version" => Command::Version,
            unknown => {
                eprintln!("Unknown command: {unknown}");
                Command::Help
            }
        };

        Self { command }
    }

    fn parse_solve_command(args: &[String]) -> Command {
        if args.len() < 3 {
            eprintln!("Error: 'solve' command requires a city file");
            return Command::Help;
        }

        let mut strategy = Strategy::TwoOpt;
        let mut seed = None;
        let mut config_path = None;

        let mut i = 3;
        while i < args.len() {
            match args[i].as_str() {
                "-s" | "--strategy" => {
                    if let Some(value) = args.get(i + 1) {
                        match value.parse() {
                            Ok(parsed) => strategy = parsed,
                            Err(e) => {
                                eprintln!("Error: {e}");
                                return Command::Help;
                            }
                        }
                    }
                    i += 2;
                }
                "--seed" => {
                    if let Some(value) = args.get(i + 1) {
                        match parse_number("--seed", value) {
                            Some(parsed) => seed = Some(parsed),
                            None => return Command::Help,
                        }
                    }
                    i += 2;
                }
                "--config" => {
                    config_path = args.get(i + 1).map(PathBuf::from).or(config_path);
                    i += 2;
                }
                _ => i += 1,
            }
        }

        Command::Solve {
            cities_path: PathBuf::from(&args[2]),
            strategy,
            seed,
            config_path,
        }
    }

    fn parse_compare_command(args: &[String]) -> Command {
        if args.len() < 3 {
            eprintln!("Error: 'compare' command requires a city file");
            return Command::Help;
        }

        let Ok(seed) = numeric_option(args, 3, "--seed") else {
            return Command::Help;
        };

        Command::Compare {
            cities_path: PathBuf::from(&args[2]),
            seed,
            config_path: option_value(args, 3, "--config").map(PathBuf::from),
        }
    }

    fn parse_serve_command(args: &[String]) -> Command {
        Command::Serve {
            config_path: option_value(args, 2, "--config").map(PathBuf::from),
        }
    }

    fn parse_scores_command(args: &[String]) -> Command {
        let scope = match option_value(args, 2, "--scope") {
            Some(value) => match value.parse() {
                Ok(scope) => scope,
                Err(e) => {
                    eprintln!("Error: {e}");
                    return Command::Help;
                }
            },
            None => Scope::Global,
        };
        let Ok(limit) = numeric_option(args, 2, "--limit") else {
            return Command::Help;
        };

        Command::Scores {
            scope,
            agent_type: option_value(args, 2, "--agent").map(str::to_string),
            limit,
            db_path: option_value(args, 2, "--db").map(PathBuf::from),
        }
    }
}

/// Value following the last occurrence of `flag` at or after `start`.
fn option_value<'a>(args: &'a [String], start: usize, flag: &str) -> Option<&'a str> {
    args.iter()
        .skip(start)
        .zip(args.iter().skip(start + 1))
        .filter(|(key, _)| *key == flag)
        .map(|(_, value)| value.as_str())
        .last()
}

/// Parse a numeric flag value, reporting it when malformed.
fn parse_number<T: FromStr>(flag: &str, value: &str) -> Option<T> {
    let parsed = value.trim().parse().ok();
    if parsed.is_none() {
        eprintln!("Error: {flag} expects a non-negative integer, got '{value}'");
    }
    parsed
}

/// Numeric value of `flag`; `Err` once a malformed value has been reported.
fn numeric_option<T: FromStr>(args: &[String], start: usize, flag: &str) -> Result<Option<T>, ()> {
    match option_value(args, start, flag) {
        Some(value) => parse_number(flag, value).map(Some).ok_or(()),
        None => Ok(None),
    }
}
