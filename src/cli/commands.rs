//! CLI command handlers.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing::debug;

use crate::config::GameConfig;
use crate::error::TourResult;
use crate::heuristics::{HeuristicRunner, Strategy};
use crate::instance::CitySet;
use crate::logging;
use crate::store::{JsonStore, Scope};

use super::output::{print_comparison, print_help, print_scores, print_solution, print_version};
use super::{Args, Command};

/// Main CLI entry point.
///
/// Dispatches to the appropriate command handler based on parsed arguments.
#[must_use]
pub fn run_cli(args: Args) -> ExitCode {
    match args.command {
        Command::Solve {
            cities_path,
            strategy,
            seed,
            config_path,
        } => report(solve(&cities_path, strategy, seed, config_path.as_deref())),
        Command::Compare {
            cities_path,
            seed,
            config_path,
        } => report(compare(&cities_path, seed, config_path.as_deref())),
        Command::Serve { config_path } => report(serve(config_path.as_deref())),
        Command::Scores {
            scope,
            agent_type,
            limit,
            db_path,
        } => report(scores(scope, agent_type.as_deref(), limit, db_path)),
        Command::Help => {
            print_help();
            ExitCode::SUCCESS
        }
        Command::Version => {
            print_version();
            ExitCode::SUCCESS
        }
    }
}

fn report(result: TourResult<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

fn load_cities(path: &Path) -> TourResult<CitySet> {
    let set = CitySet::load(path)?;
    debug!(event = "cities_loaded", path = %path.display(), cities = set.len());
    Ok(set)
}

/// Runner seeded from `--seed`, else from `engine.seed` in the config.
fn runner(seed: Option<u64>, config_path: Option<&Path>) -> TourResult<HeuristicRunner> {
    let config = load_config(config_path)?;
    Ok(HeuristicRunner::with_seed(seed.or(config.engine.seed)))
}

/// Build one tour over a city file and print it.
///
/// # Errors
///
/// Returns error if the config or city file cannot be loaded, or the file
/// holds no cities.
pub fn solve(
    path: &Path,
    strategy: Strategy,
    seed: Option<u64>,
    config_path: Option<&Path>,
) -> TourResult<()> {
    logging::init("warn");
    let mut runner = runner(seed, config_path)?;
    let set = load_cities(path)?;
    let result = runner.run(strategy, &set.cities)?;
    let seed = strategy.is_stochastic().then(|| runner.seed());
    print_solution(&result, &set.cities, seed);
    Ok(())
}

/// Run every strategy over a city file and print the ranking.
///
/// # Errors
///
/// Returns error if the config or city file cannot be loaded, or the file
/// holds no cities.
pub fn compare(path: &Path, seed: Option<u64>, config_path: Option<&Path>) -> TourResult<()> {
    logging::init("warn");
    let mut runner = runner(seed, config_path)?;
    let set = load_cities(path)?;
    let results = runner.run_all(&set.cities)?;
    print_comparison(&results, set.len(), runner.seed());
    Ok(())
}

/// Start the HTTP API.
///
/// # Errors
///
/// Returns error if configuration fails to load or the server cannot start.
#[cfg(feature = "web")]
pub fn serve(config_path: Option<&Path>) -> TourResult<()> {
    let config = load_config(config_path)?;
    logging::init(&config.logging.filter);
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(crate::web::serve(config))
}

/// Start the HTTP API.
///
/// # Errors
///
/// Always fails: the binary was built without the `web` feature.
#[cfg(not(feature = "web"))]
pub fn serve(config_path: Option<&Path>) -> TourResult<()> {
    load_config(config_path)?;
    Err(crate::error::TourError::config(
        "this build has no HTTP server; rebuild with `--features web`",
    ))
}

/// Print the high-score table from a database file.
///
/// # Errors
///
/// Returns error if the database cannot be opened.
pub fn scores(
    scope: Scope,
    agent_type: Option<&str>,
    limit: Option<usize>,
    db_path: Option<PathBuf>,
) -> TourResult<()> {
    logging::init("warn");
    let config = GameConfig::default();
    let store = JsonStore::open(db_path.unwrap_or(config.store.path))?;
    let runs = store.highscores(scope, agent_type, limit.unwrap_or(config.scoreboard.limit))?;
    print_scores(&runs);
    Ok(())
}

fn load_config(path: Option<&Path>) -> TourResult<GameConfig> {
    path.map_or_else(|| Ok(GameConfig::default()), GameConfig::load)
}
