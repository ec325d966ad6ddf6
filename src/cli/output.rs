//! CLI output formatting.

use crate::geometry::City;
use crate::heuristics::HeuristicResult;
use crate::store::Run;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Version line with the metadata embedded by the build script.
#[must_use]
pub fn version_line() -> String {
    let version = option_env!("TOURGAME_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
    let git = option_env!("GIT_HASH").filter(|h| !h.is_empty()).unwrap_or("unknown");
    let built = option_env!("BUILD_TIMESTAMP").unwrap_or("unknown");
    format!("tourgame {version} (git {git}, built at unix time {built})")
}

/// Print version information.
pub fn print_version() {
    println!("{}", version_line());
}

/// Print help message.
pub fn print_help() {
    println!(
        r"tourgame - Route engine and scoreboard for the travelling-salesman game

USAGE:
    tourgame <COMMAND> [OPTIONS]

COMMANDS:
    solve <cities.yaml>         Build a tour with one strategy
        -s, --strategy <S>      greedy | nearest | 2opt | random (default: 2opt)
        --seed <N>              Seed for the random strategy
        --config <file.yaml>    Configuration file (engine.seed)

    compare <cities.yaml>       Run every strategy and rank the tours
        --seed <N>              Seed for the random strategy
        --config <file.yaml>    Configuration file (engine.seed)

    serve                       Start the HTTP API
        --config <file.yaml>    Configuration file

    scores                      Print the high-score table
        --scope <S>             global | per_game (default: global)
        --agent <TAG>           Only runs tagged human, bot-2opt, ...
        --limit <N>             Maximum rows (default: 20)
        --db <file.json>        Database file (default: db.json)

    help                        Show this help message
    version                     Show version information

EXAMPLES:
    tourgame solve layouts/square.yaml --strategy nearest
    tourgame compare layouts/square.yaml --seed 42
    tourgame serve --config tourgame.yaml
    tourgame scores --scope per_game --agent human

Set RUST_LOG (e.g. RUST_LOG=tourgame=debug) to see engine events.
"
    );
}

/// Render a route as `A → B → ... → A`.
#[must_use]
pub fn format_route(result: &HeuristicResult, cities: &[City]) -> String {
    result
        .route
        .as_slice()
        .iter()
        .filter_map(|&i| cities.get(i).map(|c| c.id.as_str()))
        .collect::<Vec<_>>()
        .join(" → ")
}

/// Body of the `solve` report. `seed` is shown only when the tour depends
/// on it.
#[must_use]
pub fn format_solution(result: &HeuristicResult, cities: &[City], seed: Option<u64>) -> String {
    let mut out = format!("Route:    {}\n", format_route(result, cities));
    out.push_str(&format!("Distance: {:.2}\n", result.distance));
    out.push_str(&format!("Time:     {:.3} ms\n", result.elapsed_ms));
    if let Some(seed) = seed {
        out.push_str(&format!("Seed:     {seed}\n"));
    }
    out
}

/// Print one strategy's result.
pub fn print_solution(result: &HeuristicResult, cities: &[City], seed: Option<u64>) {
    println!("{RULE}");
    println!("Strategy: {}", result.strategy);
    println!("Cities:   {}", cities.len());
    println!("{RULE}\n");
    print!("{}", format_solution(result, cities, seed));
}

/// Comparison table, shortest tour first.
#[must_use]
pub fn format_comparison(results: &[HeuristicResult]) -> String {
    let mut ranked: Vec<&HeuristicResult> = results.iter().collect();
    ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));

    let best = ranked.first().map_or(0.0, |r| r.distance);
    let mut out = String::from("  #  Strategy   Distance      Gap   Time (ms)\n");
    for (rank, result) in ranked.iter().enumerate() {
        let gap = if best > 0.0 {
            (result.distance - best) / best * 100.0
        } else {
            0.0
        };
        out.push_str(&format!(
            "{:>3}  {:<9} {:>9.2} {:>7.1}% {:>11.3}\n",
            rank + 1,
            result.strategy.name(),
            result.distance,
            gap,
            result.elapsed_ms
        ));
    }
    out
}

/// Print the comparison of all strategies.
pub fn print_comparison(results: &[HeuristicResult], cities: usize, seed: u64) {
    println!("{RULE}");
    println!("Strategy comparison over {cities} cities (random seed {seed})");
    println!("{RULE}\n");
    print!("{}", format_comparison(results));
}

/// High-score table rows.
#[must_use]
pub fn format_scores(runs: &[Run]) -> String {
    if runs.is_empty() {
        return "No scores yet.\n".to_string();
    }
    let mut out = String::from("  #  Player            Agent          Cities   Distance   ms\n");
    for (rank, run) in runs.iter().enumerate() {
        out.push_str(&format!(
            "{:>3}  {:<16}  {:<13}  {:>6}  {:>9.2}   {}\n",
            rank + 1,
            run.player_name,
            run.agent_type,
            run.num_cities,
            run.distance,
            run.compute_time_ms
        ));
    }
    out
}

/// Print the high-score table.
pub fn print_scores(runs: &[Run]) {
    println!("{RULE}");
    println!("High scores (more cities first, then shortest)");
    println!("{RULE}\n");
    print!("{}", format_scores(runs));
}
