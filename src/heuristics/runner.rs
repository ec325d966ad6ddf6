//! Strategy selection, timing and result packaging.

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::TourRng;
use crate::error::{TourError, TourResult};
use crate::geometry::City;
use crate::tour::{path_length, Tour};

use super::{multi_start_nearest_neighbor, nearest_neighbor, random_tour, two_opt};

/// Named tour strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// Nearest neighbor from city 0.
    #[serde(rename = "greedy")]
    Greedy,
    /// Multi-start nearest neighbor.
    #[serde(rename = "nearest")]
    Nearest,
    /// 2-opt applied to the multi-start tour.
    #[serde(rename = "2opt")]
    TwoOpt,
    /// Uniform random closed tour.
    #[serde(rename = "random")]
    Random,
}

impl Strategy {
    /// All strategies in display order.
    pub const ALL: [Self; 4] = [Self::Greedy, Self::Nearest, Self::TwoOpt, Self::Random];

    /// Boundary identifier.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Greedy => "greedy",
            Self::Nearest => "nearest",
            Self::TwoOpt => "2opt",
            Self::Random => "random",
        }
    }

    /// Agent tag recorded with submitted runs (`bot-<name>`).
    #[must_use]
    pub fn agent_type(self) -> String {
        format!("bot-{}", self.name())
    }

    /// Player name recorded with submitted runs (`Bot-<name>`).
    #[must_use]
    pub fn player_name(self) -> String {
        format!("Bot-{}", self.name())
    }

    /// Whether the strategy consumes randomness.
    #[must_use]
    pub const fn is_stochastic(self) -> bool {
        matches!(self, Self::Random)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = TourError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "greedy" => Ok(Self::Greedy),
            "nearest" => Ok(Self::Nearest),
            "2opt" => Ok(Self::TwoOpt),
            "random" => Ok(Self::Random),
            other => Err(TourError::UnknownStrategy(other.to_string())),
        }
    }
}

/// Outcome of one heuristic invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeuristicResult {
    /// Strategy that produced the tour.
    pub strategy: Strategy,
    /// Closed tour over the input cities.
    pub route: Tour,
    /// Total length of `route`.
    pub distance: f64,
    /// Wall-clock time spent constructing the tour.
    pub elapsed_ms: f64,
}

impl HeuristicResult {
    /// Elapsed time in whole milliseconds, as reported to the scoreboard.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn compute_time_ms(&self) -> u64 {
        self.elapsed_ms.max(0.0).round() as u64
    }
}

/// Dispatches strategies and times them.
///
/// Holds the RNG for the `random` strategy; the other strategies are
/// deterministic and ignore it.
#[derive(Debug, Clone, Default)]
pub struct HeuristicRunner {
    rng: TourRng,
}

impl HeuristicRunner {
    /// Create a runner with an explicit RNG.
    #[must_use]
    pub const fn new(rng: TourRng) -> Self {
        Self { rng }
    }

    /// Create a runner seeded with `seed`, or from entropy when `None`.
    #[must_use]
    pub fn with_seed(seed: Option<u64>) -> Self {
        Self::new(TourRng::from_seed_option(seed))
    }

    /// Seed backing the `random` strategy.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Run `strategy` over `cities`.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientCities` if `cities` is empty.
    pub fn run(&mut self, strategy: Strategy, cities: &[City]) -> TourResult<HeuristicResult> {
        let start = Instant::now();
        let route = match strategy {
            Strategy::Greedy => nearest_neighbor(cities, 0)?,
            Strategy::Nearest => multi_start_nearest_neighbor(cities)?,
            Strategy::TwoOpt => {
                let initial = multi_start_nearest_neighbor(cities)?;
                two_opt(cities, initial.as_slice())?
            }
            Strategy::Random => random_tour(cities, &mut self.rng)?,
        };
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        // Heuristic tours only hold indices into `cities`
        let distance = path_length(cities, route.as_slice());

        debug!(
            event = "heuristic_run",
            strategy = %strategy,
            cities = cities.len(),
            distance,
            elapsed_ms,
        );

        Ok(HeuristicResult {
            strategy,
            route,
            distance,
            elapsed_ms,
        })
    }

    /// Run every strategy over the same cities, in [`Strategy::ALL`] order.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientCities` if `cities` is empty.
    pub fn run_all(&mut self, cities: &[City]) -> TourResult<Vec<HeuristicResult>> {
        Strategy::ALL
            .iter()
            .map(|&strategy| self.run(strategy, cities))
            .collect()
    }
}
