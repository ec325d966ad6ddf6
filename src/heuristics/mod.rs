//! Tour construction and improvement strategies.
//!
//! Four named strategies are exposed at the boundary:
//!
//! | Name      | Algorithm                                    |
//! |-----------|----------------------------------------------|
//! | `greedy`  | nearest neighbor from city 0                 |
//! | `nearest` | nearest neighbor from every city, best kept  |
//! | `2opt`    | 2-opt over the `nearest` tour                |
//! | `random`  | uniform random closed tour                   |
//!
//! Every function here borrows its inputs and returns a fresh
//! [`Tour`](crate::tour::Tour);
//! none keeps state between calls.

mod nearest;
mod random;
mod runner;
mod two_opt;

pub use nearest::{multi_start_nearest_neighbor, nearest_neighbor};
pub use random::random_tour;
pub use runner::{HeuristicResult, HeuristicRunner, Strategy};
pub use two_opt::two_opt;

use crate::error::{TourError, TourResult};
use crate::geometry::City;

/// Every heuristic needs at least one city.
fn require_cities(cities: &[City]) -> TourResult<()> {
    if cities.is_empty() {
        return Err(TourError::InsufficientCities {
            required: 1,
            actual: 0,
        });
    }
    Ok(())
}
