//! # tourgame
//!
//! Route engine and scoreboard for a travelling-salesman game.
//!
//! Players place cities on a board, save the layout, then click out a
//! closed route. Bots build routes over the same layout with one of four
//! strategies:
//!
//! - `greedy`: nearest neighbour from the first city
//! - `nearest`: nearest neighbour from every city, keep the shortest
//! - `2opt`: the `nearest` tour, then first-improvement 2-opt
//! - `random`: a uniformly shuffled tour
//!
//! Runs are scored by recomputed distance and ranked with more cities
//! first, then shorter routes.
//!
//! ## Example
//!
//! ```rust
//! use tourgame::prelude::*;
//!
//! let cities = vec![
//!     City::new("A", 0.0, 0.0),
//!     City::new("B", 0.0, 1.0),
//!     City::new("C", 1.0, 1.0),
//!     City::new("D", 1.0, 0.0),
//! ];
//!
//! let mut runner = HeuristicRunner::with_seed(Some(42));
//! let result = runner.run(Strategy::TwoOpt, &cities).unwrap();
//! assert_eq!(result.route.as_slice(), &[0, 1, 2, 3, 0]);
//! assert!((result.distance - 4.0).abs() < 1e-9);
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::suboptimal_flops,
    clippy::too_many_lines,
    clippy::missing_const_for_fn,  // Many functions can't be const in stable Rust
    clippy::needless_range_loop,   // Index loops read better in 2-opt
)]

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod geometry;
pub mod heuristics;
pub mod instance;
pub mod logging;
pub mod store;
pub mod tour;

#[cfg(feature = "web")]
pub mod web;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{GameConfig, GameConfigBuilder, GameRules};
    pub use crate::engine::TourRng;
    pub use crate::error::{TourError, TourResult};
    pub use crate::game::GameSession;
    pub use crate::geometry::City;
    pub use crate::heuristics::{HeuristicResult, HeuristicRunner, Strategy};
    pub use crate::instance::CitySet;
    pub use crate::store::{GameBackend, JsonStore, Scope};
    pub use crate::tour::{total_distance, Tour};
}

/// Re-export for public API
pub use error::{TourError, TourResult};
