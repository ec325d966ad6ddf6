//! Engine runtime support.
//!
//! Currently just the seedable RNG that drives the random baseline.

pub mod rng;

pub use rng::TourRng;
