//! Tours and the tour-length evaluator.
//!
//! Two conventions coexist:
//!
//! - an *open path* lists each city at most once and is what a player builds
//!   click by click;
//! - a *closed tour* repeats its first index as the last element and is what
//!   every automated strategy returns and what final scoring uses.
//!
//! ```text
//! L(π) = Σᵢ d(π(i), π(i+1))      for i in 0..len-1
//! ```
//!
//! [`total_distance`] is the single source of truth for tour cost.

use serde::{Deserialize, Serialize};

use crate::error::{TourError, TourResult};
use crate::geometry::City;

/// Ordered sequence of indices into a city list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tour(Vec<usize>);

impl Tour {
    /// Wrap an index sequence.
    #[must_use]
    pub const fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    /// Indices as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Number of positions (a closed tour over `n` cities has `n + 1`).
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the tour has no positions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the tour ends where it starts.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.0.len() >= 2 && self.0.first() == self.0.last()
    }

    /// Whether this is a closed tour visiting each of `n` cities exactly once.
    #[must_use]
    pub fn is_complete_cycle(&self, n: usize) -> bool {
        if n == 0 || self.0.len() != n + 1 || !self.is_closed() {
            return false;
        }
        let mut seen = vec![false; n];
        for &index in &self.0[..n] {
            if index >= n || seen[index] {
                return false;
            }
            seen[index] = true;
        }
        true
    }

    /// Translate indices into city display labels.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCityReference` if an index is out of range.
    pub fn labels(&self, cities: &[City]) -> TourResult<Vec<String>> {
        validate_indices(cities.len(), &self.0)?;
        Ok(self.0.iter().map(|&i| cities[i].id.clone()).collect())
    }

    /// Total length of this tour over `cities`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCityReference` if an index is out of range.
    pub fn distance(&self, cities: &[City]) -> TourResult<f64> {
        total_distance(cities, &self.0)
    }
}

impl From<Vec<usize>> for Tour {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl AsRef<[usize]> for Tour {
    fn as_ref(&self) -> &[usize] {
        &self.0
    }
}

/// Check that every index lies in `[0, len)`.
///
/// # Errors
///
/// Returns `InvalidCityReference` for the first offending index.
pub fn validate_indices(len: usize, tour: &[usize]) -> TourResult<()> {
    match tour.iter().find(|&&index| index >= len) {
        Some(&index) => Err(TourError::InvalidCityReference { index, len }),
        None => Ok(()),
    }
}

/// Sum of distances over consecutive index pairs.
///
/// Tours shorter than two positions have length `0`. No closing edge is
/// implied: a closed tour carries its own return leg.
///
/// # Errors
///
/// Returns `InvalidCityReference` if any index is outside the city list;
/// indices are checked before anything is evaluated.
pub fn total_distance(cities: &[City], tour: &[usize]) -> TourResult<f64> {
    validate_indices(cities.len(), tour)?;
    Ok(path_length(cities, tour))
}

/// Length of an already-validated index sequence.
pub(crate) fn path_length(cities: &[City], tour: &[usize]) -> f64 {
    tour.windows(2)
        .map(|pair| cities[pair[0]].distance_to(&cities[pair[1]]))
        .sum()
}
