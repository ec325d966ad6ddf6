//! Nearest-neighbor construction.
//!
//! Greedy: from the last city on the path, move to the closest unvisited
//! city, then close the loop back to the start. Unvisited cities are scanned
//! in ascending index order and only a strictly shorter distance replaces
//! the current choice, so exact ties always go to the lowest index.
//!
//! The multi-start variant repeats this from every city and keeps the
//! shortest tour, again with the lowest start index winning ties.

use crate::error::{TourError, TourResult};
use crate::geometry::City;
use crate::tour::{path_length, Tour};

use super::require_cities;

/// Build a closed tour greedily from `start`.
///
/// Returns a tour of length `n + 1`; a single city yields `[start, start]`.
///
/// # Errors
///
/// - `InsufficientCities` if `cities` is empty.
/// - `InvalidCityReference` if `start >= cities.len()`.
pub fn nearest_neighbor(cities: &[City], start: usize) -> TourResult<Tour> {
    require_cities(cities)?;
    let n = cities.len();
    if start >= n {
        return Err(TourError::InvalidCityReference { index: start, len: n });
    }
    Ok(build_from(cities, start))
}

/// Run [`nearest_neighbor`] from every start and keep the shortest tour.
///
/// `O(n³)` overall, fine at interactive scale.
///
/// # Errors
///
/// Returns `InsufficientCities` if `cities` is empty.
pub fn multi_start_nearest_neighbor(cities: &[City]) -> TourResult<Tour> {
    require_cities(cities)?;

    let mut best = build_from(cities, 0);
    let mut best_length = path_length(cities, best.as_slice());

    for start in 1..cities.len() {
        let candidate = build_from(cities, start);
        let length = path_length(cities, candidate.as_slice());
        if length < best_length {
            best_length = length;
            best = candidate;
        }
    }

    Ok(best)
}

/// Greedy construction for a validated, non-empty city list.
fn build_from(cities: &[City], start: usize) -> Tour {
    let n = cities.len();
    let mut visited = vec![false; n];
    let mut path = Vec::with_capacity(n + 1);

    visited[start] = true;
    path.push(start);

    let mut current = start;
    for _ in 1..n {
        let mut best_next = None;
        let mut best_dist = f64::INFINITY;

        for (i, city) in cities.iter().enumerate() {
            if visited[i] {
                continue;
            }
            let d = cities[current].distance_to(city);
            if d < best_dist {
                best_dist = d;
                best_next = Some(i);
            }
        }

        // Non-finite coordinates never compare as shorter; fall back to the
        // first unvisited city so the tour stays a permutation.
        let Some(next) = best_next.or_else(|| visited.iter().position(|&v| !v)) else {
            break;
        };
        visited[next] = true;
        path.push(next);
        current = next;
    }

    path.push(start);
    Tour::new(path)
}
