//! 2-opt local search.
//!
//! A move reverses the interior segment `[i, j]` of a closed tour, replacing
//! edges `(i-1, i)` and `(j, j+1)` with `(i-1, j)` and `(i, j+1)`:
//!
//! ```text
//! before: ... a → [b → ... → c] → d ...
//! after:  ... a → [c → ... → b] → d ...
//! ```
//!
//! Policy is first-improvement with full restart: the first candidate that
//! is strictly shorter is adopted and scanning starts again from `i = 1`.
//! A pass with no accepted move ends the search. The anchor positions `0`
//! and `len - 1` never move.

use crate::error::TourResult;
use crate::geometry::City;
use crate::tour::{path_length, validate_indices, Tour};

/// Improve a closed tour until no 2-opt move shortens it.
///
/// Tours with fewer than four positions have no interior pair and come back
/// unchanged. The result is never longer than the input, and feeding the
/// result back in returns it as-is.
///
/// # Errors
///
/// Returns `InvalidCityReference` if `tour` references an index outside
/// `cities`.
pub fn two_opt(cities: &[City], tour: &[usize]) -> TourResult<Tour> {
    validate_indices(cities.len(), tour)?;

    let mut route = tour.to_vec();
    let len = route.len();
    if len < 4 {
        return Ok(Tour::new(route));
    }

    let mut current = path_length(cities, &route);
    while let Some(shorter) = first_improvement(cities, &mut route, current) {
        current = shorter;
    }

    Ok(Tour::new(route))
}

/// Scan `(i, j)` pairs in order and apply the first strictly improving
/// reversal. Returns the new length, or `None` once the pass is exhausted
/// (with `route` left as it was).
fn first_improvement(cities: &[City], route: &mut [usize], current: f64) -> Option<f64> {
    let len = route.len();
    for i in 1..len - 2 {
        for j in i + 1..len - 1 {
            route[i..=j].reverse();
            let candidate = path_length(cities, route);
            if candidate < current {
                return Some(candidate);
            }
            route[i..=j].reverse();
        }
    }
    None
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::heuristics::nearest_neighbor;
    use crate::tour::total_distance;
    use proptest::prelude::*;

    fn arb_cities() -> impl Strategy<Value = Vec<City>> {
        prop::collection::vec((0.0f64..800.0, 0.0f64..600.0), 1..14).prop_map(|points| {
            points
                .into_iter()
                .enumerate()
                .map(|(i, (x, y))| City::new(format!("C{i}"), x.round(), y.round()))
                .collect()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_never_worse_and_idempotent(cities in arb_cities(), pick in 0usize..14) {
            let start = pick % cities.len();
            let initial = nearest_neighbor(&cities, start).unwrap_or_default();
            let before = total_distance(&cities, initial.as_slice()).unwrap_or(f64::NAN);

            let improved = two_opt(&cities, initial.as_slice()).unwrap_or_default();
            let after = improved.distance(&cities).unwrap_or(f64::NAN);
            prop_assert!(after <= before);
            prop_assert!(improved.is_complete_cycle(cities.len()));
            prop_assert_eq!(improved.as_slice()[0], start);

            let again = two_opt(&cities, improved.as_slice()).unwrap_or_default();
            prop_assert_eq!(again, improved);
        }
    }
}
