//! Uniform random baseline.

use crate::engine::TourRng;
use crate::error::TourResult;
use crate::geometry::City;
use crate::tour::Tour;

use super::require_cities;

/// Shuffle all city indices and close the loop on whichever index landed
/// first. The tour is *not* anchored at city `0`.
///
/// # Errors
///
/// Returns `InsufficientCities` if `cities` is empty.
pub fn random_tour(cities: &[City], rng: &mut TourRng) -> TourResult<Tour> {
    require_cities(cities)?;

    let mut path: Vec<usize> = (0..cities.len()).collect();
    rng.shuffle(&mut path);
    path.push(path[0]);

    Ok(Tour::new(path))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_closed_permutation(n in 1usize..40, seed in 0u64..u64::MAX) {
            let list: Vec<City> = (0..n).map(|i| City::new(format!("C{i}"), i as f64, 0.0)).collect();
            let mut rng = TourRng::new(seed);
            let tour = random_tour(&list, &mut rng).unwrap_or_default();
            prop_assert_eq!(tour.len(), n + 1);
            prop_assert_eq!(tour.as_slice()[n], tour.as_slice()[0]);
            prop_assert!(tour.is_complete_cycle(n));
        }
    }
}
