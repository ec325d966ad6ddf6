//! End-to-end checks of the route engine through the public API.

use tourgame::heuristics::{multi_start_nearest_neighbor, nearest_neighbor, random_tour, two_opt};
use tourgame::prelude::*;

const EPS: f64 = 1e-9;

/// 10x10 square labelled A, B, C, D counter-clockwise from the origin.
fn square() -> Vec<City> {
    vec![
        City::new("A", 0.0, 0.0),
        City::new("B", 10.0, 0.0),
        City::new("C", 10.0, 10.0),
        City::new("D", 0.0, 10.0),
    ]
}

/// Deterministic scatter of `n` cities.
fn scatter(n: usize, seed: u64) -> Vec<City> {
    let mut rng = TourRng::new(seed);
    (0..n)
        .map(|i| City::new(format!("C{i}"), (rng.gen_f64() * 800.0).round(), (rng.gen_f64() * 600.0).round()))
        .collect()
}

fn is_permutation_cycle(route: &[usize], n: usize) -> bool {
    let mut body: Vec<usize> = route[..route.len() - 1].to_vec();
    body.sort_unstable();
    route.len() == n + 1 && route.first() == route.last() && body == (0..n).collect::<Vec<_>>()
}

#[test]
fn square_nearest_neighbor_from_a() {
    let cities = square();
    let tour = nearest_neighbor(&cities, 0).unwrap();
    assert_eq!(tour.labels(&cities).unwrap(), ["A", "B", "C", "D", "A"]);
    assert!((tour.distance(&cities).unwrap() - 40.0).abs() < EPS);
}

#[test]
fn square_crossed_tour_converges_to_perimeter() {
    let cities = square();
    let crossed = [0, 2, 1, 3, 0];
    let before = total_distance(&cities, &crossed).unwrap();
    assert!((before - (20.0 + 20.0 * 2.0_f64.sqrt())).abs() < 1e-6);
    assert!((before - 48.28).abs() < 0.01);

    let improved = two_opt(&cities, &crossed).unwrap();
    assert!((improved.distance(&cities).unwrap() - 40.0).abs() < EPS);
    assert_eq!(improved.as_slice().first(), Some(&0));
    assert_eq!(improved.as_slice().last(), Some(&0));
}

#[test]
fn single_city_closes_on_itself() {
    let cities = vec![City::new("A", 3.0, 4.0)];
    let tour = nearest_neighbor(&cities, 0).unwrap();
    assert_eq!(tour.as_slice(), &[0, 0]);
    assert!(tour.distance(&cities).unwrap().abs() < EPS);

    let mut runner = HeuristicRunner::with_seed(Some(1));
    for result in runner.run_all(&cities).unwrap() {
        assert_eq!(result.route.as_slice(), &[0, 0]);
        assert!(result.distance.abs() < EPS);
    }
}

#[test]
fn no_cities_fails_every_strategy() {
    let mut runner = HeuristicRunner::with_seed(Some(1));
    for strategy in Strategy::ALL {
        let err = runner.run(strategy, &[]).unwrap_err();
        assert!(matches!(err, TourError::InsufficientCities { actual: 0, .. }));
    }
}

#[test]
fn short_tours_have_zero_length() {
    let cities = square();
    assert!(total_distance(&cities, &[]).unwrap().abs() < EPS);
    assert!(total_distance(&cities, &[2]).unwrap().abs() < EPS);
}

#[test]
fn out_of_range_index_is_rejected() {
    let cities = square();
    assert!(matches!(
        total_distance(&cities, &[0, 9, 0]),
        Err(TourError::InvalidCityReference { index: 9, len: 4 })
    ));
    assert!(matches!(
        two_opt(&cities, &[0, 1, 7, 2, 0]),
        Err(TourError::InvalidCityReference { index: 7, .. })
    ));
}

#[test]
fn multi_start_never_worse_than_any_single_start() {
    for seed in [3, 11, 29] {
        let cities = scatter(15, seed);
        let best = multi_start_nearest_neighbor(&cities).unwrap().distance(&cities).unwrap();
        for start in 0..cities.len() {
            let single = nearest_neighbor(&cities, start).unwrap().distance(&cities).unwrap();
            assert!(best <= single + EPS);
        }
    }
}

#[test]
fn two_opt_is_idempotent_and_never_worse() {
    let cities = scatter(20, 5);
    let mut rng = TourRng::new(5);
    let initial = random_tour(&cities, &mut rng).unwrap();

    let once = two_opt(&cities, initial.as_slice()).unwrap();
    let twice = two_opt(&cities, once.as_slice()).unwrap();
    assert!(once.distance(&cities).unwrap() <= initial.distance(&cities).unwrap() + EPS);
    assert_eq!(once, twice);
    assert!(is_permutation_cycle(once.as_slice(), cities.len()));
}

#[test]
fn two_opt_rescans_from_the_start_after_each_move() {
    let coords = [(29.0, 47.0), (48.0, 16.0), (24.0, 90.0), (5.0, 10.0), (17.0, 31.0), (64.0, 26.0), (51.0, 82.0), (3.0, 58.0)];
    let cities: Vec<City> = coords
        .iter()
        .zip('A'..)
        .map(|(&(x, y), label)| City::new(label.to_string(), x, y))
        .collect();

    let improved = two_opt(&cities, &[0, 1, 2, 3, 4, 5, 6, 7, 0]).unwrap();
    assert_eq!(
        improved.labels(&cities).unwrap(),
        ["A", "E", "D", "B", "F", "G", "C", "H", "A"]
    );
    assert!((improved.distance(&cities).unwrap() - 258.627_214_134_065_87).abs() < EPS);
}

#[test]
fn random_tour_is_closed_on_its_first_city() {
    let cities = scatter(12, 8);
    let mut rng = TourRng::new(8);
    for _ in 0..50 {
        let tour = random_tour(&cities, &mut rng).unwrap();
        assert!(is_permutation_cycle(tour.as_slice(), cities.len()));
    }
}

#[test]
fn seeded_runner_is_reproducible() {
    let cities = scatter(10, 2);
    let a = HeuristicRunner::with_seed(Some(99)).run(Strategy::Random, &cities).unwrap();
    let b = HeuristicRunner::with_seed(Some(99)).run(Strategy::Random, &cities).unwrap();
    assert_eq!(a.route, b.route);
}

#[test]
fn runner_strategies_rank_as_expected() {
    let cities = scatter(25, 13);
    let mut runner = HeuristicRunner::with_seed(Some(13));
    let results = runner.run_all(&cities).unwrap();
    let by = |s: Strategy| results.iter().find(|r| r.strategy == s).unwrap().distance;

    assert!(by(Strategy::Nearest) <= by(Strategy::Greedy) + EPS);
    assert!(by(Strategy::TwoOpt) <= by(Strategy::Nearest) + EPS);
    for result in &results {
        assert!(is_permutation_cycle(result.route.as_slice(), cities.len()));
        assert!(result.elapsed_ms >= 0.0);
    }
}

#[test]
fn strategy_names_round_trip_at_the_boundary() {
    for strategy in Strategy::ALL {
        assert_eq!(strategy.name().parse::<Strategy>().unwrap(), strategy);
        assert_eq!(strategy.agent_type(), format!("bot-{}", strategy.name()));
    }
    assert!("best".parse::<Strategy>().is_err());
}
