//! Planar geometry for user-placed cities.
//!
//! ```text
//! d(a, b) = √((a.x − b.x)² + (a.y − b.y)²)
//! ```

use serde::{Deserialize, Serialize};

/// A labelled 2D point placed by the player.
///
/// Cities are immutable once created. Tours refer to them by their index in
/// the caller's city list, never by copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    /// Display label, unique within a game (assigned in creation order).
    pub id: String,
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl City {
    /// Create a new city at coordinates (x, y).
    #[must_use]
    pub fn new(id: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            x,
            y,
        }
    }

    /// Euclidean distance to another city.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        distance(self.x, self.y, other.x, other.y)
    }

    /// Euclidean distance to an arbitrary point.
    #[must_use]
    pub fn distance_to_point(&self, x: f64, y: f64) -> f64 {
        distance(self.x, self.y, x, y)
    }
}

/// Euclidean distance between two points.
#[must_use]
pub fn distance(ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    (ax - bx).hypot(ay - by)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_pythagorean() {
        let a = City::new("A", 0.0, 0.0);
        let b = City::new("B", 3.0, 4.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_distance_symmetric() {
        let a = City::new("A", 12.0, -7.5);
        let b = City::new("B", -3.0, 40.0);
        assert!((a.distance_to(&b) - b.distance_to(&a)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_distance_zero_iff_coincident() {
        let a = City::new("A", 5.0, 5.0);
        let same = City::new("B", 5.0, 5.0);
        let other = City::new("C", 5.0, 5.000_001);
        assert_eq!(a.distance_to(&same), 0.0);
        assert!(a.distance_to(&other) > 0.0);
    }

    #[test]
    fn test_distance_to_point() {
        let a = City::new("A", 10.0, 10.0);
        assert!((a.distance_to_point(10.0, 0.0) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_city_serde_shape() {
        let city = City::new("A", 1.0, 2.0);
        let json = serde_json::to_string(&city).ok();
        assert_eq!(json.as_deref(), Some(r#"{"id":"A","x":1.0,"y":2.0}"#));
    }
}
