//! City sets loaded from YAML.
//!
//! Lets the CLI solve layouts without the interactive canvas. Either a bare
//! list or a named mapping is accepted; missing labels are assigned in
//! creation order, the same way the game board labels clicks.
//!
//! # Example YAML
//!
//! ```yaml
//! name: "Square"
//! cities:
//!   - { id: A, x: 0, y: 0 }
//!   - { id: B, x: 10, y: 0 }
//!   - { x: 10, y: 10 }      # labelled C
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{TourError, TourResult};
use crate::game::city_label;
use crate::geometry::City;

#[derive(Debug, Deserialize)]
struct RawCity {
    #[serde(default)]
    id: Option<String>,
    x: f64,
    y: f64,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCitySet {
    List(Vec<RawCity>),
    Named {
        #[serde(default)]
        name: Option<String>,
        cities: Vec<RawCity>,
    },
}

/// Ordered, labelled city list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CitySet {
    /// Optional layout name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Cities in index order.
    pub cities: Vec<City>,
}

impl CitySet {
    /// Parse a city set from YAML.
    ///
    /// # Errors
    ///
    /// Returns `YamlParse` for malformed input and `InvalidRequest` for
    /// duplicate labels or non-finite coordinates.
    pub fn from_yaml(yaml: &str) -> TourResult<Self> {
        let (name, raw) = match serde_yaml::from_str(yaml)? {
            RawCitySet::List(cities) => (None, cities),
            RawCitySet::Named { name, cities } => (name, cities),
        };

        let mut seen = HashSet::with_capacity(raw.len());
        let mut cities = Vec::with_capacity(raw.len());
        for (index, city) in raw.into_iter().enumerate() {
            if !city.x.is_finite() || !city.y.is_finite() {
                return Err(TourError::invalid_request(format!(
                    "city {index} has non-finite coordinates"
                )));
            }
            let id = city.id.unwrap_or_else(|| city_label(index));
            if !seen.insert(id.clone()) {
                return Err(TourError::invalid_request(format!(
                    "duplicate city id '{id}'"
                )));
            }
            cities.push(City::new(id, city.x, city.y));
        }

        Ok(Self { name, cities })
    }

    /// Load a city set from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or fails [`Self::from_yaml`].
    pub fn load<P: AsRef<Path>>(path: P) -> TourResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Number of cities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_list() {
        let yaml = "- { id: A, x: 0, y: 0 }\n- { id: B, x: 3, y: 4 }\n";
        let set = CitySet::from_yaml(yaml);
        assert!(set.is_ok());
        let set = set.ok();
        assert_eq!(set.as_ref().map(CitySet::len), Some(2));
        assert_eq!(set.as_ref().and_then(|s| s.name.clone()), None);
        let b = set.as_ref().map(|s| s.cities[1].clone());
        assert_eq!(b, Some(City::new("B", 3.0, 4.0)));
    }

    #[test]
    fn test_parse_named_with_auto_labels() {
        let yaml = r"
name: Triangle
cities:
  - { x: 0, y: 0 }
  - { id: Home, x: 5, y: 0 }
  - { x: 0, y: 5 }
";
        let set = CitySet::from_yaml(yaml).ok();
        assert_eq!(set.as_ref().and_then(|s| s.name.as_deref()), Some("Triangle"));
        let ids: Vec<String> = set
            .map(|s| s.cities.into_iter().map(|c| c.id).collect())
            .unwrap_or_default();
        assert_eq!(ids, vec!["A", "Home", "C"]);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let yaml = "- { id: A, x: 0, y: 0 }\n- { id: A, x: 1, y: 1 }\n";
        assert!(matches!(
            CitySet::from_yaml(yaml),
            Err(TourError::InvalidRequest { .. })
        ));
    }

    #[test]
    fn test_non_finite_rejected() {
        let yaml = "- { x: .nan, y: 0 }\n";
        assert!(matches!(
            CitySet::from_yaml(yaml),
            Err(TourError::InvalidRequest { .. })
        ));
    }

    #[test]
    fn test_missing_coordinate_is_parse_error() {
        assert!(matches!(
            CitySet::from_yaml("- { id: A, x: 0 }\n"),
            Err(TourError::YamlParse(_))
        ));
    }

    #[test]
    fn test_empty_list_parses() {
        let set = CitySet::from_yaml("[]").ok();
        assert_eq!(set.map(|s| s.is_empty()), Some(true));
    }

    #[test]
    fn test_yaml_round_trip() {
        let set = CitySet {
            name: Some("Square".to_string()),
            cities: vec![City::new("A", 0.0, 0.0), City::new("B", 10.0, 0.0)],
        };
        let yaml = serde_yaml::to_string(&set).unwrap_or_default();
        assert_eq!(CitySet::from_yaml(&yaml).ok(), Some(set));
    }
}
