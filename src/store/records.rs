//! Persisted records and the requests that create them.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{TourError, TourResult};
use crate::geometry::{distance, City};

/// A saved city layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    /// UUID v4.
    pub id: String,
    /// Display name (trimmed, never blank).
    pub name: String,
    /// Cities in placement order.
    pub cities: Vec<City>,
    /// Free-form client metadata.
    #[serde(default = "empty_meta")]
    pub meta: Value,
    /// Creation time, Unix milliseconds.
    pub created_at: u64,
}

impl Game {
    /// Number of cities in the layout.
    #[must_use]
    pub fn num_cities(&self) -> usize {
        self.cities.len()
    }
}

/// A scored route over a saved game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    /// UUID v4.
    pub id: String,
    /// Game the route was built on.
    pub game_id: String,
    /// Player display name.
    pub player_name: String,
    /// `human` or `bot-<strategy>`.
    pub agent_type: String,
    /// Recomputed distance when `verified`, otherwise the claimed one.
    pub distance: f64,
    /// Whether every label resolved and the distance was recomputed.
    #[serde(default)]
    pub verified: bool,
    /// Route as city labels.
    pub route: Vec<String>,
    /// City count of the game; `0` on records written before it was stored.
    #[serde(default)]
    pub num_cities: usize,
    /// Construction time reported by the client.
    #[serde(default)]
    pub compute_time_ms: u64,
    /// Submission time, Unix milliseconds.
    pub created_at: u64,
}

/// Whole database contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Database {
    /// Saved games in creation order.
    #[serde(default)]
    pub games: Vec<Game>,
    /// Submitted runs in submission order.
    #[serde(default)]
    pub runs: Vec<Run>,
}

impl Database {
    /// Look up a game by id.
    #[must_use]
    pub fn game(&self, id: &str) -> Option<&Game> {
        self.games.iter().find(|g| g.id == id)
    }
}

/// Request to save a game.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewGame {
    /// Requested name; blank or absent falls back to the store default.
    #[serde(default)]
    pub name: Option<String>,
    /// Cities in placement order.
    #[serde(default)]
    pub cities: Vec<City>,
    /// Client metadata; `{}` when absent.
    #[serde(default)]
    pub meta: Option<Value>,
}

/// Request to score a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSubmission {
    /// Target game.
    pub game_id: String,
    /// Player display name.
    pub player_name: String,
    /// `human` or `bot-<strategy>`.
    pub agent_type: String,
    /// Distance claimed by the client.
    pub distance: f64,
    /// Route as city labels.
    pub route: Vec<String>,
    /// Whole milliseconds; `0` for human routes.
    #[serde(default, deserialize_with = "lenient_millis")]
    pub compute_time_ms: u64,
}

impl RunSubmission {
    /// Fields a submission must carry.
    pub const REQUIRED: [&'static str; 5] =
        ["game_id", "player_name", "agent_type", "distance", "route"];

    /// Decode a JSON body, reporting every absent required field at once.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` if the body is not an object or a field has the
    ///   wrong type.
    /// - `MissingFields` listing absent required keys in declaration order.
    pub fn from_json(body: Value) -> TourResult<Self> {
        let Value::Object(map) = &body else {
            return Err(TourError::invalid_request("expected a JSON object"));
        };

        let missing: Vec<String> = Self::REQUIRED
            .iter()
            .filter(|key| !map.contains_key(**key))
            .map(|key| (*key).to_string())
            .collect();
        if !missing.is_empty() {
            return Err(TourError::MissingFields(missing));
        }

        serde_json::from_value(body).map_err(|e| TourError::invalid_request(e.to_string()))
    }
}

/// Accepts absent, `null`, integer or fractional values; fractions truncate
/// and anything negative or non-finite becomes `0`.
fn lenient_millis<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value
        .filter(|ms| ms.is_finite() && *ms > 0.0)
        .map_or(0, |ms| ms.trunc() as u64))
}

/// Paged listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Matching records before paging.
    pub total: usize,
    /// Records on this page.
    pub items: Vec<T>,
}

pub(crate) fn empty_meta() -> Value {
    Value::Object(Map::new())
}

/// Recompute a labelled route's length over a game's cities.
///
/// Rounded to four decimals. `None` if any label is not a city of the game.
#[must_use]
pub fn verify_distance(cities: &[City], route: &[String]) -> Option<f64> {
    let by_label: HashMap<&str, &City> = cities.iter().map(|c| (c.id.as_str(), c)).collect();

    let mut total = 0.0;
    for pair in route.windows(2) {
        let a = by_label.get(pair[0].as_str())?;
        let b = by_label.get(pair[1].as_str())?;
        total += distance(a.x, a.y, b.x, b.y);
    }
    Some(round4(total))
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
